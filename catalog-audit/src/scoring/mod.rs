//! Bullet-point quality scoring

pub mod bullet_scorer;
pub mod tier;

pub use bullet_scorer::{BulletScore, BulletScorer, RubricDimension, MAX_SCORE, MIN_SCORE};
pub use tier::Tier;
