//! Item-name similarity (stage 2)
//!
//! Channel variants are not consistently named, so exact key matching misses
//! pairs like `Widget Pro 12oz (FBM)` / `Widget Pro 12 oz`. Names are
//! normalized and compared with normalized Levenshtein similarity.
//!
//! Thresholds:
//! - similarity ≥ 0.85: same product (default)
//! - numeric tokens must agree: `12oz` vs `16oz` is a different size, never a duplicate

use super::markers::ChannelMarkers;

/// Normalized Levenshtein comparison of item names
#[derive(Debug, Clone)]
pub struct NameSimilarity {
    threshold: f64,
}

impl Default for NameSimilarity {
    fn default() -> Self {
        Self { threshold: 0.85 }
    }
}

impl NameSimilarity {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity of two already-normalized names (0.0-1.0)
    pub fn score(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }

    /// Whether two normalized names denote the same product
    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        if numbers(a) != numbers(b) {
            return false;
        }
        self.score(a, b) >= self.threshold
    }
}

/// Normalize an item name for comparison
///
/// Lowercase, channel markers removed, every run of non-alphanumeric
/// characters collapsed to one space.
pub fn normalize_name(name: &str, markers: &ChannelMarkers) -> String {
    let stripped = markers.strip(name, " ").to_lowercase();
    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for c in stripped.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Digit runs in order of appearance
fn numbers(name: &str) -> Vec<&str> {
    name.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect()
}
