//! RUFUS Bullet Scorer
//!
//! Rubric-based 1-5 quality score for a listing's bullet points, modelled on
//! what an AI shopping assistant extracts from them.
//!
//! # Rubric
//! Start at 5.0 and deduct per violated dimension, in this fixed order:
//!
//! | # | dimension                                           | weight |
//! |---|-----------------------------------------------------|--------|
//! | 1 | bullet 1 leads with a benefit                       | 1.00   |
//! | 2 | bullet 2 names a target audience                    | 0.75   |
//! | 3 | bullet 3 differentiates from alternatives           | 0.75   |
//! | 4 | no vague marketing language without a number        | 0.50   |
//! | 5 | no ALL-CAPS runs                                    | 0.50   |
//! | 6 | every bullet making a claim backs it with a number  | 1.00   |
//!
//! A missing positional bullet violates its dimension. The score never drops
//! below 1.0. Suggestions follow the dimension order, so output is stable.

use catalog_common::Listing;
use serde::Serialize;

/// Highest possible score
pub const MAX_SCORE: f64 = 5.0;
/// Lowest possible score
pub const MIN_SCORE: f64 = 1.0;

const BENEFIT_TERMS: &[&str] = &[
    "help", "reduce", "improve", "enhance", "protect", "support", "boost", "strengthen",
    "promote", "relief", "relieve", "solve", "prevent", "save", "keep", "comfort",
    "soothe", "eliminate", "lasts",
];

const AUDIENCE_TERMS: &[&str] = &[
    "ideal for", "perfect for", "designed for", "made for", "great for", "suitable for",
    "built for", "for anyone", "for everyone", "whether you", "men", "women", "kid",
    "children", "adult", "teen", "toddler", "baby", "parent", "mom", "dad",
    "professional", "beginner", "athlete", "runner", "student", "senior", "traveler",
    "gamer", "chef", "user", "owner", "family", "families",
];

const DIFFERENTIATOR_TERMS: &[&str] = &[
    "only", "unique", "exclusive", "patented", "patent", "certified", "award", "unlike",
    "compared to", "compared with", "vs", "versus", "instead of", "alternative",
    "other brands", "competitor", "than",
];

const VAGUE_PHRASES: &[&str] = &[
    "premium quality", "high quality", "best in class", "world class", "industry leading",
    "revolutionary", "amazing", "incredible", "awesome", "best ever", "top quality",
    "superior quality", "unbeatable",
];

const CLAIM_TERMS: &[&str] = &[
    "better", "faster", "stronger", "longer", "lasting", "durable", "powerful", "efficient",
];

/// Rubric dimensions in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RubricDimension {
    BenefitLead,
    TargetAudience,
    Differentiation,
    VagueMarketing,
    AllCaps,
    MissingSpecifics,
}

impl RubricDimension {
    pub const ALL: [RubricDimension; 6] = [
        Self::BenefitLead,
        Self::TargetAudience,
        Self::Differentiation,
        Self::VagueMarketing,
        Self::AllCaps,
        Self::MissingSpecifics,
    ];

    /// Deduction applied when the dimension is violated
    pub fn weight(&self) -> f64 {
        match self {
            Self::BenefitLead => 1.0,
            Self::TargetAudience => 0.75,
            Self::Differentiation => 0.75,
            Self::VagueMarketing => 0.5,
            Self::AllCaps => 0.5,
            Self::MissingSpecifics => 1.0,
        }
    }

    /// Short description of the violation
    pub fn label(&self) -> &'static str {
        match self {
            Self::BenefitLead => "bullet 1 does not lead with a benefit",
            Self::TargetAudience => "bullet 2 does not say who it is for",
            Self::Differentiation => "bullet 3 does not differentiate",
            Self::VagueMarketing => "vague marketing language",
            Self::AllCaps => "ALL CAPS text",
            Self::MissingSpecifics => "claims without numbers or specs",
        }
    }

    /// Actionable fix
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::BenefitLead => "Lead bullet 1 with the #1 benefit: what problem does it solve?",
            Self::TargetAudience => "Say who bullet 2 is for: target user, use case, or lifestyle",
            Self::Differentiation => {
                "Differentiate in bullet 3: certifications, unique materials, or why this vs. others"
            }
            Self::VagueMarketing => "Replace vague marketing language with specific, factual claims",
            Self::AllCaps => "Use sentence case; reserve capitals for brand names",
            Self::MissingSpecifics => "Back claims with concrete specs (oz, count, %, time, dimensions)",
        }
    }
}

/// Score of one listing's bullets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletScore {
    /// 1.0-5.0
    pub score: f64,
    /// Violated dimensions in evaluation order
    pub violations: Vec<RubricDimension>,
    /// One suggestion per violation, same order
    pub suggestions: Vec<String>,
}

/// Rubric-based bullet scorer
#[derive(Debug, Clone, Default)]
pub struct BulletScorer;

impl BulletScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a listing's bullet points
    pub fn score(&self, listing: &Listing) -> BulletScore {
        let bullets: Vec<&str> = listing.bullets().map(|(_, text)| text).collect();

        let violations: Vec<RubricDimension> = RubricDimension::ALL
            .into_iter()
            .filter(|dimension| self.violates(*dimension, listing, &bullets))
            .collect();

        let deduction: f64 = violations.iter().map(|d| d.weight()).sum();
        let score = (MAX_SCORE - deduction).clamp(MIN_SCORE, MAX_SCORE);

        BulletScore {
            score,
            suggestions: violations.iter().map(|d| d.suggestion().to_string()).collect(),
            violations,
        }
    }

    fn violates(&self, dimension: RubricDimension, listing: &Listing, bullets: &[&str]) -> bool {
        match dimension {
            RubricDimension::BenefitLead => !positional_match(listing, 1, BENEFIT_TERMS),
            RubricDimension::TargetAudience => !positional_match(listing, 2, AUDIENCE_TERMS),
            RubricDimension::Differentiation => !positional_match(listing, 3, DIFFERENTIATOR_TERMS),
            RubricDimension::VagueMarketing => bullets.iter().any(|b| {
                let text = WordText::new(b);
                text.contains_any(VAGUE_PHRASES) && !has_number(b)
            }),
            RubricDimension::AllCaps => bullets.iter().any(|b| has_caps_run(b)),
            RubricDimension::MissingSpecifics => bullets.iter().any(|b| {
                let text = WordText::new(b);
                (text.contains_any(BENEFIT_TERMS) || text.contains_any(CLAIM_TERMS)) && !has_number(b)
            }),
        }
    }
}

fn positional_match(listing: &Listing, position: usize, terms: &[&str]) -> bool {
    listing
        .bullet(position)
        .map(|text| WordText::new(text).contains_any(terms))
        .unwrap_or(false)
}

/// Lowercased word view of a bullet for term matching
///
/// Single-word terms match whole words, allowing a plural or verb suffix
/// (`s`, `es`, `ed`, `ing`). Multi-word terms match as a word sequence.
struct WordText {
    words: Vec<String>,
    joined: String,
}

impl WordText {
    fn new(text: &str) -> Self {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();
        let joined = format!(" {} ", words.join(" "));
        Self { words, joined }
    }

    fn contains(&self, term: &str) -> bool {
        if term.contains(' ') {
            self.joined.contains(&format!(" {} ", term))
        } else {
            self.words.iter().any(|w| word_matches(w, term))
        }
    }

    fn contains_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|t| self.contains(t))
    }
}

fn word_matches(word: &str, term: &str) -> bool {
    if word == term {
        return true;
    }
    let Some(rest) = word.strip_prefix(term) else {
        // "reduce" -> "reducing"
        return term
            .strip_suffix('e')
            .and_then(|stem| word.strip_prefix(stem))
            .map(|rest| rest == "ing" || rest == "ed")
            .unwrap_or(false);
    };
    match rest {
        "s" | "es" | "ed" | "ing" => true,
        // "save" -> "saved"
        "d" => term.ends_with('e'),
        _ => false,
    }
}

fn has_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Two or more consecutive all-uppercase words of at least three letters
fn has_caps_run(text: &str) -> bool {
    let mut run = 0;
    for word in text.split_whitespace() {
        let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase()) {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
