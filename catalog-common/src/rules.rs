//! Rule configuration data
//!
//! Character sets, phrase lists and thresholds consumed by the audit
//! queries. Everything here is data: the queries hold the logic, the
//! `[rules]` table of the TOML config may override any value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configurable rule data for all built-in queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Characters not allowed in Title, Brand and Item Name
    pub prohibited_chars: String,
    /// Characters not allowed in titles
    pub title_prohibited_chars: String,
    /// Maximum title length in characters
    pub max_title_length: usize,
    /// Special characters not allowed in bullet points
    pub bullet_special_chars: String,
    /// Emoji explicitly listed as prohibited (pictographic ranges are always checked)
    pub bullet_emojis: String,
    /// Case-insensitive regular expressions for placeholder text
    pub placeholder_patterns: Vec<String>,
    /// Claims that may not appear in bullets (lowercase substring match)
    pub prohibited_claims: Vec<String>,
    /// Guarantee or warranty phrasing not allowed in bullets
    pub guarantee_phrases: Vec<String>,
    pub bullet_min_length: usize,
    pub bullet_max_length: usize,
    /// Listings with fewer bullets are flagged
    pub min_bullet_count: usize,
    /// Listings scoring below this are reported by `rufus-bullets`
    pub rufus_threshold: f64,
    /// Template columns that are expected to stay empty
    pub always_unused: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            prohibited_chars: "!$?_{}^¬¦<>".to_string(),
            title_prohibited_chars: "!$?_{}^¬¦".to_string(),
            max_title_length: 200,
            bullet_special_chars: "™®€…†‡°¢£¥©±~â".to_string(),
            bullet_emojis: "☺☹✅❌".to_string(),
            placeholder_patterns: to_strings(&[
                r"\bnot applicable\b",
                r"\bNA\b",
                r"\bn/a\b",
                r"\bTBD\b",
                r"\bcopy pending\b",
            ]),
            prohibited_claims: to_strings(&[
                "eco-friendly",
                "anti-microbial",
                "anti-bacterial",
                "antibacterial",
                "antimicrobial",
            ]),
            guarantee_phrases: to_strings(&[
                "full refund",
                "unconditional guarantee",
                "money back guarantee",
                "100% guarantee",
            ]),
            bullet_min_length: 10,
            bullet_max_length: 255,
            min_bullet_count: 3,
            rufus_threshold: 4.0,
            always_unused: to_strings(&[
                "Status",
                "Parent SKU",
                "Parentage",
                "Variation Theme",
                "Update Delete",
                "Product Tax Code",
            ]),
        }
    }
}

/// Characters of `set` occurring in `text`, sorted and de-duplicated
pub fn find_chars(text: &str, set: &str) -> BTreeSet<char> {
    text.chars().filter(|c| set.contains(*c)).collect()
}

/// Render a character set as "a, b, c"
pub fn join_chars(chars: &BTreeSet<char>) -> String {
    chars
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
