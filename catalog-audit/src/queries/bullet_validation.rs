//! Bullet point content and formatting queries
//!
//! Product descriptions are never checked here; different content rules
//! apply to them.
//!
//! # Prohibited content (per bullet, severity required)
//! - special characters from `rules.bullet_special_chars`
//! - emoji: `rules.bullet_emojis` plus the Unicode pictographic blocks
//! - placeholder text (first matching pattern only)
//! - prohibited claims and guarantee language (case-insensitive substring)
//!
//! # Formatting (severity warning)
//! - starts with a lowercase letter
//! - length outside `[bullet_min_length, bullet_max_length]` characters
//! - ends with `.`, `!` or `?`
//! - fewer than `min_bullet_count` bullets on the listing

use catalog_common::listing::bullet_field_name;
use catalog_common::rules::{find_chars, join_chars};
use catalog_common::{Issue, RuleSet, Severity};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

use super::excerpt;
use crate::types::{PluginError, QueryContext, QueryPlugin};

/// Unicode blocks treated as emoji
const PICTOGRAPHIC_RANGES: [(u32, u32); 3] = [
    (0x2600, 0x27BF),   // Miscellaneous Symbols, Dingbats
    (0x1F000, 0x1FAFF), // Mahjong through Symbols and Pictographs Extended-A
    (0x2B50, 0x2B55),   // stars and circles
];

fn is_pictographic(c: char) -> bool {
    let code = c as u32;
    PICTOGRAPHIC_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&code))
}

pub struct BulletProhibitedContentQuery;

impl QueryPlugin for BulletProhibitedContentQuery {
    fn name(&self) -> &str {
        "bullet-prohibited-content"
    }

    fn description(&self) -> &str {
        "Find bullet points with prohibited content (chars, emojis, claims, placeholders)"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let checker = ContentChecker::new(ctx.rules)?;
        let mut issues = Vec::new();

        for listing in ctx.listings {
            for (position, text) in listing.bullets() {
                let violations = checker.violations(text);
                if violations.is_empty() {
                    continue;
                }
                let field = bullet_field_name(position);
                let details = format!(
                    "{}: {} (text: \"{}\")",
                    field,
                    violations.join("; "),
                    excerpt(text)
                );
                issues.push(Issue::for_listing(listing, field, Severity::Required, details));
            }
        }

        Ok(issues)
    }
}

/// Compiled prohibited-content rules
struct ContentChecker<'a> {
    rules: &'a RuleSet,
    placeholders: Vec<Regex>,
    claims: Vec<String>,
    guarantees: Vec<String>,
}

impl<'a> ContentChecker<'a> {
    fn new(rules: &'a RuleSet) -> Result<Self, PluginError> {
        let placeholders = rules
            .placeholder_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        PluginError::Failed(format!(
                            "invalid placeholder pattern '{}': {}",
                            pattern, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            placeholders,
            claims: lowercase_all(&rules.prohibited_claims),
            guarantees: lowercase_all(&rules.guarantee_phrases),
        })
    }

    fn violations(&self, text: &str) -> Vec<String> {
        let mut violations = Vec::new();

        let special = find_chars(text, &self.rules.bullet_special_chars);
        if !special.is_empty() {
            violations.push(format!("Prohibited special characters: {}", join_chars(&special)));
        }

        let emojis: BTreeSet<char> = text
            .chars()
            .filter(|c| self.rules.bullet_emojis.contains(*c) || is_pictographic(*c))
            .collect();
        if !emojis.is_empty() {
            violations.push(format!("Emojis not allowed: {}", join_chars(&emojis)));
        }

        if let Some(found) = self.placeholders.iter().find_map(|re| re.find(text)) {
            violations.push(format!("Placeholder text: '{}'", found.as_str()));
        }

        let lower = text.to_lowercase();
        for claim in self.claims.iter().filter(|c| lower.contains(c.as_str())) {
            violations.push(format!("Prohibited claim: '{}'", claim));
        }
        for phrase in self.guarantees.iter().filter(|g| lower.contains(g.as_str())) {
            violations.push(format!("Guarantee language not allowed: '{}'", phrase));
        }

        violations
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

pub struct BulletFormattingQuery;

impl QueryPlugin for BulletFormattingQuery {
    fn name(&self) -> &str {
        "bullet-formatting"
    }

    fn description(&self) -> &str {
        "Check bullet point formatting (capitalization, length, punctuation)"
    }

    fn evaluate(&self, ctx: &QueryContext<'_>) -> Result<Vec<Issue>, PluginError> {
        let rules = ctx.rules;
        let mut issues = Vec::new();

        for listing in ctx.listings {
            let mut count = 0;

            for (position, raw) in listing.bullets() {
                count += 1;
                let violations = format_violations(raw.trim(), rules);
                if violations.is_empty() {
                    continue;
                }
                let field = bullet_field_name(position);
                let details = format!(
                    "{}: {} (text: \"{}\")",
                    field,
                    violations.join("; "),
                    excerpt(raw)
                );
                issues.push(Issue::for_listing(listing, field, Severity::Warning, details));
            }

            if count < rules.min_bullet_count {
                issues.push(Issue::for_listing(
                    listing,
                    "Bullet Points",
                    Severity::Warning,
                    format!(
                        "Only {} bullet point(s) found; at least {} recommended",
                        count, rules.min_bullet_count
                    ),
                ));
            }
        }

        Ok(issues)
    }
}

fn format_violations(text: &str, rules: &RuleSet) -> Vec<String> {
    let mut violations = Vec::new();

    if text.chars().next().is_some_and(char::is_lowercase) {
        violations.push("Must begin with capital letter".to_string());
    }

    let length = text.chars().count();
    if length < rules.bullet_min_length {
        violations.push(format!(
            "Too short ({} chars, minimum {})",
            length, rules.bullet_min_length
        ));
    } else if length > rules.bullet_max_length {
        violations.push(format!(
            "Too long ({} chars, maximum {})",
            length, rules.bullet_max_length
        ));
    }

    if let Some(last) = text.chars().last().filter(|c| matches!(c, '.' | '!' | '?')) {
        violations.push(format!("Should not end with '{}'", last));
    }

    violations
}
