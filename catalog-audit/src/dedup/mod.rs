//! Fulfillment-channel duplicate suppression
//!
//! The same product is often listed twice: once fulfilled by Amazon and once
//! as a merchant-fulfilled shadow listing. Auditing both doubles every
//! finding, so before any query runs the listings are grouped and only one
//! canonical listing per group is kept.
//!
//! # Grouping
//! Two explicit stages, each testable on its own:
//! 1. **markers** - one listing carries a channel marker in its SKU or item
//!    name and the marker-stripped keys are equal
//! 2. **similarity** - one listing carries a marker and the normalized item
//!    names are similar (normalized Levenshtein ≥ threshold)
//!
//! Each marked listing links to the single listing it shadows, preferring an
//! unmarked one; groups are the closure of those links. Two unmarked
//! listings never share a group, even through a marked third listing.
//!
//! # Canonical selection
//! First FBA listing of the group (input order), else the first listing.

pub mod markers;
pub mod similarity;

use catalog_common::config::DedupConfig;
use catalog_common::{FulfillmentChannel, Listing};
use std::collections::HashMap;
use tracing::{debug, info};

pub use markers::ChannelMarkers;
pub use similarity::{normalize_name, NameSimilarity};

/// A listing removed as a channel duplicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressedListing {
    pub row: usize,
    pub sku: String,
    /// SKU of the listing kept in its place
    pub canonical_sku: String,
}

/// Result of duplicate filtering
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Surviving listings in original relative order
    pub listings: Vec<Listing>,
    pub suppressed: Vec<SuppressedListing>,
}

impl FilterOutcome {
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }
}

/// Duplicate filter
#[derive(Debug, Clone)]
pub struct DuplicateFilter {
    include_fbm_duplicates: bool,
    markers: ChannelMarkers,
    similarity: NameSimilarity,
}

impl Default for DuplicateFilter {
    fn default() -> Self {
        Self {
            include_fbm_duplicates: false,
            markers: ChannelMarkers::default(),
            similarity: NameSimilarity::default(),
        }
    }
}

impl DuplicateFilter {
    /// Create filter from configuration
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            include_fbm_duplicates: config.include_fbm_duplicates,
            markers: ChannelMarkers::new(&config.markers),
            similarity: NameSimilarity::new(config.similarity_threshold),
        }
    }

    /// Keep channel duplicates (turns the filter into a no-op)
    pub fn include_fbm_duplicates(mut self, include: bool) -> Self {
        self.include_fbm_duplicates = include;
        self
    }

    /// Filter channel duplicates out of `listings`
    pub fn filter(&self, listings: &[Listing]) -> FilterOutcome {
        if self.include_fbm_duplicates {
            return FilterOutcome {
                listings: listings.to_vec(),
                suppressed: Vec::new(),
            };
        }

        let groups = self.groups(listings);
        let mut canonical_of: Vec<usize> = (0..listings.len()).collect();
        for group in &groups {
            let canonical = group
                .iter()
                .copied()
                .find(|&idx| self.effective_channel(&listings[idx]) == FulfillmentChannel::Fba)
                .unwrap_or(group[0]);
            for &idx in group {
                canonical_of[idx] = canonical;
            }
        }

        let mut outcome = FilterOutcome::default();
        for (idx, listing) in listings.iter().enumerate() {
            let canonical = canonical_of[idx];
            if canonical == idx {
                outcome.listings.push(listing.clone());
            } else {
                debug!(
                    row = listing.row_number,
                    sku = %listing.sku,
                    canonical_sku = %listings[canonical].sku,
                    "Suppressing channel duplicate"
                );
                outcome.suppressed.push(SuppressedListing {
                    row: listing.row_number,
                    sku: listing.sku.clone(),
                    canonical_sku: listings[canonical].sku.clone(),
                });
            }
        }

        if !outcome.suppressed.is_empty() {
            info!(
                suppressed = outcome.suppressed.len(),
                kept = outcome.listings.len(),
                "Skipped FBM/MFN duplicates (keeping FBA versions)"
            );
        }

        outcome
    }

    /// Duplicate groups (two or more members), each sorted by input index
    ///
    /// Groups are ordered by their first member.
    pub fn groups(&self, listings: &[Listing]) -> Vec<Vec<usize>> {
        let keys: Vec<ListingKeys> = listings
            .iter()
            .map(|l| ListingKeys::new(l, &self.markers))
            .collect();

        let mut sets = DisjointSet::new(listings.len());
        for (idx, listing) in listings.iter().enumerate() {
            if !keys[idx].is_marked() {
                continue;
            }
            if let Some(other) = self.counterpart(idx, &keys) {
                debug!(
                    sku = %listing.sku,
                    counterpart_sku = %listings[other].sku,
                    "Channel shadow linked"
                );
                sets.union(idx, other);
            }
        }

        let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
        for idx in 0..listings.len() {
            by_root.entry(sets.find(idx)).or_default().push(idx);
        }
        let mut groups: Vec<Vec<usize>> = by_root
            .into_values()
            .filter(|members| members.len() > 1)
            .collect();
        groups.sort_by_key(|members| members[0]);
        groups
    }

    /// The one listing a marked listing shadows
    ///
    /// Unmarked listings are searched first; another marked listing is only
    /// chosen when no unmarked one matches. Every marked listing links to at
    /// most one counterpart and unmarked listings never link, so a group
    /// holds at most one unmarked listing.
    fn counterpart(&self, idx: usize, keys: &[ListingKeys]) -> Option<usize> {
        for marked in [false, true] {
            let pool: Vec<usize> = (0..keys.len())
                .filter(|&j| j != idx && keys[j].is_marked() == marked)
                .collect();
            let found = marker_match(&keys[idx], &pool, keys)
                .or_else(|| self.similar_match(&keys[idx], &pool, keys));
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Stage 2: the most similar normalized name (earliest on ties)
    fn similar_match(&self, this: &ListingKeys, pool: &[usize], keys: &[ListingKeys]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &j in pool {
            let other = &keys[j].normalized;
            if !self.similarity.is_similar(&this.normalized, other) {
                continue;
            }
            let score = self.similarity.score(&this.normalized, other);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((j, score));
            }
        }
        best.map(|(j, _)| j)
    }

    /// Declared channel, or the channel implied by a SKU marker when unknown
    pub fn effective_channel(&self, listing: &Listing) -> FulfillmentChannel {
        match listing.fulfillment_channel {
            FulfillmentChannel::Unknown => self
                .markers
                .channel_hint(&listing.sku)
                .unwrap_or(FulfillmentChannel::Unknown),
            known => known,
        }
    }
}

/// Comparison keys of one listing
struct ListingKeys {
    sku_key: String,
    name_key: String,
    normalized: String,
    sku_marked: bool,
    name_marked: bool,
}

impl ListingKeys {
    fn new(listing: &Listing, markers: &ChannelMarkers) -> Self {
        Self {
            sku_key: markers.sku_key(&listing.sku),
            name_key: markers.name_key(&listing.item_name),
            normalized: normalize_name(&listing.item_name, markers),
            sku_marked: markers.contains_marker(&listing.sku),
            name_marked: markers.contains_marker(&listing.item_name),
        }
    }

    fn is_marked(&self) -> bool {
        self.sku_marked || self.name_marked
    }
}

/// Stage 1: equal marker-stripped SKU, then equal marker-stripped item name
///
/// A key only counts when `this` carries the marker in that same column.
fn marker_match(this: &ListingKeys, pool: &[usize], keys: &[ListingKeys]) -> Option<usize> {
    let by_sku = || {
        pool.iter()
            .copied()
            .find(|&j| this.sku_marked && !this.sku_key.is_empty() && keys[j].sku_key == this.sku_key)
    };
    let by_name = || {
        pool.iter()
            .copied()
            .find(|&j| this.name_marked && !this.name_key.is_empty() && keys[j].name_key == this.name_key)
    };
    by_sku().or_else(by_name)
}

/// Union-find over listing indices; the smallest index is always the root
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = idx;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}
