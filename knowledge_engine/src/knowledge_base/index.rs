//! The 8-way pattern index.
//!
//! A triple `s p o` is a member of one bucket per subset of its positions
//! that stay bound: `s p o`, `s p ?`, `s ? o`, `s ? ?`, `? p o`, `? p ?`,
//! `? ? o` and `? ? ?`. Every possible query shape is then a single lookup.
//!
//! Add and delete both derive bucket keys through [`bucket_keys`], so the two
//! paths cannot disagree.

use std::collections::{HashMap, HashSet};

use super::entity::WILDCARD;
use super::TripleId;

const SUBJECT_BIT: usize = 0b100;
const PREDICATE_BIT: usize = 0b010;
const OBJECT_BIT: usize = 0b001;

/// Number of buckets every triple belongs to.
pub const BUCKETS_PER_TRIPLE: usize = 8;

/// Key of one bucket. `None` positions become the wildcard.
///
/// Tokens must already be canonical.
pub fn bucket_key(subject: Option<&str>, predicate: Option<&str>, object: Option<&str>) -> String {
    format!(
        "{} {} {}",
        subject.unwrap_or(WILDCARD),
        predicate.unwrap_or(WILDCARD),
        object.unwrap_or(WILDCARD)
    )
}

/// Keys of all buckets a canonical triple belongs to.
///
/// Index `0b111` is the exact-match key and index `0` is `? ? ?`.
pub fn bucket_keys(subject: &str, predicate: &str, object: &str) -> [String; BUCKETS_PER_TRIPLE] {
    std::array::from_fn(|mask| {
        let bound = |bit: usize, token| (mask & bit != 0).then_some(token);
        bucket_key(
            bound(SUBJECT_BIT, subject),
            bound(PREDICATE_BIT, predicate),
            bound(OBJECT_BIT, object),
        )
    })
}

/// Pattern key -> triples matching that pattern.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    buckets: HashMap<String, HashSet<TripleId>>,
}

impl PatternIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple to every bucket in `keys`.
    pub fn insert(&mut self, keys: &[String], id: TripleId) {
        for key in keys {
            self.buckets.entry(key.clone()).or_default().insert(id);
        }
    }

    /// Remove a triple from every bucket in `keys`, dropping emptied buckets.
    pub fn remove(&mut self, keys: &[String], id: TripleId) {
        for key in keys {
            if let Some(bucket) = self.buckets.get_mut(key) {
                bucket.remove(&id);
                if bucket.is_empty() {
                    self.buckets.remove(key);
                }
            }
        }
    }

    /// The bucket for a pattern key, if any triple matches it.
    pub fn bucket(&self, key: &str) -> Option<&HashSet<TripleId>> {
        self.buckets.get(key)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// How many buckets hold `id`. Scans everything; meant for checks.
    pub fn membership_count(&self, id: TripleId) -> usize {
        self.buckets.values().filter(|bucket| bucket.contains(&id)).count()
    }
}
