//! Datapoint key statistics for one screen file.
//!
//! Counts how often prefixes of object-instance keys occur in a screen's
//! content. The more instances of a subtree a screen shows, the higher a
//! queried key from that subtree scores, so screens showing an instance's
//! neighbours win the ranking.
//!
//! Example: a screen referencing `MSR01:H01:Uwp`, `MSR01:H01:Fuehler` and
//! `MSR01:H02:Uwp` scores a query for `MSR01:H01:Waf` higher than a query
//! for `MSR02:H10:Uwp` (no shared prefix, score 0).

use super::keypath;
use std::collections::HashMap;

/// Prefix occurrence counts, additive within a run, never decremented.
#[derive(Debug, Default)]
pub struct KeyStats {
    counts: HashMap<String, u64>,
}

impl KeyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every ancestor prefix of `key` once. No-op on an empty key.
    pub fn update(&mut self, key: &str) {
        for prefix in keypath::ancestor_prefixes(key) {
            *self.counts.entry(prefix).or_insert(0) += 1;
        }
    }

    /// Similarity of `key` to the recorded keys: the sum of the stored
    /// counts over its ancestor prefixes. Absent prefixes count as zero;
    /// an empty key scores zero.
    pub fn score(&self, key: &str) -> u64 {
        keypath::ancestor_prefixes(key)
            .iter()
            .map(|prefix| self.counts.get(prefix).copied().unwrap_or(0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_scores_zero() {
        let mut stats = KeyStats::new();
        stats.update("MSR01:H01:Uwp");
        assert_eq!(stats.score("MSR02:H10:Uwp"), 0);
        assert_eq!(stats.score(""), 0);
    }

    #[test]
    fn shared_prefixes_accumulate() {
        let mut stats = KeyStats::new();
        stats.update("MSR01:H01:Uwp");
        stats.update("MSR01:H01:Fuehler");
        stats.update("MSR01:H02:Uwp");

        // Neighbours in the same subtree outscore a different subtree
        assert!(stats.score("MSR01:H01:Waf") > stats.score("MSR01:H99:Waf"));
        assert_eq!(stats.score("MSR02:H01:Waf"), 0);
    }

    #[test]
    fn repeated_updates_scale_linearly() {
        // Prefixes of a single-segment key are just the segment itself
        let mut stats = KeyStats::new();
        for _ in 0..4 {
            stats.update("MSR01");
        }
        assert_eq!(stats.score("MSR01"), 4);

        // A three-segment key contributes its first segment twice per
        // update, so one update already scores 2 + 2 + 1
        let mut stats = KeyStats::new();
        stats.update("MSR01:H01:Uwp");
        assert_eq!(stats.score("MSR01:H01:Uwp"), 5);
        stats.update("MSR01:H01:Uwp");
        assert_eq!(stats.score("MSR01:H01:Uwp"), 10);
    }
}
