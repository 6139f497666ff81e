//! Candidate screens per object instance, plus per-screen ranking signals.

use std::collections::HashMap;

/// Reverse index: which screens mention which object instance, how often a
/// screen is linked from other screens, and whether it carries general
/// elements (alarm lamp, battery indicator).
#[derive(Debug, Default)]
pub struct CandidateIndex {
    /// Object instance -> screens mentioning it, in discovery order
    candidates: HashMap<String, Vec<String>>,
    /// Screen -> inbound links from other screens
    reference_counts: HashMap<String, u64>,
    /// Screens flagged as carrying general elements
    general: HashMap<String, bool>,
}

impl CandidateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `file` mentions `key`. Idempotent per (key, file) pair.
    pub fn register_reference(&mut self, key: &str, file: &str) {
        let list = self.candidates.entry(key.to_string()).or_default();
        if !list.iter().any(|f| f == file) {
            list.push(file.to_string());
        }
    }

    /// Count one inbound link to `file`.
    pub fn add_reference(&mut self, file: &str) {
        *self.reference_counts.entry(file.to_string()).or_insert(0) += 1;
    }

    /// Flag `file` as general-purpose. Never cleared within a run.
    pub fn mark_general(&mut self, file: &str) {
        self.general.insert(file.to_string(), true);
    }

    /// Screens mentioning `key`, empty for unknown keys.
    pub fn candidates_for(&self, key: &str) -> &[String] {
        self.candidates.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reference_count(&self, file: &str) -> u64 {
        self.reference_counts.get(file).copied().unwrap_or(0)
    }

    pub fn is_general(&self, file: &str) -> bool {
        self.general.get(file).copied().unwrap_or(false)
    }

    /// Number of distinct object instances seen.
    pub fn key_count(&self) -> usize {
        self.candidates.len()
    }

    /// Number of screens with at least one inbound link.
    pub fn linked_file_count(&self) -> usize {
        self.reference_counts.len()
    }

    /// All indexed instance keys (unordered).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.candidates.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_reference_is_idempotent() {
        let mut index = CandidateIndex::new();
        index.register_reference("MSR01:H01:Uwp", "a.psc");
        index.register_reference("MSR01:H01:Uwp", "a.psc");
        index.register_reference("MSR01:H01:Uwp", "b.psc");

        assert_eq!(index.candidates_for("MSR01:H01:Uwp"), ["a.psc", "b.psc"]);
    }

    #[test]
    fn unknown_key_has_no_candidates() {
        let index = CandidateIndex::new();
        assert!(index.candidates_for("MSR01:H01:Uwp").is_empty());
    }

    #[test]
    fn reference_counting_and_defaults() {
        let mut index = CandidateIndex::new();
        index.add_reference("a.psc");
        index.add_reference("a.psc");

        assert_eq!(index.reference_count("a.psc"), 2);
        assert_eq!(index.reference_count("b.psc"), 0);
    }

    #[test]
    fn general_flag_defaults_to_false() {
        let mut index = CandidateIndex::new();
        assert!(!index.is_general("a.psc"));

        index.mark_general("a.psc");
        index.mark_general("a.psc");
        assert!(index.is_general("a.psc"));
    }
}
