//! Screen resolution and change computation
//!
//! Two ranking strategies exist because projects come in two generations:
//! older ones rely on heuristics over the corpus indexes, newer ones encode
//! the correct screen directly in the file naming convention. The strategy
//! is picked once per run and passed into the resolver; nothing here reads
//! process-wide state.

use super::datapoints::{AlarmRegistry, GCNAME_SUBKEY, REINIT_SUBKEY};
use super::error::Result;
use super::keypath;
use super::scanner::ScreenCorpus;
use indexmap::IndexMap;
use std::path::Path;
use tracing::{info, warn};

/// Ranking strategy selector, fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    /// Rank by general-purpose flag, key similarity and inbound links
    Heuristic,
    /// Rank by file name only (naming-convention projects)
    Filename,
}

impl RankingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::Filename => "filename",
        }
    }
}

/// Outcome of resolving one object instance.
///
/// "No candidate" is a routine result, recovered by the caller; it is
/// deliberately not an error variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Full path of the best-suited screen file
    Resolved(String),
    /// No screen file references the instance
    NoCandidate,
}

/// Picks the best screen among several candidates.
///
/// Only consulted for instances with two or more candidates; the
/// single-candidate case never reaches a strategy.
trait RankingStrategy {
    fn select<'a>(&self, instance: &str, candidates: &'a [String], corpus: &ScreenCorpus)
        -> &'a str;
}

/// Sort ascending by (general flag, key similarity, inbound links); the
/// best candidate ends up last. The stable sort keeps discovery order on
/// full ties.
struct HeuristicRanking;

impl RankingStrategy for HeuristicRanking {
    fn select<'a>(
        &self,
        instance: &str,
        candidates: &'a [String],
        corpus: &ScreenCorpus,
    ) -> &'a str {
        let mut ranked: Vec<&'a String> = candidates.iter().collect();
        ranked.sort_by_key(|file| {
            (
                corpus.candidates().is_general(file),
                corpus.keyscore(file, instance),
                corpus.candidates().reference_count(file),
            )
        });
        ranked[ranked.len() - 1]
    }
}

/// Sort descending by full file identifier and take the last, i.e. the
/// lexically smallest name. Corpus signals are ignored.
struct FilenameRanking;

impl RankingStrategy for FilenameRanking {
    fn select<'a>(
        &self,
        _instance: &str,
        candidates: &'a [String],
        _corpus: &ScreenCorpus,
    ) -> &'a str {
        let mut ranked: Vec<&'a String> = candidates.iter().collect();
        ranked.sort_by(|a, b| b.cmp(a));
        ranked[ranked.len() - 1]
    }
}

/// Ordered set of datapoint writes; a datapoint appears at most once and
/// keeps its discovery position.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: IndexMap<String, String>,
}

impl ChangeSet {
    fn record(&mut self, datapoint: &str, screen: &str) {
        self.changes
            .insert(datapoint.to_string(), screen.to_string());
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn screen_for(&self, datapoint: &str) -> Option<&str> {
        self.changes.get(datapoint).map(String::as_str)
    }
}

/// Resolves object instances to screen files and diffs the result against
/// the stored mappings.
pub struct ScreenResolver<'a> {
    corpus: &'a ScreenCorpus,
    strategy: Box<dyn RankingStrategy>,
}

impl<'a> ScreenResolver<'a> {
    pub fn new(corpus: &'a ScreenCorpus, mode: RankingMode) -> Self {
        let strategy: Box<dyn RankingStrategy> = match mode {
            RankingMode::Heuristic => Box::new(HeuristicRanking),
            RankingMode::Filename => Box::new(FilenameRanking),
        };
        Self { corpus, strategy }
    }

    /// Best-suited screen file for an object instance.
    pub fn resolve(&self, instance: &str) -> Resolution {
        let candidates = self.corpus.candidates().candidates_for(instance);
        match candidates {
            [] => Resolution::NoCandidate,
            [only] => Resolution::Resolved(only.clone()),
            _ => Resolution::Resolved(
                self.strategy
                    .select(instance, candidates, self.corpus)
                    .to_string(),
            ),
        }
    }

    /// Diff freshly resolved mappings against the stored state.
    ///
    /// A datapoint enters the change set when its mapping differs, or when
    /// one of its companion subkeys no longer carries the datapoint's root
    /// node (the object moved to another controller, or the project
    /// predates the companion keys). Datapoints that resolve to no screen
    /// are skipped.
    pub fn compute_changes(&self, registry: &AlarmRegistry) -> Result<ChangeSet> {
        let mut changes = ChangeSet::default();
        let mut total = 0usize;
        let mut unmapped = 0usize;

        for (datapoint, instance) in registry.bound() {
            total += 1;
            let screen_path = match self.resolve(instance) {
                Resolution::Resolved(path) => path,
                Resolution::NoCandidate => {
                    unmapped += 1;
                    warn!(
                        datapoint,
                        instance, "no screen file references this instance, leaving unmapped"
                    );
                    continue;
                }
            };

            let proposed = basename(&screen_path);
            if registry.current_screen(datapoint) != proposed {
                changes.record(datapoint, &proposed);
            }

            let root = keypath::root(datapoint)?;
            for subkey in [GCNAME_SUBKEY, REINIT_SUBKEY] {
                let companion = format!("{datapoint}:{subkey}");
                if registry.recorded_value(&companion) != root {
                    changes.record(datapoint, &proposed);
                }
            }
        }

        info!(
            datapoints = total,
            current = registry.mapping_count(),
            unmapped,
            changed = changes.len(),
            "change computation complete"
        );
        Ok(changes)
    }
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::scanner::ScreenScanner;
    use almscreen_dms::MemoryDms;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const KEY: &str = "MSR01:H01:Uwp";

    fn object_ref(instance: &str) -> String {
        format!("LIB;uwp01.plb;uwp01;{instance};BMO:{instance}\n")
    }

    fn write_screen(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content.as_bytes()).unwrap();
    }

    fn scan(dir: &Path) -> ScreenCorpus {
        ScreenScanner::new().scan(dir).unwrap()
    }

    fn resolved(resolver: &ScreenResolver, instance: &str) -> String {
        match resolver.resolve(instance) {
            Resolution::Resolved(path) => basename(&path),
            Resolution::NoCandidate => panic!("expected a screen for {instance}"),
        }
    }

    #[test]
    fn unknown_instance_has_no_candidate() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "a.psc", &object_ref(KEY));
        let corpus = scan(temp.path());

        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        assert_eq!(resolver.resolve("MSR99:Nope"), Resolution::NoCandidate);
    }

    #[test]
    fn single_candidate_bypasses_ranking() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "only.psc", &object_ref(KEY));
        let corpus = scan(temp.path());

        for mode in [RankingMode::Heuristic, RankingMode::Filename] {
            let resolver = ScreenResolver::new(&corpus, mode);
            assert_eq!(resolved(&resolver, KEY), "only.psc");
        }
    }

    #[test]
    fn general_screen_outranks_similarity_and_links() {
        let temp = TempDir::new().unwrap();
        // busy.psc shows the whole subtree and is linked from a third screen
        let busy = format!(
            "{}{}{}",
            object_ref(KEY),
            object_ref("MSR01:H01:Fuehler"),
            object_ref("MSR01:H02:Uwp")
        );
        write_screen(temp.path(), "busy.psc", &busy);
        let lamp = format!("{}LIB;Alarm01.plb;Alarm01;\n", object_ref(KEY));
        write_screen(temp.path(), "lamp.psc", &lamp);
        write_screen(temp.path(), "index.psc", "IBW;busy.psc;1;2;3;4;;\n");
        let corpus = scan(temp.path());

        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        assert_eq!(resolved(&resolver, KEY), "lamp.psc");
    }

    #[test]
    fn similarity_decides_when_generality_ties() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "sparse.psc", &object_ref(KEY));
        let dense = format!(
            "{}{}{}",
            object_ref(KEY),
            object_ref("MSR01:H01:Fuehler"),
            object_ref("MSR01:H01:Waf")
        );
        write_screen(temp.path(), "dense.psc", &dense);
        let corpus = scan(temp.path());

        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        assert_eq!(resolved(&resolver, KEY), "dense.psc");
    }

    #[test]
    fn inbound_links_break_similarity_ties() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "lonely.psc", &object_ref(KEY));
        write_screen(temp.path(), "popular.psc", &object_ref(KEY));
        write_screen(
            temp.path(),
            "index.psc",
            "IBW;popular.psc;1;2;3;4;;\nIBW;popular.psc;5;6;7;8;;\n",
        );
        let corpus = scan(temp.path());

        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        assert_eq!(resolved(&resolver, KEY), "popular.psc");
    }

    #[test]
    fn filename_mode_picks_lexically_smallest() {
        let temp = TempDir::new().unwrap();
        // zz would win every heuristic signal; filename mode ignores them
        let busy = format!("{}{}", object_ref(KEY), object_ref("MSR01:H01:Fuehler"));
        write_screen(temp.path(), "zz_uwp.psc", &busy);
        write_screen(temp.path(), "aa_uwp.psc", &object_ref(KEY));
        let corpus = scan(temp.path());

        let resolver = ScreenResolver::new(&corpus, RankingMode::Filename);
        assert_eq!(resolved(&resolver, KEY), "aa_uwp.psc");
    }

    fn registry_for(dms: &mut MemoryDms) -> AlarmRegistry {
        AlarmRegistry::collect(dms).unwrap()
    }

    #[test]
    fn up_to_date_mapping_yields_empty_change_set() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "screenA.psc", &object_ref("PLC2:Valve1"));
        let corpus = scan(temp.path());

        let mut dms = MemoryDms::new();
        dms.insert("PLC2:Valve1:OBJECT", "valve");
        dms.insert("PLC2:Valve1", "0");
        dms.mark_alarm("PLC2:Valve1");
        dms.insert("PLC2:Valve1:ALM:Screen", "screenA.psc");
        dms.insert("PLC2:Valve1:ALM:Screen:GcName", "PLC2");
        dms.insert("PLC2:Valve1:ALM:Screen:ReInit", "PLC2");

        let registry = registry_for(&mut dms);
        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        let changes = resolver.compute_changes(&registry).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn stale_companion_root_forces_rewrite() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "screenA.psc", &object_ref("PLC2:Valve1"));
        let corpus = scan(temp.path());

        let mut dms = MemoryDms::new();
        dms.insert("PLC2:Valve1:OBJECT", "valve");
        dms.insert("PLC2:Valve1", "0");
        dms.mark_alarm("PLC2:Valve1");
        // Mapping is already correct, but the companion keys still carry
        // the controller the object was moved away from
        dms.insert("PLC2:Valve1:ALM:Screen", "screenA.psc");
        dms.insert("PLC2:Valve1:ALM:Screen:GcName", "PLC1");
        dms.insert("PLC2:Valve1:ALM:Screen:ReInit", "PLC1");

        let registry = registry_for(&mut dms);
        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        let changes = resolver.compute_changes(&registry).unwrap();
        assert_eq!(changes.screen_for("PLC2:Valve1"), Some("screenA.psc"));
    }

    #[test]
    fn missing_companion_keys_force_rewrite() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "screenA.psc", &object_ref("PLC2:Valve1"));
        let corpus = scan(temp.path());

        let mut dms = MemoryDms::new();
        dms.insert("PLC2:Valve1:OBJECT", "valve");
        dms.insert("PLC2:Valve1", "0");
        dms.mark_alarm("PLC2:Valve1");
        dms.insert("PLC2:Valve1:ALM:Screen", "screenA.psc");

        let registry = registry_for(&mut dms);
        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        let changes = resolver.compute_changes(&registry).unwrap();
        assert_eq!(changes.screen_for("PLC2:Valve1"), Some("screenA.psc"));
    }

    #[test]
    fn unresolvable_instance_is_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        write_screen(temp.path(), "other.psc", &object_ref("PLC9:Other"));
        let corpus = scan(temp.path());

        let mut dms = MemoryDms::new();
        dms.insert("PLC2:Valve1:OBJECT", "valve");
        dms.insert("PLC2:Valve1", "0");
        dms.mark_alarm("PLC2:Valve1");

        let registry = registry_for(&mut dms);
        let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);
        let changes = resolver.compute_changes(&registry).unwrap();
        assert!(changes.is_empty());
    }
}
