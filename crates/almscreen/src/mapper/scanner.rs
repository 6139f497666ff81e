//! PSC corpus scanner
//!
//! Walks one project screen directory (flat, subdirectories are not screen
//! locations), extracts object-instance references and screen-to-screen
//! links from each file, and builds the indexes the resolver ranks with.
//!
//! PSC files are Windows-1252 text. A file that is not valid Windows-1252
//! aborts the scan: a partially decoded corpus would produce a ranking that
//! silently drops candidates.

use super::candidates::CandidateIndex;
use super::error::{MapperError, Result};
use super::keystats::KeyStats;
use encoding_rs::WINDOWS_1252;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Library constructs that mark a screen as carrying general elements
const GENERAL_MARKERS: [&str; 2] = ["LIB;Alarm01.plb;Alarm01;", "LIB;BATT01_LED.plb;BATT01;"];

/// Byte values Windows-1252 leaves unassigned. The WHATWG decoder maps them
/// to C1 controls instead of failing, so they are rejected up front.
const CP1252_UNASSIGNED: [u8; 5] = [0x81, 0x8d, 0x8f, 0x90, 0x9d];

/// Statistics from a corpus scan
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    /// Number of PSC files scanned
    pub files_scanned: u64,
    /// Number of distinct object instances found
    pub instances_found: u64,
    /// Number of valid links between screen files
    pub links_found: u64,
}

/// Result of scanning one screen directory
#[derive(Debug)]
pub struct ScreenCorpus {
    dir: PathBuf,
    candidates: CandidateIndex,
    stats_by_file: HashMap<String, KeyStats>,
    scan_stats: ScanStats,
}

impl ScreenCorpus {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn candidates(&self) -> &CandidateIndex {
        &self.candidates
    }

    pub fn scan_stats(&self) -> ScanStats {
        self.scan_stats
    }

    /// Similarity of `key` to the instances shown on `file`.
    ///
    /// Scores are per screen file: a screen is ranked by how much of the
    /// queried key's subtree it shows, not by corpus-wide totals.
    pub fn keyscore(&self, file: &str, key: &str) -> u64 {
        self.stats_by_file
            .get(file)
            .map(|stats| stats.score(key))
            .unwrap_or(0)
    }
}

/// Screen corpus scanner with pre-compiled extraction patterns
pub struct ScreenScanner {
    /// `LIB;<plb>;<name>;<instance>;BMO:...` object references
    object_refs: Regex,
    /// `IBW;...;BMO<instance>;<instance>;` buttons with reinitialization
    reinit_buttons: Regex,
    /// `IBW;<target>;...;;` buttons linking another screen without reinit
    plain_links: Regex,
}

impl ScreenScanner {
    pub fn new() -> Self {
        Self {
            object_refs: Regex::new(r"LIB;[\w\s]+\.plb;\w+;([\w:]+);BMO:.+").unwrap(),
            reinit_buttons: Regex::new(r"IBW;[\w\s]+\.*\w*;\d+;\d+;\d+;\d+;BMO[\w:]+;([\w:]+);")
                .unwrap(),
            plain_links: Regex::new(r"IBW;([\w\s]+\.*\w*);\d+;\d+;\d+;\d+;;").unwrap(),
        }
    }

    /// Scan every PSC file directly inside `dir`, in directory-listing order.
    pub fn scan(&self, dir: &Path) -> Result<ScreenCorpus> {
        info!(dir = %dir.display(), "scanning screen corpus");

        let mut candidates = CandidateIndex::new();
        let mut stats_by_file: HashMap<String, KeyStats> = HashMap::new();
        let mut scan_stats = ScanStats::default();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| MapperError::Io(e.into()))?;
            if !entry.file_type().is_file() || !is_screen_file(entry.path()) {
                continue;
            }

            let path = entry.path().to_string_lossy().into_owned();
            debug!(file = %path, "analyzing screen file");
            let content = read_screen_file(entry.path())?;
            scan_stats.files_scanned += 1;

            let stats = stats_by_file.entry(path.clone()).or_default();
            for pattern in [&self.object_refs, &self.reinit_buttons] {
                for capture in pattern.captures_iter(&content) {
                    let instance = &capture[1];
                    candidates.register_reference(instance, &path);
                    stats.update(instance);
                }
            }

            // Links count per occurrence, and only towards screens that
            // actually exist in this corpus
            for capture in self.plain_links.captures_iter(&content) {
                let target = dir.join(&capture[1]);
                if target.is_file() {
                    candidates.add_reference(&target.to_string_lossy());
                    scan_stats.links_found += 1;
                }
            }

            if GENERAL_MARKERS.iter().any(|m| content.contains(m)) {
                candidates.mark_general(&path);
            }
        }

        scan_stats.instances_found = candidates.key_count() as u64;
        info!(
            files = scan_stats.files_scanned,
            instances = scan_stats.instances_found,
            links = scan_stats.links_found,
            "corpus scan complete"
        );

        Ok(ScreenCorpus {
            dir: dir.to_path_buf(),
            candidates,
            stats_by_file,
            scan_stats,
        })
    }
}

impl Default for ScreenScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_screen_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("psc"))
        .unwrap_or(false)
}

fn read_screen_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    if bytes.iter().any(|b| CP1252_UNASSIGNED.contains(b)) {
        return Err(MapperError::Decode {
            path: path.display().to_string(),
        });
    }
    let (content, _, _) = WINDOWS_1252.decode(&bytes);
    Ok(content.into_owned())
}
