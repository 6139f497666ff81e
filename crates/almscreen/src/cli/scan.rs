//! Scan command - inspect a screen corpus without a DMS
//!
//! Reports what the resolver would see: file and instance counts, screens
//! carrying general elements, and every instance referenced by more than
//! one screen together with its heuristic winner.

use crate::cli::output::print_table;
use crate::mapper::{RankingMode, Resolution, ScreenResolver, ScreenScanner};
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Arguments for the scan command
#[derive(Debug)]
pub struct ScanArgs {
    pub path: PathBuf,
    pub json: bool,
}

/// An instance referenced by more than one screen
#[derive(Debug, Serialize)]
struct AmbiguousInstance {
    instance: String,
    candidates: usize,
    best: String,
}

/// Complete scan report
#[derive(Debug, Serialize)]
struct ScanReport {
    files_scanned: u64,
    instances_found: u64,
    links_found: u64,
    ambiguous: Vec<AmbiguousInstance>,
}

/// Execute the scan command
pub fn run(args: ScanArgs) -> Result<()> {
    if !args.path.is_dir() {
        bail!("Not a directory: {}", args.path.display());
    }

    let corpus = ScreenScanner::new().scan(&args.path)?;
    let resolver = ScreenResolver::new(&corpus, RankingMode::Heuristic);

    let mut instances: Vec<&str> = corpus.candidates().keys().collect();
    instances.sort_unstable();

    let mut ambiguous = Vec::new();
    for instance in instances {
        let candidates = corpus.candidates().candidates_for(instance);
        if candidates.len() < 2 {
            continue;
        }
        let best = match resolver.resolve(instance) {
            Resolution::Resolved(path) => basename(&path),
            Resolution::NoCandidate => continue,
        };
        ambiguous.push(AmbiguousInstance {
            instance: instance.to_string(),
            candidates: candidates.len(),
            best,
        });
    }

    let stats = corpus.scan_stats();
    let report = ScanReport {
        files_scanned: stats.files_scanned,
        instances_found: stats.instances_found,
        links_found: stats.links_found,
        ambiguous,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Scanned {} screen files: {} object instances, {} screen links",
        report.files_scanned, report.instances_found, report.links_found
    );

    if report.ambiguous.is_empty() {
        println!("No instance is referenced by more than one screen.");
    } else {
        println!();
        let rows = report
            .ambiguous
            .iter()
            .map(|a| {
                vec![
                    a.instance.clone(),
                    a.candidates.to_string(),
                    a.best.clone(),
                ]
            })
            .collect();
        print_table(&["Instance", "Screens", "Best match"], rows);
    }

    Ok(())
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
