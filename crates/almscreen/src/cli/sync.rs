//! Sync command - resolve and write alarm screen mappings
//!
//! The full run: connect to the DMS, detect the ranking mode, scan the
//! project's screen corpus, collect the alarm datapoints, optionally export
//! a backup of the stored mappings, compute the change set and write it.

use crate::mapper::datapoints::{GCNAME_SUBKEY, REINIT_SUBKEY, SCREEN_SUBKEY};
use crate::mapper::{
    keypath, AlarmRegistry, BackupRecord, MapperError, RankingMode, ScreenResolver, ScreenScanner,
};
use almscreen_dms::{DmsClient, DmsStore};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Arguments for the sync command
#[derive(Debug)]
pub struct SyncArgs {
    pub host: String,
    pub port: u16,
    pub dry_run: bool,
    pub backup: bool,
}

/// Summary of one sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Screen files scanned
    pub files_scanned: u64,
    /// Alarm datapoints found in the store
    pub datapoints: usize,
    /// Datapoints whose mapping changed
    pub changed: usize,
    /// Datapoints actually written (0 on dry runs)
    pub written: usize,
    /// Backup file, when one was exported
    pub backup_file: Option<PathBuf>,
}

/// Execute the sync command
pub fn run(args: SyncArgs) -> Result<()> {
    let mut client = DmsClient::connect(&args.host, args.port, "almscreen", "mapper")
        .with_context(|| format!("Failed to connect to DMS at {}:{}", args.host, args.port))?;

    let version = client.dp_get("System:Version:dms.exe", None)?;
    if let Some(version) = version.first() {
        info!(version = %version.value, "connected to DMS");
    }

    run_with_store(&mut client, args.dry_run, args.backup)?;
    Ok(())
}

/// Full mapping run against any store implementation.
pub fn run_with_store(
    store: &mut dyn DmsStore,
    dry_run: bool,
    backup: bool,
) -> Result<SyncReport> {
    let project = project_path(store)?;
    info!(project = %project.display(), "working in project");

    let mode = detect_mode(store)?;
    info!(mode = mode.as_str(), "ranking mode detected");

    let corpus = ScreenScanner::new().scan(&project.join("scr"))?;
    let registry = AlarmRegistry::collect(store)?;

    let mut report = SyncReport {
        files_scanned: corpus.scan_stats().files_scanned,
        datapoints: registry.datapoint_count(),
        ..Default::default()
    };

    if backup {
        let mut record = BackupRecord::new();
        for (key, value) in registry.observed_keys() {
            record.record(key, value);
        }
        report.backup_file = Some(record.export(&project.join("cfg"))?);
    }

    let resolver = ScreenResolver::new(&corpus, mode);
    let changes = resolver.compute_changes(&registry)?;
    report.changed = changes.len();

    if dry_run {
        info!(changed = changes.len(), "dry run, nothing written");
        return Ok(report);
    }
    if changes.is_empty() {
        info!("screen mappings already up to date, nothing to do");
        return Ok(report);
    }

    info!(changed = changes.len(), "writing changed screen mappings");
    for (datapoint, screen) in changes.iter() {
        write_mapping(store, datapoint, screen)?;
        report.written += 1;
    }
    info!(written = report.written, "screen mappings written");

    Ok(report)
}

/// Write the mapping and its companion subkeys for one datapoint.
///
/// A store error aborts the run; earlier writes stay in place and the
/// backup export is the way back.
fn write_mapping(
    store: &mut dyn DmsStore,
    datapoint: &str,
    screen: &str,
) -> crate::mapper::Result<()> {
    let root = keypath::root(datapoint)?.to_string();
    for (subkey, value) in [
        (SCREEN_SUBKEY, screen),
        (GCNAME_SUBKEY, root.as_str()),
        (REINIT_SUBKEY, root.as_str()),
    ] {
        let key = format!("{datapoint}:{subkey}");
        let ack = store.dp_set(&key, value, true)?;
        if let Some(message) = ack.message {
            return Err(MapperError::StoreWrite { key, message });
        }
    }
    Ok(())
}

fn project_path(store: &mut dyn DmsStore) -> Result<PathBuf> {
    let responses = store.dp_get("System:Project", None)?;
    let value = responses.first().map(|r| r.value.as_str()).unwrap_or("");
    if value.is_empty() {
        bail!("DMS reports no project path (System:Project is empty)");
    }
    Ok(PathBuf::from(value))
}

/// Projects built on the legacy object library answer with a value here and
/// need the heuristics; newer projects encode the mapping in their screen
/// file names.
fn detect_mode(store: &mut dyn DmsStore) -> Result<RankingMode> {
    let responses = store.dp_get("BMO:MES01:OBJECT", None)?;
    let legacy = responses
        .first()
        .map(|r| !r.value.is_empty())
        .unwrap_or(false);
    Ok(if legacy {
        RankingMode::Heuristic
    } else {
        RankingMode::Filename
    })
}
