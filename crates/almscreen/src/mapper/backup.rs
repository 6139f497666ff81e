//! Backup export of the stored screen-mapping keys
//!
//! Written before any DMS write; re-importing the file restores the previous
//! mappings. Rows use the DMS import format
//! `<key>;<datatype>;<value>;<rights>` with datatype and rights fixed for
//! string datapoints.

use super::error::Result;
use chrono::Local;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ordered snapshot of store keys taken before modification
#[derive(Debug, Default)]
pub struct BackupRecord {
    entries: IndexMap<String, String>,
}

impl BackupRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key/value pair. First observation fixes the position,
    /// later observations update the value.
    pub fn record(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push_str(";STR;");
            out.push_str(value);
            out.push_str(";RW\n");
        }
        out
    }

    /// Write the snapshot into `dir` as
    /// `almscreen_<YYYY-MM-DD_HH.MM.SS>_old_values.dms`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let name = format!(
            "almscreen_{}_old_values.dms",
            Local::now().format("%Y-%m-%d_%H.%M.%S")
        );
        let path = dir.join(name);
        fs::write(&path, self.render())?;
        info!(
            datapoints = self.entries.len(),
            file = %path.display(),
            "wrote backup file"
        );
        Ok(path)
    }
}
