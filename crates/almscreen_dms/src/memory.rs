//! In-memory DMS store
//!
//! Backs integration tests and offline experiments with the same `DmsStore`
//! surface the TCP client provides. Values are held in insertion order so
//! responses come back in the order datapoints were created, matching the
//! stable ordering a real server exhibits.

use crate::error::{DmsError, Result};
use crate::types::{DpValue, Query, SetAck};
use crate::DmsStore;
use fancy_regex::Regex;
use indexmap::IndexMap;
use std::collections::HashSet;

/// In-memory datapoint tree
#[derive(Debug, Default)]
pub struct MemoryDms {
    values: IndexMap<String, String>,
    alarm_flags: HashSet<String>,
}

impl MemoryDms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a datapoint
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), value.into());
    }

    /// Flag a datapoint as carrying alarm configuration
    pub fn mark_alarm(&mut self, path: impl Into<String>) {
        self.alarm_flags.insert(path.into());
    }

    /// Read back a raw value (test helper)
    pub fn value(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }

    fn in_subtree(path: &str, key: &str) -> bool {
        path.is_empty() || key == path || key.starts_with(&format!("{path}:"))
    }

    fn matches(&self, key: &str, path: &str, query: Option<&Query>) -> Result<bool> {
        if !Self::in_subtree(path, key) {
            return Ok(false);
        }
        let Some(query) = query else { return Ok(true) };

        if let Some(pattern) = &query.reg_ex_path {
            let regex = Regex::new(pattern).map_err(|e| DmsError::InvalidFilter {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            let hit = regex.is_match(key).map_err(|e| DmsError::InvalidFilter {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            if !hit {
                return Ok(false);
            }
        }

        if let Some(flag) = query.has_alarm_data {
            if self.alarm_flags.contains(key) != flag {
                return Ok(false);
            }
        }

        // Every stored value is a string; any other type filter matches nothing
        if let Some(type_name) = &query.is_type {
            if type_name != "string" {
                return Ok(false);
            }
        }

        if query.max_depth >= 0 {
            let rel = key.strip_prefix(path).unwrap_or(key).trim_start_matches(':');
            let depth = rel.split(':').count() as i32;
            if depth > query.max_depth {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl DmsStore for MemoryDms {
    fn dp_get(&mut self, path: &str, query: Option<&Query>) -> Result<Vec<DpValue>> {
        let mut responses = Vec::new();
        for (key, value) in &self.values {
            if self.matches(key, path, query)? {
                responses.push(DpValue {
                    path: key.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(responses)
    }

    fn dp_set(&mut self, path: &str, value: &str, create: bool) -> Result<SetAck> {
        if !create && !self.values.contains_key(path) {
            return Ok(SetAck {
                path: path.to_string(),
                message: Some("datapoint does not exist".to_string()),
            });
        }
        self.values.insert(path.to_string(), value.to_string());
        Ok(SetAck {
            path: path.to_string(),
            message: None,
        })
    }
}
