//! Alarm datapoint collection from the DMS
//!
//! Gathers the run input in three passes: alarm-bearing datapoints, their
//! currently stored screen mappings, and the object instances the alarms
//! belong to. The registry is read-only once collected.

use super::error::Result;
use almscreen_dms::{DmsStore, Query};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{info, warn};

/// Roots that never carry project alarm datapoints
const RESERVED_ROOTS: [&str; 2] = ["System", "GE"];

/// Mapping key below every alarm datapoint
pub const SCREEN_SUBKEY: &str = "ALM:Screen";
/// Companion subkeys written alongside the mapping; both carry the root
/// node of the datapoint
pub const GCNAME_SUBKEY: &str = "ALM:Screen:GcName";
pub const REINIT_SUBKEY: &str = "ALM:Screen:ReInit";

const SCREEN_SUFFIX: &str = ":ALM:Screen";
const GCNAME_SUFFIX: &str = ":ALM:Screen:GcName";
const REINIT_SUFFIX: &str = ":ALM:Screen:ReInit";

// Server-side path filters. The DMS regex dialect supports lookahead, which
// keeps the whole object library subtree out of every response.
const ALARM_FILTER: &str = "^(?!BMO).*";
const OBJECT_FILTER: &str = "^(?!BMO).+:OBJECT$";
const SCREEN_FILTER: &str = r"^(?!BMO).*:ALM:Screen(:[\w]+)?";

/// Run input collected from the store
#[derive(Debug, Default)]
pub struct AlarmRegistry {
    /// Alarm datapoint -> bound object instance, in discovery order
    datapoints: IndexMap<String, Option<String>>,
    /// Alarm datapoint -> currently mapped screen file name
    current_screens: HashMap<String, String>,
    /// Every screen-mapping key as first observed, for the backup export
    /// and for detecting stale companion subkeys
    observed_keys: IndexMap<String, String>,
}

impl AlarmRegistry {
    /// Collect everything the resolver needs, in one read-only sweep.
    pub fn collect(store: &mut dyn DmsStore) -> Result<Self> {
        let mut registry = Self::default();
        registry.collect_alarms(store)?;
        registry.collect_screens(store)?;
        registry.bind_objects(store)?;
        Ok(registry)
    }

    fn collect_alarms(&mut self, store: &mut dyn DmsStore) -> Result<()> {
        info!("retrieving alarm datapoints from DMS");
        let query = Query::with_regex(ALARM_FILTER).has_alarm_data(true);
        for response in store.dp_get("", Some(&query))? {
            if is_reserved(&response.path) {
                continue;
            }
            self.datapoints.insert(response.path, None);
        }
        info!(
            datapoints = self.datapoints.len(),
            "alarm datapoints collected"
        );
        Ok(())
    }

    fn collect_screens(&mut self, store: &mut dyn DmsStore) -> Result<()> {
        let query = Query::with_regex(SCREEN_FILTER).is_type("string");
        for response in store.dp_get("", Some(&query))? {
            if is_reserved(&response.path) {
                continue;
            }
            if response.path.ends_with(SCREEN_SUFFIX) {
                let datapoint = response.path.split(SCREEN_SUFFIX).next().unwrap_or("");
                if !datapoint.is_empty() && !response.value.is_empty() {
                    self.current_screens
                        .insert(datapoint.to_string(), response.value.clone());
                }
                self.observed_keys.insert(response.path, response.value);
            } else if response.path.ends_with(GCNAME_SUFFIX)
                || response.path.ends_with(REINIT_SUFFIX)
            {
                self.observed_keys.insert(response.path, response.value);
            } else {
                warn!(path = %response.path, "unexpected screen mapping key, ignoring");
            }
        }
        info!(
            mappings = self.current_screens.len(),
            "current screen mappings collected"
        );
        Ok(())
    }

    fn bind_objects(&mut self, store: &mut dyn DmsStore) -> Result<()> {
        let query = Query::with_regex(OBJECT_FILTER);
        for response in store.dp_get("", Some(&query))? {
            let instance = response.path.split(":OBJECT").next().unwrap_or("");
            if instance.is_empty() {
                continue;
            }
            for (datapoint, bound) in self.datapoints.iter_mut() {
                // Assumption: every alarm datapoint belongs to exactly one
                // object instance
                if datapoint.contains(instance) {
                    *bound = Some(instance.to_string());
                }
            }
        }
        Ok(())
    }

    /// Bound (datapoint, instance) pairs, materialized in discovery order.
    /// Datapoints that belong to no object are logged and skipped.
    pub fn bound(&self) -> Vec<(&str, &str)> {
        self.datapoints
            .iter()
            .filter_map(|(datapoint, bound)| match bound {
                Some(instance) => Some((datapoint.as_str(), instance.as_str())),
                None => {
                    warn!(datapoint = %datapoint, "datapoint does not belong to an object, ignoring");
                    None
                }
            })
            .collect()
    }

    /// Currently mapped screen file, empty when none is stored.
    pub fn current_screen(&self, datapoint: &str) -> &str {
        self.current_screens
            .get(datapoint)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Raw value of an observed mapping key, empty when never seen.
    pub fn recorded_value(&self, key: &str) -> &str {
        self.observed_keys
            .get(key)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Observed mapping keys in first-seen order, for the backup export.
    pub fn observed_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.observed_keys
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn datapoint_count(&self) -> usize {
        self.datapoints.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.current_screens.len()
    }
}

fn is_reserved(path: &str) -> bool {
    RESERVED_ROOTS.iter().any(|root| path.starts_with(root))
}
