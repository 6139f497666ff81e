//! Request and response types for the DMS JSON Data Exchange
//!
//! Field names follow the server's JSON vocabulary (`regExPath`, `maxDepth`,
//! `isType`, `hasAlarmData`, `create`), produced here via serde's camelCase
//! renaming.

use serde::{Deserialize, Serialize};

/// Server-side filter attached to a datapoint query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Regex filter over the full datapoint path (server dialect, may use
    /// lookaround)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_ex_path: Option<String>,

    /// Restrict responses to datapoints of this value type (e.g. "string")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_type: Option<String>,

    /// Restrict responses to datapoints carrying alarm configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_alarm_data: Option<bool>,

    /// Subtree depth limit, -1 = unlimited
    pub max_depth: i32,
}

impl Query {
    /// Unbounded query with a path regex filter
    pub fn with_regex(reg_ex_path: impl Into<String>) -> Self {
        Self {
            reg_ex_path: Some(reg_ex_path.into()),
            is_type: None,
            has_alarm_data: None,
            max_depth: -1,
        }
    }

    pub fn is_type(mut self, type_name: impl Into<String>) -> Self {
        self.is_type = Some(type_name.into());
        self
    }

    pub fn has_alarm_data(mut self, flag: bool) -> Self {
        self.has_alarm_data = Some(flag);
        self
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            reg_ex_path: None,
            is_type: None,
            has_alarm_data: None,
            max_depth: -1,
        }
    }
}

/// One datapoint in a get response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpValue {
    /// Full datapoint path
    pub path: String,
    /// Value rendered as a string (empty when the datapoint carries none)
    #[serde(default)]
    pub value: String,
}

/// Acknowledgement of a set request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAck {
    /// Path the server wrote (or refused to write)
    pub path: String,
    /// Error message; `None` means the write was accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Identify payload sent once after connecting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    pub whois: String,
    pub user: String,
}

/// Get request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequest {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
}

/// Set request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    pub path: String,
    pub value: String,
    pub create: bool,
}
