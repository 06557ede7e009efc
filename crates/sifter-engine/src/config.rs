//! Engine configuration.
//!
//! All settings have defaults, so an empty document is a valid
//! configuration. Documents are YAML; JSON is accepted as well since it
//! is a subset.

use serde::{Deserialize, Serialize};

use crate::date::DateStorage;
use crate::error::Result;
use crate::time::TimeFormat;

/// What to do when an update names a filter that is no longer present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMissPolicy {
    /// Append the updated filter to the end of the sequence.
    #[default]
    Append,
    /// Discard the updated filter.
    Drop,
}

/// Settings shared by the engine and the form controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clock convention for displayed times.
    pub time_format: TimeFormat,
    /// Form in which submitted dates are stored.
    pub date_storage: DateStorage,
    pub update_miss: UpdateMissPolicy,
    /// Quiet period before a search request is sent, in milliseconds.
    pub search_debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            time_format: TimeFormat::default(),
            date_storage: DateStorage::default(),
            update_miss: UpdateMissPolicy::default(),
            search_debounce_ms: 300,
        }
    }
}

impl EngineConfig {
    /// Decodes a configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(EngineConfig::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
