use serde::{Deserialize, Serialize};
use std::fs;

/// Loader-wide settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Keep a pristine copy of every parsed document that has an id.
    pub debug_info: bool,
    /// Stop a bulk load at the first malformed record instead of skipping it.
    pub fail_fast: bool,
}

impl Settings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn with_debug_info(mut self, debug_info: bool) -> Self {
        self.debug_info = debug_info;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_info: cfg!(feature = "debug-tools"),
            fail_fast: false,
        }
    }
}
