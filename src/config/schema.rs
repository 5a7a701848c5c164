//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for serialization.

use serde::{Deserialize, Serialize};

use crate::registry::KindSpec;
use crate::render::OutputFormat;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace to trace in when none is given on the command line
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Default output format
    #[serde(default)]
    pub output: OutputFormat,

    /// Cancel the whole traversal after this many seconds (0 disables)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Timeout for a single listing request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Upper bound on kind listings in flight at once
    #[serde(default = "default_max_concurrent_listings")]
    pub max_concurrent_listings: usize,

    /// Kinds to scan in addition to the built-in workload kinds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<KindSpec>,
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_max_concurrent_listings() -> usize {
    crate::lineage::DEFAULT_MAX_CONCURRENT_LISTINGS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            output: OutputFormat::default(),
            timeout_seconds: default_timeout_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
            max_concurrent_listings: default_max_concurrent_listings(),
            kinds: Vec::new(),
        }
    }
}
