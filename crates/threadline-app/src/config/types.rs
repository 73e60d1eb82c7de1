//! Configuration types for threadline

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global application settings from `.threadline/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub thread: ThreadSettings,
}

/// How to reach the comment service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Relative endpoints in the seed are resolved against this
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Header carrying the anti-forgery token
    pub anti_forgery_header: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
            anti_forgery_header: "X-CSRFToken".to_string(),
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThreadSettings {
    /// Seed file, relative to `.threadline/`
    pub seed: Option<PathBuf>,

    /// Page fragment used for the deep-link highlight
    pub fragment: Option<String>,
}
