//! The `search` section of `localchat.yaml`.

use std::time::Duration;

use serde::Deserialize;

/// Default host for the HTML results endpoint.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://html.duckduckgo.com";

/// Search backend settings. Every field is optional in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Cap on results included in one tool result.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_results() -> usize {
    5
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
        }
    }
}
