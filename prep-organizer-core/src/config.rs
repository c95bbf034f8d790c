use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::template::DEFAULT_EXTENSION;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Credential store file; the platform config dir is used when unset.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Default `owner/name` to publish into.
    #[serde(default)]
    pub repository: Option<String>,
    /// Directory inside the repository for solution files.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            repository: None,
            directory: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: default_extension(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            api_base_url = %self.github.api_base_url,
            repository = self.github.repository.as_deref().unwrap_or("<unset>"),
            timeout_secs = self.github.timeout_secs,
            extension = %self.output.extension,
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
