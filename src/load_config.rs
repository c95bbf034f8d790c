/// `load_config` module: loads the optional YAML config file and applies environment overrides.
///
/// # Responsibilities
/// - Locate the config file: explicit `--config` path, else `PREP_ORGANIZER_CONFIG`, else none
/// - Parse YAML into the core [`Config`] model; a missing file falls back to defaults
/// - Apply environment overrides (`GITHUB_API_URL`)
/// - Expand a leading `~/` in `store_path` and `output.dir`; reject a zero timeout
/// - Resolve where the credential store lives
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use prep_organizer_core::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const CONFIG_ENV: &str = "PREP_ORGANIZER_CONFIG";
pub const API_URL_ENV: &str = "GITHUB_API_URL";

const APP_DIR: &str = "prep-organizer";
const STORE_FILE: &str = "store.json";

/// Loads configuration. An explicitly named file must exist; with no file
/// named anywhere, defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let chosen = path.map(Path::to_path_buf).or(from_env);

    let mut config = match chosen {
        Some(path_ref) => {
            info!(config_path = ?path_ref, "Loading configuration from file");
            let content = match fs::read_to_string(&path_ref) {
                Ok(content) => content,
                Err(e) => {
                    error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
                    return Err(anyhow::anyhow!(
                        "Failed to read config file {:?}: {}",
                        path_ref,
                        e
                    ));
                }
            };
            if content.trim().is_empty() {
                Config::default()
            } else {
                match serde_yaml::from_str::<Config>(&content) {
                    Ok(conf) => {
                        info!(config_path = ?path_ref, "Parsed config YAML successfully");
                        conf
                    }
                    Err(e) => {
                        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                        return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
                    }
                }
            }
        }
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };

    if let Ok(api_url) = std::env::var(API_URL_ENV) {
        if !api_url.trim().is_empty() {
            info!(api_url = %api_url, "GITHUB_API_URL overrides github.api_base_url");
            config.github.api_base_url = api_url.trim().to_string();
        }
    }

    if config.github.timeout_secs == 0 {
        error!("github.timeout_secs is 0");
        bail!("Invalid config: github.timeout_secs must be greater than zero");
    }

    config.store_path = config.store_path.as_deref().map(expand_home).transpose()?;
    config.output.dir = config.output.dir.as_deref().map(expand_home).transpose()?;

    config.trace_loaded();
    Ok(config)
}

/// Replaces a leading `~` component with the user's home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir()
        .with_context(|| format!("Could not determine the home directory to expand {}", path.display()))?;
    Ok(home.join(rest))
}

/// The credential store file: `store_path` from config, else
/// `<config dir>/prep-organizer/store.json`.
pub fn resolve_store_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.store_path {
        return Ok(path.clone());
    }
    let base = dirs::config_dir()
        .context("Could not determine the user config directory; set store_path in the config file")?;
    Ok(base.join(APP_DIR).join(STORE_FILE))
}
