pub mod config;
pub mod request;
pub mod search;
pub mod sensors;
pub mod serve;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_request_client::{connect_from_config, MediaRequestService};
use media_request_config::{Config, PathManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathManager::default().config_file())
}

/// Load the configuration file and apply environment overrides.
///
/// A missing file is tolerated so that containers can be configured from the
/// environment alone; validation still requires an api key.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = config_path(explicit);

    let mut config = if path.exists() {
        debug!(path = %path.display(), "Loading configuration");
        Config::load_from_file(&path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?
    } else if explicit.is_some() {
        return Err(eyre!("Configuration file not found: {}", path.display()));
    } else {
        warn!(
            path = %path.display(),
            "Configuration file not found, using defaults and environment variables"
        );
        Config::template()
    };

    config
        .apply_env_overrides()
        .map_err(|e| eyre!("Invalid environment override: {}", e))?;
    config.validate().map_err(|e| {
        eyre!(
            "Invalid configuration: {}. Run 'overseerr-bridge config init' or set OVERSEERR_API_KEY.",
            e
        )
    })?;

    Ok(config)
}

pub async fn connect(config: &Config) -> Result<Arc<dyn MediaRequestService>> {
    connect_from_config(config)
        .await
        .map_err(|e| eyre!("Failed to connect to Overseerr: {:#}", e))
}
