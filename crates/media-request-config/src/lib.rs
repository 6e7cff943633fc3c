pub mod config;
pub mod paths;

pub use config::{Config, HttpConfig, OverseerrConfig, SensorConfig, ServerConfig, API_KEY_PLACEHOLDER, DEFAULT_PORT};
pub use paths::{PathManager, container_base_path};
