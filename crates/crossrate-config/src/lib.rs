pub mod config;
pub mod paths;

pub use config::{Config, ConfigError, DisplayConfig, HttpConfig, SearchConfig};
pub use paths::{PathManager, container_base_path};
