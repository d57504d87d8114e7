pub mod config;
pub mod paths;

pub use config::{ApiConfig, Config, LoggingConfig, StatsConfig, DEFAULT_API_URL};
pub use paths::{base_path_override, PathManager};
