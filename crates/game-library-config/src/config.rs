use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Dashboard aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// How many entries the "most recent" lists hold
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Reviews at or above this normalized score count as high
    #[serde(default = "default_high_score_threshold")]
    pub high_score_threshold: f64,
    /// Rated reviews at or below this normalized score count as low
    #[serde(default = "default_low_score_threshold")]
    pub low_score_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_api_url() -> String {
    std::env::var("AXIOM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_recent_limit() -> usize {
    5
}

fn default_high_score_threshold() -> f64 {
    8.0
}

fn default_low_score_threshold() -> f64 {
    5.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            high_score_threshold: default_high_score_threshold(),
            low_score_threshold: default_low_score_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!("api.base_url must start with http:// or https://, got '{}'", url));
        }
        if self.api.timeout_secs == 0 {
            return Err(anyhow::anyhow!("api.timeout_secs must be greater than zero"));
        }

        if self.stats.recent_limit == 0 {
            return Err(anyhow::anyhow!("stats.recent_limit must be greater than zero"));
        }
        for (name, value) in [
            ("high_score_threshold", self.stats.high_score_threshold),
            ("low_score_threshold", self.stats.low_score_threshold),
        ] {
            if !(0.0..=10.0).contains(&value) {
                return Err(anyhow::anyhow!("stats.{} must be within 0-10, got {}", name, value));
            }
        }
        if self.stats.low_score_threshold > self.stats.high_score_threshold {
            return Err(anyhow::anyhow!("stats.low_score_threshold cannot exceed stats.high_score_threshold"));
        }

        Ok(())
    }
}
