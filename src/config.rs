use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DataConfig {
    pub wholesale: PathBuf,
    pub retail: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows shown on the Raw Data tab.
    pub raw_rows: usize,
    /// Default N for the top-customers chart.
    pub top_customers: usize,
    /// Width of the longest text bar, in characters.
    pub bar_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            raw_rows: 25,
            top_customers: 5,
            bar_width: 40,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
wholesale = "segmented_wholesale.csv"
retail = "segmented_retail.csv"

[display]
raw_rows = 25
top_customers = 5
bar_width = 40

[logging]
level = "warn"
"#;

const LOCAL_CONFIG: &str = "dashboard.toml";

/// Load configuration.
///
/// Search order:
/// 1. The explicit `--config` path (must exist)
/// 2. `dashboard.toml` in the working directory
/// 3. The embedded default
///
/// Runs before the subscriber is installed, so it returns where the
/// config came from instead of logging it.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, String)> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)?;
        return Ok((toml::from_str(&contents)?, path.display().to_string()));
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        let contents = std::fs::read_to_string(local)?;
        return Ok((toml::from_str(&contents)?, LOCAL_CONFIG.to_string()));
    }

    Ok((toml::from_str(DEFAULT_CONFIG)?, "embedded default".to_string()))
}
