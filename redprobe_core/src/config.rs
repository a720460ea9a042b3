use crate::engine::EngineKind;
use crate::pump::PumpStrategy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ProbeSettings {
    #[serde(default)]
    pub engine: EngineKind,
    /// Overrides the engine's own default when set.
    #[serde(default)]
    pub pump_strategy: Option<PumpStrategy>,
}

/// Tuning for the lazy DFA. Unset values keep `regex-automata`'s defaults.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct AutomataSettings {
    #[serde(default)]
    pub cache_capacity: Option<usize>,
    #[serde(default)]
    pub minimum_cache_clear_count: Option<usize>,
    #[serde(default)]
    pub skip_cache_capacity_check: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

pub fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct RedprobeConfig {
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub automata: AutomataSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl RedprobeConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
