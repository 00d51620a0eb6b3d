// Configuration loading and parsing (config/server.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port for the WebSocket listener.
    pub port: u16,
    /// Pick clock length per turn.
    pub pick_duration_seconds: u64,
    /// Maximum roster size per team; bounds the number of rounds.
    pub roster_cap: usize,
    /// Bonus points for rising-trend athletes in results scoring.
    pub trend_bonus: u32,
    /// Path to the rankings CSV.
    pub rankings_path: String,
    /// Where to write final rosters after completion, if anywhere.
    pub export_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            pick_duration_seconds: 60,
            roster_cap: 7,
            trend_bonus: 5,
            rankings_path: "data/individual_rankings.csv".to_string(),
            export_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// server.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for server.toml. Every section and key is
/// optional; anything omitted falls back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
struct ServerFile {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    draft: DraftSection,
    #[serde(default)]
    scoring: ScoringSection,
    #[serde(default)]
    data: DataSection,
    #[serde(default)]
    export: ExportSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ServerSection {
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            port: Config::default().port,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DraftSection {
    pick_duration_seconds: u64,
    roster_cap: usize,
}

impl Default for DraftSection {
    fn default() -> Self {
        let defaults = Config::default();
        DraftSection {
            pick_duration_seconds: defaults.pick_duration_seconds,
            roster_cap: defaults.roster_cap,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ScoringSection {
    trend_bonus: u32,
}

impl Default for ScoringSection {
    fn default() -> Self {
        ScoringSection {
            trend_bonus: Config::default().trend_bonus,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DataSection {
    rankings: String,
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection {
            rankings: Config::default().rankings_path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportSection {
    rosters: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from `config/server.toml` relative to the current
/// working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(&cwd)
}

/// Load and validate configuration from `config/server.toml` under
/// `base_dir`. A missing file yields the built-in defaults; a present but
/// malformed file is an error.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("server.toml");

    let file: ServerFile = if path.exists() {
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?
    } else {
        ServerFile::default()
    };

    assemble(file)
}

fn assemble(file: ServerFile) -> Result<Config, ConfigError> {
    let config = Config {
        port: file.server.port,
        pick_duration_seconds: file.draft.pick_duration_seconds,
        roster_cap: file.draft.roster_cap,
        trend_bonus: file.scoring.trend_bonus,
        rankings_path: file.data.rankings,
        export_path: file.export.rosters,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.pick_duration_seconds < 5 {
        return Err(ConfigError::ValidationError {
            field: "draft.pick_duration_seconds".to_string(),
            message: "must be at least 5 seconds".to_string(),
        });
    }
    if config.roster_cap == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.roster_cap".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if config.rankings_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.rankings".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}
