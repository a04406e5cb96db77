//! Configuration loading and validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{TiebreakRule, TournamentSettings};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Ranking defaults for tournaments created without explicit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsConfig {
    #[serde(default)]
    pub away_goals_rule: bool,

    #[serde(default = "TiebreakRule::default_chain")]
    pub tiebreaker_rules: Vec<TiebreakRule>,
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self {
            away_goals_rule: false,
            tiebreaker_rules: TiebreakRule::default_chain(),
        }
    }
}

impl StandingsConfig {
    pub fn settings(&self) -> TournamentSettings {
        TournamentSettings {
            away_goals_rule: self.away_goals_rule,
            teams_to_qualify: None,
            tiebreaker_rules: self.tiebreaker_rules.clone(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub standings: StandingsConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            standings: StandingsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!("Loading config from {:?}", path);
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.standings.tiebreaker_rules {
            if !seen.insert(rule) {
                return Err(ConfigError::ValidationError(format!(
                    "Tiebreak rule {} listed more than once",
                    rule
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert!(!config.standings.away_goals_rule);
        assert_eq!(
            config.standings.tiebreaker_rules,
            TiebreakRule::default_chain()
        );
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_repeated_rule() {
        let mut config = AppConfig::default();
        config.standings.tiebreaker_rules =
            vec![TiebreakRule::GoalsFor, TiebreakRule::GoalsFor];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            data_dir = "/srv/committee"

            [standings]
            away_goals_rule = true
            tiebreaker_rules = ["headToHead", "goalDifference"]
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/committee"));
        assert_eq!(config.server.host, "127.0.0.1");
        let settings = config.standings.settings();
        assert!(settings.away_goals_rule);
        assert_eq!(
            settings.tiebreaker_rules,
            vec![TiebreakRule::HeadToHead, TiebreakRule::GoalDifference]
        );
    }

    #[test]
    fn test_load_or_default() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert_eq!(AppConfig::load_or_default(&missing).unwrap().server.port, 8080);

        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();
        assert_eq!(AppConfig::load_or_default(&path).unwrap().server.port, 9000);

        std::fs::write(&path, "[server]\nport = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_or_default(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.standings.tiebreaker_rules, parsed.standings.tiebreaker_rules);
    }
}
