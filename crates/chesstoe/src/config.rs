//! Engine configuration: roster and session options, loadable from TOML.

use crate::piece::PieceSpec;
use crate::types::CellId;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pieces to play with, in id order.
    #[serde(default = "default_roster")]
    roster: Vec<PieceSpec>,

    /// Start a new game automatically once a line is completed.
    #[serde(default)]
    restart_on_win: bool,
}

#[instrument]
fn default_roster() -> Vec<PieceSpec> {
    PieceSpec::standard_roster()
}

impl EngineConfig {
    /// Creates a configuration with a custom roster.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the roster is empty or does not fit on the board.
    #[instrument(skip(roster), fields(pieces = roster.len()))]
    pub fn new(roster: Vec<PieceSpec>, restart_on_win: bool) -> Result<Self, ConfigError> {
        let config = Self {
            roster,
            restart_on_win,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(
            pieces = config.roster.len(),
            restart_on_win = config.restart_on_win,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks the roster can be played.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_roster(&self.roster)
    }
}

/// A playable roster has at least one piece and no more pieces than cells,
/// since setup only ends once every piece is placed.
#[track_caller]
pub(crate) fn validate_roster(roster: &[PieceSpec]) -> Result<(), ConfigError> {
    if roster.is_empty() {
        return Err(ConfigError::new("Roster is empty".to_string()));
    }
    if roster.len() > CellId::COUNT {
        return Err(ConfigError::new(format!(
            "Roster has {} pieces but the board only has {} cells",
            roster.len(),
            CellId::COUNT
        )));
    }
    Ok(())
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            restart_on_win: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, PieceKind};

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.roster().len(), 6);
        assert!(!*config.restart_on_win());
    }

    #[test]
    fn test_custom_roster() {
        let config = EngineConfig::from_toml_str(
            r#"
            restart_on_win = true

            [[roster]]
            color = "white"
            kind = "rock"

            [[roster]]
            color = "black"
            kind = "horse"
            "#,
        )
        .unwrap();

        assert!(*config.restart_on_win());
        assert_eq!(
            config.roster(),
            &vec![
                PieceSpec::new(Color::White, PieceKind::Rock),
                PieceSpec::new(Color::Black, PieceKind::Horse),
            ]
        );
    }

    #[test]
    fn test_oversized_roster_rejected() {
        let roster = vec![PieceSpec::new(Color::White, PieceKind::Bishop); 10];
        let err = EngineConfig::new(roster, false).unwrap_err();
        assert!(err.message.contains("only has 9 cells"));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(EngineConfig::from_toml_str("roster = []").is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [[roster]]
            color = "white"
            kind = "queen"
            "#,
        )
        .unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }
}
