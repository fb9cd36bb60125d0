//! Game setup loaded from TOML.
//!
//! ```toml
//! first_to_move = "black"
//! layout = [
//!     "....K...", "........", "........", "........",
//!     "........", "........", "........", "r...k...",
//! ]
//! ```
//!
//! Both keys are optional; an empty file is the standard game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::error::RulesError;
use crate::layout::STANDARD_LAYOUT;
use crate::types::Color;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Layout(#[from] RulesError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Side that moves first.
    pub first_to_move: Color,
    /// Eight rows, top first, in layout codes.
    pub layout: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_to_move: Color::White,
            layout: STANDARD_LAYOUT.iter().map(|row| row.to_string()).collect(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(s)?;
        // Reject a bad layout at load time rather than at the first restart.
        config.board()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Fresh board in this configuration's layout.
    pub fn board(&self) -> Result<Board, RulesError> {
        Board::from_rows(&self.layout)
    }
}
