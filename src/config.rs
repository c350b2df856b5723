//! Player setup for a game instance.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GameError;
use crate::types::CellColor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub color: CellColor,
}

/// Names and colors of the two players.
///
/// The color assignment is fixed for the lifetime of a game. Black always
/// moves first, whichever player is listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player1: PlayerConfig,
    pub player2: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new("Black", "White")
    }
}

impl GameConfig {
    /// The standard assignment: the first-listed player takes Black.
    pub fn new(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self {
            player1: PlayerConfig {
                name: player1.into(),
                color: CellColor::Black,
            },
            player2: PlayerConfig {
                name: player2.into(),
                color: CellColor::White,
            },
        }
    }

    /// Checks that the players map one-to-one onto Black and White and
    /// carry distinct, non-blank names.
    #[instrument(skip(self), fields(player1 = %self.player1.name, player2 = %self.player2.name))]
    pub fn validate(&self) -> Result<(), GameError> {
        for player in [&self.player1, &self.player2] {
            if !player.color.is_piece() {
                return Err(GameError::InvalidColor);
            }
            if player.name.trim().is_empty() {
                return Err(GameError::EmptyName);
            }
        }

        if self.player1.color == self.player2.color {
            return Err(GameError::DuplicateColor(self.player1.color));
        }
        if self.player1.name.trim() == self.player2.name.trim() {
            return Err(GameError::DuplicateName(self.player1.name.trim().to_string()));
        }

        debug!("configuration accepted");
        Ok(())
    }
}
