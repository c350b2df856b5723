//! Error types for invalid arguments and invalid game configuration.
//!
//! Refused moves are not errors; they come back as
//! [`MoveOutcome::Rejected`](crate::types::MoveOutcome::Rejected).

use derive_more::{Display, Error};

use crate::types::CellColor;

/// Reasons a board string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseBoardError {
    #[display("unexpected character {_0:?} in board string")]
    InvalidCell(#[error(not(source))] char),
    #[display("board string has {_0} cells, expected 64")]
    WrongCellCount(#[error(not(source))] usize),
}

/// Errors raised at the public edge of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    #[display("position ({row},{col}) is outside the 8x8 board")]
    OutOfRange { row: u8, col: u8 },

    #[display("both players are assigned {_0}")]
    DuplicateColor(#[error(not(source))] CellColor),

    #[display("players must be assigned Black or White")]
    InvalidColor,

    #[display("player name must not be empty")]
    EmptyName,

    #[display("both players are named {_0:?}")]
    DuplicateName(#[error(not(source))] String),

    #[display("invalid board: {_0}")]
    ParseBoard(#[error(source)] ParseBoardError),
}

impl From<ParseBoardError> for GameError {
    fn from(err: ParseBoardError) -> Self {
        Self::ParseBoard(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            GameError::OutOfRange { row: 9, col: 1 }.to_string(),
            "position (9,1) is outside the 8x8 board"
        );
        assert_eq!(
            GameError::DuplicateColor(CellColor::Black).to_string(),
            "both players are assigned Black"
        );
        assert_eq!(
            GameError::DuplicateName("Ann".to_string()).to_string(),
            "both players are named \"Ann\""
        );
    }

    #[test]
    fn parse_errors_convert_into_game_errors() {
        let err: GameError = ParseBoardError::WrongCellCount(3).into();
        assert_eq!(err.to_string(), "invalid board: board string has 3 cells, expected 64");
        assert!(std::error::Error::source(&err).is_some());
    }
}
