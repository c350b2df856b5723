use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{BOARD_SIZE, Board};
use crate::error::GameError;

/// Contents of one board cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellColor {
    #[default]
    None,
    Black,
    White,
}

impl CellColor {
    /// Returns the opposing color. `None` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
            Self::None => Self::None,
        }
    }

    pub fn is_piece(self) -> bool {
        self != Self::None
    }

    /// Wire encoding used by the JS front end: 0=empty, 1=black, 2=white.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Black => 1,
            Self::White => 2,
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Black => "Black",
            Self::White => "White",
        })
    }
}

/// A board coordinate. Always within `0..8` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Validates `(row, col)` against the board edge.
    pub fn new(row: u8, col: u8) -> Result<Self, GameError> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(GameError::OutOfRange { row, col })
        }
    }

    /// Steps `(dr, dc)` away from this position, or `None` past the edge.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col).ok()
    }

    /// Iterates all 64 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8)
            .flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Position { row, col }))
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major square index (0..=63), as used on the JS side.
    pub fn square_index(self) -> u8 {
        self.row * BOARD_SIZE as u8 + self.col
    }

    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A participant: name, assigned color and live piece count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub name: String,
    pub color: CellColor,
    /// Recomputed from the board after every mutation.
    pub score: u8,
}

/// Lifecycle of a game instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

/// Final result once neither side can move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum GameResult {
    Win { winner: Player, loser: Player },
    Tie { player1: Player, player2: Player },
}

impl GameResult {
    pub fn from_players(player1: &Player, player2: &Player) -> Self {
        if player1.score == player2.score {
            Self::Tie {
                player1: player1.clone(),
                player2: player2.clone(),
            }
        } else if player1.score > player2.score {
            Self::Win {
                winner: player1.clone(),
                loser: player2.clone(),
            }
        } else {
            Self::Win {
                winner: player2.clone(),
                loser: player1.clone(),
            }
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        match self {
            Self::Win { winner, .. } => Some(winner),
            Self::Tie { .. } => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Self::Tie { .. })
    }

    /// Short status line shown once the game is over.
    pub fn headline(&self) -> String {
        match self {
            Self::Win { winner, .. } => format!("WINNER: {}!", winner.name),
            Self::Tie { .. } => "It's a TIE!".to_string(),
        }
    }

    /// Full end-of-game summary with both names and scores.
    pub fn summary(&self) -> String {
        match self {
            Self::Win { winner, loser } => format!(
                "Game Over! Winner: {} with {} pieces! Final Score: {} {} - {} {}",
                winner.name, winner.score, winner.name, winner.score, loser.score, loser.name
            ),
            Self::Tie { player1, .. } => format!(
                "Game ended in a tie! Both players have {} pieces.",
                player1.score
            ),
        }
    }
}

/// Public game state handed to renderers after every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub player1: Player,
    pub player2: Player,
    pub current_color: CellColor,
    pub legal_moves: Vec<Position>,
    pub phase: GamePhase,
    pub message: String,
    /// Contract:
    /// - Normal move: cells flipped by that move, excluding the placed piece.
    /// - After start/reset: empty.
    pub flipped: Vec<Position>,
    /// `true` when the side that should have moved next was passed over.
    pub turn_skipped: bool,
    pub result: Option<GameResult>,
}

impl GameSnapshot {
    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }
}

/// Why a move attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum RejectReason {
    #[display("Game not started or already ended")]
    GameNotActive,
    #[display("Invalid move! Position {_0} is not valid.")]
    IllegalPosition(Position),
}

/// What happened to a move attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Rejected(RejectReason),
    Accepted,
    Ended(GameResult),
}

/// Outcome of `attempt_move` together with the state after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    pub snapshot: GameSnapshot,
}

impl MoveReport {
    pub fn is_accepted(&self) -> bool {
        !matches!(self.outcome, MoveOutcome::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, color: CellColor, score: u8) -> Player {
        Player {
            name: name.to_string(),
            color,
            score,
        }
    }

    #[test]
    fn position_rejects_coordinates_past_the_edge() {
        assert!(Position::new(7, 7).is_ok());
        assert_eq!(
            Position::new(8, 0),
            Err(GameError::OutOfRange { row: 8, col: 0 })
        );
        assert_eq!(
            Position::new(0, 200),
            Err(GameError::OutOfRange { row: 0, col: 200 })
        );
    }

    #[test]
    fn offset_stops_at_board_edges() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1), Some(Position::new(1, 1).unwrap()));

        let far = Position::new(7, 7).unwrap();
        assert_eq!(far.offset(1, 0), None);
        assert_eq!(far.offset(-1, -1), Some(Position::new(6, 6).unwrap()));
    }

    #[test]
    fn all_positions_are_row_major_and_unique() {
        let all: Vec<Position> = Position::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0], Position::new(0, 0).unwrap());
        assert_eq!(all[9], Position::new(1, 1).unwrap());
        assert_eq!(all[63], Position::new(7, 7).unwrap());
    }

    #[test]
    fn square_index_matches_row_major_order() {
        for (expected, p) in Position::all().enumerate() {
            assert_eq!(p.square_index() as usize, expected);
        }
        assert_eq!(Position::new(2, 3).unwrap().square_index(), 19);
    }

    #[test]
    fn opponent_swaps_piece_colors() {
        assert_eq!(CellColor::Black.opponent(), CellColor::White);
        assert_eq!(CellColor::White.opponent(), CellColor::Black);
        assert_eq!(CellColor::None.opponent(), CellColor::None);
    }

    #[test]
    fn result_picks_higher_score() {
        let alice = player("Alice", CellColor::Black, 40);
        let bob = player("Bob", CellColor::White, 24);

        let result = GameResult::from_players(&bob, &alice);
        assert_eq!(result.winner().map(|p| p.name.as_str()), Some("Alice"));
        assert_eq!(result.headline(), "WINNER: Alice!");
        assert_eq!(
            result.summary(),
            "Game Over! Winner: Alice with 40 pieces! Final Score: Alice 40 - 24 Bob"
        );
    }

    #[test]
    fn equal_scores_are_a_tie() {
        let alice = player("Alice", CellColor::Black, 32);
        let bob = player("Bob", CellColor::White, 32);

        let result = GameResult::from_players(&alice, &bob);
        assert!(result.is_tie());
        assert_eq!(result.winner(), None);
        assert_eq!(result.headline(), "It's a TIE!");
        assert_eq!(
            result.summary(),
            "Game ended in a tie! Both players have 32 pieces."
        );
    }

    #[test]
    fn reject_reason_messages() {
        let pos = Position::new(0, 0).unwrap();
        assert_eq!(
            RejectReason::IllegalPosition(pos).to_string(),
            "Invalid move! Position (0,0) is not valid."
        );
        assert_eq!(
            RejectReason::GameNotActive.to_string(),
            "Game not started or already ended"
        );
    }
}
