//! Rules engine for two-player Othello.
//!
//! [`GameController`] owns the board and drives the turn state machine;
//! [`engine`] holds the pure move-legality and capture functions it uses.
//! Front ends either read the [`GameSnapshot`] returned by every operation
//! or subscribe to [`GameEvent`]s. [`wasm::WasmGame`] exposes the same API
//! to JavaScript.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::{GameConfig, PlayerConfig};
pub use error::{GameError, ParseBoardError};
pub use events::{ChannelObserver, GameEvent, GameObserver, ObserverId};
pub use game::GameController;
pub use types::{
    CellColor, GamePhase, GameResult, GameSnapshot, MoveOutcome, MoveReport, Player, Position,
    RejectReason,
};
