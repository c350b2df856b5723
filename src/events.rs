//! Change notifications published by the controller.
//!
//! Observers run synchronously inside the mutating call that produced the
//! event. They only see the event, never the controller, so they cannot
//! re-enter it.

use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::types::{GameResult, Position};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum GameEvent {
    /// `"<name>'s turn (<Color>)"`.
    TurnChanged(String),
    /// The board was reset or a move was applied. Renderers redraw all cells.
    BoardChanged,
    /// Fresh legal-move set for the side to move.
    MoveSetChanged(Vec<Position>),
    MessageChanged(String),
    GameEnded { summary: String, result: GameResult },
}

/// Handle returned by `GameController::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

pub trait GameObserver: Send {
    fn on_event(&mut self, event: &GameEvent);

    /// A closed observer is removed after the current event.
    fn is_closed(&self) -> bool {
        false
    }
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Forwards events into a channel. Closes once the receiver hangs up.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<GameEvent>,
    closed: bool,
}

impl ChannelObserver {
    pub fn new(tx: Sender<GameEvent>) -> Self {
        Self { tx, closed: false }
    }
}

impl GameObserver for ChannelObserver {
    fn on_event(&mut self, event: &GameEvent) {
        if !self.closed && self.tx.send(event.clone()).is_err() {
            self.closed = true;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
