//! JavaScript facade over [`GameController`].
//!
//! Snapshots cross the boundary as plain JS objects. Change notifications
//! are queued by the controller and handed to the optional listener before
//! each mutating call returns. A throwing listener does not undo the change
//! or stop later events; the call still returns its snapshot.

use std::fmt::{Debug, Display};
use std::sync::mpsc::Receiver;

use js_sys::Function;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::game::GameController;

#[wasm_bindgen]
pub struct WasmGame {
    inner: GameController,
    events: Receiver<GameEvent>,
    listener: Option<Function>,
}

#[wasm_bindgen]
impl WasmGame {
    /// First-listed player takes Black.
    #[wasm_bindgen(constructor)]
    pub fn new(player1: String, player2: String) -> Result<WasmGame, JsValue> {
        Self::build(GameConfig::new(player1, player2))
    }

    /// Builds a game from `{ player1: { name, color }, player2: { name, color } }`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<WasmGame, JsValue> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        Self::build(config)
    }

    /// Called with each `{ type, data }` event; pass `undefined` to detach.
    #[wasm_bindgen(js_name = setListener)]
    pub fn set_listener(&mut self, listener: Option<Function>) {
        self.listener = listener;
    }

    pub fn start(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.start();
        self.flush();
        to_js(&snapshot)
    }

    #[wasm_bindgen(js_name = attemptMove)]
    pub fn attempt_move(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let report = self.inner.attempt_move(row, col).map_err(js_error)?;
        self.flush();
        to_js(&report)
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.inner.reset();
        self.flush();
        to_js(&snapshot)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }

    /// 0=empty, 1=black, 2=white.
    #[wasm_bindgen(js_name = pieceColorAt)]
    pub fn piece_color_at(&self, row: u8, col: u8) -> Result<u8, JsValue> {
        let color = self.inner.piece_color_at(row, col).map_err(js_error)?;
        Ok(color.to_u8())
    }

    #[wasm_bindgen(js_name = isLegalMove)]
    pub fn is_legal_move(&self, row: u8, col: u8) -> Result<bool, JsValue> {
        self.inner.is_legal_move(row, col).map_err(js_error)
    }

    #[wasm_bindgen(js_name = currentPlayerColor)]
    pub fn current_player_color(&self) -> u8 {
        self.inner.current_player_color().to_u8()
    }

    #[wasm_bindgen(js_name = isEnded)]
    pub fn is_ended(&self) -> bool {
        self.inner.is_ended()
    }

    /// Row-major cells using the same 0/1/2 encoding as `pieceColorAt`.
    pub fn board(&self) -> Vec<u8> {
        self.inner.board().to_array().to_vec()
    }

    /// Legal moves as row-major square indices (0..=63).
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Vec<u8> {
        self.inner
            .legal_moves()
            .iter()
            .map(|pos| pos.square_index())
            .collect()
    }
}

impl WasmGame {
    fn build(config: GameConfig) -> Result<WasmGame, JsValue> {
        let mut inner = GameController::new(config).map_err(js_error)?;
        let events = inner.subscribe_channel();
        Ok(WasmGame {
            inner,
            events,
            listener: None,
        })
    }

    /// Drains every queued event, forwarding them when a listener is
    /// attached. The change is already committed, so listener failures are
    /// logged and never abort the call.
    fn flush(&self) {
        let events = self.events.try_iter();
        match &self.listener {
            Some(listener) => {
                forward_events(events, |event| {
                    listener.call1(&JsValue::NULL, &to_js(event)?)?;
                    Ok::<(), JsValue>(())
                });
            }
            None => events.for_each(drop),
        }
    }
}

/// Hands each event to `deliver`, continuing past failures.
/// Returns the number of events that failed.
fn forward_events<E: Debug>(
    events: impl Iterator<Item = GameEvent>,
    mut deliver: impl FnMut(&GameEvent) -> Result<(), E>,
) -> usize {
    let mut failures = 0;
    for event in events {
        if let Err(err) = deliver(&event) {
            warn!(?event, ?err, "event listener failed");
            failures += 1;
        }
    }
    failures
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

fn js_error(err: impl Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_delivery_does_not_stop_later_events() {
        let events = vec![
            GameEvent::BoardChanged,
            GameEvent::MessageChanged("Ben's turn".to_string()),
            GameEvent::MoveSetChanged(Vec::new()),
        ];
        let mut delivered = Vec::new();

        let failures = forward_events(events.clone().into_iter(), |event| {
            delivered.push(event.clone());
            if delivered.len() == 1 { Err("listener threw") } else { Ok(()) }
        });

        assert_eq!(failures, 1);
        assert_eq!(delivered, events);
    }
}
