use std::sync::mpsc::{self, Receiver};

use tracing::{debug, info, instrument, warn};

use crate::board::Board;
use crate::config::GameConfig;
use crate::engine;
use crate::error::GameError;
use crate::events::{ChannelObserver, GameEvent, GameObserver, ObserverId};
use crate::types::{
    CellColor, GamePhase, GameResult, GameSnapshot, MoveOutcome, MoveReport, Player, Position,
    RejectReason,
};

const READY_MESSAGE: &str = "Ready to start.";
const RESET_MESSAGE: &str = "Game reset. Ready to start.";

/// Where the turn landed after recomputing legal moves.
enum TurnFlow {
    Ready,
    Skipped(String),
    Finished(GameResult),
}

/// The game state machine: `NotStarted -> InProgress -> Ended`.
///
/// Owns the board privately. Renderers read snapshots or subscribe to
/// [`GameEvent`]s; they never mutate the board. Not meant for concurrent
/// mutation: a multi-threaded host wraps the controller in one `Mutex`.
pub struct GameController {
    board: Board,
    players: [Player; 2],
    /// Index into `players` of the side to move.
    current: usize,
    legal_moves: Vec<Position>,
    phase: GamePhase,
    message: String,
    flipped: Vec<Position>,
    turn_skipped: bool,
    result: Option<GameResult>,
    observers: Vec<(ObserverId, Box<dyn GameObserver>)>,
    next_observer: u64,
}

impl GameController {
    /// Validates `config` and sets up the standard starting board.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_board(config, Board::new())
    }

    /// Starts from an arbitrary position. Black still moves first.
    /// `reset` always returns to the standard layout.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, GameError> {
        config.validate()?;

        let players = [config.player1, config.player2].map(|p| Player {
            name: p.name.trim().to_string(),
            color: p.color,
            score: 0,
        });

        let mut game = Self {
            board,
            players,
            current: 0,
            legal_moves: Vec::new(),
            phase: GamePhase::NotStarted,
            message: READY_MESSAGE.to_string(),
            flipped: Vec::new(),
            turn_skipped: false,
            result: None,
            observers: Vec::new(),
            next_observer: 0,
        };
        game.current = game.first_mover();
        game.update_scores();
        Ok(game)
    }

    /// Like [`with_board`](Self::with_board), parsing the position from text.
    pub fn from_position(config: GameConfig, position: &str) -> Result<Self, GameError> {
        Self::with_board(config, position.parse()?)
    }

    /// Registers a change observer. Observers run in-line, in
    /// registration order, before the mutating call returns.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Registers a channel observer and returns its receiving end.
    /// The observer is dropped once the receiver hangs up.
    pub fn subscribe_channel(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribe(ChannelObserver::new(tx));
        rx
    }

    /// Removes an observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Begins play with Black to move. A no-op once play has begun,
    /// whether the game is still running or has ended.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> GameSnapshot {
        if self.phase != GamePhase::NotStarted {
            debug!(phase = ?self.phase, "start ignored: game already started");
            return self.snapshot();
        }

        self.phase = GamePhase::InProgress;
        self.flipped.clear();
        self.turn_skipped = false;
        self.result = None;
        self.update_scores();
        info!(
            black = %self.players[self.first_mover()].name,
            white = %self.players[1 - self.first_mover()].name,
            "game started"
        );

        match self.settle_turn() {
            TurnFlow::Ready => {
                let message = format!("Game started! {}'s turn", self.current_player().name);
                self.publish_turn(message);
            }
            TurnFlow::Skipped(skipped) => self.publish_skip(&skipped),
            TurnFlow::Finished(_) => {}
        }

        self.snapshot()
    }

    /// Places a piece for the side to move.
    ///
    /// Coordinates outside the board are an error. A legal-range position
    /// that is not playable, or any attempt while the game is not in
    /// progress, is a rejected outcome with the state left untouched.
    #[instrument(skip(self))]
    pub fn attempt_move(&mut self, row: u8, col: u8) -> Result<MoveReport, GameError> {
        let pos = Position::new(row, col)?;

        if self.phase != GamePhase::InProgress {
            return Ok(self.reject(RejectReason::GameNotActive));
        }
        if !self.legal_moves.contains(&pos) {
            return Ok(self.reject(RejectReason::IllegalPosition(pos)));
        }

        let color = self.current_color();
        let flipped = engine::captured_cells(&self.board, pos, color);
        self.board.set(pos, color);
        for &cell in &flipped {
            self.board.set(cell, color);
        }
        debug!(player = %self.current_player().name, %pos, flipped = flipped.len(), "move applied");

        self.flipped = flipped;
        self.turn_skipped = false;
        self.update_scores();
        self.emit(GameEvent::BoardChanged);

        if engine::is_terminal(&self.board) {
            let result = self.end_game();
            return Ok(self.report(MoveOutcome::Ended(result)));
        }

        self.switch_turn();
        let outcome = match self.settle_turn() {
            TurnFlow::Ready => {
                let message = format!("{}'s turn", self.current_player().name);
                self.publish_turn(message);
                MoveOutcome::Accepted
            }
            TurnFlow::Skipped(skipped) => {
                self.publish_skip(&skipped);
                MoveOutcome::Accepted
            }
            TurnFlow::Finished(result) => MoveOutcome::Ended(result),
        };

        Ok(self.report(outcome))
    }

    /// Returns to the standard starting layout and `NotStarted`.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> GameSnapshot {
        self.board.reset();
        self.update_scores();
        self.current = self.first_mover();
        self.legal_moves.clear();
        self.phase = GamePhase::NotStarted;
        self.flipped.clear();
        self.turn_skipped = false;
        self.result = None;
        info!("game reset");

        self.emit(GameEvent::BoardChanged);
        self.emit(GameEvent::MoveSetChanged(Vec::new()));
        self.set_message(RESET_MESSAGE.to_string());

        self.snapshot()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            player1: self.players[0].clone(),
            player2: self.players[1].clone(),
            current_color: self.current_color(),
            legal_moves: self.legal_moves.clone(),
            phase: self.phase,
            message: self.message.clone(),
            flipped: self.flipped.clone(),
            turn_skipped: self.turn_skipped,
            result: self.result.clone(),
        }
    }

    pub fn piece_color_at(&self, row: u8, col: u8) -> Result<CellColor, GameError> {
        Ok(self.board.get(Position::new(row, col)?))
    }

    /// Whether `(row, col)` should be highlighted as playable.
    pub fn is_legal_move(&self, row: u8, col: u8) -> Result<bool, GameError> {
        let pos = Position::new(row, col)?;
        Ok(self.legal_moves.contains(&pos))
    }

    pub fn current_player_color(&self) -> CellColor {
        self.current_color()
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn player1(&self) -> &Player {
        &self.players[0]
    }

    pub fn player2(&self) -> &Player {
        &self.players[1]
    }

    /// Returns `(black_count, white_count)`.
    pub fn scores(&self) -> (u8, u8) {
        self.board.counts()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn legal_moves(&self) -> &[Position] {
        &self.legal_moves
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::NotStarted
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    fn current_color(&self) -> CellColor {
        self.players[self.current].color
    }

    fn first_mover(&self) -> usize {
        if self.players[0].color == CellColor::Black { 0 } else { 1 }
    }

    fn switch_turn(&mut self) {
        self.current = 1 - self.current;
    }

    fn refresh_legal_moves(&mut self) {
        self.legal_moves = engine::legal_moves(&self.board, self.current_color());
        debug!(
            color = %self.current_color(),
            count = self.legal_moves.len(),
            "legal moves recomputed"
        );
    }

    /// Recomputes moves for the side to move, passing the turn once if
    /// that side is stuck. Ends the game when the other side is stuck too.
    fn settle_turn(&mut self) -> TurnFlow {
        self.refresh_legal_moves();
        if !self.legal_moves.is_empty() {
            return TurnFlow::Ready;
        }

        let skipped = self.current_player().name.clone();
        debug!(player = %skipped, "no legal moves, skipping turn");
        self.switch_turn();
        self.refresh_legal_moves();

        if self.legal_moves.is_empty() {
            return TurnFlow::Finished(self.end_game());
        }

        self.turn_skipped = true;
        TurnFlow::Skipped(skipped)
    }

    fn end_game(&mut self) -> GameResult {
        self.phase = GamePhase::Ended;
        self.legal_moves.clear();
        self.update_scores();

        let result = GameResult::from_players(&self.players[0], &self.players[1]);
        let summary = result.summary();
        info!(%summary, "game ended");

        self.result = Some(result.clone());
        self.emit(GameEvent::MoveSetChanged(Vec::new()));
        self.set_message(result.headline());
        self.emit(GameEvent::GameEnded {
            summary,
            result: result.clone(),
        });
        result
    }

    fn update_scores(&mut self) {
        for player in &mut self.players {
            player.score = self.board.count(player.color);
        }
    }

    fn publish_turn(&mut self, message: String) {
        let player = self.current_player();
        let turn = format!("{}'s turn ({})", player.name, player.color);
        self.emit(GameEvent::MoveSetChanged(self.legal_moves.clone()));
        self.emit(GameEvent::TurnChanged(turn));
        self.set_message(message);
    }

    fn publish_skip(&mut self, skipped: &str) {
        let message = format!(
            "No valid moves for {skipped}. Skipping turn. {}'s turn",
            self.current_player().name
        );
        self.publish_turn(message);
    }

    fn reject(&self, reason: RejectReason) -> MoveReport {
        warn!(%reason, "move rejected");
        self.report(MoveOutcome::Rejected(reason))
    }

    fn report(&self, outcome: MoveOutcome) -> MoveReport {
        MoveReport {
            outcome,
            snapshot: self.snapshot(),
        }
    }

    fn set_message(&mut self, message: String) {
        self.message = message.clone();
        self.emit(GameEvent::MessageChanged(message));
    }

    fn emit(&mut self, event: GameEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_event(&event);
        }
        self.observers.retain(|(id, observer)| {
            let open = !observer.is_closed();
            if !open {
                debug!(?id, "dropping closed observer");
            }
            open
        });
    }
}
