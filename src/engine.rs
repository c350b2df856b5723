//! Move legality and capture computation.
//!
//! Everything here is a pure function of the board: nothing is cached and
//! nothing is mutated. Captures are always computed against the board as it
//! stands before the new piece is placed.

use crate::board::Board;
use crate::types::{CellColor, Position};

/// The eight compass directions as `(row, col)` unit steps.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Opponent cells captured along one ray from `pos`.
///
/// The run of opponent pieces counts only when it is closed by a piece of
/// `color`; an empty cell or the board edge discards it.
pub fn ray_captures(board: &Board, pos: Position, color: CellColor, dir: (i8, i8)) -> Vec<Position> {
    let opponent = color.opponent();
    let mut run = Vec::new();
    let mut cursor = pos.offset(dir.0, dir.1);

    while let Some(cell) = cursor {
        match board[cell] {
            c if c == opponent => run.push(cell),
            c if c == color && !run.is_empty() => return run,
            _ => break,
        }
        cursor = cell.offset(dir.0, dir.1);
    }

    Vec::new()
}

/// Every opponent cell flipped by placing `color` at `pos`.
///
/// Empty when the move is not legal, including when `pos` is occupied.
pub fn captured_cells(board: &Board, pos: Position, color: CellColor) -> Vec<Position> {
    if board[pos].is_piece() || !color.is_piece() {
        return Vec::new();
    }

    DIRECTIONS
        .iter()
        .flat_map(|&dir| ray_captures(board, pos, color, dir))
        .collect()
}

fn captures_any(board: &Board, pos: Position, color: CellColor) -> bool {
    !board[pos].is_piece()
        && DIRECTIONS
            .iter()
            .any(|&dir| !ray_captures(board, pos, color, dir).is_empty())
}

/// All empty cells where `color` would capture at least one piece,
/// in row-major order.
pub fn legal_moves(board: &Board, color: CellColor) -> Vec<Position> {
    if !color.is_piece() {
        return Vec::new();
    }

    Position::all()
        .filter(|&pos| captures_any(board, pos, color))
        .collect()
}

pub fn has_legal_move(board: &Board, color: CellColor) -> bool {
    color.is_piece() && Position::all().any(|pos| captures_any(board, pos, color))
}

/// `true` when neither color can move.
pub fn is_terminal(board: &Board) -> bool {
    !has_legal_move(board, CellColor::Black) && !has_legal_move(board, CellColor::White)
}
