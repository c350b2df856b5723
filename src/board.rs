use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseBoardError;
use crate::types::{CellColor, Position};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Othello board as a plain 8x8 grid of cell colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Board {
    cells: [[CellColor; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }

    /// A board with no pieces at all.
    pub fn empty() -> Self {
        Self {
            cells: [[CellColor::None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Restores the four-piece starting layout.
    pub fn reset(&mut self) {
        self.cells = [[CellColor::None; BOARD_SIZE]; BOARD_SIZE];
        self.cells[3][3] = CellColor::White;
        self.cells[3][4] = CellColor::Black;
        self.cells[4][3] = CellColor::Black;
        self.cells[4][4] = CellColor::White;
    }

    pub fn get(&self, pos: Position) -> CellColor {
        self[pos]
    }

    pub fn set(&mut self, pos: Position, color: CellColor) {
        self[pos] = color;
    }

    /// Number of cells holding `color`.
    pub fn count(&self, color: CellColor) -> u8 {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == color)
            .count() as u8
    }

    /// Returns `(black_count, white_count)`.
    pub fn counts(&self) -> (u8, u8) {
        (self.count(CellColor::Black), self.count(CellColor::White))
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        self.count(CellColor::None)
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> &[[CellColor; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut out = [0u8; NUM_SQUARES];
        for (cell, color) in out.iter_mut().zip(self.cells.iter().flatten()) {
            *cell = color.to_u8();
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Position> for Board {
    type Output = CellColor;

    fn index(&self, pos: Position) -> &CellColor {
        let (row, col) = pos.index();
        &self.cells[row][col]
    }
}

impl IndexMut<Position> for Board {
    fn index_mut(&mut self, pos: Position) -> &mut CellColor {
        let (row, col) = pos.index();
        &mut self.cells[row][col]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  0 1 2 3 4 5 6 7")?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "\n{row} ")?;
            for cell in cells {
                let glyph = match cell {
                    CellColor::None => '.',
                    CellColor::Black => 'X',
                    CellColor::White => 'O',
                };
                write!(f, "{glyph} ")?;
            }
        }
        writeln!(f)
    }
}

/// Parses 64 cells in row-major order. Whitespace is ignored;
/// `.`/`-` is empty, `X`/`B` black, `O`/`W` white.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colors = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c.to_ascii_uppercase() {
                '.' | '-' => Ok(CellColor::None),
                'X' | 'B' => Ok(CellColor::Black),
                'O' | 'W' => Ok(CellColor::White),
                other => Err(ParseBoardError::InvalidCell(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if colors.len() != NUM_SQUARES {
            return Err(ParseBoardError::WrongCellCount(colors.len()));
        }

        let mut board = Self::empty();
        for (pos, color) in Position::all().zip(colors) {
            board[pos] = color;
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn initial_board_has_four_center_pieces() {
        let board = Board::new();

        assert_eq!(board.get(pos(3, 3)), CellColor::White);
        assert_eq!(board.get(pos(3, 4)), CellColor::Black);
        assert_eq!(board.get(pos(4, 3)), CellColor::Black);
        assert_eq!(board.get(pos(4, 4)), CellColor::White);
        assert_eq!(board.counts(), (2, 2));
        assert_eq!(board.empty_count(), 60);
    }

    #[test]
    fn reset_restores_start_layout_and_is_idempotent() {
        let mut board = Board::new();
        board.set(pos(0, 0), CellColor::Black);
        board.set(pos(3, 3), CellColor::Black);

        board.reset();
        let once = board;
        board.reset();

        assert_eq!(once, Board::new());
        assert_eq!(board, once);
    }

    #[test]
    fn set_overwrites_any_in_range_cell() {
        let mut board = Board::empty();
        board.set(pos(7, 0), CellColor::White);

        assert_eq!(board[pos(7, 0)], CellColor::White);
        assert_eq!(board.count(CellColor::White), 1);
        assert_eq!(board.empty_count(), 63);
    }

    #[test]
    fn to_array_uses_row_major_wire_encoding() {
        let cells = Board::new().to_array();

        assert_eq!(cells[3 * 8 + 3], 2);
        assert_eq!(cells[3 * 8 + 4], 1);
        assert_eq!(cells[4 * 8 + 3], 1);
        assert_eq!(cells[4 * 8 + 4], 2);
        assert_eq!(cells.iter().filter(|&&c| c == 0).count(), 60);
    }

    #[test]
    fn parse_round_trips_through_display_glyphs() {
        let text = "
            ........
            ........
            ........
            ...OX...
            ...XO...
            ........
            ........
            ........";
        let board: Board = text.parse().unwrap();

        assert_eq!(board, Board::new());
        assert!(board.to_string().contains("3 . . . O X . . . "));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            "........".parse::<Board>(),
            Err(ParseBoardError::WrongCellCount(8))
        );

        let bad = format!("{}?", ".".repeat(63));
        assert_eq!(bad.parse::<Board>(), Err(ParseBoardError::InvalidCell('?')));
    }
}
