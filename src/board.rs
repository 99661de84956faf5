use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::{Cell, Side, Square};

pub const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const HOME_ROWS: usize = 3;

/// Checkers board as a plain 8x8 value, row-major (`cells[y][x]`).
///
/// Serialized as the 8x8 grid of cell codes the browser works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[[u8; BOARD_SIZE]; BOARD_SIZE]", try_from = "[[u8; BOARD_SIZE]; BOARD_SIZE]")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates the starting position: red men on the dark squares of rows 0-2,
    /// white men on the dark squares of rows 5-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                if (x + y) % 2 == 0 {
                    continue;
                }
                if y < HOME_ROWS {
                    board.cells[y][x] = Cell::RedMan;
                } else if y >= BOARD_SIZE - HOME_ROWS {
                    board.cells[y][x] = Cell::WhiteMan;
                }
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Returns a copy with `square` set to `cell`.
    pub fn with(mut self, square: Square, cell: Cell) -> Self {
        self.set(square, cell);
        self
    }

    /// Cell at `square`.
    ///
    /// Panics when `square` is off the board.
    pub fn cell(&self, square: Square) -> Cell {
        let (x, y) = index(square);
        self.cells[y][x]
    }

    /// Cell at `square`, or `None` when it is off the board.
    pub fn get(&self, square: Square) -> Option<Cell> {
        square.in_bounds().then(|| self.cell(square))
    }

    pub(crate) fn set(&mut self, square: Square, cell: Cell) {
        let (x, y) = index(square);
        self.cells[y][x] = cell;
    }

    /// The same position seen from the other side of the table:
    /// rows and columns both reversed.
    pub fn flipped(&self) -> Self {
        let mut cells = self.cells;
        cells.reverse();
        for row in cells.iter_mut() {
            row.reverse();
        }
        Self { cells }
    }

    /// Number of pieces `side` has on the board.
    pub fn count(&self, side: Side) -> u8 {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.belongs_to(side))
            .count() as u8
    }

    /// Iterates over `side`'s pieces in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Cell)> + '_ {
        self.squares()
            .map(|square| (square, self.cell(square)))
            .filter(move |(_, cell)| cell.belongs_to(side))
    }

    /// Every square in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE as i8).flat_map(|y| (0..BOARD_SIZE as i8).map(move |x| Square::new(x, y)))
    }

    /// Converts board to `[u8; 64]` using the cell codes.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut out = [0u8; NUM_SQUARES];
        for (slot, cell) in out.iter_mut().zip(self.cells.iter().flatten()) {
            *slot = cell.code();
        }
        out
    }

    /// Parses 64 row-major cell codes.
    pub fn from_array(codes: &[u8]) -> Result<Self, GameError> {
        if codes.len() != NUM_SQUARES {
            return Err(GameError::BadBoardLength(codes.len()));
        }
        let mut board = Self::empty();
        for (pos, &code) in codes.iter().enumerate() {
            board.cells[pos / BOARD_SIZE][pos % BOARD_SIZE] =
                Cell::from_code(code).ok_or(GameError::UnknownCell(code))?;
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for [[u8; BOARD_SIZE]; BOARD_SIZE] {
    fn from(board: Board) -> Self {
        board.cells.map(|row| row.map(Cell::code))
    }
}

impl TryFrom<[[u8; BOARD_SIZE]; BOARD_SIZE]> for Board {
    type Error = GameError;

    fn try_from(rows: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, Self::Error> {
        Self::from_array(rows.as_flattened())
    }
}

fn index(square: Square) -> (usize, usize) {
    assert!(square.in_bounds(), "square {square} is off the board");
    (square.x as usize, square.y as usize)
}
