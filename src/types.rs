use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    White,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::White,
            Side::White => Side::Red,
        }
    }

    /// Player code used by the browser UI: 1 = red, 2 = white.
    pub fn code(self) -> u8 {
        match self {
            Side::Red => 1,
            Side::White => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Side> {
        match code {
            1 => Some(Side::Red),
            2 => Some(Side::White),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => f.write_str("red"),
            Side::White => f.write_str("white"),
        }
    }
}

/// Content of a single square. The discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    RedMan = 1,
    WhiteMan = 2,
    RedKing = 3,
    WhiteKing = 4,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn is_king(self) -> bool {
        matches!(self, Cell::RedKing | Cell::WhiteKing)
    }

    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::RedMan | Cell::RedKing => Some(Side::Red),
            Cell::WhiteMan | Cell::WhiteKing => Some(Side::White),
        }
    }

    pub fn belongs_to(self, side: Side) -> bool {
        self.side() == Some(side)
    }

    pub fn is_opponent_of(self, side: Side) -> bool {
        self.side() == Some(side.opponent())
    }

    pub fn man(side: Side) -> Cell {
        match side {
            Side::Red => Cell::RedMan,
            Side::White => Cell::WhiteMan,
        }
    }

    pub fn king(side: Side) -> Cell {
        match side {
            Side::Red => Cell::RedKing,
            Side::White => Cell::WhiteKing,
        }
    }

    /// The king of the same side; kings and empty cells are returned unchanged.
    pub fn crowned(self) -> Cell {
        match self.side() {
            Some(side) => Cell::king(side),
            None => Cell::Empty,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::RedMan),
            2 => Some(Cell::WhiteMan),
            3 => Some(Cell::RedKing),
            4 => Some(Cell::WhiteKing),
            _ => None,
        }
    }
}

/// A board coordinate: column `x`, row `y`.
///
/// Signed so that a destination past the edge can still be named and rejected.
/// Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i8, i8)", into = "(i8, i8)")]
pub struct Square {
    pub x: i8,
    pub y: i8,
}

impl Square {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        (0..8).contains(&self.x) && (0..8).contains(&self.y)
    }

    pub fn offset(self, dx: i8, dy: i8) -> Square {
        Square::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Arithmetic midpoint; only meaningful for two squares an even distance apart.
    pub fn midpoint(self, other: Square) -> Square {
        let mid = |a: i8, b: i8| ((i16::from(a) + i16::from(b)) / 2) as i8;
        Square::new(mid(self.x, other.x), mid(self.y, other.y))
    }
}

impl From<(i8, i8)> for Square {
    fn from((x, y): (i8, i8)) -> Self {
        Square::new(x, y)
    }
}

impl From<Square> for (i8, i8) {
    fn from(square: Square) -> Self {
        (square.x, square.y)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A candidate move or jump descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn is_capture(&self) -> bool {
        self.from.x.abs_diff(self.to.x) == 2
    }

    /// Square of the piece jumped over.
    pub fn captured(&self) -> Option<Square> {
        self.is_capture().then(|| self.from.midpoint(self.to))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Move,
    Capture,
}

/// Result of executing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub board: Board,
    pub move_type: MoveKind,
    pub promoted: bool,
}

/// Moves open to a single piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceMoves {
    /// Opposing pieces this piece can jump.
    pub capture_squares: Vec<Square>,
    pub jumps: Vec<Move>,
    pub jump_required: bool,
    /// Neither a jump nor a simple step is available.
    pub has_no_move: bool,
}

/// Moves open to a whole side at the start of its turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub highlight_squares: Vec<Square>,
    /// Non-empty means the side must capture.
    pub mandatory_jumps: Vec<Move>,
    pub is_stalemate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    AllCaptured,
    Stalemate,
    Concede,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub winner: Side,
    pub reason: EndReason,
}

impl GameOutcome {
    /// End condition label from `local`'s point of view, as the end dialog expects it.
    pub fn end_condition(&self, local: Side) -> &'static str {
        let won = self.winner == local;
        match (self.reason, won) {
            (EndReason::AllCaptured, true) => "victory",
            (EndReason::AllCaptured, false) => "loss",
            (EndReason::Stalemate, true) => "victory-stalemate",
            (EndReason::Stalemate, false) => "loss-stalemate",
            (EndReason::Concede, true) => "victory-concede",
            (EndReason::Concede, false) => "loss-concede",
            (EndReason::Timeout, true) => "victory-timeout",
            (EndReason::Timeout, false) => "loss-timeout",
        }
    }
}

/// Public session state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// 64 cell codes, row-major, in the local player's orientation.
    pub board: Vec<u8>,
    pub current_player: Side,
    pub local_player: Side,
    pub red_captured: u8,
    pub white_captured: u8,
    pub selected: Option<Square>,
    /// Piece that must keep jumping before the turn can end.
    pub chain: Option<Square>,
    pub is_game_over: bool,
    pub end_condition: Option<&'static str>,
    pub rematch_requested: bool,
    pub seconds_left: Option<u64>,
}
