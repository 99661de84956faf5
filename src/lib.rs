pub mod board;
pub mod error;
pub mod game;
pub mod protocol;
pub mod rules;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use error::{GameError, GameResult};
pub use game::{GameSession, SessionConfig};
pub use types::{Cell, Move, MoveKind, Side, Square};
