//! Error types for the game session and the wire formats.
//!
//! The rules engine itself has no error type: an illegal query is answered
//! with `false`, and an out-of-contract call panics.

use crate::types::{Side, Square};

/// Errors returned by session operations and board decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,

    #[error("game is still in progress")]
    GameInProgress,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("no piece is selected")]
    NothingSelected,

    /// The square does not hold one of the local player's pieces.
    #[error("no {side} piece at {at}")]
    NotYourPiece { side: Side, at: Square },

    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("a capture is available and must be taken")]
    CaptureRequired,

    /// A multi-jump is in progress and only this piece may move.
    #[error("the piece at {0} must keep jumping")]
    JumpInProgress(Square),

    #[error("message for game {got:?} does not belong to game {expected:?}")]
    WrongGame { expected: String, got: String },

    #[error("unexpected {0} message")]
    UnexpectedMessage(&'static str),

    #[error("no rematch has been requested")]
    NoRematchPending,

    #[error("unknown player code {0}")]
    UnknownSide(u8),

    #[error("unknown cell code {0}")]
    UnknownCell(u8),

    #[error("board must have 64 cells, got {0}")]
    BadBoardLength(usize),
}

/// Result type alias for session operations
pub type GameResult<T> = Result<T, GameError>;
