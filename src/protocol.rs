//! Messages relayed between the two peers of a game.
//!
//! The relay forwards envelopes verbatim and never looks inside a move, so
//! every board travels in its sender's orientation and the receiver flips it.

use serde::{Deserialize, Serialize};

use crate::board::Board;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// A finished turn. `captured` is the sender's running capture count.
    Move { board: Board, captured: u8 },
    /// The receiver of the last move has no legal move left.
    Stalemate,
    Concede,
    /// The sender ran out of time on its turn.
    Timeout,
    RematchRequest,
    RematchAccept,
}

impl Message {
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Move { .. } => "move",
            Message::Stalemate => "stalemate",
            Message::Concede => "concede",
            Message::Timeout => "timeout",
            Message::RematchRequest => "rematch_request",
            Message::RematchAccept => "rematch_accept",
        }
    }
}

/// A message addressed to a game, as posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub game_id: String,
    #[serde(flatten)]
    pub message: Message,
}
