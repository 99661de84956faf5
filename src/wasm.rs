//! WASM bindings for the browser UI.
//!
//! Boards cross the boundary as nested `[row][column]` arrays of cell codes,
//! squares as `[x, y]` and players as `1` (red) / `2` (white). Coordinates
//! are taken as `i32` so that out-of-range numbers from JS are rejected rather
//! than wrapped onto the board.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::error::GameError;
use crate::game::{GameSession, SessionConfig};
use crate::protocol::Envelope;
use crate::rules;
use crate::types::{Move, Side, Square};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn side_from_code(player: u8) -> Result<Side, JsError> {
    Side::from_code(player).ok_or_else(|| GameError::UnknownSide(player).into())
}

fn square(x: i32, y: i32) -> Option<Square> {
    let square = Square::new(i8::try_from(x).ok()?, i8::try_from(y).ok()?);
    square.in_bounds().then_some(square)
}

fn on_board(x: i32, y: i32) -> Result<Square, JsError> {
    square(x, y).ok_or_else(|| JsError::new(&format!("square ({x}, {y}) is off the board")))
}

#[wasm_bindgen(js_name = initialBoard)]
pub fn initial_board() -> Result<JsValue, JsError> {
    to_js(&rules::initial_board())
}

#[wasm_bindgen(js_name = flipGameBoard)]
pub fn flip_game_board(board: JsValue) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    to_js(&board.flipped())
}

#[wasm_bindgen(js_name = isValidMove)]
pub fn is_valid_move(
    board: JsValue,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
    player: u8,
) -> Result<bool, JsError> {
    let board: Board = from_js(board)?;
    let from = on_board(start_x, start_y)?;
    let side = side_from_code(player)?;
    Ok(square(end_x, end_y).is_some_and(|to| rules::is_valid_move(&board, from, to, side)))
}

/// Returns `{ board, moveType, promoted }`. Throws instead of aborting on an
/// illegal move.
#[wasm_bindgen(js_name = makeMove)]
pub fn make_move(
    board: JsValue,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
    player: u8,
) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    let from = on_board(start_x, start_y)?;
    let to = on_board(end_x, end_y)?;
    let side = side_from_code(player)?;
    if !board.cell(from).belongs_to(side) {
        return Err(GameError::NotYourPiece { side, at: from }.into());
    }
    if !rules::is_valid_move(&board, from, to, side) {
        return Err(GameError::IllegalMove { from, to }.into());
    }
    to_js(&rules::make_move(&board, from, to, side))
}

#[wasm_bindgen(js_name = checkPieceForMoves)]
pub fn check_piece_for_moves(board: JsValue, x: i32, y: i32, player: u8) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    let at = on_board(x, y)?;
    to_js(&rules::check_piece_for_moves(&board, at, side_from_code(player)?))
}

#[wasm_bindgen(js_name = getAvailableMoves)]
pub fn get_available_moves(board: JsValue, player: u8) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    to_js(&rules::get_available_moves(&board, side_from_code(player)?))
}

#[wasm_bindgen(js_name = checkForceJumpsAfterCapture)]
pub fn check_force_jumps_after_capture(
    board: JsValue,
    x: i32,
    y: i32,
    player: u8,
) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    let at = on_board(x, y)?;
    to_js(&rules::check_force_jumps_after_capture(&board, at, side_from_code(player)?))
}

/// `mandatoryJumps` is the `{ from, to }` list from `getAvailableMoves`.
#[wasm_bindgen(js_name = markPossibleMoves)]
pub fn mark_possible_moves(
    board: JsValue,
    x: i32,
    y: i32,
    player: u8,
    mandatory_jumps: JsValue,
) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    let at = on_board(x, y)?;
    let jumps: Vec<Move> = if mandatory_jumps.is_undefined() || mandatory_jumps.is_null() {
        Vec::new()
    } else {
        from_js(mandatory_jumps)?
    };
    to_js(&rules::mark_possible_moves(&board, at, side_from_code(player)?, &jumps))
}

#[wasm_bindgen(js_name = legalMoves)]
pub fn legal_moves(board: JsValue, player: u8) -> Result<JsValue, JsError> {
    let board: Board = from_js(board)?;
    to_js(&rules::legal_moves(&board, side_from_code(player)?))
}

/// WASM-friendly wrapper around [`GameSession`].
#[wasm_bindgen]
pub struct WasmSession {
    inner: GameSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// `config` is `{ gameId, localSide, firstToMove, turnTimeLimitSecs }`;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmSession, JsError> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            from_js(config)?
        };
        Ok(WasmSession {
            inner: GameSession::new(config),
        })
    }

    #[wasm_bindgen(js_name = startTurn)]
    pub fn start_turn(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.start_turn()?)
    }

    pub fn select(&mut self, x: i32, y: i32) -> Result<JsValue, JsError> {
        to_js(&self.inner.select(on_board(x, y)?)?)
    }

    pub fn deselect(&mut self) -> Result<(), JsError> {
        Ok(self.inner.deselect()?)
    }

    pub fn play(&mut self, x: i32, y: i32) -> Result<JsValue, JsError> {
        to_js(&self.inner.play(on_board(x, y)?)?)
    }

    /// Applies an envelope from the relay; returns an envelope to send back or `null`.
    pub fn receive(&mut self, envelope: JsValue) -> Result<JsValue, JsError> {
        let envelope: Envelope = from_js(envelope)?;
        to_js(&self.inner.receive(envelope)?)
    }

    pub fn concede(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.concede()?)
    }

    /// Returns a timeout envelope to send once the local clock has run out, else `null`.
    #[wasm_bindgen(js_name = pollClock)]
    pub fn poll_clock(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.poll_clock())
    }

    #[wasm_bindgen(js_name = requestRematch)]
    pub fn request_rematch(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.request_rematch()?)
    }

    #[wasm_bindgen(js_name = acceptRematch)]
    pub fn accept_rematch(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.accept_rematch()?)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.state())
    }
}
