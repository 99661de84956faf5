use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::protocol::{Envelope, Message};
use crate::rules::{
    check_force_jumps_after_capture, get_available_moves, is_valid_move, make_move,
    mark_possible_moves,
};
use crate::types::{
    Availability, EndReason, GameOutcome, GameState, Move, MoveKind, Side, Square,
};

pub const PIECES_PER_SIDE: u8 = 12;
const DEFAULT_TURN_TIME_LIMIT_SECS: u64 = 60;

/// Settings for one peer's view of a game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Id the relay routes this game's messages by.
    pub game_id: String,
    pub local_side: Side,
    pub first_to_move: Side,
    /// Seconds allowed per turn; `0` disables the clock.
    pub turn_time_limit_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_id: String::new(),
            local_side: Side::White,
            first_to_move: Side::White,
            turn_time_limit_secs: DEFAULT_TURN_TIME_LIMIT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TurnClock {
    limit: Option<Duration>,
    started: Option<Instant>,
}

impl TurnClock {
    fn new(limit_secs: u64) -> Self {
        Self {
            limit: (limit_secs > 0).then(|| Duration::from_secs(limit_secs)),
            started: None,
        }
    }

    /// Starts the clock unless it is already running.
    fn start(&mut self) {
        self.started.get_or_insert_with(Instant::now);
    }

    fn stop(&mut self) {
        self.started = None;
    }

    fn remaining(&self) -> Option<Duration> {
        let limit = self.limit?;
        let started = self.started?;
        Some(limit.saturating_sub(started.elapsed()))
    }

    fn expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }
}

/// What the local player faces at the start of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStart {
    Ready(Availability),
    /// No piece can move: the game is lost and the envelope must be relayed.
    Stalemated(Envelope),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStep {
    /// The piece on `at` must jump again before the turn can end.
    Continue { at: Square, jumps: Vec<Move> },
    /// The turn is over; the envelope must be relayed to the opponent.
    Ended(Envelope),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEvent {
    pub move_type: MoveKind,
    pub promoted: bool,
    pub step: TurnStep,
}

/// One peer's side of a networked game.
///
/// The board is always held in the local player's orientation, so the local
/// side's men advance toward row 0. Moves from the opponent arrive as whole
/// boards and are trusted as they are.
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    current_player: Side,
    red_captured: u8,
    white_captured: u8,
    selected: Option<Square>,
    chain: Option<Square>,
    outcome: Option<GameOutcome>,
    rematch_requested: bool,
    rematch_sent: bool,
    clock: TurnClock,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        let clock = TurnClock::new(config.turn_time_limit_secs);
        Self {
            board: initial_board_for(config.local_side),
            current_player: config.first_to_move,
            red_captured: 0,
            white_captured: 0,
            selected: None,
            chain: None,
            outcome: None,
            rematch_requested: false,
            rematch_sent: false,
            clock,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn local_side(&self) -> Side {
        self.config.local_side
    }

    pub fn current_player(&self) -> Side {
        self.current_player
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Pieces captured so far by `side`.
    pub fn captured(&self, side: Side) -> u8 {
        match side {
            Side::Red => self.red_captured,
            Side::White => self.white_captured,
        }
    }

    /// Begins the local player's turn: computes forced jumps, detects
    /// stalemate and starts the clock. Calling it again mid-turn leaves the
    /// clock running as it was.
    pub fn start_turn(&mut self) -> GameResult<TurnStart> {
        self.ensure_local_turn()?;
        if let Some(chain) = self.chain {
            return Err(GameError::JumpInProgress(chain));
        }

        let local = self.local_side();
        let availability = get_available_moves(&self.board, local);
        if availability.is_stalemate {
            self.finish(local.opponent(), EndReason::Stalemate);
            return Ok(TurnStart::Stalemated(self.seal(Message::Stalemate)));
        }

        self.clock.start();
        Ok(TurnStart::Ready(availability))
    }

    /// Selects one of the local pieces and returns where it can go.
    pub fn select(&mut self, at: Square) -> GameResult<Vec<Square>> {
        self.ensure_local_turn()?;

        if let Some(chain) = self.chain
            && chain != at
        {
            return Err(GameError::JumpInProgress(chain));
        }

        let local = self.local_side();
        if !self.board.get(at).is_some_and(|cell| cell.belongs_to(local)) {
            return Err(GameError::NotYourPiece { side: local, at });
        }

        let forced = self.forced_jumps();
        self.selected = Some(at);
        Ok(mark_possible_moves(&self.board, at, local, &forced))
    }

    pub fn deselect(&mut self) -> GameResult<()> {
        if let Some(chain) = self.chain {
            return Err(GameError::JumpInProgress(chain));
        }
        self.selected = None;
        Ok(())
    }

    /// Moves the selected piece to `to`.
    pub fn play(&mut self, to: Square) -> GameResult<TurnEvent> {
        self.ensure_local_turn()?;

        let from = self.selected.ok_or(GameError::NothingSelected)?;
        let local = self.local_side();
        if !is_valid_move(&self.board, from, to, local) {
            return Err(GameError::IllegalMove { from, to });
        }

        let forced = self.forced_jumps();
        if !forced.is_empty() && !forced.contains(&Move::new(from, to)) {
            return Err(match self.chain {
                Some(chain) => GameError::JumpInProgress(chain),
                None => GameError::CaptureRequired,
            });
        }

        let outcome = make_move(&self.board, from, to, local);
        self.board = outcome.board;

        if outcome.move_type == MoveKind::Capture {
            let captured = self.record_capture(local);
            if captured >= PIECES_PER_SIDE {
                self.finish(local, EndReason::AllCaptured);
                return Ok(self.end_turn(outcome.move_type, outcome.promoted));
            }

            if !outcome.promoted {
                let next = check_force_jumps_after_capture(&self.board, to, local);
                if next.jump_required {
                    debug!(at = %to, jumps = next.jumps.len(), "jump chain continues");
                    self.chain = Some(to);
                    self.selected = Some(to);
                    return Ok(TurnEvent {
                        move_type: outcome.move_type,
                        promoted: outcome.promoted,
                        step: TurnStep::Continue {
                            at: to,
                            jumps: next.jumps,
                        },
                    });
                }
            }
        }

        Ok(self.end_turn(outcome.move_type, outcome.promoted))
    }

    /// Applies a message relayed from the opponent.
    ///
    /// Returns an envelope to relay back when the message leaves the local
    /// player stalemated.
    pub fn receive(&mut self, envelope: Envelope) -> GameResult<Option<Envelope>> {
        if envelope.game_id != self.config.game_id {
            warn!(
                expected = %self.config.game_id,
                got = %envelope.game_id,
                "dropping message for another game"
            );
            return Err(GameError::WrongGame {
                expected: self.config.game_id.clone(),
                got: envelope.game_id,
            });
        }

        let local = self.local_side();
        let opponent = local.opponent();
        match envelope.message {
            Message::Move { board, captured } => {
                if self.is_game_over() {
                    return Err(GameError::GameOver);
                }
                if self.current_player != opponent {
                    warn!("move received out of turn");
                    return Err(GameError::UnexpectedMessage("move"));
                }

                self.board = board.flipped();
                match opponent {
                    Side::Red => self.red_captured = captured,
                    Side::White => self.white_captured = captured,
                }
                self.current_player = local;

                if captured >= PIECES_PER_SIDE {
                    self.finish(opponent, EndReason::AllCaptured);
                    return Ok(None);
                }

                match self.start_turn()? {
                    TurnStart::Ready(_) => Ok(None),
                    TurnStart::Stalemated(reply) => Ok(Some(reply)),
                }
            }
            Message::Stalemate => self.opponent_forfeits(EndReason::Stalemate),
            Message::Concede => self.opponent_forfeits(EndReason::Concede),
            Message::Timeout => self.opponent_forfeits(EndReason::Timeout),
            Message::RematchRequest => {
                if !self.is_game_over() {
                    return Err(GameError::GameInProgress);
                }
                self.rematch_requested = true;
                Ok(None)
            }
            Message::RematchAccept => {
                if !self.is_game_over() {
                    return Err(GameError::GameInProgress);
                }
                if !self.rematch_sent {
                    warn!("rematch accepted without a request");
                    return Err(GameError::NoRematchPending);
                }
                self.reset();
                Ok(None)
            }
        }
    }

    pub fn concede(&mut self) -> GameResult<Envelope> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        self.finish(self.local_side().opponent(), EndReason::Concede);
        Ok(self.seal(Message::Concede))
    }

    /// Ends the game when the local turn clock has run out.
    pub fn poll_clock(&mut self) -> Option<Envelope> {
        if self.is_game_over() || self.current_player != self.local_side() || !self.clock.expired() {
            return None;
        }
        self.finish(self.local_side().opponent(), EndReason::Timeout);
        Some(self.seal(Message::Timeout))
    }

    /// Time left on the local turn, when the clock is running.
    pub fn time_left(&self) -> Option<Duration> {
        if self.is_game_over() || self.current_player != self.local_side() {
            return None;
        }
        self.clock.remaining()
    }

    pub fn request_rematch(&mut self) -> GameResult<Envelope> {
        if !self.is_game_over() {
            return Err(GameError::GameInProgress);
        }
        self.rematch_sent = true;
        Ok(self.seal(Message::RematchRequest))
    }

    pub fn accept_rematch(&mut self) -> GameResult<Envelope> {
        if !self.rematch_requested {
            return Err(GameError::NoRematchPending);
        }
        self.reset();
        Ok(self.seal(Message::RematchAccept))
    }

    pub fn state(&self) -> GameState {
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.current_player,
            local_player: self.local_side(),
            red_captured: self.red_captured,
            white_captured: self.white_captured,
            selected: self.selected,
            chain: self.chain,
            is_game_over: self.is_game_over(),
            end_condition: self
                .outcome
                .map(|outcome| outcome.end_condition(self.local_side())),
            rematch_requested: self.rematch_requested,
            seconds_left: self.time_left().map(|left| left.as_secs()),
        }
    }

    fn ensure_local_turn(&self) -> GameResult<()> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if self.current_player != self.local_side() {
            return Err(GameError::NotYourTurn(self.local_side()));
        }
        Ok(())
    }

    /// Jumps the local side must choose from, computed from the current board.
    fn forced_jumps(&self) -> Vec<Move> {
        let local = self.local_side();
        match self.chain {
            Some(at) => check_force_jumps_after_capture(&self.board, at, local).jumps,
            None => get_available_moves(&self.board, local).mandatory_jumps,
        }
    }

    fn record_capture(&mut self, side: Side) -> u8 {
        let count = match side {
            Side::Red => &mut self.red_captured,
            Side::White => &mut self.white_captured,
        };
        *count += 1;
        *count
    }

    fn end_turn(&mut self, move_type: MoveKind, promoted: bool) -> TurnEvent {
        let local = self.local_side();
        self.selected = None;
        self.chain = None;
        self.clock.stop();
        if !self.is_game_over() {
            self.current_player = local.opponent();
        }

        let message = Message::Move {
            board: self.board,
            captured: self.captured(local),
        };
        TurnEvent {
            move_type,
            promoted,
            step: TurnStep::Ended(self.seal(message)),
        }
    }

    fn opponent_forfeits(&mut self, reason: EndReason) -> GameResult<Option<Envelope>> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        self.finish(self.local_side(), reason);
        Ok(None)
    }

    fn finish(&mut self, winner: Side, reason: EndReason) {
        info!(%winner, ?reason, game_id = %self.config.game_id, "game over");
        self.clock.stop();
        self.selected = None;
        self.chain = None;
        self.outcome = Some(GameOutcome { winner, reason });
    }

    fn reset(&mut self) {
        info!(game_id = %self.config.game_id, "rematch started");
        *self = Self::new(self.config.clone());
    }

    fn seal(&self, message: Message) -> Envelope {
        Envelope {
            game_id: self.config.game_id.clone(),
            message,
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Side) {
        self.board = board;
        self.current_player = current_player;
        self.selected = None;
        self.chain = None;
        self.outcome = None;
    }

    #[cfg(test)]
    fn set_turn_limit_for_test(&mut self, limit: Duration) {
        self.clock.limit = Some(limit);
    }
}

/// Starting position as seen by `side`: white sits at the bottom of the
/// canonical board, red sees it turned around.
fn initial_board_for(side: Side) -> Board {
    match side {
        Side::White => Board::new(),
        Side::Red => Board::new().flipped(),
    }
}
