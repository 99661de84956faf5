//! Checkers rules engine.
//!
//! Every function is a pure computation over a [`Board`] value seen from the
//! perspective of the side being asked about: men of either side advance
//! toward row 0 and are crowned on it. Callers that hold the board in a
//! different orientation flip it with [`Board::flipped`] first.

use tracing::debug;

use crate::board::Board;
use crate::types::{Availability, Cell, Move, MoveKind, MoveOutcome, PieceMoves, Side, Square};

/// Row on which a man is crowned.
pub const PROMOTION_ROW: i8 = 0;

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The standard starting position.
pub fn initial_board() -> Board {
    Board::new()
}

/// Checks whether the piece at `from` may step or jump to `to`.
///
/// Does not look at whose turn it is or whether a capture elsewhere is
/// mandatory; see [`get_available_moves`] and [`legal_moves`] for that.
/// Panics when `from` is off the board.
pub fn is_valid_move(board: &Board, from: Square, to: Square, side: Side) -> bool {
    if !to.in_bounds() || !board.cell(to).is_empty() {
        return false;
    }

    let piece = board.cell(from);
    let dx = from.x.abs_diff(to.x);
    let dy = from.y.abs_diff(to.y);
    if dx != dy || !may_advance(piece, to.y - from.y) {
        return false;
    }

    match dx {
        1 => true,
        2 => board.cell(from.midpoint(to)).is_opponent_of(side),
        _ => false,
    }
}

/// Executes a move and returns the resulting board; `board` is left untouched.
///
/// Caller contract: the move must satisfy [`is_valid_move`] and `from` must
/// hold one of `side`'s pieces. Anything else panics.
pub fn make_move(board: &Board, from: Square, to: Square, side: Side) -> MoveOutcome {
    let piece = board.cell(from);
    assert!(piece.belongs_to(side), "no {side} piece at {from}");
    assert!(
        is_valid_move(board, from, to, side),
        "illegal move from {from} to {to} for {side}"
    );

    let mut next = *board;
    next.set(from, Cell::Empty);

    let move_type = if from.x.abs_diff(to.x) == 2 {
        next.set(from.midpoint(to), Cell::Empty);
        MoveKind::Capture
    } else {
        MoveKind::Move
    };

    let crowned = to.y == PROMOTION_ROW;
    next.set(to, if crowned { piece.crowned() } else { piece });
    let promoted = crowned && !piece.is_king();

    debug!(%side, %from, %to, ?move_type, promoted, "move executed");

    MoveOutcome {
        board: next,
        move_type,
        promoted,
    }
}

/// Examines the four diagonals around the piece at `at`.
pub fn check_piece_for_moves(board: &Board, at: Square, side: Side) -> PieceMoves {
    let piece = board.cell(at);
    let mut moves = PieceMoves::default();
    let mut has_step = false;

    for (dx, dy) in DIAGONALS {
        if !may_advance(piece, dy) {
            continue;
        }

        let over = at.offset(dx, dy);
        let land = at.offset(2 * dx, 2 * dy);
        match board.get(over) {
            Some(Cell::Empty) => has_step = true,
            Some(cell) if cell.is_opponent_of(side) && board.get(land) == Some(Cell::Empty) => {
                moves.capture_squares.push(over);
                moves.jumps.push(Move::new(at, land));
            }
            _ => {}
        }
    }

    moves.jump_required = !moves.jumps.is_empty();
    moves.has_no_move = !moves.jump_required && !has_step;
    moves
}

/// Unions [`check_piece_for_moves`] over every piece of `side`.
///
/// A side with no piece able to move is stalemated; this includes a side with
/// no pieces at all.
pub fn get_available_moves(board: &Board, side: Side) -> Availability {
    let mut availability = Availability {
        is_stalemate: true,
        ..Availability::default()
    };

    for (square, _) in board.pieces(side) {
        let moves = check_piece_for_moves(board, square, side);
        availability.is_stalemate &= moves.has_no_move;
        availability.highlight_squares.extend(moves.capture_squares);
        availability.mandatory_jumps.extend(moves.jumps);
    }

    availability
}

/// Looks for further jumps by the piece that just captured on `at`.
///
/// Callers must not ask this for a piece crowned by that capture; crowning
/// ends the turn.
pub fn check_force_jumps_after_capture(board: &Board, at: Square, side: Side) -> PieceMoves {
    check_piece_for_moves(board, at, side)
}

/// Destinations reachable from `at`: simple steps only while no capture is
/// mandatory anywhere, capture landings always.
pub fn mark_possible_moves(
    board: &Board,
    at: Square,
    side: Side,
    mandatory_jumps: &[Move],
) -> Vec<Square> {
    let mut destinations = Vec::new();

    for (dx, dy) in DIAGONALS {
        let step = at.offset(dx, dy);
        if mandatory_jumps.is_empty() && is_valid_move(board, at, step, side) {
            destinations.push(step);
        }

        let land = at.offset(2 * dx, 2 * dy);
        if is_valid_move(board, at, land, side) {
            destinations.push(land);
        }
    }

    destinations
}

/// Every move `side` may make right now, with mandatory capture applied:
/// all jumps when any exist, otherwise all simple steps.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let availability = get_available_moves(board, side);
    if !availability.mandatory_jumps.is_empty() {
        return availability.mandatory_jumps;
    }

    board
        .pieces(side)
        .flat_map(|(from, _)| {
            mark_possible_moves(board, from, side, &[])
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

fn may_advance(piece: Cell, dy: i8) -> bool {
    piece.is_king() || dy < 0
}
