use checkers::rules::{
    check_force_jumps_after_capture, get_available_moves, initial_board, is_valid_move,
    legal_moves, make_move, mark_possible_moves,
};
use checkers::{Board, Cell, Move, MoveKind, Side, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RANDOM_BOARDS: usize = 300;

fn sq(x: i8, y: i8) -> Square {
    Square::new(x, y)
}

/// Random position with pieces on dark squares only.
fn random_board(rng: &mut StdRng) -> Board {
    let mut board = Board::empty();
    for y in 0..8 {
        for x in 0..8 {
            if (x + y) % 2 == 0 || rng.random_bool(0.55) {
                continue;
            }
            let cell = Cell::from_code(rng.random_range(1..=4)).unwrap();
            board = board.with(sq(x, y), cell);
        }
    }
    board
}

fn all_squares() -> impl Iterator<Item = Square> {
    (0..8).flat_map(|y| (0..8).map(move |x| sq(x, y)))
}

#[test]
fn scenario_red_man_cannot_move_to_a_higher_row() {
    let board = initial_board();

    assert!(!is_valid_move(&board, sq(1, 2), sq(0, 3), Side::Red));
    assert!(!is_valid_move(&board, sq(1, 2), sq(2, 3), Side::Red));
}

#[test]
fn scenario_white_opening_step() {
    let board = initial_board();

    assert!(is_valid_move(&board, sq(2, 5), sq(1, 4), Side::White));
    let outcome = make_move(&board, sq(2, 5), sq(1, 4), Side::White);

    assert_eq!(outcome.board.cell(sq(1, 4)), Cell::WhiteMan);
    assert_eq!(outcome.board.cell(sq(2, 5)), Cell::Empty);
    assert_eq!(outcome.move_type, MoveKind::Move);
    assert!(!outcome.promoted);
    assert_eq!(board, initial_board());
}

#[test]
fn scenario_red_capture() {
    let board = Board::empty()
        .with(sq(3, 4), Cell::RedMan)
        .with(sq(2, 3), Cell::WhiteMan);

    assert!(is_valid_move(&board, sq(3, 4), sq(1, 2), Side::Red));
    let outcome = make_move(&board, sq(3, 4), sq(1, 2), Side::Red);

    assert_eq!(outcome.board.cell(sq(1, 2)), Cell::RedMan);
    assert_eq!(outcome.board.cell(sq(3, 4)), Cell::Empty);
    assert_eq!(outcome.board.cell(sq(2, 3)), Cell::Empty);
    assert_eq!(outcome.move_type, MoveKind::Capture);
}

#[test]
fn scenario_white_promotion() {
    let board = Board::empty().with(sq(0, 1), Cell::WhiteMan);

    let outcome = make_move(&board, sq(0, 1), sq(1, 0), Side::White);

    assert_eq!(outcome.board.cell(sq(1, 0)), Cell::WhiteKing);
    assert!(outcome.promoted);
}

#[test]
fn scenario_boxed_in_last_piece_is_stalemated() {
    let board = Board::empty()
        .with(sq(0, 7), Cell::WhiteMan)
        .with(sq(1, 6), Cell::RedMan)
        .with(sq(2, 5), Cell::RedMan);

    let availability = get_available_moves(&board, Side::White);

    assert!(availability.is_stalemate);
    assert!(availability.mandatory_jumps.is_empty());
    assert!(!get_available_moves(&board, Side::Red).is_stalemate);
}

#[test]
fn side_without_pieces_is_stalemated() {
    let board = Board::empty().with(sq(3, 4), Cell::RedMan);

    assert!(get_available_moves(&board, Side::White).is_stalemate);
}

#[test]
fn available_moves_union_every_jump() {
    let board = Board::empty()
        .with(sq(3, 4), Cell::RedMan)
        .with(sq(2, 3), Cell::WhiteMan)
        .with(sq(6, 5), Cell::RedKing)
        .with(sq(5, 6), Cell::WhiteMan);

    let availability = get_available_moves(&board, Side::Red);

    assert_eq!(availability.highlight_squares, vec![sq(2, 3), sq(5, 6)]);
    assert_eq!(
        availability.mandatory_jumps,
        vec![Move::new(sq(3, 4), sq(1, 2)), Move::new(sq(6, 5), sq(4, 7))]
    );
    assert!(!availability.is_stalemate);
}

#[test]
fn king_chains_jumps_backwards() {
    let board = Board::empty()
        .with(sq(2, 1), Cell::WhiteKing)
        .with(sq(3, 2), Cell::RedMan)
        .with(sq(3, 4), Cell::RedMan);

    let first = make_move(&board, sq(2, 1), sq(4, 3), Side::White);
    let next = check_force_jumps_after_capture(&first.board, sq(4, 3), Side::White);

    assert!(next.jump_required);
    assert_eq!(next.jumps, vec![Move::new(sq(4, 3), sq(2, 5))]);
    assert_eq!(next.capture_squares, vec![sq(3, 4)]);
}

#[test]
fn destinations_off_the_board_or_occupied_are_rejected() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..RANDOM_BOARDS {
        let board = random_board(&mut rng);
        for side in [Side::Red, Side::White] {
            for (from, _) in board.pieces(side) {
                for (dx, dy) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                    for reach in 1..=2 {
                        let to = from.offset(dx * reach, dy * reach);
                        let valid = is_valid_move(&board, from, to, side);
                        if !to.in_bounds() || !board.cell(to).is_empty() {
                            assert!(!valid, "{from} -> {to} accepted");
                        }
                    }
                }
                assert!(!is_valid_move(&board, from, sq(from.x, 8), side));
                assert!(!is_valid_move(&board, from, sq(-1, from.y), side));
            }
        }
    }
}

#[test]
fn men_never_move_to_a_higher_row() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..RANDOM_BOARDS {
        let board = random_board(&mut rng);
        for side in [Side::Red, Side::White] {
            for (from, cell) in board.pieces(side) {
                if cell.is_king() {
                    continue;
                }
                for to in all_squares() {
                    if is_valid_move(&board, from, to, side) {
                        assert!(to.y < from.y, "man moved {from} -> {to}");
                    }
                }
            }
        }
    }
}

#[test]
fn make_move_changes_only_the_squares_involved() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..RANDOM_BOARDS {
        let board = random_board(&mut rng);
        let before = board;
        for side in [Side::Red, Side::White] {
            for (from, piece) in board.pieces(side) {
                for to in all_squares() {
                    if !is_valid_move(&board, from, to, side) {
                        continue;
                    }
                    let outcome = make_move(&board, from, to, side);
                    assert_eq!(board, before);

                    let mv = Move::new(from, to);
                    let captured = mv.captured();
                    for square in all_squares() {
                        let after = outcome.board.cell(square);
                        if square == from || Some(square) == captured {
                            assert_eq!(after, Cell::Empty);
                        } else if square == to {
                            let expected = if to.y == 0 { piece.crowned() } else { piece };
                            assert_eq!(after, expected);
                            assert_eq!(outcome.promoted, to.y == 0 && !piece.is_king());
                        } else {
                            assert_eq!(after, board.cell(square), "{square} changed");
                        }
                    }
                    assert_eq!(
                        outcome.move_type == MoveKind::Capture,
                        captured.is_some()
                    );
                    if let Some(square) = captured {
                        assert!(board.cell(square).is_opponent_of(side));
                        assert_eq!(
                            outcome.board.count(side.opponent()) + 1,
                            board.count(side.opponent())
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn stalemate_means_no_valid_move_exists() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut stalemates = 0;
    for _ in 0..RANDOM_BOARDS {
        let board = random_board(&mut rng);
        for side in [Side::Red, Side::White] {
            let any_move = board
                .pieces(side)
                .any(|(from, _)| all_squares().any(|to| is_valid_move(&board, from, to, side)));
            let availability = get_available_moves(&board, side);

            assert_eq!(availability.is_stalemate, !any_move);
            assert_eq!(legal_moves(&board, side).is_empty(), !any_move);
            if availability.is_stalemate {
                stalemates += 1;
            }
        }
    }
    assert!(stalemates < RANDOM_BOARDS * 2);
}

#[test]
fn legal_moves_match_mark_possible_moves() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..RANDOM_BOARDS {
        let board = random_board(&mut rng);
        for side in [Side::Red, Side::White] {
            let jumps = get_available_moves(&board, side).mandatory_jumps;
            let legal = legal_moves(&board, side);
            for (from, _) in board.pieces(side) {
                let marked = mark_possible_moves(&board, from, side, &jumps);
                for to in &marked {
                    assert!(legal.contains(&Move::new(from, *to)), "{from} -> {to}");
                }
                if jumps.is_empty() {
                    assert!(marked.iter().all(|to| from.x.abs_diff(to.x) == 1));
                }
            }
            if !jumps.is_empty() {
                assert!(legal.iter().all(Move::is_capture));
            }
        }
    }
}
