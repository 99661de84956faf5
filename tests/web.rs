#![cfg(target_arch = "wasm32")]

use checkers::wasm::{
    WasmSession, get_available_moves, initial_board, is_valid_move, make_move, mark_possible_moves,
};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn get(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn initial_board_is_a_nested_array() {
    let board = initial_board().map_err(JsValue::from).unwrap();

    assert!(Array::is_array(&board));
    let rows = Array::from(&board);
    assert_eq!(rows.length(), 8);
    let first = Array::from(&rows.get(0));
    assert_eq!(first.get(1).as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn white_opening_move_round_trips_through_js() {
    let board = initial_board().map_err(JsValue::from).unwrap();

    assert!(is_valid_move(board.clone(), 2, 5, 1, 4, 2).map_err(JsValue::from).unwrap());
    assert!(!is_valid_move(board.clone(), 1, 2, 0, 3, 1).map_err(JsValue::from).unwrap());

    let outcome = make_move(board, 2, 5, 1, 4, 2).map_err(JsValue::from).unwrap();
    assert_eq!(get(&outcome, "moveType").as_string().as_deref(), Some("move"));
    assert_eq!(get(&outcome, "promoted").as_bool(), Some(false));
    let row = Array::from(&Array::from(&get(&outcome, "board")).get(4));
    assert_eq!(row.get(1).as_f64(), Some(2.0));
}

#[wasm_bindgen_test]
fn illegal_make_move_throws() {
    let board = initial_board().map_err(JsValue::from).unwrap();

    assert!(make_move(board.clone(), 1, 2, 2, 3, 1).is_err());
    assert!(make_move(board, 2, 5, 1, 4, 7).is_err());
}

#[wasm_bindgen_test]
fn availability_uses_ui_field_names() {
    let board = initial_board().map_err(JsValue::from).unwrap();

    let availability = get_available_moves(board.clone(), 2).map_err(JsValue::from).unwrap();
    assert_eq!(get(&availability, "isStalemate").as_bool(), Some(false));
    assert_eq!(Array::from(&get(&availability, "mandatoryJumps")).length(), 0);

    let targets = mark_possible_moves(board, 2, 5, 2, JsValue::NULL)
        .map_err(JsValue::from)
        .unwrap();
    assert_eq!(Array::from(&targets).length(), 2);
}

#[wasm_bindgen_test]
fn session_plays_a_move_and_reports_state() {
    let mut session = WasmSession::new(JsValue::UNDEFINED).map_err(JsValue::from).unwrap();
    session.start_turn().map_err(JsValue::from).unwrap();
    session.select(2, 5).map_err(JsValue::from).unwrap();

    let event = session.play(3, 4).map_err(JsValue::from).unwrap();
    let ended = get(&get(&event, "step"), "ended");
    assert_eq!(get(&ended, "type").as_string().as_deref(), Some("move"));

    let state = session.state().map_err(JsValue::from).unwrap();
    assert_eq!(get(&state, "currentPlayer").as_string().as_deref(), Some("red"));
    assert!(session.select(4, 5).is_err());
}

#[wasm_bindgen_test]
fn out_of_range_coordinates_do_not_wrap_onto_the_board() {
    let board = initial_board().map_err(JsValue::from).unwrap();

    assert!(!is_valid_move(board.clone(), 2, 5, 257, 4, 2).map_err(JsValue::from).unwrap());
    assert!(!is_valid_move(board.clone(), 2, 5, -255, 4, 2).map_err(JsValue::from).unwrap());
    assert!(is_valid_move(board.clone(), 258, 5, 1, 4, 2).is_err());
    assert!(make_move(board, 2, 5, 257, 4, 2).is_err());

    let mut session = WasmSession::new(JsValue::UNDEFINED).map_err(JsValue::from).unwrap();
    session.start_turn().map_err(JsValue::from).unwrap();
    assert!(session.select(258, 5).is_err());
    session.select(2, 5).map_err(JsValue::from).unwrap();
    assert!(session.play(257, 4).is_err());
}
