//! Tests for per-thread search tables: killers, history, counter moves
//! and capture history.

use std::sync::Arc;

use crate::board::search::{
    CaptureHistory, CounterMoveTable, HistoryTable, KillerTable, SearchParams, SearchState,
    SearchTables,
};
use crate::board::{Board, Color, Move, MAX_PLY};
use crate::tt::TranspositionTable;

fn mv(board: &mut Board, uci: &str) -> Move {
    board.parse_move(uci).expect("legal move")
}

// ============================================================================
// Killer Move Tests
// ============================================================================

#[test]
fn test_killer_empty_initially() {
    let table = KillerTable::new();
    for ply in 0..10 {
        assert!(table.get(ply).iter().all(|m| m.is_null()));
    }
}

#[test]
fn test_killer_update_shifts_to_secondary() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let d4 = mv(&mut board, "d2d4");
    let mut table = KillerTable::new();

    table.update(0, e4);
    assert_eq!(table.get(0)[0], e4);
    assert!(table.get(0)[1].is_null());

    table.update(0, d4);
    assert_eq!(table.get(0), [d4, e4]);
    assert!(table.is_killer(0, e4) && table.is_killer(0, d4));
}

#[test]
fn test_killer_same_move_no_duplicate() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let d4 = mv(&mut board, "d2d4");
    let mut table = KillerTable::new();

    table.update(0, e4);
    table.update(0, d4);
    table.update(0, e4);
    assert_eq!(table.get(0), [d4, e4], "a stored killer keeps its slot");
}

#[test]
fn test_killer_plies_independent_and_reset() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let nf3 = mv(&mut board, "g1f3");
    let mut table = KillerTable::new();

    table.update(0, e4);
    table.update(1, nf3);
    assert!(table.is_killer(0, e4) && !table.is_killer(0, nf3));
    assert!(table.is_killer(1, nf3));

    table.reset();
    assert!(!table.is_killer(0, e4));
    assert!(!table.is_killer(1, nf3));
}

#[test]
fn test_killer_out_of_bounds_safe() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let mut table = KillerTable::new();
    table.update(MAX_PLY + 5, e4);
    assert!(!table.is_killer(MAX_PLY + 5, e4));
    assert!(table.get(MAX_PLY + 5).iter().all(|m| m.is_null()));
}

// ============================================================================
// History Tests
// ============================================================================

#[test]
fn test_history_depth_squared_bonus() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let mut table = HistoryTable::default();

    assert_eq!(table.score(Color::White, e4), 0);
    table.update(Color::White, e4, 3);
    assert_eq!(table.score(Color::White, e4), 9);
    table.update(Color::White, e4, 4);
    assert_eq!(table.score(Color::White, e4), 25);
    assert_eq!(table.score(Color::Black, e4), 0, "sides are separate");
}

#[test]
fn test_history_penalize_goes_negative() {
    let mut board = Board::new();
    let a3 = mv(&mut board, "a2a3");
    let mut table = HistoryTable::default();
    table.penalize(Color::White, a3, 5);
    assert_eq!(table.score(Color::White, a3), -25);
}

#[test]
fn test_history_halves_past_cap() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let d4 = mv(&mut board, "d2d4");
    let mut table = HistoryTable::new(100);

    table.update(Color::White, d4, 8); // 64
    table.update(Color::White, e4, 9); // 81
    table.update(Color::White, e4, 5); // 106 > cap: everything halves
    assert_eq!(table.score(Color::White, e4), 53);
    assert_eq!(table.score(Color::White, d4), 32);
}

#[test]
fn test_history_age_and_reset() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let mut table = HistoryTable::default();
    table.update(Color::White, e4, 10);
    table.age();
    assert_eq!(table.score(Color::White, e4), 50);
    table.reset();
    assert_eq!(table.score(Color::White, e4), 0);
}

// ============================================================================
// Counter Move Tests
// ============================================================================

#[test]
fn test_counter_set_and_get() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    board.make_move(e4);
    let e5 = mv(&mut board, "e7e5");
    let c5 = mv(&mut board, "c7c5");
    let mut table = CounterMoveTable::new();

    assert!(table.get(Color::Black, e4).is_null());
    table.set(Color::Black, e4, e5);
    assert_eq!(table.get(Color::Black, e4), e5);
    assert!(table.get(Color::White, e4).is_null());

    table.set(Color::Black, e4, c5);
    assert_eq!(table.get(Color::Black, e4), c5, "newest reply wins");

    table.reset();
    assert!(table.get(Color::Black, e4).is_null());
}

#[test]
fn test_counter_ignores_null_previous_move() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let mut table = CounterMoveTable::new();
    table.set(Color::White, Move::null(), e4);
    assert!(table.get(Color::White, Move::null()).is_null());
}

// ============================================================================
// Capture History Tests
// ============================================================================

#[test]
fn test_capture_history_tracks_captures_only() {
    let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
    let exd5 = mv(&mut board, "e4d5");
    let push = mv(&mut board, "e4e5");
    let mut table = CaptureHistory::default();

    table.update(exd5, 4);
    table.update(push, 4);
    assert_eq!(table.score(exd5), 16);
    assert_eq!(table.score(push), 0);

    table.age();
    assert_eq!(table.score(exd5), 8);
    table.reset();
    assert_eq!(table.score(exd5), 0);
}

#[test]
fn test_capture_history_cap() {
    let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
    let exd5 = mv(&mut board, "e4d5");
    let mut table = CaptureHistory::new(50);
    table.update(exd5, 6); // 36
    table.update(exd5, 5); // 61 > cap
    assert_eq!(table.score(exd5), 30);
}

// ============================================================================
// Table bundle
// ============================================================================

#[test]
fn test_new_search_clears_killers_and_ages_history() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let mut tables = SearchTables::new(Arc::new(TranspositionTable::new(1)), 1_000_000);

    tables.killer_moves.update(0, e4);
    tables.history.update(Color::White, e4, 6);
    tables.counter_moves.set(Color::White, e4, e4);
    tables.new_search();

    assert!(!tables.killer_moves.is_killer(0, e4));
    assert_eq!(tables.history.score(Color::White, e4), 18);
    assert_eq!(tables.counter_moves.get(Color::White, e4), e4);
}

#[test]
fn test_search_params_apply_history_cap() {
    let mut board = Board::new();
    let e4 = mv(&mut board, "e2e4");
    let mut state = SearchState::new(1);
    state.set_params(SearchParams {
        history_cap: 10,
        ..SearchParams::default()
    });
    assert_eq!(state.params().history_cap, 10);

    state.tables.history.update(Color::White, e4, 4); // 16 > 10
    assert_eq!(state.tables.history.score(Color::White, e4), 8);
}

