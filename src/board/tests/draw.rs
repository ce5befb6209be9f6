//! Draw detection tests.

use crate::board::Board;

fn apply_uci(board: &mut Board, moves: &[&str]) {
    for uci in moves {
        board.make_move_uci(uci).expect("uci move not legal");
    }
}

const KNIGHT_SHUFFLE: [&str; 4] = ["g1f3", "g8f6", "f3g1", "f6g8"];

#[test]
fn test_fen_halfmove_parsing() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 1");
    assert_eq!(board.halfmove_clock(), 57);
    assert!(!board.is_draw());
}

#[test]
fn test_fifty_move_rule_draw() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1");
    assert!(board.is_fifty_move_draw());
    assert!(board.is_draw());
}

#[test]
fn test_fifty_move_reached_by_quiet_move() {
    let mut board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 99 1");
    assert!(!board.is_draw());
    apply_uci(&mut board, &["a1a2"]);
    assert!(board.is_fifty_move_draw());
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let mut board = Board::from_fen("8/8/8/8/8/8/4P3/K1k5 w - - 99 1");
    apply_uci(&mut board, &["e2e4"]);
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw());
}

#[test]
fn test_halfmove_resets_on_capture() {
    let mut board = Board::from_fen("k7/8/8/8/8/8/1r6/K7 w - - 80 1");
    apply_uci(&mut board, &["a1b2"]);
    assert_eq!(board.halfmove_clock(), 0);
}

#[test]
fn test_repetition_needs_two_earlier_occurrences() {
    let mut board = Board::new();
    apply_uci(&mut board, &KNIGHT_SHUFFLE);
    // Back at the start once: the position was only reached once by a move
    assert!(!board.is_repetition());

    apply_uci(&mut board, &KNIGHT_SHUFFLE);
    assert!(board.is_repetition());
    assert!(board.is_draw());
}

#[test]
fn test_unmake_forgets_repetition() {
    let mut board = Board::new();
    apply_uci(&mut board, &KNIGHT_SHUFFLE);
    // Nf3 again reaches a position already in the history
    let again = board.parse_move("g1f3").unwrap();
    let info = board.make_move(again);
    assert!(board.is_repetition());
    board.unmake_move(again, info);
    assert!(!board.is_repetition());
    assert_eq!(board.history().len(), 4);
}

#[test]
fn test_fen_load_clears_history() {
    let mut board = Board::new();
    apply_uci(&mut board, &KNIGHT_SHUFFLE);
    let reloaded = Board::from_fen(&board.to_fen());
    assert!(reloaded.history().is_empty());
    assert_eq!(reloaded.hash(), board.hash());
}
