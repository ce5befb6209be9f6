//! Make/unmake move tests.

use crate::board::{Board, CastleSide, Color, Move, Piece, Square, UnmakeInfo};
use rand::prelude::*;

fn sq(name: &str) -> Square {
    name.parse().expect("valid square")
}

fn find_move(board: &mut Board, uci: &str) -> Move {
    board.parse_move(uci).expect("expected move not found")
}

#[test]
fn test_en_passant_make_unmake() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let original_hash = board.hash();
    let original_ep = board.en_passant_target();
    let mv = find_move(&mut board, "e5f6");
    assert!(mv.is_en_passant());

    let info = board.make_move(mv);
    assert_eq!(board.piece_at(sq("f5")), None);
    assert_eq!(board.piece_at(sq("f6")), Some((Color::White, Piece::Pawn)));

    board.unmake_move(mv, info);
    assert_eq!(board.hash(), original_hash);
    assert_eq!(board.en_passant_target(), original_ep);
    assert_eq!(board.piece_at(sq("f5")), Some((Color::Black, Piece::Pawn)));
}

#[test]
fn test_double_push_sets_en_passant_target() {
    let mut board = Board::new();
    board.make_move_uci("e2e4").unwrap();
    assert_eq!(board.en_passant_target(), Some(sq("e3")));
    board.make_move_uci("g8f6").unwrap();
    assert_eq!(board.en_passant_target(), None);
}

#[test]
fn test_promotion_make_unmake() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let original_hash = board.hash();
    let mv = find_move(&mut board, "a7a8q");
    let info = board.make_move(mv);
    assert_eq!(board.piece_at(sq("a8")), Some((Color::White, Piece::Queen)));
    board.unmake_move(mv, info);
    assert_eq!(board.hash(), original_hash);
    assert_eq!(board.piece_at(sq("a7")), Some((Color::White, Piece::Pawn)));
    assert_eq!(board.piece_at(sq("a8")), None);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let original_fen = board.to_fen();
    let mv = find_move(&mut board, "e1g1");
    let info = board.make_move(mv);
    assert_eq!(board.piece_at(sq("g1")), Some((Color::White, Piece::King)));
    assert_eq!(board.piece_at(sq("f1")), Some((Color::White, Piece::Rook)));
    assert!(!board.castling_rights().has(Color::White, CastleSide::King));
    assert!(!board.castling_rights().has(Color::White, CastleSide::Queen));
    assert!(board.castling_rights().has(Color::Black, CastleSide::Queen));

    board.unmake_move(mv, info);
    assert_eq!(board.to_fen(), original_fen);
}

#[test]
fn test_chess960_castling_onto_rook_square() {
    // Rooks on b1 and g1: kingside castling lands the king on the rook's square
    let mut board = Board::from_fen("1r2k1r1/pppppppp/8/8/8/8/PPPPPPPP/1R2K1R1 w GBgb - 0 1");
    let original_fen = board.to_fen();
    let castle = board
        .generate_moves()
        .iter()
        .copied()
        .find(|m| m.is_castling() && m.castling_rook() == Some(sq("g1")))
        .expect("kingside castling");
    let info = board.make_move(castle);
    assert_eq!(board.piece_at(sq("g1")), Some((Color::White, Piece::King)));
    assert_eq!(board.piece_at(sq("f1")), Some((Color::White, Piece::Rook)));
    assert_eq!(board.piece_at(sq("e1")), None);
    assert!(board.is_consistent());
    board.unmake_move(castle, info);
    assert_eq!(board.to_fen(), original_fen);
}

#[test]
fn test_chess960_fen_round_trip_after_all_rights_are_gone() {
    let mut board = Board::from_fen("1r2k1r1/pppppppp/8/8/8/8/PPPPPPPP/1R2K1R1 w GBgb - 0 1");
    assert!(board.castling_rights().is_chess960());
    for rook in ["g1", "g8"] {
        let castle = board
            .generate_moves()
            .iter()
            .copied()
            .find(|m| m.is_castling() && m.castling_rook() == Some(sq(rook)))
            .expect("kingside castling");
        board.make_move(castle);
    }
    assert!(!board.castling_rights().any());

    let fen = board.to_fen();
    assert_eq!(fen.split_whitespace().nth(2), Some("-"));
    let restored = Board::from_fen(&fen);
    assert_eq!(restored.castling_rights(), board.castling_rights());
    assert_eq!(restored.hash(), board.hash());
    assert_eq!(restored.to_fen(), fen);
}

#[test]
fn test_null_move_make_unmake_restores_hash_and_ep() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let original_hash = board.hash();
    let original_ep = board.en_passant_target();

    let info = board.make_null_move();
    assert_eq!(board.en_passant_target(), None);
    assert_ne!(board.hash(), original_hash);
    assert_eq!(board.side_to_move(), Color::Black);
    assert!(board.is_consistent());

    board.unmake_null_move(info);
    assert_eq!(board.hash(), original_hash);
    assert_eq!(board.en_passant_target(), original_ep);
    assert_eq!(board.side_to_move(), Color::White);
}

#[test]
fn test_null_move_preserves_castling_rights() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let original_castling = board.castling_rights();
    let info = board.make_null_move();
    assert_eq!(board.castling_rights(), original_castling);
    board.unmake_null_move(info);
    assert_eq!(board.castling_rights(), original_castling);
}

#[test]
fn test_legal_moves_stable_after_make_unmake() {
    let mut board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let initial_moves = board.generate_moves();
    let mut initial_list: Vec<String> = initial_moves.iter().map(|m| m.to_string()).collect();
    initial_list.sort();

    for mv in initial_moves.iter() {
        let info = board.make_move(*mv);
        board.unmake_move(*mv, info);
    }

    let mut after_list: Vec<String> = board.generate_moves().iter().map(|m| m.to_string()).collect();
    after_list.sort();

    assert_eq!(initial_list, after_list);
}

#[test]
fn test_random_playout_round_trip_state() {
    let mut board = Board::new();
    let initial_fen = board.to_fen();
    let initial_hash = board.hash();

    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut history: Vec<(Move, UnmakeInfo)> = Vec::new();

    for _ in 0..200 {
        let moves = board.generate_moves();
        let Some(&mv) = moves.as_slice().choose(&mut rng) else {
            break;
        };
        let info = board.make_move(mv);
        history.push((mv, info));
        assert!(board.is_consistent(), "inconsistent after {mv}");
    }

    while let Some((mv, info)) = history.pop() {
        board.unmake_move(mv, info);
        assert!(board.is_consistent(), "inconsistent after undoing {mv}");
    }

    assert_eq!(board.hash(), initial_hash);
    assert_eq!(board.to_fen(), initial_fen);
    assert!(board.history().is_empty());
}
