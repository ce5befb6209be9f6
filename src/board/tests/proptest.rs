//! Property-based tests using proptest.

use crate::board::search::{HistoryTable, KillerTable};
use crate::board::{
    Board, ClassicalEvaluator, Color, Evaluator, IncrementalPst, Move, MoveKind, Piece, Square,
    UnmakeInfo,
};
use crate::tt::{BoundType, TranspositionTable};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const START_POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
];

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=20usize
}

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn quiet(from: usize, to: usize) -> Move {
    Move::new(
        Square::from_index(from),
        Square::from_index(to),
        Piece::Knight,
        Color::White,
        None,
        MoveKind::Quiet,
    )
}

/// Play up to `count` random legal moves, returning what was played.
fn random_walk(board: &mut Board, rng: &mut StdRng, count: usize) -> Vec<(Move, UnmakeInfo)> {
    let mut played = Vec::with_capacity(count);
    for _ in 0..count {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves.as_slice()[rng.gen_range(0..moves.len())];
        let info = board.make_move(mv);
        played.push((mv, info));
    }
    played
}

proptest! {
    /// make_move followed by unmake_move restores the position exactly
    #[test]
    fn prop_make_unmake_restores_state(
        start in 0..START_POSITIONS.len(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        let mut board = Board::from_fen(START_POSITIONS[start]);
        let mut rng = StdRng::seed_from_u64(seed);
        let initial_hash = board.hash();
        let initial_pawn_hash = board.pawn_hash();
        let initial_fen = board.to_fen();

        let mut played = random_walk(&mut board, &mut rng, num_moves);
        while let Some((mv, info)) = played.pop() {
            board.unmake_move(mv, info);
        }

        prop_assert_eq!(board.hash(), initial_hash);
        prop_assert_eq!(board.pawn_hash(), initial_pawn_hash);
        prop_assert_eq!(board.to_fen(), initial_fen);
        prop_assert!(board.history().is_empty());
    }

    /// Incremental hashes and bitboards stay in step with the pieces
    #[test]
    fn prop_board_stays_consistent(
        start in 0..START_POSITIONS.len(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        let mut board = Board::from_fen(START_POSITIONS[start]);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..num_moves {
            if random_walk(&mut board, &mut rng, 1).is_empty() {
                break;
            }
            prop_assert!(board.is_consistent(), "inconsistent at {}", board.to_fen());
        }
    }

    /// FEN output parses back to the same position
    #[test]
    fn prop_fen_roundtrip(
        start in 0..START_POSITIONS.len(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        let mut board = Board::from_fen(START_POSITIONS[start]);
        let mut rng = StdRng::seed_from_u64(seed);
        random_walk(&mut board, &mut rng, num_moves);

        let fen = board.to_fen();
        let restored = Board::from_fen(&fen);
        prop_assert_eq!(board.hash(), restored.hash());
        prop_assert_eq!(board.side_to_move(), restored.side_to_move());
        prop_assert_eq!(board.castling_rights(), restored.castling_rights());
        prop_assert_eq!(board.en_passant_target(), restored.en_passant_target());
        prop_assert_eq!(restored.to_fen(), fen);
    }

    /// No generated move leaves the mover's king attacked
    #[test]
    fn prop_legal_moves_are_legal(start in 0..START_POSITIONS.len(), seed in seed_strategy()) {
        let mut board = Board::from_fen(START_POSITIONS[start]);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..10 {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mover = board.side_to_move();
            for mv in moves.iter() {
                let info = board.make_move(*mv);
                prop_assert!(!board.is_in_check(mover), "{:?} leaves the king in check", mv);
                board.unmake_move(*mv, info);
            }
            random_walk(&mut board, &mut rng, 1);
        }
    }

    /// Tactical generation is exactly the captures and promotions of full generation
    #[test]
    fn prop_tactical_moves_subset(start in 0..START_POSITIONS.len(), seed in seed_strategy()) {
        let mut board = Board::from_fen(START_POSITIONS[start]);
        let mut rng = StdRng::seed_from_u64(seed);
        random_walk(&mut board, &mut rng, 8);

        let mut all: Vec<String> = board
            .generate_moves()
            .iter()
            .filter(|m| m.is_tactical())
            .map(|m| m.to_string())
            .collect();
        let mut tactical: Vec<String> = board
            .generate_tactical_moves()
            .iter()
            .map(|m| m.to_string())
            .collect();
        all.sort();
        tactical.sort();
        prop_assert_eq!(all, tactical);
    }

    /// A capture never gains more than the captured piece, plus a
    /// promotion bonus when the capturer promotes
    #[test]
    fn prop_see_bounded_by_victim(seed in seed_strategy(), num_moves in 0..15usize) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        random_walk(&mut board, &mut rng, num_moves);

        let moves = board.generate_moves();
        for mv in moves.iter().filter(|m| m.is_capture() && !m.is_promotion()) {
            let victim = mv.captured().map_or(0, Piece::value);
            let see = board.see(*mv);
            prop_assert!(see <= victim, "SEE {} exceeds victim value {} for {:?}", see, victim, mv);
        }
    }

    /// Killer updates keep the newest move first and the previous one second
    #[test]
    fn prop_killer_preserves_moves(
        ply in 0..100usize,
        mv1_from in 0..64usize,
        mv1_to in 0..64usize,
        mv2_from in 0..64usize,
        mv2_to in 0..64usize,
    ) {
        let mut table = KillerTable::new();
        let mv1 = quiet(mv1_from, mv1_to);
        let mv2 = quiet(mv2_from, mv2_to);

        table.update(ply, mv1);
        prop_assert_eq!(table.get(ply)[0], mv1);

        if mv1 != mv2 {
            table.update(ply, mv2);
            prop_assert_eq!(table.get(ply)[0], mv2);
            prop_assert_eq!(table.get(ply)[1], mv1);
        }
    }

    /// History stays within its cap no matter how often a move is rewarded
    #[test]
    fn prop_history_bounded(
        mv_from in 0..64usize,
        mv_to in 0..64usize,
        depth in 1..20u32,
        num_updates in 1..200usize,
    ) {
        let cap = 4_000;
        let mut table = HistoryTable::new(cap);
        let mv = quiet(mv_from, mv_to);
        for _ in 0..num_updates {
            table.update(Color::White, mv, depth);
        }
        let score = table.score(Color::White, mv);
        prop_assert!(score > 0 && score <= cap, "score {} outside (0, {}]", score, cap);
        prop_assert_eq!(table.score(Color::Black, mv), 0);
    }

    /// Evaluations stay far away from mate scores
    #[test]
    fn prop_eval_bounded(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        random_walk(&mut board, &mut rng, num_moves);

        let eval = ClassicalEvaluator::default().evaluate(&board);
        prop_assert!(eval.abs() < 10_000, "evaluation {} is unreasonably large", eval);
    }

    /// The incremental accumulator matches a fresh evaluation after any walk
    #[test]
    fn prop_incremental_matches_refresh(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut eval = IncrementalPst::default();
        eval.refresh(&board);

        for _ in 0..num_moves {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves.as_slice()[rng.gen_range(0..moves.len())];
            board.make_move(mv);
            eval.push(&board, mv);
        }
        let mut fresh = IncrementalPst::default();
        prop_assert_eq!(eval.evaluate(&board), fresh.evaluate(&board));
    }

    /// Stored entries come back with clamped depth and score
    #[test]
    fn prop_tt_store_retrieve(
        hash in any::<u64>(),
        depth in 0..300u32,
        score in -40_000..40_000i32,
    ) {
        let tt = TranspositionTable::new(1);
        tt.save(hash, score, depth, BoundType::Exact, None);

        let entry = tt.probe(hash);
        prop_assert!(entry.is_some());
        if let Some(entry) = entry {
            prop_assert_eq!(entry.depth(), depth.min(255));
            prop_assert_eq!(entry.score(), score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)));
            prop_assert_eq!(entry.bound_type(), BoundType::Exact);
            prop_assert!(entry.packed_move.is_none());
        }
    }
}
