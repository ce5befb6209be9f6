//! Move ordering scores.

use crate::board::{Board, Move, Piece};

use super::constants::{BAD_CAPTURE_BASE, GOOD_CAPTURE_BASE, QSEARCH_PROMOTION_BONUS};
use super::tables::CaptureHistory;

/// Ordering score for a capture: `victim * 10 - attacker + SEE`, plus
/// capture history when enabled. Captures that lose material by SEE sink
/// below every quiet move.
pub fn capture_score(
    board: &Board,
    mv: Move,
    capture_history: Option<&CaptureHistory>,
) -> i32 {
    let see = board.see(mv);
    if see < 0 {
        return BAD_CAPTURE_BASE + see;
    }
    let victim = mv.captured().map_or(0, Piece::value);
    let attacker = mv.piece().value();
    let history = capture_history.map_or(0, |table| table.score(mv).min(GOOD_CAPTURE_BASE / 2));
    GOOD_CAPTURE_BASE + victim * 10 - attacker + see + history
}

/// Ordering score for a quiet queen promotion: with the good captures.
pub fn promotion_score(mv: Move) -> Option<i32> {
    match mv.promotion() {
        Some(Piece::Queen) => Some(GOOD_CAPTURE_BASE + Piece::Queen.value()),
        _ => None,
    }
}

/// Quiescence ordering: promotions first, then the most valuable victim.
pub fn qsearch_score(mv: Move) -> i32 {
    let promo = if mv.is_promotion() {
        QSEARCH_PROMOTION_BONUS
    } else {
        0
    };
    promo + mv.captured().map_or(0, Piece::value)
}

#[cfg(test)]
mod tests {
    use super::super::constants::KILLER_SCORE;
    use super::*;

    fn mv(board: &mut Board, uci: &str) -> Move {
        board.parse_move(uci).expect("legal move")
    }

    #[test]
    fn test_winning_capture_above_losing_capture() {
        // Rook takes an undefended knight; queen takes a pawn defended by a pawn
        let mut board = Board::from_fen("4k3/2p5/3p4/8/8/5n2/3Q4/5R1K w - - 0 1");
        let rook_takes = mv(&mut board, "f1f3");
        let queen_takes = mv(&mut board, "d2d6");
        let good = capture_score(&board, rook_takes, None);
        let bad = capture_score(&board, queen_takes, None);
        assert_eq!(good, GOOD_CAPTURE_BASE + 320 * 10 - 500 + 320);
        assert_eq!(bad, BAD_CAPTURE_BASE + (100 - 900));
        assert!(bad < 0 && good > KILLER_SCORE);
    }

    #[test]
    fn test_qsearch_prefers_promotions_then_victims() {
        let mut board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let take_promote = mv(&mut board, "a7b8q");
        let push_promote = mv(&mut board, "a7a8q");
        assert_eq!(qsearch_score(take_promote), 900 + 500);
        assert_eq!(qsearch_score(push_promote), 900);
        assert_eq!(promotion_score(push_promote), Some(GOOD_CAPTURE_BASE + 900));
    }
}
