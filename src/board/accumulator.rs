//! Incremental material and piece-square evaluator.
//!
//! Keeps the white-relative score on a stack that grows by one entry per
//! made move. Most moves only touch two or three squares, so the new entry
//! is derived from the move alone; king moves (castling included) rebuild
//! the entry from the board, the same way a neural accumulator must be
//! refreshed when its king-relative features change.

use super::eval::{material_and_pst, Evaluator};
use super::eval_terms::params::EvalParams;
use super::eval_terms::tables::pst_value;
use super::{Board, Color, Move, Piece, Square, MAX_PLY};

pub struct IncrementalPst {
    params: EvalParams,
    stack: Vec<i32>,
}

impl IncrementalPst {
    #[must_use]
    pub fn new(params: EvalParams) -> Self {
        IncrementalPst {
            params,
            stack: Vec::with_capacity(MAX_PLY + 1),
        }
    }

    /// Current white-relative score, if the stack has been seeded.
    #[must_use]
    pub fn current(&self) -> Option<i32> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn term(&self, piece: Piece, color: Color, sq: Square) -> i32 {
        color.sign() * (self.params.piece_value(piece) + pst_value(piece, color, sq))
    }

    /// Score change caused by a non-king move.
    fn delta(&self, m: Move) -> i32 {
        let color = m.color();
        let placed = m.promotion().unwrap_or(m.piece());
        let mut delta = self.term(placed, color, m.to()) - self.term(m.piece(), color, m.from());
        if let Some(victim) = m.captured() {
            let victim_sq = if m.is_en_passant() {
                m.to().with_rank(m.from().rank())
            } else {
                m.to()
            };
            delta -= self.term(victim, color.opponent(), victim_sq);
        }
        delta
    }
}

impl Default for IncrementalPst {
    fn default() -> Self {
        IncrementalPst::new(EvalParams::default())
    }
}

impl Evaluator for IncrementalPst {
    fn evaluate(&mut self, board: &Board) -> i32 {
        let white = match self.current() {
            Some(score) => score,
            None => {
                self.refresh(board);
                material_and_pst(board, &self.params)
            }
        };
        board.side_to_move().sign() * white
    }

    fn push(&mut self, board: &Board, m: Move) {
        let next = match self.current() {
            Some(score) if m.piece() != Piece::King => score + self.delta(m),
            _ => material_and_pst(board, &self.params),
        };
        self.stack.push(next);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn refresh(&mut self, board: &Board) {
        self.stack.clear();
        self.stack.push(material_and_pst(board, &self.params));
    }

    fn fork(&self) -> Box<dyn Evaluator> {
        Box::new(IncrementalPst::new(self.params.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(fen: &str, moves: &[&str]) {
        let mut board = Board::from_fen(fen);
        let mut eval = IncrementalPst::default();
        eval.refresh(&board);
        let mut made = Vec::new();

        for uci in moves {
            let m = board.parse_move(uci).expect("legal move");
            let info = board.make_move(m);
            eval.push(&board, m);
            assert_eq!(
                eval.current(),
                Some(material_and_pst(&board, &EvalParams::default())),
                "after {uci}"
            );
            made.push((m, info));
        }
        while let Some((m, info)) = made.pop() {
            board.unmake_move(m, info);
            eval.pop();
            assert_eq!(
                eval.current(),
                Some(material_and_pst(&board, &EvalParams::default()))
            );
        }
        assert_eq!(eval.depth(), 1);
    }

    #[test]
    fn test_quiet_and_capture_sequence() {
        walk(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5"],
        );
    }

    #[test]
    fn test_en_passant_and_promotion() {
        walk("4k3/1P6/8/8/3pP3/8/8/4K3 b - e3 0 1", &["d4e3", "b7b8q"]);
        walk("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1", &["b7a8n"]);
    }

    #[test]
    fn test_castling_refreshes() {
        walk(
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1",
            &["e1g1", "e8c8", "g1h1"],
        );
    }

    #[test]
    fn test_side_relative_and_lazy_seed() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        let mut eval = IncrementalPst::default();
        let score = eval.evaluate(&board);
        assert!(score < -400);
        assert_eq!(eval.depth(), 1);
    }
}
