use super::super::move_order::qsearch_score;
use super::SimpleSearchContext;
use crate::board::{ScoredMoveList, MAX_PLY};

impl SimpleSearchContext<'_> {
    /// Quiescence search over captures and promotions with SEE and delta
    /// pruning. Fail-hard.
    pub fn quiesce(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.nodes += 1;
        self.update_seldepth(ply);
        if self.should_stop() {
            return alpha;
        }

        let stand_pat = self.evaluate();
        if ply >= MAX_PLY - 1 {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }

        // Delta pruning: even winning a queen would not reach alpha
        let in_check = self.board.in_check();
        if !in_check && stand_pat < alpha - self.state.params().delta_margin {
            return alpha;
        }
        alpha = alpha.max(stand_pat);

        let moves = self.board.generate_tactical_moves();
        let mut ordered = ScoredMoveList::new();
        for &m in &moves {
            ordered.push(m, qsearch_score(m));
        }

        let mut idx = 0;
        while let Some(scored) = ordered.pick_best(idx) {
            idx += 1;
            let m = scored.mv;
            if m.is_capture() && self.board.see(m) < 0 {
                continue;
            }

            let info = self.make(m);
            let score = -self.quiesce(-beta, -alpha, ply + 1);
            self.unmake(m, info);

            if self.stopped {
                return alpha;
            }
            if score >= beta {
                return beta;
            }
            alpha = alpha.max(score);
        }
        alpha
    }
}
