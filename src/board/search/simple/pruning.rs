use super::super::constants::MATE_THRESHOLD;
use super::{NodeContext, SimpleSearchContext};
use crate::board::{Piece, EMPTY_MOVE};

impl SimpleSearchContext<'_> {
    /// Zugzwang guard: the side to move owns a piece other than pawns and king
    fn has_non_pawn_material(&self) -> bool {
        let side = self.board.side_to_move();
        [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .into_iter()
            .any(|piece| self.board.pieces(side, piece).any())
    }

    /// Try null move pruning
    pub(super) fn try_null_move_pruning(
        &mut self,
        depth: u32,
        beta: i32,
        node: &NodeContext,
    ) -> Option<i32> {
        let params = self.state.params();
        if node.in_check
            || node.excluded_active()
            || node.ply == 0
            || depth < params.null_min_depth
            || !self.has_non_pawn_material()
        {
            return None;
        }
        let reduced_depth = depth.saturating_sub(1 + params.null_reduction);

        let info = self.board.make_null_move();
        self.previous_move[node.ply] = EMPTY_MOVE;
        let score = -self.alphabeta(reduced_depth, -beta, -beta + 1, node.ply + 1, EMPTY_MOVE, false);
        self.board.unmake_null_move(info);

        if self.stopped {
            return None;
        }
        (score >= beta).then_some(beta)
    }

    /// Razoring: hopeless positions near the leaves drop into quiescence.
    fn try_razoring(
        &mut self,
        depth: u32,
        alpha: i32,
        beta: i32,
        eval: i32,
        node: &NodeContext,
    ) -> Option<i32> {
        let params = self.state.params();
        if depth > params.razor_max_depth
            || eval + params.razor_base + params.razor_per_depth * depth as i32 > alpha
        {
            return None;
        }
        let score = self.quiesce(alpha, beta, node.ply);
        (score <= alpha).then_some(alpha)
    }

    fn try_futility(&self, depth: u32, alpha: i32, eval: i32) -> Option<i32> {
        let params = self.state.params();
        (depth <= params.futility_max_depth
            && eval + params.futility_per_depth * depth as i32 <= alpha)
            .then_some(alpha)
    }

    /// ProbCut: a shallow search that beats beta by a margin predicts a
    /// cutoff at full depth.
    fn try_probcut(&mut self, depth: u32, beta: i32, node: &NodeContext) -> Option<i32> {
        let params = self.state.params();
        if depth < params.probcut_min_depth || beta.abs() >= MATE_THRESHOLD {
            return None;
        }
        let probcut_beta = beta + params.probcut_margin;
        let reduced_depth = depth.saturating_sub(params.probcut_reduction);
        let score = self.alphabeta(
            reduced_depth,
            probcut_beta - 1,
            probcut_beta,
            node.ply,
            EMPTY_MOVE,
            true,
        );
        (!self.stopped && score >= probcut_beta).then_some(beta)
    }

    /// Run the pruning steps that can exit before the move loop. Only
    /// called at depth >= 1 when not in check.
    pub(super) fn prune_before_move_loop(
        &mut self,
        depth: u32,
        alpha: i32,
        beta: i32,
        eval: i32,
        node: &NodeContext,
    ) -> Option<i32> {
        if let Some(score) = self.try_razoring(depth, alpha, beta, eval, node) {
            return Some(score);
        }
        if let Some(score) = self.try_futility(depth, alpha, eval) {
            return Some(score);
        }
        self.try_probcut(depth, beta, node)
    }
}
