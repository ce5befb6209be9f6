//! Core search implementation.
//!
//! This module implements:
//! - Alpha-beta search with PVS, fail-hard
//! - Mate distance pruning
//! - Null move pruning, razoring, futility pruning and ProbCut
//! - Internal iterative deepening (IID)
//! - Check, passed pawn and singular extensions
//! - Late move reductions (LMR) and late move pruning (LMP)
//! - Quiescence search with SEE and delta pruning
//! - Move ordering (TT move, SEE captures, killers, counter moves, history)

mod iterative;
mod pruning;
mod quiescence;

pub(crate) use iterative::simple_search;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::tt::{BoundType, TtEntry};

use super::constants::{
    COUNTER_SCORE, INFINITY, KILLER_SCORE, LMR_TABLE_MAX_DEPTH, LMR_TABLE_MAX_IDX, MATE_THRESHOLD,
    NODE_CHECK_MASK, TT_MOVE_SCORE,
};
use super::move_order::{capture_score, promotion_score};
use super::{SearchClock, SearchConfig, SearchState, StopFlags, MATE_SCORE};
use crate::board::{Board, Move, Piece, ScoredMoveList, UnmakeInfo, EMPTY_MOVE, MAX_PLY};

/// Search context for a single search thread
pub struct SimpleSearchContext<'a> {
    pub board: &'a mut Board,
    pub state: &'a mut SearchState,
    pub config: &'a SearchConfig,
    pub(crate) stops: StopFlags<'a>,
    pub clock: Arc<SearchClock>,
    /// 0 = unlimited
    pub node_limit: u64,
    pub nodes: u64,
    /// Latched once any limit or stop flag fires
    pub stopped: bool,
    /// Move played at each ply, for the counter-move heuristic
    pub previous_move: [Move; MAX_PLY],
}

#[derive(Clone, Copy)]
struct NodeContext {
    ply: usize,
    in_check: bool,
    excluded_move: Move,
    tt_move: Move,
    /// Extension for the TT move (from singular extension search)
    singular_extension: u32,
}

impl NodeContext {
    fn excluded_active(&self) -> bool {
        !self.excluded_move.is_null()
    }
}

impl<'a> SimpleSearchContext<'a> {
    pub(crate) fn new(
        board: &'a mut Board,
        state: &'a mut SearchState,
        config: &'a SearchConfig,
        clock: Arc<SearchClock>,
        stops: StopFlags<'a>,
    ) -> Self {
        SimpleSearchContext {
            board,
            state,
            config,
            stops,
            clock,
            node_limit: config.effective_node_limit(),
            nodes: 0,
            stopped: false,
            previous_move: [EMPTY_MOVE; MAX_PLY],
        }
    }
}

impl SimpleSearchContext<'_> {
    /// Precomputed LMR table: `floor(0.75 + ln(depth) * ln(moves) / 2.25)`
    #[allow(clippy::cast_precision_loss)]
    fn lmr_table() -> &'static [[u32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH] {
        use std::sync::OnceLock;
        static TABLE: OnceLock<[[u32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH]> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut t = [[0u32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH];
            for (depth, row) in t.iter_mut().enumerate().skip(1) {
                for (idx, cell) in row.iter_mut().enumerate().skip(1) {
                    let val = (0.75 + (depth as f64).ln() * (idx as f64).ln() / 2.25).floor();
                    *cell = val.max(0.0) as u32;
                }
            }
            t
        })
    }

    /// Principal variation starting with `first`, followed through the TT.
    /// Every move is re-validated against the legal moves of its position.
    fn extract_pv(&mut self, first: Move, max_len: usize) -> Vec<Move> {
        let max_len = max_len.clamp(1, MAX_PLY);
        let mut pv = Vec::with_capacity(max_len);
        let mut seen_hashes = Vec::with_capacity(max_len);
        let mut unmake_infos = Vec::with_capacity(max_len);

        seen_hashes.push(self.board.hash());
        pv.push(first);
        unmake_infos.push((first, self.board.make_move(first)));

        while pv.len() < max_len {
            // Avoid looping through TT collisions or repetitions
            let hash = self.board.hash();
            if seen_hashes.contains(&hash) {
                break;
            }
            seen_hashes.push(hash);

            let legal = self.board.generate_moves();
            let Some(mv) = self
                .state
                .tables
                .tt
                .probe(hash)
                .and_then(|entry| entry.best_move(&legal))
            else {
                break;
            };
            pv.push(mv);
            unmake_infos.push((mv, self.board.make_move(mv)));
        }

        for (mv, info) in unmake_infos.into_iter().rev() {
            self.board.unmake_move(mv, info);
        }
        pv
    }

    /// Check (and latch) whether the search must stop
    #[inline]
    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let hit = self.stops.external.load(Ordering::Relaxed)
            || self
                .stops
                .helpers
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || (self.node_limit > 0 && self.nodes >= self.node_limit)
            || (self.nodes & NODE_CHECK_MASK == 0 && self.clock.hard_expired());
        if hit {
            self.stopped = true;
        }
        hit
    }

    /// Evaluate position from side-to-move's perspective
    #[inline]
    fn evaluate(&mut self) -> i32 {
        self.state.evaluator.evaluate(self.board)
    }

    /// Make a move and keep the evaluator in step
    #[inline]
    fn make(&mut self, m: Move) -> UnmakeInfo {
        let info = self.board.make_move(m);
        self.state.evaluator.push(self.board, m);
        info
    }

    #[inline]
    fn unmake(&mut self, m: Move, info: UnmakeInfo) {
        self.board.unmake_move(m, info);
        self.state.evaluator.pop();
    }

    #[inline]
    fn is_draw_position(&self) -> bool {
        self.board.is_fifty_move_draw() || self.board.is_repetition()
    }

    /// Draws are worth `-contempt` to the side to move.
    #[inline]
    fn draw_score(&self) -> i32 {
        -self.config.contempt
    }

    #[inline]
    fn update_seldepth(&mut self, ply: usize) {
        let ply = ply as u32;
        if ply > self.state.stats.seldepth {
            self.state.stats.seldepth = ply;
        }
    }

    #[inline]
    fn prev_move(&self, ply: usize) -> Move {
        if ply == 0 {
            EMPTY_MOVE
        } else {
            self.previous_move[ply - 1]
        }
    }

    /// One ply for a pawn pushed to the 6th or 7th rank that is passed.
    /// Called after the move is made.
    fn passed_pawn_extension(&self, m: Move) -> u32 {
        if m.piece() != Piece::Pawn || m.is_promotion() {
            return 0;
        }
        let rank = m.color().relative_rank(m.to().rank());
        u32::from(matches!(rank, 5 | 6) && self.board.is_passed_pawn(m.to(), m.color()))
    }

    /// Order moves: TT move > good captures and queen promotions > killers >
    /// counter move > history > losing captures
    fn order_moves(&self, moves: &[Move], tt_move: Move, ply: usize, prev_move: Move) -> ScoredMoveList {
        let tables = &self.state.tables;
        let side = self.board.side_to_move();
        let counter = tables.counter_moves.get(side, prev_move);
        let capture_history = self
            .config
            .use_capture_history
            .then_some(&tables.capture_history);
        let history_bound = COUNTER_SCORE - 1;

        let mut scored = ScoredMoveList::new();
        for &m in moves {
            let score = if !tt_move.is_null() && m == tt_move {
                TT_MOVE_SCORE
            } else if m.is_capture() {
                capture_score(self.board, m, capture_history)
            } else if let Some(promo) = promotion_score(m) {
                promo
            } else if tables.killer_moves.is_killer(ply, m) {
                KILLER_SCORE
            } else if !counter.is_null() && m == counter {
                COUNTER_SCORE
            } else if self.config.use_history {
                tables
                    .history
                    .score(side, m)
                    .clamp(-history_bound, history_bound)
            } else {
                0
            };
            scored.push(m, score);
        }
        scored
    }

    /// Heuristic updates after a beta cutoff by `m`. The board is back at
    /// the node's position.
    fn update_heuristics(&mut self, m: Move, ply: usize, depth: u32, quiets_tried: &[Move]) {
        let side = self.board.side_to_move();
        let prev = self.prev_move(ply);
        let tables = &mut self.state.tables;
        if m.is_quiet() {
            tables.killer_moves.update(ply, m);
            if self.config.use_history {
                tables.history.update(side, m, depth);
                for &quiet in quiets_tried {
                    tables.history.penalize(side, quiet, depth);
                }
            }
            tables.counter_moves.set(side, prev, m);
        } else if m.is_capture() && self.config.use_capture_history {
            tables.capture_history.update(m, depth);
        }
    }

    fn store_tt(&self, depth: u32, score: i32, bound: BoundType, best_move: Move) {
        let best = (!best_move.is_null()).then_some(best_move);
        self.state
            .tables
            .tt
            .save(self.board.hash(), score, depth, bound, best);
    }

    /// Probe TT and check for cutoff.
    /// Returns the entry (for its move) and the cutoff score, if any.
    fn probe_tt(
        &mut self,
        depth: u32,
        alpha: i32,
        beta: i32,
        excluded_move_active: bool,
    ) -> (Option<TtEntry>, Option<i32>) {
        let entry = self.state.tables.tt.probe(self.board.hash());
        let Some(found) = entry else {
            return (None, None);
        };
        self.state.stats.tt_hits = self.state.stats.tt_hits.saturating_add(1);

        if excluded_move_active || found.depth() < depth {
            return (entry, None);
        }
        let score = found.score();
        let cutoff = match found.bound_type() {
            BoundType::Exact => Some(score),
            BoundType::LowerBound if score >= beta => Some(score),
            BoundType::UpperBound if score <= alpha => Some(score),
            _ => None,
        };
        (entry, cutoff)
    }

    /// LMR reduction for a quiet late move.
    fn lmr_reduction(&self, depth: u32, moves_searched: usize, m: Move, in_check: bool, gives_check: bool) -> u32 {
        let params = self.state.params();
        if depth < params.lmr_min_depth
            || moves_searched <= params.lmr_min_move
            || in_check
            || gives_check
            || !m.is_quiet()
        {
            return 0;
        }
        let table = Self::lmr_table();
        let depth_idx = (depth as usize).min(LMR_TABLE_MAX_DEPTH - 1);
        let move_idx = moves_searched.min(LMR_TABLE_MAX_IDX - 1);
        table[depth_idx][move_idx].min(depth.saturating_sub(2))
    }

    /// Late move pruning: skip quiet moves late in the list, or with a bad
    /// history, near the leaves. The first searched move is never pruned.
    fn should_prune_late_move(&self, m: Move, depth: u32, moves_searched: usize, in_check: bool) -> bool {
        let params = self.state.params();
        if moves_searched == 0
            || depth > params.lmp_max_depth
            || in_check
            || !m.is_quiet()
            || m.is_castling()
        {
            return false;
        }
        if moves_searched >= params.lmp_base + (depth * depth) as usize {
            return true;
        }
        self.config.use_history
            && self.state.tables.history.score(self.board.side_to_move(), m)
                < -params.lmp_history_margin * depth as i32
    }

    /// Search the ordered move list. Fail-hard: the result lies in
    /// `[alpha, beta]`.
    #[allow(clippy::too_many_lines)]
    fn search_moves(
        &mut self,
        node: &NodeContext,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        moves: &[Move],
    ) -> i32 {
        let ply = node.ply;
        let mut ordered = self.order_moves(moves, node.tt_move, ply, self.prev_move(ply));

        let mut best_score = -INFINITY;
        let mut best_move = EMPTY_MOVE;
        let mut bound = BoundType::UpperBound;
        let mut moves_searched = 0usize;

        // Quiet moves searched before a cutoff get a history malus
        let mut quiets_tried = [EMPTY_MOVE; 64];
        let mut quiets_count = 0usize;

        let mut idx = 0;
        while let Some(scored) = ordered.pick_best(idx) {
            idx += 1;
            let m = scored.mv;
            if m == node.excluded_move {
                continue;
            }
            if self.should_prune_late_move(m, depth, moves_searched, node.in_check) {
                continue;
            }

            let info = self.make(m);
            self.previous_move[ply] = m;
            let gives_check = self.board.in_check();

            let mut extension = u32::from(gives_check).max(self.passed_pawn_extension(m));
            if m == node.tt_move {
                extension += node.singular_extension;
            }
            let new_depth = depth - 1 + extension;

            let score = if moves_searched == 0 {
                -self.alphabeta(new_depth, -beta, -alpha, ply + 1, EMPTY_MOVE, true)
            } else {
                let reduction = self.lmr_reduction(depth, moves_searched, m, node.in_check, gives_check);
                let mut score = -self.alphabeta(
                    new_depth.saturating_sub(reduction),
                    -alpha - 1,
                    -alpha,
                    ply + 1,
                    EMPTY_MOVE,
                    true,
                );
                if reduction > 0 && score > alpha {
                    score = -self.alphabeta(new_depth, -alpha - 1, -alpha, ply + 1, EMPTY_MOVE, true);
                }
                if score > alpha && score < beta {
                    score = -self.alphabeta(new_depth, -beta, -alpha, ply + 1, EMPTY_MOVE, true);
                }
                score
            };

            self.unmake(m, info);
            moves_searched += 1;

            if self.stopped {
                return alpha;
            }

            if score >= beta {
                if !node.excluded_active() {
                    self.store_tt(depth, score, BoundType::LowerBound, m);
                }
                self.update_heuristics(m, ply, depth, &quiets_tried[..quiets_count]);
                return beta;
            }

            if m.is_quiet() && quiets_count < quiets_tried.len() {
                quiets_tried[quiets_count] = m;
                quiets_count += 1;
            }

            if score > best_score {
                best_score = score;
                best_move = m;
                if score > alpha {
                    alpha = score;
                    bound = BoundType::Exact;
                }
            }
        }

        // Every move excluded or pruned
        if moves_searched == 0 {
            return alpha;
        }

        if !node.excluded_active() {
            self.store_tt(depth, best_score, bound, best_move);
        }
        alpha
    }

    /// Alpha-beta search with all pruning and extension techniques.
    ///
    /// `excluded_move` is skipped in the move loop (singular extension
    /// probes); while it is set, the TT is neither used for cutoffs nor
    /// written.
    pub fn alphabeta(
        &mut self,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
        excluded_move: Move,
        allow_null: bool,
    ) -> i32 {
        self.nodes += 1;
        self.update_seldepth(ply);
        if self.should_stop() {
            return alpha;
        }

        // Mate distance pruning
        let ply_score = ply as i32;
        alpha = alpha.max(-MATE_SCORE + ply_score);
        beta = beta.min(MATE_SCORE - ply_score - 1);
        if alpha >= beta {
            return alpha;
        }

        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        if self.is_draw_position() {
            return self.draw_score();
        }

        let mut node = NodeContext {
            ply,
            in_check: self.board.in_check(),
            excluded_move,
            tt_move: EMPTY_MOVE,
            singular_extension: 0,
        };

        if allow_null {
            if let Some(score) = self.try_null_move_pruning(depth, beta, &node) {
                return score;
            }
        }

        let (mut entry, cutoff) = self.probe_tt(depth, alpha, beta, node.excluded_active());
        if let Some(score) = cutoff {
            return score;
        }

        // Internal iterative deepening: find a move to try first
        let params = self.state.params();
        let (iid_min_depth, iid_reduction) = (params.iid_min_depth, params.iid_reduction);
        if depth > iid_min_depth
            && !node.excluded_active()
            && entry.and_then(|e| e.packed_move).is_none()
        {
            self.alphabeta(depth.saturating_sub(iid_reduction), alpha, beta, ply, EMPTY_MOVE, allow_null);
            if self.stopped {
                return alpha;
            }
            entry = self.state.tables.tt.probe(self.board.hash());
        }

        if depth > 0 && !node.in_check && !node.excluded_active() {
            let eval = self.evaluate();
            if let Some(score) = self.prune_before_move_loop(depth, alpha, beta, eval, &node) {
                return score;
            }
        }

        let moves = self.board.generate_moves();
        if moves.is_empty() {
            return if node.in_check {
                -MATE_SCORE + ply_score
            } else {
                0
            };
        }

        if depth == 0 {
            return self.quiesce(alpha, beta, ply);
        }

        if let Some(entry) = entry {
            node.tt_move = entry.best_move(&moves).unwrap_or(EMPTY_MOVE);
            node.singular_extension = self.singular_extension(depth, &node, &entry);
            if self.stopped {
                return alpha;
            }
        }

        self.search_moves(&node, depth, alpha, beta, moves.as_slice())
    }

    /// Extend the TT move by one ply when every alternative falls well
    /// short of its stored score.
    fn singular_extension(&mut self, depth: u32, node: &NodeContext, entry: &TtEntry) -> u32 {
        let params = self.state.params();
        if node.excluded_active()
            || node.tt_move.is_null()
            || depth < params.singular_min_depth
            || entry.depth() + 3 < depth
            || entry.bound_type() == BoundType::UpperBound
            || entry.score().abs() >= MATE_THRESHOLD
        {
            return 0;
        }
        let singular_beta = entry.score() - params.singular_margin * depth as i32;
        let score = self.alphabeta(
            (depth - 1) / 2,
            singular_beta - 1,
            singular_beta,
            node.ply,
            node.tt_move,
            false,
        );
        u32::from(!self.stopped && score < singular_beta)
    }
}
