use std::sync::Arc;

use super::super::constants::{DEFAULT_MAX_DEPTH, INFINITY};
use super::super::time::StabilityAuthority;
use super::super::{
    mate_in, SearchClock, SearchConfig, SearchIterationInfo, SearchResult, SearchState,
    StopFlags, TimeAuthority,
};
use super::SimpleSearchContext;
use crate::board::{Board, Move, EMPTY_MOVE, MAX_PLY};
use crate::tt::BoundType;

/// Best line of one completed depth
struct Iteration {
    best_move: Move,
    score: i32,
    pv: Vec<Move>,
}

impl SimpleSearchContext<'_> {
    /// Legal root moves, restricted to `search_moves` when that names any
    /// legal move.
    fn root_moves(&mut self) -> Vec<Move> {
        let legal = self.board.generate_moves();
        let restricted: Vec<Move> = legal
            .iter()
            .copied()
            .filter(|m| self.config.search_moves.contains(m))
            .collect();
        if restricted.is_empty() {
            legal.as_slice().to_vec()
        } else {
            restricted
        }
    }

    /// Search every root move not in `excluded`. Returns the best move and
    /// its score; on stop the result covers the moves finished so far.
    fn root_search(
        &mut self,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        root_moves: &[Move],
        excluded: &[Move],
    ) -> (Option<Move>, i32) {
        let original_alpha = alpha;
        let candidates: Vec<Move> = root_moves
            .iter()
            .copied()
            .filter(|m| !excluded.contains(m))
            .collect();
        let legal = self.board.generate_moves();
        let tt_move = self
            .state
            .tables
            .tt
            .probe(self.board.hash())
            .and_then(|entry| entry.best_move(&legal))
            .unwrap_or(EMPTY_MOVE);
        let mut ordered = self.order_moves(&candidates, tt_move, 0, EMPTY_MOVE);

        let mut best_move = None;
        let mut best_score = -INFINITY;
        let mut idx = 0;
        while let Some(scored) = ordered.pick_best(idx) {
            idx += 1;
            if self.should_stop() {
                break;
            }
            let m = scored.mv;
            let info = self.make(m);
            self.previous_move[0] = m;
            let gives_check = self.board.in_check();
            let extension = u32::from(gives_check).max(self.passed_pawn_extension(m));
            let new_depth = depth - 1 + extension;

            let score = if idx == 1 {
                -self.alphabeta(new_depth, -beta, -alpha, 1, EMPTY_MOVE, true)
            } else {
                let mut score = -self.alphabeta(new_depth, -alpha - 1, -alpha, 1, EMPTY_MOVE, true);
                if score > alpha && score < beta {
                    score = -self.alphabeta(new_depth, -beta, -alpha, 1, EMPTY_MOVE, true);
                }
                score
            };
            self.unmake(m, info);

            if self.stopped {
                break;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(m);
            }
            if score > alpha {
                alpha = score;
            }
            if score >= beta {
                break;
            }
        }

        if let Some(best) = best_move {
            if !self.stopped && excluded.is_empty() {
                let bound = if best_score <= original_alpha {
                    BoundType::UpperBound
                } else if best_score >= beta {
                    BoundType::LowerBound
                } else {
                    BoundType::Exact
                };
                self.store_tt(depth, best_score, bound, best);
            }
        }
        (best_move, best_score)
    }

    /// One PV line with aspiration windows. Only the first line of a depth
    /// past the first uses a narrow window; a fail widens the failing side.
    fn search_pv_line(
        &mut self,
        depth: u32,
        pv_idx: usize,
        prev_score: i32,
        root_moves: &[Move],
        excluded: &[Move],
    ) -> (Option<Move>, i32) {
        let window = self.config.aspiration_window;
        let (mut alpha, mut beta) = if depth > 1 && pv_idx == 0 && window > 0 {
            (prev_score - window, prev_score + window)
        } else {
            (-INFINITY, INFINITY)
        };

        loop {
            let (best, score) = self.root_search(depth, alpha, beta, root_moves, excluded);
            if self.stopped || best.is_none() {
                return (best, score);
            }
            if score <= alpha && alpha > -INFINITY {
                #[cfg(feature = "logging")]
                log::debug!("depth {depth}: fail low at {score}, re-searching");
                alpha = -INFINITY;
                continue;
            }
            if score >= beta && beta < INFINITY {
                #[cfg(feature = "logging")]
                log::debug!("depth {depth}: fail high at {score}, re-searching");
                beta = INFINITY;
                continue;
            }
            return (best, score);
        }
    }

    /// All PV lines of one depth. `None` when the depth was interrupted
    /// before its first line finished.
    fn search_depth(&mut self, depth: u32, prev_score: i32, root_moves: &[Move]) -> Option<Iteration> {
        let lines = self.config.multi_pv.clamp(1, root_moves.len().max(1));
        let mut excluded = Vec::with_capacity(lines);
        let mut first = None;

        for pv_idx in 0..lines {
            let (best, score) = self.search_pv_line(depth, pv_idx, prev_score, root_moves, &excluded);
            if self.stopped {
                break;
            }
            let Some(best) = best else {
                break;
            };
            let pv = self.extract_pv(best, depth as usize);
            self.report_info(depth, pv_idx, score, &pv);
            if pv_idx == 0 {
                first = Some(Iteration {
                    best_move: best,
                    score,
                    pv,
                });
            }
            excluded.push(best);
        }

        // A multi-PV depth cut short still has a complete first line
        first
    }

    fn report_info(&self, depth: u32, pv_idx: usize, score: i32, pv: &[Move]) {
        let elapsed = self.clock.elapsed();
        let time_ms = elapsed.as_millis() as u64;
        let nps = if time_ms > 0 {
            self.nodes * 1000 / time_ms
        } else {
            0
        };

        #[cfg(feature = "logging")]
        log::debug!(
            "depth {depth} multipv {} score {score} nodes {} time {time_ms}ms",
            pv_idx + 1,
            self.nodes
        );

        let Some(callback) = &self.config.info_callback else {
            return;
        };
        let info = SearchIterationInfo {
            depth,
            seldepth: self.state.stats.seldepth,
            multipv: (pv_idx + 1) as u32,
            score,
            mate_in: mate_in(score),
            nodes: self.nodes,
            nps,
            hashfull: self.state.hashfull_per_mille(),
            time_ms,
            pv: pv.to_vec(),
        };
        callback(&info);
    }

    /// Iterative deepening with aspiration windows, multi-PV and soft/hard
    /// time management.
    pub fn iterative_deepening(&mut self) -> SearchResult {
        let root_moves = self.root_moves();
        let max_depth = self
            .config
            .max_depth
            .unwrap_or(DEFAULT_MAX_DEPTH)
            .clamp(1, (MAX_PLY - 1) as u32);
        let (soft_limit, hard_limit) = self.clock.limits();
        let authority: Arc<dyn TimeAuthority> = self
            .config
            .time_authority
            .clone()
            .unwrap_or_else(|| Arc::new(StabilityAuthority));
        let instability_margin = self.state.params().instability_margin;

        let mut completed: Option<(Iteration, u32)> = None;
        let mut streak = 0u32;

        for depth in 1..=max_depth {
            let prev_score = completed.as_ref().map_or(0, |(it, _)| it.score);
            let Some(iteration) = self.search_depth(depth, prev_score, &root_moves) else {
                break;
            };

            let same_move = completed
                .as_ref()
                .is_some_and(|(it, _)| it.best_move == iteration.best_move);
            // Depths the best move has survived unchanged
            streak = if same_move { streak + 1 } else { 0 };
            let score_drop = completed
                .as_ref()
                .map_or(0, |(it, _)| it.score - iteration.score);
            completed = Some((iteration, depth));

            if self.should_stop() {
                break;
            }

            let Some(soft) = soft_limit else {
                continue;
            };
            let mut limit = soft;
            let mut stable = streak >= 2;
            if score_drop > instability_margin {
                // Falling score: allow up to twice the soft limit
                limit = hard_limit.map_or(soft * 2, |hard| hard.min(soft * 2));
                stable = false;
            }
            let elapsed = self.clock.elapsed();
            if authority.should_stop(elapsed, limit, stable)
                || hard_limit.is_some_and(|hard| elapsed >= hard)
            {
                break;
            }
        }

        match completed {
            Some((iteration, depth)) => SearchResult {
                best_move: Some(iteration.best_move),
                ponder_move: iteration.pv.get(1).copied(),
                score: iteration.score,
                depth,
                nodes: self.nodes,
            },
            None => SearchResult {
                best_move: self.fallback_move(&root_moves),
                ponder_move: None,
                score: 0,
                depth: 0,
                nodes: self.nodes,
            },
        }
    }

    /// Move to play when not even depth 1 finished: the TT move if it is
    /// a root candidate, else the first candidate.
    fn fallback_move(&mut self, root_moves: &[Move]) -> Option<Move> {
        let legal = self.board.generate_moves();
        self.state
            .tables
            .tt
            .probe(self.board.hash())
            .and_then(|entry| entry.best_move(&legal))
            .filter(|m| root_moves.contains(m))
            .or_else(|| root_moves.first().copied())
    }
}

/// Single-threaded iterative deepening search from `board`.
pub(crate) fn simple_search(
    board: &mut Board,
    state: &mut SearchState,
    config: &SearchConfig,
    clock: Arc<SearchClock>,
    stops: StopFlags<'_>,
) -> SearchResult {
    state.evaluator.refresh(board);
    let mut ctx = SimpleSearchContext::new(board, state, config, clock, stops);
    let result = ctx.iterative_deepening();
    let nodes = ctx.nodes;
    state.stats.nodes = nodes;
    state.stats.total_nodes = state.stats.total_nodes.saturating_add(nodes);
    result
}
