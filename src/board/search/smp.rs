//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! Implements parallel search where multiple threads search the same position
//! independently with different depth offsets. All threads share a common
//! transposition table, which provides natural coordination.
//!
//! - Separate killer/history tables per thread reduce correlated pruning failures
//! - Helper threads searching at depth+1 populate TT for main thread
//! - The main worker runs on the calling thread; when it finishes, helpers stop

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};

use crate::board::Board;
use crate::tt::TranspositionTable;

use super::simple::simple_search;
use super::{SearchClock, SearchConfig, SearchResult, SearchState, StopFlags};

/// Shared state across all worker threads
pub struct SharedSearchState {
    /// Thread-safe transposition table
    pub tt: Arc<TranspositionTable>,
    /// Raised by the main worker once it is done
    pub helpers_stop: AtomicBool,
    /// Global node counter (sum of all workers)
    pub total_nodes: AtomicU64,
    /// Maximum selective depth seen
    pub max_seldepth: AtomicU32,
}

impl SharedSearchState {
    #[must_use]
    pub fn new(tt: Arc<TranspositionTable>) -> Self {
        SharedSearchState {
            tt,
            helpers_stop: AtomicBool::new(false),
            total_nodes: AtomicU64::new(0),
            max_seldepth: AtomicU32::new(0),
        }
    }

    /// Update seldepth if this value is higher
    pub fn update_seldepth(&self, seldepth: u32) {
        self.max_seldepth.fetch_max(seldepth, Ordering::Relaxed);
    }

    /// Add nodes to global counter
    pub fn add_nodes(&self, nodes: u64) {
        self.total_nodes.fetch_add(nodes, Ordering::Relaxed);
    }
}

/// Result from a single worker thread
#[derive(Debug, Clone, Copy)]
pub struct WorkerResult {
    pub worker_id: usize,
    pub result: SearchResult,
}

/// Get depth offset for a worker thread.
///
/// Thread 0 (main): searches at target depth
/// Thread 1: searches at depth + 1 (populates TT with deeper entries)
/// Thread 2: searches at depth (different move order due to separate tables)
/// Thread 3: searches at depth + 1
/// etc.
fn worker_depth_offset(worker_id: usize) -> u32 {
    // Odd workers search deeper, even workers search at target depth
    #[allow(clippy::match_same_arms)]
    match worker_id % 4 {
        0 => 0,
        1 => 1,
        2 => 0,
        3 => 1,
        _ => 0,
    }
}

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Helpers search quietly: one line, no progress reports.
fn helper_config(config: &SearchConfig, worker_id: usize) -> SearchConfig {
    let mut helper = config.clone();
    helper.max_depth = config
        .max_depth
        .map(|depth| depth + worker_depth_offset(worker_id));
    helper.info_callback = None;
    helper.multi_pv = 1;
    helper.threads = 1;
    helper
}

/// Run parallel search using Lazy SMP.
///
/// Spawns `config.threads - 1` helper threads that search the same position
/// independently; the calling thread runs the main worker with `state`.
/// Workers share the transposition table but have separate move ordering
/// tables and evaluator forks. The main worker's result is preferred.
pub(crate) fn smp_search(
    board: &Board,
    state: &mut SearchState,
    config: &SearchConfig,
    clock: Arc<SearchClock>,
    stop: &AtomicBool,
) -> SearchResult {
    let num_threads = config.threads.max(1);
    let shared = SharedSearchState::new(state.shared_tt());

    let mut helper_states: Vec<SearchState> = (1..num_threads)
        .map(|_| {
            SearchState::with_shared_tt(
                Arc::clone(&shared.tt),
                state.evaluator.fork(),
                state.params().clone(),
            )
        })
        .collect();

    let mut results: Vec<WorkerResult> = thread::scope(|scope| {
        let mut handles: Vec<ScopedJoinHandle<'_, WorkerResult>> =
            Vec::with_capacity(num_threads - 1);

        for (idx, helper_state) in helper_states.iter_mut().enumerate() {
            let worker_id = idx + 1;
            let worker_config = helper_config(config, worker_id);
            let worker_clock = Arc::clone(&clock);
            let mut worker_board = board.clone();
            let shared = &shared;

            let spawned = thread::Builder::new()
                .name(format!("search-{worker_id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    let stops = StopFlags {
                        external: stop,
                        helpers: Some(&shared.helpers_stop),
                    };
                    run_worker(
                        worker_id,
                        &mut worker_board,
                        helper_state,
                        &worker_config,
                        worker_clock,
                        stops,
                        shared,
                    )
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    log::warn!("failed to spawn search worker {worker_id}: {_err}");
                }
            }
        }

        let mut main_board = board.clone();
        let stops = StopFlags {
            external: stop,
            helpers: None,
        };
        let main = run_worker(0, &mut main_board, state, config, Arc::clone(&clock), stops, &shared);
        shared.helpers_stop.store(true, Ordering::Relaxed);

        let mut results = Vec::with_capacity(num_threads);
        results.push(main);
        for handle in handles {
            if let Ok(result) = handle.join() {
                results.push(result);
            }
        }
        results
    });

    state.stats.nodes = shared.total_nodes.load(Ordering::Relaxed);
    state.stats.seldepth = shared.max_seldepth.load(Ordering::Relaxed);

    // Prefer the main worker; fall back to the deepest helper.
    let main_index = results
        .iter()
        .position(|r| r.worker_id == 0 && r.result.best_move.is_some());
    let chosen = match main_index {
        Some(idx) => results.swap_remove(idx),
        None => results
            .into_iter()
            .filter(|r| r.result.best_move.is_some())
            .max_by_key(|r| r.result.depth)
            .unwrap_or(WorkerResult {
                worker_id: 0,
                result: SearchResult::immediate(None, 0),
            }),
    };

    SearchResult {
        nodes: state.stats.nodes,
        ..chosen.result
    }
}

/// Run a single worker
fn run_worker(
    worker_id: usize,
    board: &mut Board,
    state: &mut SearchState,
    config: &SearchConfig,
    clock: Arc<SearchClock>,
    stops: StopFlags<'_>,
    shared: &SharedSearchState,
) -> WorkerResult {
    let result = simple_search(board, state, config, clock, stops);

    shared.add_nodes(result.nodes);
    shared.update_seldepth(state.stats.seldepth);

    #[cfg(feature = "logging")]
    log::debug!(
        "worker {worker_id}: depth {} nodes {} best {:?}",
        result.depth,
        result.nodes,
        result.best_move.map(|m| m.to_string())
    );

    WorkerResult { worker_id, result }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_offsets_alternate() {
        let offsets: Vec<u32> = (0..6).map(worker_depth_offset).collect();
        assert_eq!(offsets, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_helper_config_is_quiet() {
        let config = SearchConfig::depth(5)
            .with_multi_pv(3)
            .with_threads(4)
            .with_info_callback(Arc::new(|_| {}));
        let helper = helper_config(&config, 1);
        assert_eq!(helper.max_depth, Some(6));
        assert_eq!(helper.multi_pv, 1);
        assert_eq!(helper.threads, 1);
        assert!(helper.info_callback.is_none());
        assert_eq!(helper_config(&config, 2).max_depth, Some(5));
    }
}
