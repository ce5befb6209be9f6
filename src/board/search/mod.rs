//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows and multi-PV
//! - Alpha-beta with PVS, null move pruning, razoring, futility and ProbCut
//! - Internal iterative deepening and singular extensions
//! - Late move reductions and late move pruning
//! - Quiescence search with SEE and delta pruning
//! - Move ordering (TT move, SEE captures, killers, counter moves, history)
//! - Lazy SMP parallel search over a shared transposition table

mod constants;
mod move_order;
mod params;
mod provider;
mod simple;
pub mod smp;
mod strength;
mod tables;
mod time;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::tt::TranspositionTable;

use super::eval::{ClassicalEvaluator, Evaluator};
use super::{Board, Move, MoveList};

pub use constants::{MATE_SCORE, MATE_THRESHOLD};
pub use params::SearchParams;
pub use provider::{MoveProvider, TextBook};
pub use strength::{blunder_probability, elo_to_nodes};
pub use tables::{CaptureHistory, CounterMoveTable, HistoryTable, KillerTable, SearchTables};
pub use time::{SearchClock, StabilityAuthority, TimeAuthority};

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// The expected opponent reply (for pondering)
    pub ponder_move: Option<Move>,
    /// Score of the last completed depth, side to move's perspective
    pub score: i32,
    /// Last completed depth; 0 when the move came without searching
    pub depth: u32,
    pub nodes: u64,
}

impl SearchResult {
    fn immediate(best_move: Option<Move>, score: i32) -> Self {
        SearchResult {
            best_move,
            ponder_move: None,
            score,
            depth: 0,
            nodes: 0,
        }
    }

    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score)
    }
}

/// Moves to mate for a mate score, negative when being mated.
#[must_use]
pub fn mate_in(score: i32) -> Option<i32> {
    if score.abs() <= MATE_THRESHOLD {
        return None;
    }
    let moves = (MATE_SCORE - score.abs() + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

/// Default transposition table size in MB
pub const DEFAULT_TT_MB: usize = 64;

/// Statistics tracked during search
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub nodes: u64,
    pub seldepth: u32,
    pub total_nodes: u64,
    pub tt_hits: u64,
}

impl SearchStats {
    pub fn reset_search(&mut self) {
        self.nodes = 0;
        self.seldepth = 0;
        self.tt_hits = 0;
    }
}

/// Search state persisted across searches: the transposition table,
/// this thread's heuristics, the evaluator and any move providers.
pub struct SearchState {
    pub stats: SearchStats,
    pub tables: SearchTables,
    params: SearchParams,
    evaluator: Box<dyn Evaluator>,
    providers: Vec<Box<dyn MoveProvider>>,
}

impl SearchState {
    /// Fresh state with a classical evaluator.
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        Self::with_evaluator(tt_mb, Box::new(ClassicalEvaluator::default()))
    }

    #[must_use]
    pub fn with_evaluator(tt_mb: usize, evaluator: Box<dyn Evaluator>) -> Self {
        Self::with_shared_tt(
            Arc::new(TranspositionTable::new(tt_mb)),
            evaluator,
            SearchParams::default(),
        )
    }

    /// State around an existing table. Used for SMP workers that share
    /// the TT but keep their own heuristics and evaluator.
    #[must_use]
    pub fn with_shared_tt(
        tt: Arc<TranspositionTable>,
        evaluator: Box<dyn Evaluator>,
        params: SearchParams,
    ) -> Self {
        SearchState {
            stats: SearchStats::default(),
            tables: SearchTables::new(tt, params.history_cap),
            params,
            evaluator,
            providers: Vec::new(),
        }
    }

    /// Get a clone of the shared TT Arc for use by SMP workers
    #[must_use]
    pub fn shared_tt(&self) -> Arc<TranspositionTable> {
        Arc::clone(&self.tables.tt)
    }

    #[must_use]
    pub fn tt(&self) -> &TranspositionTable {
        &self.tables.tt
    }

    pub fn evaluator_mut(&mut self) -> &mut dyn Evaluator {
        self.evaluator.as_mut()
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluator = evaluator;
    }

    /// Providers are asked in insertion order before every search.
    pub fn add_provider(&mut self, provider: Box<dyn MoveProvider>) {
        self.providers.push(provider);
    }

    pub fn clear_providers(&mut self) {
        self.providers.clear();
    }

    pub fn new_search(&mut self) {
        self.stats.reset_search();
        self.tables.new_search();
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.tables.history.set_cap(params.history_cap);
        self.tables.capture_history.set_cap(params.history_cap);
        self.params = params;
    }

    /// Resize the transposition table. Fails (returns false) while any
    /// other owner still holds the table.
    pub fn resize_tt(&mut self, tt_mb: usize) -> bool {
        match Arc::get_mut(&mut self.tables.tt) {
            Some(tt) => {
                tt.resize(tt_mb);
                true
            }
            None => false,
        }
    }

    /// Forget everything learned: TT entries and heuristics.
    pub fn clear(&mut self) {
        self.tables.tt.clear();
        self.tables.reset();
        self.stats = SearchStats::default();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tables.tt.hashfull_per_mille()
    }

    /// First provider move that is legal here and allowed by `restrict`.
    fn consult_providers(&self, board: &Board, legal: &MoveList, restrict: &[Move]) -> Option<Move> {
        self.providers
            .iter()
            .filter_map(|provider| provider.lookup(board))
            .find(|mv| legal.contains(mv) && (restrict.is_empty() || restrict.contains(mv)))
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    /// Which PV line this is (1 = best, 2 = second best, etc.)
    pub multipv: u32,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub hashfull: u32,
    pub time_ms: u64,
    pub pv: Vec<Move>,
}

impl SearchIterationInfo {
    /// `cp <n>` or `mate <n>`
    #[must_use]
    pub fn score_string(&self) -> String {
        match self.mate_in {
            Some(n) => format!("mate {n}"),
            None => format!("cp {}", self.score),
        }
    }

    /// PV in coordinate notation, space separated
    #[must_use]
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(std::string::ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Configuration for a search operation.
#[derive(Clone)]
pub struct SearchConfig {
    /// Maximum depth to search (None = 64)
    pub max_depth: Option<u32>,
    /// Abort as soon as this is reached (0 = unlimited)
    pub hard_limit_ms: u64,
    /// Stop between depths once this is reached and the best move is stable (0 = unset)
    pub soft_limit_ms: u64,
    /// Node limit (0 = unlimited)
    pub node_limit: u64,
    /// Limit strength to this Elo with a node budget
    pub elo: Option<u32>,
    /// Allow random move substitution below 2500 Elo
    pub blunders: bool,
    pub multi_pv: usize,
    pub aspiration_window: i32,
    /// Score of a draw for the side that reaches it, negated
    pub contempt: i32,
    pub use_history: bool,
    pub use_capture_history: bool,
    /// Only these root moves are searched when non-empty
    pub search_moves: Vec<Move>,
    pub threads: usize,
    /// Whether to extract ponder move from the PV
    pub extract_ponder: bool,
    pub info_callback: Option<SearchInfoCallback>,
    pub time_authority: Option<Arc<dyn TimeAuthority>>,
    /// Externally controlled clock; overrides the millisecond limits
    pub clock: Option<Arc<SearchClock>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: None,
            hard_limit_ms: 0,
            soft_limit_ms: 0,
            node_limit: 0,
            elo: None,
            blunders: true,
            multi_pv: 1,
            aspiration_window: 50,
            contempt: 0,
            use_history: true,
            use_capture_history: true,
            search_moves: Vec::new(),
            threads: 1,
            extract_ponder: true,
            info_callback: None,
            time_authority: None,
            clock: None,
        }
    }
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Time-limited search; the limit is both soft and hard.
    #[must_use]
    pub fn time(time_limit_ms: u64) -> Self {
        SearchConfig {
            hard_limit_ms: time_limit_ms,
            soft_limit_ms: time_limit_ms,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn with_limits(mut self, soft_limit_ms: u64, hard_limit_ms: u64) -> Self {
        self.soft_limit_ms = soft_limit_ms;
        self.hard_limit_ms = hard_limit_ms;
        self
    }

    /// Set node limit
    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    #[must_use]
    pub fn with_elo(mut self, elo: u32) -> Self {
        self.elo = Some(elo);
        self
    }

    #[must_use]
    pub fn with_blunders(mut self, blunders: bool) -> Self {
        self.blunders = blunders;
        self
    }

    #[must_use]
    pub fn with_multi_pv(mut self, lines: usize) -> Self {
        self.multi_pv = lines.max(1);
        self
    }

    #[must_use]
    pub fn with_aspiration_window(mut self, window: i32) -> Self {
        self.aspiration_window = window;
        self
    }

    #[must_use]
    pub fn with_contempt(mut self, contempt: i32) -> Self {
        self.contempt = contempt;
        self
    }

    #[must_use]
    pub fn with_history(mut self, use_history: bool) -> Self {
        self.use_history = use_history;
        self
    }

    #[must_use]
    pub fn with_capture_history(mut self, use_capture_history: bool) -> Self {
        self.use_capture_history = use_capture_history;
        self
    }

    #[must_use]
    pub fn with_search_moves(mut self, moves: Vec<Move>) -> Self {
        self.search_moves = moves;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set whether to extract ponder move
    #[must_use]
    pub fn with_ponder(mut self, extract_ponder: bool) -> Self {
        self.extract_ponder = extract_ponder;
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }

    #[must_use]
    pub fn with_time_authority(mut self, authority: Arc<dyn TimeAuthority>) -> Self {
        self.time_authority = Some(authority);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<SearchClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Node budget from the explicit limit, else from the Elo setting.
    #[must_use]
    pub fn effective_node_limit(&self) -> u64 {
        if self.node_limit > 0 {
            self.node_limit
        } else {
            self.elo.and_then(elo_to_nodes).unwrap_or(0)
        }
    }

    fn make_clock(&self) -> Arc<SearchClock> {
        self.clock.clone().unwrap_or_else(|| {
            Arc::new(SearchClock::from_limits(
                self.soft_limit_ms,
                self.hard_limit_ms,
            ))
        })
    }
}

/// Stop flags a search context polls.
#[derive(Clone, Copy)]
pub(crate) struct StopFlags<'a> {
    /// Owned by the caller
    pub external: &'a AtomicBool,
    /// Raised by the main SMP worker when it finishes
    pub helpers: Option<&'a AtomicBool>,
}

/// Run a search on `board` and return the best move found.
///
/// Move providers are consulted first; a single legal move is returned
/// without searching. Otherwise iterative deepening runs until the depth,
/// time or node limit, or until `stop` is raised. A legal move is always
/// returned when one exists.
///
/// # Example
/// ```ignore
/// let config = SearchConfig::depth(6).with_multi_pv(2);
/// let result = search(&mut board, &mut state, config, &AtomicBool::new(false));
/// ```
#[allow(clippy::needless_pass_by_value)] // Config is intentionally consumed
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    config: SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    state.new_search();
    let legal = board.generate_moves();
    if legal.is_empty() {
        let score = if board.in_check() { -MATE_SCORE } else { 0 };
        return SearchResult::immediate(None, score);
    }

    if let Some(mv) = state.consult_providers(board, &legal, &config.search_moves) {
        #[cfg(feature = "logging")]
        log::info!("provider move {mv}");
        return SearchResult::immediate(Some(mv), 0);
    }

    if legal.len() == 1 {
        let only = legal.first();
        let score = state.evaluator.evaluate(board);
        return SearchResult::immediate(only, score);
    }

    #[cfg(feature = "logging")]
    log::info!(
        "search start: depth {:?} soft {}ms hard {}ms nodes {} threads {}",
        config.max_depth,
        config.soft_limit_ms,
        config.hard_limit_ms,
        config.effective_node_limit(),
        config.threads
    );

    let clock = config.make_clock();
    let mut result = if config.threads > 1 {
        smp::smp_search(board, state, &config, clock, stop)
    } else {
        let flags = StopFlags {
            external: stop,
            helpers: None,
        };
        simple::simple_search(board, state, &config, clock, flags)
    };

    if !config.extract_ponder {
        result.ponder_move = None;
    }

    if let (Some(elo), Some(best)) = (config.elo, result.best_move) {
        if config.blunders {
            let chosen = strength::maybe_blunder(board, best, elo, &mut rand::thread_rng());
            if chosen != best {
                #[cfg(feature = "logging")]
                log::debug!("strength limit replaced {best} with {chosen}");
                result.best_move = Some(chosen);
                result.ponder_move = None;
            }
        }
    }

    #[cfg(feature = "logging")]
    log::info!(
        "search done: best {:?} score {} depth {} nodes {}",
        result.best_move.map(|m| m.to_string()),
        result.score,
        result.depth,
        result.nodes
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_in_encoding() {
        assert_eq!(mate_in(MATE_SCORE - 1), Some(1));
        assert_eq!(mate_in(MATE_SCORE - 3), Some(2));
        assert_eq!(mate_in(MATE_SCORE - 4), Some(2));
        assert_eq!(mate_in(-(MATE_SCORE - 2)), Some(-1));
        assert_eq!(mate_in(350), None);
        assert_eq!(mate_in(-MATE_THRESHOLD), None);
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::time(500)
            .with_multi_pv(0)
            .with_threads(0)
            .with_elo(1200);
        assert_eq!(config.soft_limit_ms, 500);
        assert_eq!(config.hard_limit_ms, 500);
        assert_eq!(config.multi_pv, 1);
        assert_eq!(config.threads, 1);
        assert_eq!(config.effective_node_limit(), 1000);
        assert_eq!(config.clone().with_nodes(77).effective_node_limit(), 77);
        assert_eq!(SearchConfig::default().effective_node_limit(), 0);
    }

    #[test]
    fn test_resize_needs_exclusive_table() {
        let mut state = SearchState::new(1);
        assert!(state.resize_tt(2));
        let shared = state.shared_tt();
        assert!(!state.resize_tt(4));
        drop(shared);
        assert!(state.resize_tt(4));
    }
}
