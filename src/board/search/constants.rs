//! Search constants.
//!
//! Fixed scores and table sizes used by the alpha-beta search. Tunable
//! margins live in [`SearchParams`](super::SearchParams).

// ============================================================================
// SCORES
// ============================================================================

/// Score of being mated at the root; a mate found at ply `n` scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 20000;

/// Scores with absolute value above this are mate scores
pub const MATE_THRESHOLD: i32 = 10000;

/// Window bound wider than any reachable score
pub const INFINITY: i32 = 30000;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores are tried earlier. TT > good captures > killers > counter >
// history > losing captures.

/// Hash move (from transposition table)
pub const TT_MOVE_SCORE: i32 = 2_000_000;

/// Captures that do not lose material start here
pub const GOOD_CAPTURE_BASE: i32 = 1_000_000;

/// Quiet move that caused a beta cutoff at the same ply
pub const KILLER_SCORE: i32 = 900_000;

/// Quiet move that refuted the opponent's previous move
pub const COUNTER_SCORE: i32 = 800_000;

/// Captures with negative SEE, below every quiet move
pub const BAD_CAPTURE_BASE: i32 = -1_000_000;

/// Bonus for a quiescence move that promotes
pub const QSEARCH_PROMOTION_BONUS: i32 = 900;

// ============================================================================
// TABLES
// ============================================================================

/// Killer slots per ply
pub const KILLER_SLOTS: usize = 2;

/// LMR reduction table dimensions (depth x moves searched)
pub const LMR_TABLE_MAX_DEPTH: usize = 64;
pub const LMR_TABLE_MAX_IDX: usize = 256;

/// Time and node limits are sampled when `nodes & NODE_CHECK_MASK == 0`
pub const NODE_CHECK_MASK: u64 = 2047;

/// Depth searched when no depth limit is given
pub const DEFAULT_MAX_DEPTH: u32 = 64;
