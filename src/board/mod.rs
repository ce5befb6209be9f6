//! Chess board representation and game logic.
//!
//! Uses bitboards for move generation and position evaluation. Supports
//! full chess rules including castling (standard and Chess960), en passant
//! and promotions.
//!
//! # Example
//! ```
//! use lazy_chess::board::{Board, Color, Piece};
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod accumulator;
mod attack_tables;
mod error;
mod eval;
mod eval_terms;
mod fen;
mod make_unmake;
mod movegen;
mod perft;
mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{BookError, FenError, MoveParseError, ParamError, SquareError};
pub use fen::START_FEN;
pub use perft::PerftTable;
pub use state::Board;
pub use types::{
    Bitboard, BitboardIter, CastleSide, CastlingRights, Color, Move, MoveKind, MoveList,
    MoveListIntoIter, Piece, Square, MAX_PLY,
};

// Public API - evaluation
pub use accumulator::IncrementalPst;
pub use eval::{ClassicalEvaluator, Evaluator};
pub use eval_terms::params::EvalParams;

// Public API - search functions and configuration
pub use search::{
    blunder_probability, elo_to_nodes, mate_in, search, MoveProvider, SearchClock, SearchConfig,
    SearchInfoCallback, SearchIterationInfo, SearchParams, SearchResult, SearchState,
    SearchStats, StabilityAuthority, TextBook, TimeAuthority, DEFAULT_TT_MB, MATE_SCORE,
    MATE_THRESHOLD,
};

// Re-export search internals for users who need fine-grained control
pub use search::{CaptureHistory, CounterMoveTable, HistoryTable, KillerTable, SearchTables};

// Internal types exposed for advanced usage
pub use state::{NullMoveInfo, UnmakeInfo};
pub use types::ScoredMove;

pub(crate) use types::{ScoredMoveList, EMPTY_MOVE};
