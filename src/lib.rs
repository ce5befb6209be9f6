//! Alpha-beta chess engine core: bitboard move generation, classical
//! evaluation, a lock-free shared transposition table and a lazy SMP
//! search.
//!
//! # Example
//! ```
//! use std::sync::atomic::AtomicBool;
//! use lazy_chess::{search, Board, SearchConfig, SearchState};
//!
//! let mut board = Board::new();
//! let mut state = SearchState::new(16);
//! let result = search(&mut board, &mut state, SearchConfig::depth(3), &AtomicBool::new(false));
//! assert!(result.best_move.is_some());
//! ```

pub mod board;
pub mod pawn_hash;
pub mod tt;
mod zobrist;

pub use board::{
    search, Board, Color, Evaluator, Move, Piece, SearchConfig, SearchResult, SearchState, Square,
};
pub use tt::{BoundType, TranspositionTable, TtEntry};
