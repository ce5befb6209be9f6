//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Performance tests for move generation
//! - `draw.rs` - Draw detection (50-move, repetition)
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `edge_cases.rs` - Special positions and edge cases
//! - `eval.rs` - Evaluation symmetry and evaluator hooks
//! - `search.rs` - Search behaviour end to end
//! - `search_tables.rs` - Move ordering heuristics
//! - `proptest.rs` - Property-based tests

mod draw;
mod make_unmake;
mod proptest;
mod search_tables;
