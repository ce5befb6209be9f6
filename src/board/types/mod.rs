//! Core chess types.
//!
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - compact board square representation (u8)
//! - `Bitboard` - 64-bit set of squares
//! - `Move`, `MoveKind` and `MoveList` - move representation
//! - `CastlingRights` - castling state with Chess960 rook files

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingRights};
pub(crate) use moves::{ScoredMoveList, EMPTY_MOVE};
pub use moves::{Move, MoveKind, MoveList, MoveListIntoIter, ScoredMove, MAX_PLY};
pub use piece::{Color, Piece};
pub(crate) use piece::PROMOTION_PIECES;
pub use square::Square;
