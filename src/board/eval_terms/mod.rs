//! Classical evaluation terms.
//!
//! Contains evaluation functions for:
//! - Mobility (safe squares for knights, bishops, rooks and queens)
//! - Pawn structure (passed, doubled, isolated, backward pawns)
//! - Outposts for minor pieces
//! - King safety (attack units, pawn shield and storm)
//!
//! Every term returns a score from white's perspective.

mod helpers;
mod king_safety;
mod mobility;
mod outposts;
pub mod params;
mod pawns;
pub mod tables;
