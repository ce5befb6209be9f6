//! Pawn structure evaluation.
//!
//! Doubled, isolated and backward penalties plus a passed pawn bonus that
//! grows with advancement. The result only depends on pawn placement, which
//! is what makes it cacheable by pawn hash.

use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Piece, Square};

use super::params::EvalParams;
use super::tables::PASSED_PAWN_BONUS;

impl Board {
    /// Pawn structure score from white's perspective.
    #[must_use]
    pub fn eval_pawn_structure(&self, params: &EvalParams) -> i32 {
        let mut score = 0;
        for color in Color::BOTH {
            let mut side = 0;
            for sq in self.pieces(color, Piece::Pawn) {
                side += self.pawn_term(sq, color, params);
            }
            score += color.sign() * side;
        }
        score
    }

    fn pawn_term(&self, sq: Square, color: Color, params: &EvalParams) -> i32 {
        let own = self.pieces(color, Piece::Pawn);
        let mut score = 0;

        // Doubled: a friendly pawn directly in front
        let front_rank = match color {
            Color::White => sq.rank() + 1,
            Color::Black => sq.rank().wrapping_sub(1),
        };
        if front_rank < 8 && own.contains(sq.with_rank(front_rank)) {
            score -= params.doubled_pawn_penalty;
        }

        let neighbours = own & Bitboard::adjacent_files(sq.file());
        if neighbours.is_empty() {
            score -= params.isolated_pawn_penalty;
        } else if (neighbours & Bitboard::ranks_ahead(sq.rank(), color == Color::Black)).is_empty()
        {
            // Backward: no neighbour stands behind to support an advance
            score -= params.backward_pawn_penalty;
        }

        if self.is_passed_pawn(sq, color) {
            score += PASSED_PAWN_BONUS[color.relative_rank(sq.rank())];
        }
        score
    }

    /// No enemy pawn on this or an adjacent file stands ahead of the pawn.
    #[must_use]
    pub fn is_passed_pawn(&self, sq: Square, color: Color) -> bool {
        let files = Bitboard::file_mask(sq.file()) | Bitboard::adjacent_files(sq.file());
        let ahead = Bitboard::ranks_ahead(sq.rank(), color == Color::White);
        (self.pieces(color.opponent(), Piece::Pawn) & files & ahead).is_empty()
    }
}
