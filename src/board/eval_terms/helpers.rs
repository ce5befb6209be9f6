//! Helper methods for evaluation.

use crate::board::attack_tables::{king_attacks, pawn_attacks};
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Piece};

/// Squares attacked by each side, computed once per evaluation and shared
/// by the mobility and king safety terms.
#[derive(Debug, Clone, Copy)]
pub struct AttackContext {
    pub white_attacks: Bitboard,
    pub black_attacks: Bitboard,
}

impl AttackContext {
    #[inline]
    pub fn all_attacks(&self, color: Color) -> Bitboard {
        match color {
            Color::White => self.white_attacks,
            Color::Black => self.black_attacks,
        }
    }
}

impl Board {
    /// Every square a piece of `color` attacks under the current occupancy.
    #[must_use]
    pub fn attack_map(&self, color: Color) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for sq in self.pieces(color, Piece::Pawn) {
            attacks |= pawn_attacks(color, sq);
        }
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            for sq in self.pieces(color, piece) {
                attacks |= Board::attacks_from(piece, color, sq, self.all_occupied);
            }
        }
        if let Some(king) = self.king_square(color) {
            attacks |= king_attacks(king);
        }
        attacks
    }

    #[must_use]
    pub fn compute_attack_context(&self) -> AttackContext {
        AttackContext {
            white_attacks: self.attack_map(Color::White),
            black_attacks: self.attack_map(Color::Black),
        }
    }
}
