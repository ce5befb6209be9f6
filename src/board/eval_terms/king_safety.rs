//! King safety evaluation.
//!
//! Attack units for enemy pieces bearing on the squares around the king,
//! plus a pawn shield and pawn storm term on the king's file and its
//! neighbours.

use crate::board::attack_tables::{bishop_attacks, king_attacks, knight_attacks, rook_attacks};
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Piece, Square};

use super::params::EvalParams;
use super::tables::{
    DIAGONAL_ATTACK_UNITS, KING_SAFETY_TABLE, KNIGHT_ATTACK_UNITS, ROOK_LINE_ATTACK_UNITS,
};

impl Board {
    /// King safety for both sides, from white's perspective.
    #[must_use]
    pub fn eval_king_safety(&self, params: &EvalParams) -> i32 {
        Color::BOTH
            .iter()
            .filter_map(|&color| {
                self.king_square(color)
                    .map(|king| color.sign() * self.king_safety_for(king, color, params))
            })
            .sum()
    }

    /// Safety of `color`'s king on `king`; negative is dangerous.
    fn king_safety_for(&self, king: Square, color: Color, params: &EvalParams) -> i32 {
        let zone = king_attacks(king);
        let mut score = self.king_attackers_score(zone, color.opponent());

        let lo = king.file().saturating_sub(1);
        let hi = (king.file() + 1).min(7);
        for file in lo..=hi {
            score += self.pawn_shield(king, file, color, params);
            score += self.pawn_storm(king, file, color, params);
        }
        score
    }

    fn king_attackers_score(&self, zone: Bitboard, attacker: Color) -> i32 {
        let occupied = self.all_occupied;
        let queens = self.pieces(attacker, Piece::Queen);
        let mut units = 0;
        let mut count = 0;

        for sq in self.pieces(attacker, Piece::Knight) {
            if (knight_attacks(sq) & zone).any() {
                units += KNIGHT_ATTACK_UNITS;
                count += 1;
            }
        }
        // Queens are counted on both lines
        for sq in self.pieces(attacker, Piece::Rook) | queens {
            if (rook_attacks(sq, occupied) & zone).any() {
                units += ROOK_LINE_ATTACK_UNITS;
                count += 1;
            }
        }
        for sq in self.pieces(attacker, Piece::Bishop) | queens {
            if (bishop_attacks(sq, occupied) & zone).any() {
                units += DIAGONAL_ATTACK_UNITS;
                count += 1;
            }
        }

        if count > 1 {
            -KING_SAFETY_TABLE[(units as usize).min(KING_SAFETY_TABLE.len() - 1)]
        } else {
            0
        }
    }

    /// Full bonus for a friendly pawn one rank in front of the king on
    /// `file`, half for one two ranks in front.
    fn pawn_shield(&self, king: Square, file: usize, color: Color, params: &EvalParams) -> i32 {
        let pawns = self.pieces(color, Piece::Pawn);
        let ahead = |steps: usize| match color {
            Color::White => Some(king.rank() + steps).filter(|&r| r < 8),
            Color::Black => king.rank().checked_sub(steps),
        };
        let has_pawn = |steps| ahead(steps).is_some_and(|rank| pawns.contains(Square::at(rank, file)));

        if has_pawn(1) {
            params.shield_bonus
        } else if has_pawn(2) {
            params.shield_bonus / 2
        } else {
            0
        }
    }

    /// Penalty for the nearest enemy pawn on `file`, sharper the closer it
    /// has come to the king's rank.
    fn pawn_storm(&self, king: Square, file: usize, color: Color, params: &EvalParams) -> i32 {
        let enemy = self.pieces(color.opponent(), Piece::Pawn) & Bitboard::file_mask(file);
        let nearest = match color {
            Color::White => enemy.lsb(),
            Color::Black => enemy.msb(),
        };
        match nearest {
            Some(sq) => {
                let dist = sq.rank().abs_diff(king.rank()) as i32;
                if dist > 0 {
                    -(params.pawn_storm_penalty / dist)
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}
