//! Minor piece outposts.

use crate::board::attack_tables::pawn_attacks;
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Piece, Square};

use super::params::EvalParams;

impl Board {
    /// Outpost bonus for knights and bishops, from white's perspective.
    ///
    /// An outpost is a square on relative ranks 4-6, defended by a friendly
    /// pawn, that no enemy pawn can ever attack. The bonus grows by one step
    /// per rank.
    #[must_use]
    pub fn eval_outposts(&self, params: &EvalParams) -> i32 {
        let mut score = 0;
        for color in Color::BOTH {
            for (piece, bonus) in [
                (Piece::Knight, params.knight_outpost_bonus),
                (Piece::Bishop, params.bishop_outpost_bonus),
            ] {
                for sq in self.pieces(color, piece) {
                    score += color.sign() * bonus * self.outpost_multiplier(sq, color);
                }
            }
        }
        score
    }

    fn outpost_multiplier(&self, sq: Square, color: Color) -> i32 {
        let relative = color.relative_rank(sq.rank());
        if !(3..=5).contains(&relative) {
            return 0;
        }
        // Friendly pawns that could capture onto `sq` defend it
        let supported = (pawn_attacks(color.opponent(), sq) & self.pieces(color, Piece::Pawn)).any();
        let enemy_can_attack = (Bitboard::adjacent_files(sq.file())
            & Bitboard::ranks_ahead(sq.rank(), color == Color::White)
            & self.pieces(color.opponent(), Piece::Pawn))
        .any();
        if supported && !enemy_can_attack {
            relative as i32 - 2
        } else {
            0
        }
    }
}
