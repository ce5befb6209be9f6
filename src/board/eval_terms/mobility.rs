//! Mobility evaluation.
//!
//! Counts the squares each knight, bishop, rook and queen attacks that are
//! neither occupied by a friendly piece nor attacked by the opponent.

use crate::board::state::Board;
use crate::board::types::{Color, Piece};

use super::helpers::AttackContext;
use super::params::EvalParams;

impl Board {
    /// Evaluate mobility for all pieces, from white's perspective.
    #[must_use]
    pub fn eval_mobility(&self, params: &EvalParams) -> i32 {
        let ctx = self.compute_attack_context();
        self.eval_mobility_with_context(&ctx, params)
    }

    /// Evaluate mobility using pre-computed attack context.
    #[must_use]
    pub fn eval_mobility_with_context(&self, ctx: &AttackContext, params: &EvalParams) -> i32 {
        let mut score = 0;
        for color in Color::BOTH {
            let unsafe_squares = ctx.all_attacks(color.opponent()) | self.occupied_by(color);
            for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                for sq in self.pieces(color, piece) {
                    let safe = Board::attacks_from(piece, color, sq, self.all_occupied)
                        & !unsafe_squares;
                    score += color.sign() * safe.popcount() as i32 * params.mobility_bonus(piece);
                }
            }
        }
        score
    }
}
