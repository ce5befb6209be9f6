//! Static Exchange Evaluation (SEE).
//!
//! Evaluates capture sequences on a single square to determine
//! if a capture is winning, losing, or equal.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::state::Board;
use super::types::{Bitboard, Color, Move, Piece};

/// Longest exchange we track; 32 pieces bounds it.
const MAX_EXCHANGE: usize = 32;

impl Board {
    /// Static Exchange Evaluation for a move.
    ///
    /// Returns the material balance after all exchanges on the target
    /// square, from the point of view of the side making `m`. Positive is
    /// winning, negative is losing. Quiet moves score what the opponent can
    /// win by capturing the moved piece, so a hanging quiet move is negative.
    #[must_use]
    pub fn see(&self, m: Move) -> i32 {
        let to = m.to();
        let mut gain = [0i32; MAX_EXCHANGE];
        let mut depth = 0;

        let mut on_square = m.promotion().unwrap_or(m.piece());
        gain[0] = m.captured().map_or(0, Piece::value);
        if let Some(promo) = m.promotion() {
            gain[0] += promo.value() - Piece::Pawn.value();
        }

        let mut occupancy = self.all_occupied;
        if m.is_en_passant() {
            occupancy ^= Bitboard::from_square(to.with_rank(m.from().rank()));
        }
        let mut from_bb = Bitboard::from_square(m.from());
        let mut attackers = self.attackers_to(to, occupancy);
        let mut side = m.color();

        let rook_like = self.pieces_of_type(Piece::Rook) | self.pieces_of_type(Piece::Queen);
        let bishop_like = self.pieces_of_type(Piece::Bishop) | self.pieces_of_type(Piece::Queen);

        loop {
            occupancy ^= from_bb;
            attackers &= !from_bb;
            // Removing a piece can uncover a slider behind it
            attackers |= ((rook_attacks(to, occupancy) & rook_like)
                | (bishop_attacks(to, occupancy) & bishop_like))
                & occupancy;

            side = side.opponent();
            let side_attackers = attackers & self.occupied_by(side);
            if side_attackers.is_empty() {
                break;
            }

            let (lva, lva_bb) = self.least_valuable_attacker(side_attackers, side);
            if lva == Piece::King && (attackers & self.occupied_by(side.opponent())).any() {
                // The king may not capture into a defended square
                break;
            }

            depth += 1;
            if depth >= MAX_EXCHANGE {
                depth -= 1;
                break;
            }
            gain[depth] = on_square.value() - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            on_square = lva;
            from_bb = lva_bb;
        }

        while depth > 0 {
            depth -= 1;
            gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
        }

        gain[0]
    }

    /// The cheapest piece of `color` in `attackers`, as a single-square set.
    fn least_valuable_attacker(&self, attackers: Bitboard, color: Color) -> (Piece, Bitboard) {
        for piece in Piece::ALL {
            if let Some(sq) = (attackers & self.pieces(color, piece)).lsb() {
                return (piece, Bitboard::from_square(sq));
            }
        }
        unreachable!("least_valuable_attacker called with no attackers of {color}")
    }

    /// True when the exchange started by `m` nets at least `threshold`.
    #[inline]
    #[must_use]
    pub fn see_ge(&self, m: Move, threshold: i32) -> bool {
        self.see(m) >= threshold
    }
}
