use super::super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use super::super::{Bitboard, Board, Color, Move, MoveKind, MoveList, Piece, Square};

impl Board {
    /// Squares a `piece` of `color` on `sq` attacks with the given occupancy.
    #[inline]
    #[must_use]
    pub fn attacks_from(piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        match piece {
            Piece::Pawn => pawn_attacks(color, sq),
            Piece::Knight => knight_attacks(sq),
            Piece::Bishop => bishop_attacks(sq, occupied),
            Piece::Rook => rook_attacks(sq, occupied),
            Piece::Queen => queen_attacks(sq, occupied),
            Piece::King => king_attacks(sq),
        }
    }

    /// Non-pawn, non-castling moves of `piece` from `from`.
    pub(crate) fn generate_piece_moves(
        &self,
        from: Square,
        piece: Piece,
        moves: &mut MoveList,
        tactical_only: bool,
    ) {
        let color = self.side_to_move;
        let mut targets =
            Board::attacks_from(piece, color, from, self.all_occupied) & !self.occupied_by(color);
        if tactical_only {
            targets &= self.occupied_by(color.opponent());
        }
        for to in targets {
            let captured = self.piece_at(to).map(|(_, p)| p);
            let kind = if captured.is_some() {
                MoveKind::Capture
            } else {
                MoveKind::Quiet
            };
            moves.push(Move::new(from, to, piece, color, captured, kind));
        }
    }
}
