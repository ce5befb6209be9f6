use super::super::attack_tables::pawn_attacks;
use super::super::types::PROMOTION_PIECES;
use super::super::{Board, Color, Move, MoveKind, MoveList, Piece, Square};

impl Board {
    fn push_pawn_move(
        from: Square,
        to: Square,
        color: Color,
        captured: Option<Piece>,
        moves: &mut MoveList,
    ) {
        if color.relative_rank(to.rank()) == 7 {
            for promo in PROMOTION_PIECES {
                moves.push(Move::new(
                    from,
                    to,
                    Piece::Pawn,
                    color,
                    captured,
                    MoveKind::Promotion(promo),
                ));
            }
        } else {
            let kind = if captured.is_some() {
                MoveKind::Capture
            } else {
                MoveKind::Quiet
            };
            moves.push(Move::new(from, to, Piece::Pawn, color, captured, kind));
        }
    }

    /// Pawn moves from `from`. With `tactical_only`, quiet pushes are
    /// skipped but push-promotions are kept.
    pub(crate) fn generate_pawn_moves(&self, from: Square, moves: &mut MoveList, tactical_only: bool) {
        let color = self.side_to_move;
        let opponent = color.opponent();
        let forward: isize = if color == Color::White { 8 } else { -8 };
        let rel_rank = color.relative_rank(from.rank());

        // A pawn on its last rank cannot exist, so one step forward is on the board
        let one = Square::from_index((from.index() as isize + forward) as usize);
        if self.is_empty(one) {
            if !tactical_only || rel_rank == 6 {
                Board::push_pawn_move(from, one, color, None, moves);
            }
            if !tactical_only && rel_rank == 1 {
                let two = Square::from_index((one.index() as isize + forward) as usize);
                if self.is_empty(two) {
                    moves.push(Move::new(
                        from,
                        two,
                        Piece::Pawn,
                        color,
                        None,
                        MoveKind::DoublePawnPush,
                    ));
                }
            }
        }

        let attacks = pawn_attacks(color, from);
        for to in attacks & self.occupied_by(opponent) {
            let captured = self.piece_at(to).map(|(_, p)| p);
            Board::push_pawn_move(from, to, color, captured, moves);
        }

        if let Some(ep) = self.en_passant_target {
            let victim = ep.with_rank(from.rank());
            if attacks.contains(ep) && self.pieces(opponent, Piece::Pawn).contains(victim) {
                moves.push(Move::new(
                    from,
                    ep,
                    Piece::Pawn,
                    color,
                    Some(Piece::Pawn),
                    MoveKind::EnPassant,
                ));
            }
        }
    }
}
