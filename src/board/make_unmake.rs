use crate::zobrist::ZOBRIST;

use super::{
    Board, CastleSide, CastlingRights, Color, Move, MoveKind, NullMoveInfo, Piece, Square,
    UnmakeInfo,
};

/// Square of the pawn removed by an en passant capture
#[inline]
fn en_passant_victim(m: Move) -> Square {
    m.to().with_rank(m.from().rank())
}

/// Rook start and destination squares for a castling move
#[inline]
fn castling_rook_squares(m: Move) -> (CastleSide, Square, Square) {
    let (side, rook) = match m.kind() {
        MoveKind::CastleKingside { rook } => (CastleSide::King, rook),
        MoveKind::CastleQueenside { rook } => (CastleSide::Queen, rook),
        _ => unreachable!("castling_rook_squares on a non-castling move"),
    };
    (side, rook, rook.with_file(side.rook_dest_file()))
}

impl Board {
    /// Remove every castling right tied to `sq` (a rook start square).
    fn clear_rights_on(rights: &mut CastlingRights, sq: Square) {
        for color in Color::BOTH {
            if sq.rank() != color.back_rank() {
                continue;
            }
            for side in CastleSide::BOTH {
                if rights.rook_file(color, side) == Some(sq.file()) {
                    rights.remove(color, side);
                }
            }
        }
    }

    fn castling_hash(rights: CastlingRights) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if rights.has(color, side) {
                    hash ^= ZOBRIST.castling(color, side);
                }
            }
        }
        hash
    }

    #[inline]
    fn toggle(&mut self, sq: Square, color: Color, piece: Piece) {
        self.hash ^= ZOBRIST.piece(piece, color, sq);
        if piece == Piece::Pawn {
            self.pawn_hash ^= ZOBRIST.piece(Piece::Pawn, color, sq);
        }
    }

    /// Play `m` on the board and return what is needed to take it back.
    ///
    /// # Panics
    ///
    /// Panics if the moving piece is not on the source square, which means
    /// the move was not generated for this position.
    pub fn make_move(&mut self, m: Move) -> UnmakeInfo {
        let color = m.color();
        let piece = m.piece();
        assert!(
            color == self.side_to_move && self.pieces(color, piece).contains(m.from()),
            "make_move: no {color} {piece} on {} for {m:?}",
            m.from()
        );

        let info = UnmakeInfo {
            previous_en_passant_target: self.en_passant_target,
            previous_castling_rights: self.castling_rights,
            previous_hash: self.hash,
            previous_pawn_hash: self.pawn_hash,
            previous_halfmove_clock: self.halfmove_clock,
            previous_fullmove_number: self.fullmove_number,
        };
        let opponent = color.opponent();

        self.hash ^= ZOBRIST.black_to_move_key;
        if let Some(ep) = self.en_passant_target.take() {
            self.hash ^= ZOBRIST.en_passant(ep);
        }

        let mut rights = self.castling_rights;

        if m.is_castling() {
            let (side, rook_from, rook_to) = castling_rook_squares(m);
            debug_assert_eq!(m.to().file(), side.king_dest_file());
            assert!(
                self.pieces(color, Piece::Rook).contains(rook_from),
                "make_move: castling rook missing on {rook_from}"
            );
            // King and rook may trade squares in Chess960, so lift both first
            self.remove_piece(m.from(), color, Piece::King);
            self.remove_piece(rook_from, color, Piece::Rook);
            self.set_piece(m.to(), color, Piece::King);
            self.set_piece(rook_to, color, Piece::Rook);
            self.toggle(m.from(), color, Piece::King);
            self.toggle(m.to(), color, Piece::King);
            self.toggle(rook_from, color, Piece::Rook);
            self.toggle(rook_to, color, Piece::Rook);
        } else {
            if let Some(captured) = m.captured() {
                let victim_sq = if m.is_en_passant() {
                    en_passant_victim(m)
                } else {
                    m.to()
                };
                assert!(
                    self.pieces(opponent, captured).contains(victim_sq),
                    "make_move: no {opponent} {captured} to capture on {victim_sq}"
                );
                self.remove_piece(victim_sq, opponent, captured);
                self.toggle(victim_sq, opponent, captured);
                Board::clear_rights_on(&mut rights, victim_sq);
            }

            let placed = m.promotion().unwrap_or(piece);
            self.remove_piece(m.from(), color, piece);
            self.set_piece(m.to(), color, placed);
            self.toggle(m.from(), color, piece);
            self.toggle(m.to(), color, placed);

            if m.is_double_pawn_push() {
                let ep = m.from().with_rank((m.from().rank() + m.to().rank()) / 2);
                self.en_passant_target = Some(ep);
                self.hash ^= ZOBRIST.en_passant(ep);
            }
        }

        if piece == Piece::King {
            rights.remove(color, CastleSide::King);
            rights.remove(color, CastleSide::Queen);
        } else {
            Board::clear_rights_on(&mut rights, m.from());
        }
        if rights != self.castling_rights {
            self.hash ^= Board::castling_hash(self.castling_rights) ^ Board::castling_hash(rights);
            self.castling_rights = rights;
        }

        if piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = opponent;
        self.history.push(self.hash);

        info
    }

    /// Take back `m`, which must be the last move made.
    pub fn unmake_move(&mut self, m: Move, info: UnmakeInfo) {
        let color = m.color();
        self.history.pop();
        self.side_to_move = color;
        self.en_passant_target = info.previous_en_passant_target;
        self.castling_rights = info.previous_castling_rights;
        self.hash = info.previous_hash;
        self.pawn_hash = info.previous_pawn_hash;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.fullmove_number = info.previous_fullmove_number;

        if m.is_castling() {
            let (_, rook_from, rook_to) = castling_rook_squares(m);
            self.remove_piece(m.to(), color, Piece::King);
            self.remove_piece(rook_to, color, Piece::Rook);
            self.set_piece(m.from(), color, Piece::King);
            self.set_piece(rook_from, color, Piece::Rook);
            return;
        }

        let placed = m.promotion().unwrap_or(m.piece());
        self.remove_piece(m.to(), color, placed);
        self.set_piece(m.from(), color, m.piece());
        if let Some(captured) = m.captured() {
            let victim_sq = if m.is_en_passant() {
                en_passant_victim(m)
            } else {
                m.to()
            };
            self.set_piece(victim_sq, color.opponent(), captured);
        }
    }

    /// Pass the turn: flip the side to move and clear the en passant target.
    pub fn make_null_move(&mut self) -> NullMoveInfo {
        let info = NullMoveInfo {
            previous_en_passant_target: self.en_passant_target,
            previous_hash: self.hash,
        };
        self.hash ^= ZOBRIST.black_to_move_key;
        if let Some(ep) = self.en_passant_target.take() {
            self.hash ^= ZOBRIST.en_passant(ep);
        }
        self.side_to_move = self.side_to_move.opponent();
        info
    }

    pub fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.side_to_move = self.side_to_move.opponent();
        self.en_passant_target = info.previous_en_passant_target;
        self.hash = info.previous_hash;
    }
}
