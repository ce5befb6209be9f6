use super::super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::super::{Bitboard, Board, CastleSide, Color, Move, MoveKind, MoveList, Piece, Square};

impl Board {
    /// Castling moves for the side to move, standard and Chess960 alike.
    ///
    /// The king must not be in check, every square the king or rook travels
    /// over must be empty apart from those two pieces, and no square on the
    /// king's path may be attacked.
    pub(crate) fn generate_castling_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        let opponent = color.opponent();
        let rank = color.back_rank();
        if from.rank() != rank || !self.castling_rights.any() {
            return;
        }

        let mut king_safe: Option<bool> = None;
        for side in CastleSide::BOTH {
            let Some(rook_file) = self.castling_rights.rook_file(color, side) else {
                continue;
            };
            let rook_sq = Square::at(rank, rook_file);
            if !self.pieces(color, Piece::Rook).contains(rook_sq) {
                continue;
            }
            let king_to = Square::at(rank, side.king_dest_file());
            let king_path = Bitboard::rank_span(rank, from.file(), king_to.file());
            let rook_path = Bitboard::rank_span(rank, rook_file, side.rook_dest_file());
            let movers = Bitboard::from_square(from) | Bitboard::from_square(rook_sq);
            if ((king_path | rook_path) & self.all_occupied & !movers).any() {
                continue;
            }
            if !*king_safe.get_or_insert_with(|| !self.is_square_attacked(from, opponent)) {
                return;
            }
            if king_path.iter().any(|sq| self.is_square_attacked(sq, opponent)) {
                continue;
            }
            let kind = match side {
                CastleSide::King => MoveKind::CastleKingside { rook: rook_sq },
                CastleSide::Queen => MoveKind::CastleQueenside { rook: rook_sq },
            };
            moves.push(Move::new(from, king_to, Piece::King, color, None, kind));
        }
    }

    /// True if any piece of `attacker` attacks `square`.
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        let pawns = self.pieces(attacker, Piece::Pawn);
        if (pawn_attacks(attacker.opponent(), square) & pawns).any() {
            return true;
        }
        if (knight_attacks(square) & self.pieces(attacker, Piece::Knight)).any() {
            return true;
        }
        if (king_attacks(square) & self.pieces(attacker, Piece::King)).any() {
            return true;
        }
        let queens = self.pieces(attacker, Piece::Queen);
        let rook_like = self.pieces(attacker, Piece::Rook) | queens;
        if (rook_attacks(square, self.all_occupied) & rook_like).any() {
            return true;
        }
        let bishop_like = self.pieces(attacker, Piece::Bishop) | queens;
        (bishop_attacks(square, self.all_occupied) & bishop_like).any()
    }

    /// Every piece of either color attacking `square` under `occupied`.
    #[must_use]
    pub fn attackers_to(&self, square: Square, occupied: Bitboard) -> Bitboard {
        let rook_like = self.pieces_of_type(Piece::Rook) | self.pieces_of_type(Piece::Queen);
        let bishop_like = self.pieces_of_type(Piece::Bishop) | self.pieces_of_type(Piece::Queen);
        let white_pawns = pawn_attacks(Color::Black, square) & self.pieces(Color::White, Piece::Pawn);
        let black_pawns = pawn_attacks(Color::White, square) & self.pieces(Color::Black, Piece::Pawn);
        (white_pawns
            | black_pawns
            | (knight_attacks(square) & self.pieces_of_type(Piece::Knight))
            | (king_attacks(square) & self.pieces_of_type(Piece::King))
            | (rook_attacks(square, occupied) & rook_like)
            | (bishop_attacks(square, occupied) & bishop_like))
            & occupied
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opponent()))
    }

    /// The side to move is in check
    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_in_check(self.side_to_move)
    }
}
