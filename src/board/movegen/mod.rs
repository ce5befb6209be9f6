mod kings;
mod pawns;
mod pieces;

use super::{Board, Move, MoveList, Piece};

impl Board {
    fn generate_pseudo_moves_into(&self, moves: &mut MoveList, tactical_only: bool) {
        let color = self.side_to_move;
        for from in self.pieces(color, Piece::Pawn) {
            self.generate_pawn_moves(from, moves, tactical_only);
        }
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            for from in self.pieces(color, piece) {
                self.generate_piece_moves(from, piece, moves, tactical_only);
            }
        }
        if !tactical_only {
            if let Some(king) = self.king_square(color) {
                self.generate_castling_moves(king, moves);
            }
        }
    }

    /// Moves that obey piece movement rules but may leave the king in check.
    #[must_use]
    pub fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pseudo_moves_into(&mut moves, false);
        moves
    }

    /// Keep the moves that do not leave the mover's king attacked.
    fn retain_legal(&mut self, pseudo: MoveList) -> MoveList {
        let color = self.side_to_move;
        let mut legal = MoveList::new();
        for m in pseudo {
            let info = self.make_move(m);
            if !self.is_in_check(color) {
                legal.push(m);
            }
            self.unmake_move(m, info);
        }
        legal
    }

    /// All legal moves for the side to move.
    pub fn generate_moves(&mut self) -> MoveList {
        let pseudo = self.generate_pseudo_moves();
        self.retain_legal(pseudo)
    }

    /// Legal captures (en passant included) and promotions.
    pub fn generate_tactical_moves(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_moves_into(&mut pseudo, true);
        self.retain_legal(pseudo)
    }

    /// Whether `m` is legal here. Used to re-validate moves coming from
    /// shared tables or external providers.
    pub fn is_legal(&mut self, m: Move) -> bool {
        self.generate_moves().contains(&m)
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && self.generate_moves().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && self.generate_moves().is_empty()
    }
}
