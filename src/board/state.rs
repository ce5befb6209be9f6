use crate::zobrist::ZOBRIST;

use super::{Bitboard, CastleSide, CastlingRights, Color, Piece, Square};

/// Snapshot returned by `make_move`, required to undo it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnmakeInfo {
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_castling_rights: CastlingRights,
    pub(crate) previous_hash: u64,
    pub(crate) previous_pawn_hash: u64,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_fullmove_number: u32,
}

/// Snapshot returned by `make_null_move`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullMoveInfo {
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_hash: u64,
}

/// Bitboard position with incremental Zobrist hashing.
///
/// Invariants: the two color masks never overlap, the union of the per-piece
/// masks equals the union of the color masks, and each color has one king.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) pawn_hash: u64,
    /// Hash after every move made since the position was loaded
    pub(crate) history: Vec<u64>,
}

impl Board {
    /// The standard starting position
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            board.set_piece(Square::at(0, file), Color::White, *piece);
            board.set_piece(Square::at(7, file), Color::Black, *piece);
            board.set_piece(Square::at(1, file), Color::White, Piece::Pawn);
            board.set_piece(Square::at(6, file), Color::Black, Piece::Pawn);
        }
        board.castling_rights = CastlingRights::all();
        board.refresh_hashes();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            en_passant_target: None,
            castling_rights: CastlingRights::none(),
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            pawn_hash: 0,
            history: Vec::new(),
        }
    }

    /// Recompute both hashes from scratch and reset the move history.
    pub(crate) fn refresh_hashes(&mut self) {
        self.hash = self.calculate_initial_hash();
        self.pawn_hash = self.calculate_pawn_hash();
        self.history.clear();
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Zobrist key over pawns only
    #[inline]
    #[must_use]
    pub fn pawn_hash(&self) -> u64 {
        self.pawn_hash
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Hashes recorded for every move made since load
    #[must_use]
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Pieces of one type, both colors
    #[inline]
    #[must_use]
    pub fn pieces_of_type(&self, piece: Piece) -> Bitboard {
        self.pieces[0][piece.index()] | self.pieces[1][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = !Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] &= bit;
        self.occupied[color.index()] &= bit;
        self.all_occupied &= bit;
    }

    /// Color and type of the piece on `sq`, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        if !self.all_occupied.contains(sq) {
            return None;
        }
        let color = if self.occupied[0].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[color.index()][p.index()].contains(sq))
            .map(|p| (color, p))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        !self.all_occupied.contains(sq)
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).lsb()
    }

    pub(crate) fn calculate_initial_hash(&self) -> u64 {
        let mut hash: u64 = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece) {
                    hash ^= ZOBRIST.piece(piece, color, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if self.castling_rights.has(color, side) {
                    hash ^= ZOBRIST.castling(color, side);
                }
            }
        }
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    pub(crate) fn calculate_pawn_hash(&self) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for sq in self.pieces(color, Piece::Pawn) {
                hash ^= ZOBRIST.piece(Piece::Pawn, color, sq);
            }
        }
        hash
    }

    /// Fifty-move rule: 100 half-moves without a pawn move or capture
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// The current hash appears at least twice in the move history
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        self.history
            .iter()
            .rev()
            .filter(|&&h| h == self.hash)
            .nth(1)
            .is_some()
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_repetition()
    }

    /// Check the structural invariants of the bitboards.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if (self.occupied[0] & self.occupied[1]).any() {
            return false;
        }
        for color in Color::BOTH {
            let union = Piece::ALL
                .iter()
                .fold(Bitboard::EMPTY, |acc, p| acc | self.pieces(color, *p));
            if union != self.occupied_by(color) {
                return false;
            }
            if self.pieces(color, Piece::King).popcount() != 1 {
                return false;
            }
        }
        self.all_occupied == (self.occupied[0] | self.occupied[1])
            && self.hash == self.calculate_initial_hash()
            && self.pawn_hash == self.calculate_pawn_hash()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
