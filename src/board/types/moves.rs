//! Move types and move lists.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Color, Piece};
use super::square::Square;

/// What kind of move this is. Castling carries the originating rook square
/// because Chess960 rook files are not derivable from color and side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    Quiet,
    Capture,
    DoublePawnPush,
    EnPassant,
    /// Promotion to the given piece; a capturing promotion also has `captured` set.
    Promotion(Piece),
    CastleKingside { rook: Square },
    CastleQueenside { rook: Square },
}

/// A fully described move: squares, mover, victim and kind.
///
/// Castling moves go from the king square to the king's destination
/// (g- or c-file); the rook's start square rides in the kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    color: Color,
    captured: Option<Piece>,
    kind: MoveKind,
}

impl Move {
    #[inline]
    #[must_use]
    pub(crate) const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        color: Color,
        captured: Option<Piece>,
        kind: MoveKind,
    ) -> Self {
        Move {
            from,
            to,
            piece,
            color,
            captured,
            kind,
        }
    }

    /// Create a null/empty move (used as a sentinel in tables)
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move::new(Square::A1, Square::A1, Piece::Pawn, Color::White, None, MoveKind::Quiet)
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The moving piece (a pawn for promotions)
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    /// The captured piece; its color is always the mover's opponent
    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_null(self) -> bool {
        self == EMPTY_MOVE
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside { .. } | MoveKind::CastleQueenside { .. }
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        matches!(self.kind, MoveKind::DoublePawnPush)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(p) => Some(p),
            _ => None,
        }
    }

    /// Rook start square for castling moves
    #[inline]
    #[must_use]
    pub const fn castling_rook(self) -> Option<Square> {
        match self.kind {
            MoveKind::CastleKingside { rook } | MoveKind::CastleQueenside { rook } => Some(rook),
            _ => None,
        }
    }

    /// Not a capture and not a promotion
    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Returns true if this move is tactical (capture or promotion)
    #[inline]
    #[must_use]
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// 12-bit `from | to << 6` encoding used for compact storage.
    ///
    /// Lossy: promotion piece and castling rook are not represented.
    #[inline]
    #[must_use]
    pub const fn packed(self) -> u16 {
        (self.from.0 as u16) | ((self.to.0 as u16) << 6)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({}{} {}{}",
            self.from,
            self.to,
            self.color,
            self.piece.to_char()
        )?;
        if let Some(promo) = self.promotion() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if let Some(victim) = self.captured {
            write!(f, " x{}", victim.to_char())?;
        }
        if let Some(rook) = self.castling_rook() {
            write!(f, " castle r{rook}")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

/// Coordinate notation, e.g. `e2e4`, `e7e8q`, `e1g1`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub const MAX_PLY: usize = 128;
pub(crate) const EMPTY_MOVE: Move = Move::null();

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    /// Remove the move at `idx` by swapping in the last move.
    #[inline]
    pub(crate) fn swap_remove(&mut self, idx: usize) {
        self.len -= 1;
        self.moves[idx] = self.moves[self.len];
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.as_slice().get(idx).copied()
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.get(0)
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }

    /// First move whose packed from/to encoding equals `packed`.
    #[must_use]
    pub fn find_packed(&self, packed: u16) -> Option<Move> {
        self.iter().copied().find(|m| m.packed() == packed)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves to avoid heap allocation.
#[derive(Clone, Debug)]
pub struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: EMPTY_MOVE,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    /// Incremental selection sort: swap the best move from `start` onwards into
    /// position `start` and return it. Ties keep generation order.
    #[inline]
    pub fn pick_best(&mut self, start: usize) -> Option<ScoredMove> {
        if start >= self.len {
            return None;
        }
        let mut best_idx = start;
        let mut best_score = self.moves[start].score;
        for i in (start + 1)..self.len {
            if self.moves[i].score > best_score {
                best_score = self.moves[i].score;
                best_idx = i;
            }
        }
        if best_idx != start {
            self.moves.swap(start, best_idx);
        }
        Some(self.moves[start])
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_move_display_promotion() {
        let mv = Move::new(
            sq("e7"),
            sq("e8"),
            Piece::Pawn,
            Color::White,
            None,
            MoveKind::Promotion(Piece::Queen),
        );
        assert_eq!(mv.to_string(), "e7e8q");
        assert!(mv.is_promotion());
        assert!(!mv.is_quiet());
    }

    #[test]
    fn test_packed_drops_promotion_piece() {
        let queen = Move::new(
            sq("a7"),
            sq("a8"),
            Piece::Pawn,
            Color::White,
            None,
            MoveKind::Promotion(Piece::Queen),
        );
        let knight = Move::new(
            sq("a7"),
            sq("a8"),
            Piece::Pawn,
            Color::White,
            None,
            MoveKind::Promotion(Piece::Knight),
        );
        assert_eq!(queen.packed(), knight.packed());
        assert_ne!(queen, knight);
    }

    #[test]
    fn test_castling_carries_rook() {
        let mv = Move::new(
            Square::E1,
            sq("g1"),
            Piece::King,
            Color::White,
            None,
            MoveKind::CastleKingside { rook: Square::H1 },
        );
        assert!(mv.is_castling());
        assert_eq!(mv.castling_rook(), Some(Square::H1));
        assert_eq!(mv.to_string(), "e1g1");
    }

    #[test]
    fn test_null_move_sentinel() {
        assert!(EMPTY_MOVE.is_null());
        assert!(Move::null().is_null());
    }

    #[test]
    fn test_pick_best_orders_descending() {
        let mut list = ScoredMoveList::new();
        let a = Move::new(sq("a2"), sq("a3"), Piece::Pawn, Color::White, None, MoveKind::Quiet);
        let b = Move::new(sq("b2"), sq("b3"), Piece::Pawn, Color::White, None, MoveKind::Quiet);
        let c = Move::new(sq("c2"), sq("c3"), Piece::Pawn, Color::White, None, MoveKind::Quiet);
        list.push(a, 5);
        list.push(b, 50);
        list.push(c, 20);
        assert_eq!(list.pick_best(0).map(|s| s.mv), Some(b));
        assert_eq!(list.pick_best(1).map(|s| s.mv), Some(c));
        assert_eq!(list.pick_best(2).map(|s| s.mv), Some(a));
        assert!(list.pick_best(3).is_none());
    }
}
