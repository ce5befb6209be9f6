//! Bitboard type and operations.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use super::square::Square;

/// A 64-bit set of squares, bit `n` is square index `n` (a1=0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);
    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    pub const EMPTY: Bitboard = Bitboard(0);

    /// Light squares (b1, d1, ..., a2, c2, ...)
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);
    /// Dark squares (a1, c1, ..., b2, d2, ...)
    pub const DARK_SQUARES: Bitboard = Bitboard(0xAA55_AA55_AA55_AA55);

    /// Create a bitboard with a single square set
    #[inline]
    #[must_use]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bit())
    }

    /// Returns an iterator over the squares set in this bitboard, lowest first
    #[inline]
    #[must_use]
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self.0)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    /// Returns the number of set bits (population count)
    #[inline]
    #[must_use]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set
    #[inline]
    #[must_use]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bit() != 0
    }

    /// Lowest set square, if any
    #[inline]
    #[must_use]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square(self.0.trailing_zeros() as u8))
        }
    }

    /// Highest set square, if any
    #[inline]
    #[must_use]
    pub const fn msb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square(63 - self.0.leading_zeros() as u8))
        }
    }

    /// Shift all bits north (toward rank 8)
    #[inline]
    #[must_use]
    pub const fn shift_north(self) -> Self {
        Bitboard(self.0 << 8)
    }

    /// Shift all bits south (toward rank 1)
    #[inline]
    #[must_use]
    pub const fn shift_south(self) -> Self {
        Bitboard(self.0 >> 8)
    }

    /// Get the file mask for a given file index (0-7)
    #[inline]
    #[must_use]
    pub const fn file_mask(file: usize) -> Self {
        Bitboard(Self::FILE_A.0 << file)
    }

    /// Get the rank mask for a given rank index (0-7)
    #[inline]
    #[must_use]
    pub const fn rank_mask(rank: usize) -> Self {
        Bitboard(Self::RANK_1.0 << (rank * 8))
    }

    /// Files adjacent to `file`, not including it.
    #[inline]
    #[must_use]
    pub const fn adjacent_files(file: usize) -> Self {
        let mut mask = 0u64;
        if file > 0 {
            mask |= Self::FILE_A.0 << (file - 1);
        }
        if file < 7 {
            mask |= Self::FILE_A.0 << (file + 1);
        }
        Bitboard(mask)
    }

    /// Ranks strictly ahead of `rank` from white's (`white`) or black's point of view.
    #[inline]
    #[must_use]
    pub const fn ranks_ahead(rank: usize, white: bool) -> Self {
        if white {
            if rank >= 7 {
                Bitboard(0)
            } else {
                Bitboard(!0u64 << ((rank + 1) * 8))
            }
        } else if rank == 0 {
            Bitboard(0)
        } else {
            Bitboard(!0u64 >> ((8 - rank) * 8))
        }
    }

    /// Squares on the same rank between two files, inclusive on both ends.
    #[must_use]
    pub fn rank_span(rank: usize, file_a: usize, file_b: usize) -> Self {
        let (lo, hi) = if file_a <= file_b {
            (file_a, file_b)
        } else {
            (file_b, file_a)
        };
        let mut mask = 0u64;
        for file in lo..=hi {
            mask |= Square::at(rank, file).bit();
        }
        Bitboard(mask)
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Self {
        Bitboard(!self.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter(u64);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let idx = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(Square(idx))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_yields_squares_in_order() {
        let bb = Bitboard(0b1001_0001);
        let squares: Vec<usize> = bb.iter().map(Square::index).collect();
        assert_eq!(squares, vec![0, 4, 7]);
    }

    #[test]
    fn test_lsb_msb() {
        let bb = Bitboard((1 << 3) | (1 << 40));
        assert_eq!(bb.lsb(), Some(Square(3)));
        assert_eq!(bb.msb(), Some(Square(40)));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
    }

    #[test]
    fn test_ranks_ahead() {
        assert_eq!(
            Bitboard::ranks_ahead(5, true),
            Bitboard::rank_mask(6) | Bitboard::rank_mask(7)
        );
        assert_eq!(
            Bitboard::ranks_ahead(2, false),
            Bitboard::rank_mask(0) | Bitboard::rank_mask(1)
        );
        assert!(Bitboard::ranks_ahead(7, true).is_empty());
        assert!(Bitboard::ranks_ahead(0, false).is_empty());
    }

    #[test]
    fn test_adjacent_files_edges() {
        assert_eq!(Bitboard::adjacent_files(0), Bitboard::file_mask(1));
        assert_eq!(Bitboard::adjacent_files(7), Bitboard::file_mask(6));
    }

    #[test]
    fn test_rank_span_inclusive() {
        let span = Bitboard::rank_span(0, 6, 4);
        assert_eq!(span.popcount(), 3);
        assert!(span.contains(Square::E1));
    }
}
