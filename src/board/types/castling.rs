//! Castling rights, including Chess960 rook files.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

/// Which wing a castling right refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// File the king lands on
    #[inline]
    #[must_use]
    pub const fn king_dest_file(self) -> usize {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }

    /// File the rook lands on
    #[inline]
    #[must_use]
    pub const fn rook_dest_file(self) -> usize {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }
}

/// Castling rights as the originating rook file per color and side.
///
/// Standard chess uses files h and a; Chess960 positions may use any file.
/// `chess960` only affects FEN output (file letters instead of `KQkq`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights {
    rook_files: [[Option<u8>; 2]; 2],
    chess960: bool,
}

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights {
            rook_files: [[None; 2]; 2],
            chess960: false,
        }
    }

    /// Standard castling rights for both colors on both wings
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights {
            rook_files: [[Some(7), Some(0)], [Some(7), Some(0)]],
            chess960: false,
        }
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.rook_files[color.index()][side.index()].is_some()
    }

    /// Originating file of the rook for this right, if the right is held
    #[inline]
    #[must_use]
    pub const fn rook_file(self, color: Color, side: CastleSide) -> Option<usize> {
        match self.rook_files[color.index()][side.index()] {
            Some(f) => Some(f as usize),
            None => None,
        }
    }

    /// Grant a castling right with the given rook file
    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide, rook_file: usize) {
        self.rook_files[color.index()][side.index()] = Some(rook_file as u8);
    }

    /// Remove a specific castling right. Losing the last right also drops
    /// the Chess960 marker, which a `-` FEN field cannot carry.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.rook_files[color.index()][side.index()] = None;
        if !self.any() {
            self.chess960 = false;
        }
    }

    #[inline]
    #[must_use]
    pub const fn any(self) -> bool {
        self.has(Color::White, CastleSide::King)
            || self.has(Color::White, CastleSide::Queen)
            || self.has(Color::Black, CastleSide::King)
            || self.has(Color::Black, CastleSide::Queen)
    }

    #[inline]
    #[must_use]
    pub const fn is_chess960(self) -> bool {
        self.chess960
    }

    pub(crate) fn set_chess960(&mut self, chess960: bool) {
        self.chess960 = chess960;
    }

    /// The castling field of a FEN string.
    #[must_use]
    pub fn to_fen_field(self) -> String {
        let mut out = String::new();
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                let Some(file) = self.rook_file(color, side) else {
                    continue;
                };
                let c = if self.chess960 {
                    (b'a' + file as u8) as char
                } else if side == CastleSide::King {
                    'k'
                } else {
                    'q'
                };
                out.push(if color == Color::White {
                    c.to_ascii_uppercase()
                } else {
                    c
                });
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}
