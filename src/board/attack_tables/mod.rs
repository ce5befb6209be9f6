//! Attack tables for move generation.
//!
//! Leapers use precomputed per-square tables. Sliders use Hyperbola
//! Quintessence (`o ^ (o - 2r)` with byteswap for the reverse direction)
//! and a small lookup table for ranks. Every slider result stops at and
//! includes the first blocker in each direction.

#![allow(clippy::needless_range_loop)]
#![allow(clippy::inline_always)]

mod tables;

use std::sync::LazyLock;

use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use super::{Bitboard, Color, Square};

const FILE_A: u64 = 0x0101_0101_0101_0101;

fn line_masks(dr: isize, df: isize) -> [u64; 64] {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        let mut mask = 1u64 << sq;
        for dir in [1isize, -1] {
            let mut r = (sq / 8) as isize + dr * dir;
            let mut f = (sq % 8) as isize + df * dir;
            while (0..8).contains(&r) && (0..8).contains(&f) {
                mask |= 1u64 << (r * 8 + f);
                r += dr * dir;
                f += df * dir;
            }
        }
        masks[sq] = mask;
    }
    masks
}

/// Diagonal masks through each square (a1-h8 direction), origin included
static DIAG_MASKS: LazyLock<[u64; 64]> = LazyLock::new(|| line_masks(1, 1));

/// Anti-diagonal masks through each square (a8-h1 direction), origin included
static ANTI_MASKS: LazyLock<[u64; 64]> = LazyLock::new(|| line_masks(1, -1));

/// Rank attack lookup: `[8 * inner_occupancy + file]` -> attacks along rank 1
static RANK_ATTACKS: LazyLock<[u64; 512]> = LazyLock::new(|| {
    let mut attacks = [0u64; 512];
    for occ_6bit in 0..64 {
        for file in 0..8 {
            let mut attack = 0u64;
            for f in (file + 1)..8 {
                attack |= 1u64 << f;
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            for f in (0..file).rev() {
                attack |= 1u64 << f;
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            attacks[8 * occ_6bit + file] = attack;
        }
    }
    attacks
});

#[inline(always)]
fn hyp_quint(occupied: u64, mask: u64, square: usize) -> u64 {
    let piece_bit = 1u64 << square;
    let forward = occupied & mask;
    let backward = forward.swap_bytes();
    let forward_attacks = forward.wrapping_sub(piece_bit.wrapping_mul(2));
    let backward_attacks = backward
        .wrapping_sub(piece_bit.swap_bytes().wrapping_mul(2))
        .swap_bytes();
    (forward_attacks ^ backward_attacks) & mask
}

#[inline(always)]
fn file_attacks(occupied: u64, square: usize) -> u64 {
    hyp_quint(occupied | (1u64 << square), FILE_A << (square % 8), square)
}

#[inline(always)]
fn rank_attacks(occupied: u64, square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let occ_6bit = ((occupied >> (rank * 8 + 1)) & 63) as usize;
    RANK_ATTACKS[8 * occ_6bit + file] << (rank * 8)
}

#[inline(always)]
fn diagonal_attacks(occupied: u64, square: usize) -> u64 {
    let occ = occupied | (1u64 << square);
    hyp_quint(occ, DIAG_MASKS[square], square) | hyp_quint(occ, ANTI_MASKS[square], square)
}

/// Bishop attacks from `sq` given the board occupancy
#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(diagonal_attacks(occupied.0, sq.index()))
}

/// Rook attacks from `sq` given the board occupancy
#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let s = sq.index();
    Bitboard(file_attacks(occupied.0, s) | rank_attacks(occupied.0, s))
}

/// Queen attacks (union of rook and bishop rays)
#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Squares attacked by a pawn of `color` standing on `sq`
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}
