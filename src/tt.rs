//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve position evaluations,
//! enabling significant search tree pruning.
//!
//! Every slot is a pair of atomic u64 words accessed with relaxed
//! ordering and no locks, so Lazy SMP workers can share one table.
//! The key is stored XORed with the data word; a torn write from a
//! concurrent `save` therefore reads back as a key mismatch (a miss).
//! Moves coming out of the table are always re-validated against the
//! legal move list by the caller.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::{Move, MoveList};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked TT entry for reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub score: i16,
    pub bound_type: BoundType,
    /// Packed from/to of the stored move. Promotion piece and castling
    /// rook are not kept, see [`TtEntry::best_move`].
    pub packed_move: Option<u16>,
}

impl TtEntry {
    #[must_use]
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }

    #[must_use]
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    /// Re-derive the stored move from `legal`.
    ///
    /// Returns `None` when the slot holds no move or when no legal move
    /// has the stored from/to pair (a collision or a stale entry).
    #[must_use]
    pub fn best_move(&self, legal: &MoveList) -> Option<Move> {
        self.packed_move.and_then(|packed| legal.find_packed(packed))
    }
}

const MOVE_MASK: u64 = 0x0FFF;
const HAS_MOVE: u64 = 1 << 12;
const VALID: u64 = 1 << 48;

/// Packed entry format (fits in 64 bits):
/// - bits 0-11:  move (`from | to << 6`)
/// - bit 12:     move present
/// - bits 16-31: score (i16 as u16)
/// - bits 32-39: depth (u8)
/// - bits 40-41: bound
/// - bit 48:     valid, so a stored entry is never all zeroes
fn pack_entry(depth: u8, score: i16, bound_type: BoundType, best_move: Option<Move>) -> u64 {
    let mv = best_move.map_or(0, |m| (u64::from(m.packed()) & MOVE_MASK) | HAS_MOVE);
    mv | (u64::from(score as u16) << 16)
        | (u64::from(depth) << 32)
        | (bound_type.to_bits() << 40)
        | VALID
}

fn unpack_entry(data: u64) -> TtEntry {
    TtEntry {
        depth: ((data >> 32) & 0xFF) as u8,
        score: ((data >> 16) & 0xFFFF) as u16 as i16,
        bound_type: BoundType::from_bits(data >> 40),
        packed_move: (data & HAS_MOVE != 0).then_some((data & MOVE_MASK) as u16),
    }
}

#[repr(C)]
struct TtSlot {
    /// hash ^ packed data
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TtSlot {
    fn new() -> Self {
        TtSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    fn probe(&self, hash: u64) -> Option<TtEntry> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (data & VALID != 0 && key_xor ^ data == hash).then(|| unpack_entry(data))
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn reset(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Thread-safe transposition table using lockless hashing.
///
/// One entry per slot, addressed by `key % capacity`, and every save
/// overwrites the addressed slot.
pub struct TranspositionTable {
    slots: Vec<TtSlot>,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        TranspositionTable {
            slots: Self::allocate(size_mb),
        }
    }

    fn allocate(size_mb: usize) -> Vec<TtSlot> {
        let count = ((size_mb * 1024 * 1024) / mem::size_of::<TtSlot>()).max(1024);
        let mut slots = Vec::with_capacity(count);
        slots.resize_with(count, TtSlot::new);
        slots
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot(&self, hash: u64) -> &TtSlot {
        &self.slots[(hash % self.slots.len() as u64) as usize]
    }

    /// Probe the table for an entry matching the given hash.
    /// A different key in the slot is a plain miss.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        self.slot(hash).probe(hash)
    }

    /// Overwrite the slot addressed by `hash`.
    ///
    /// Scores are clamped to the i16 range and depth to 255.
    pub fn save(
        &self,
        hash: u64,
        score: i32,
        depth: u32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) {
        let depth = depth.min(u32::from(u8::MAX)) as u8;
        let score = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        self.slot(hash)
            .store(hash, pack_entry(depth, score, bound_type, best_move));
    }

    /// Returns hash table fullness in per mille (0-1000), sampled from
    /// the first 1000 slots.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let used = self
            .slots
            .iter()
            .take(sample)
            .filter(|slot| !slot.is_empty())
            .count();
        ((used * 1000) / sample) as u32
    }

    /// Clear all entries. Workers still probing see misses.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.reset();
        }
    }

    /// Reallocate with a new size. Needs exclusive access, so a table
    /// shared through an `Arc` must first be reclaimed with `Arc::get_mut`.
    pub fn resize(&mut self, size_mb: usize) {
        self.slots = Self::allocate(size_mb);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(16)
    }
}
