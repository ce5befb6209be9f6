//! Pawn hash table for caching pawn structure evaluation.
//!
//! Pawn structure only depends on pawn positions, so it can be cached
//! using a pawn-only Zobrist hash. Pawns rarely move, so most probes hit.

use std::sync::atomic::{AtomicU64, Ordering};

/// Marks a written slot; a position without pawns has pawn key zero and
/// must still be storable.
const VALID: u64 = 1 << 32;

#[inline]
fn pack_entry(score: i32) -> u64 {
    u64::from(score as u32) | VALID
}

#[inline]
fn unpack_entry(data: u64) -> i32 {
    data as u32 as i32
}

/// A single slot using the XOR technique for lockless reads.
#[repr(C)]
struct PawnSlot {
    /// Stores: `pawn_hash` ^ `packed_data`
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl PawnSlot {
    fn new() -> Self {
        PawnSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    fn probe(&self, hash: u64) -> Option<i32> {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);

        // XOR verification detects torn reads
        (data & VALID != 0 && key_xor ^ data == hash).then(|| unpack_entry(data))
    }
}

/// Thread-safe pawn structure cache.
///
/// Stores the white-relative pawn structure score indexed by pawn-only
/// Zobrist hash. One entry per slot, `key % capacity`, always replaced.
pub struct PawnHashTable {
    slots: Vec<PawnSlot>,
}

impl PawnHashTable {
    /// Create a new pawn hash table with the given size in kilobytes.
    #[must_use]
    pub fn new(size_kb: usize) -> Self {
        let count = ((size_kb * 1024) / std::mem::size_of::<PawnSlot>()).max(64);
        let mut slots = Vec::with_capacity(count);
        slots.resize_with(count, PawnSlot::new);
        PawnHashTable { slots }
    }

    #[inline]
    fn slot(&self, hash: u64) -> &PawnSlot {
        &self.slots[(hash % self.slots.len() as u64) as usize]
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Probe the table for a cached pawn structure score.
    #[must_use]
    pub fn probe(&self, pawn_hash: u64) -> Option<i32> {
        self.slot(pawn_hash).probe(pawn_hash)
    }

    pub fn store(&self, pawn_hash: u64, score: i32) {
        self.slot(pawn_hash).store(pawn_hash, pack_entry(score));
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.key_xor.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for PawnHashTable {
    fn default() -> Self {
        Self::new(1024) // 1 MB default
    }
}
