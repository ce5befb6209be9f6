//! Move ordering heuristics owned by one search thread.

use std::sync::Arc;

use crate::board::{Color, Move, EMPTY_MOVE, MAX_PLY};
use crate::tt::TranspositionTable;

use super::constants::KILLER_SLOTS;

/// Quiet moves that caused a beta cutoff, two per ply.
pub struct KillerTable {
    slots: [[Move; KILLER_SLOTS]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[EMPTY_MOVE; KILLER_SLOTS]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.slots
            .get(ply)
            .is_some_and(|row| !mv.is_null() && row.contains(&mv))
    }

    #[must_use]
    pub fn get(&self, ply: usize) -> [Move; KILLER_SLOTS] {
        self.slots.get(ply).copied().unwrap_or([EMPTY_MOVE; KILLER_SLOTS])
    }

    /// Newest killer goes first; a move already stored is left alone.
    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row.contains(&mv) {
            return;
        }
        row.rotate_right(1);
        row[0] = mv;
    }

    pub fn reset(&mut self) {
        for row in &mut self.slots {
            *row = [EMPTY_MOVE; KILLER_SLOTS];
        }
    }
}

/// Butterfly history indexed by `[side][from][to]`.
///
/// Bonuses and maluses are `depth^2`. When an entry would pass the cap
/// in either direction the whole table is halved.
pub struct HistoryTable {
    entries: Box<[[[i32; 64]; 64]; 2]>,
    cap: i32,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new(cap: i32) -> Self {
        HistoryTable {
            entries: Box::new([[[0; 64]; 64]; 2]),
            cap,
        }
    }

    #[must_use]
    pub fn score(&self, side: Color, mv: Move) -> i32 {
        self.entries[side.index()][mv.from().index()][mv.to().index()]
    }

    pub fn set_cap(&mut self, cap: i32) {
        self.cap = cap;
    }

    /// Reward a quiet move that failed high.
    pub fn update(&mut self, side: Color, mv: Move, depth: u32) {
        self.adjust(side, mv, bonus(depth));
    }

    /// Penalize a quiet move that was searched before the cutoff move.
    pub fn penalize(&mut self, side: Color, mv: Move, depth: u32) {
        self.adjust(side, mv, -bonus(depth));
    }

    fn adjust(&mut self, side: Color, mv: Move, delta: i32) {
        let entry = &mut self.entries[side.index()][mv.from().index()][mv.to().index()];
        *entry = entry.saturating_add(delta);
        if entry.abs() > self.cap {
            self.age();
        }
    }

    /// Halve every entry.
    pub fn age(&mut self) {
        for side in self.entries.iter_mut() {
            for row in side.iter_mut() {
                for entry in row.iter_mut() {
                    *entry >>= 1;
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self.entries = [[[0; 64]; 64]; 2];
    }
}

/// Reply that refuted a given opponent move, indexed by
/// `[replying side][prev_from][prev_to]`.
pub struct CounterMoveTable {
    entries: Box<[[[Move; 64]; 64]; 2]>,
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterMoveTable {
    #[must_use]
    pub fn new() -> Self {
        CounterMoveTable {
            entries: Box::new([[[EMPTY_MOVE; 64]; 64]; 2]),
        }
    }

    #[must_use]
    pub fn get(&self, side: Color, prev: Move) -> Move {
        if prev.is_null() {
            return EMPTY_MOVE;
        }
        self.entries[side.index()][prev.from().index()][prev.to().index()]
    }

    pub fn set(&mut self, side: Color, prev: Move, mv: Move) {
        if !prev.is_null() {
            self.entries[side.index()][prev.from().index()][prev.to().index()] = mv;
        }
    }

    pub fn reset(&mut self) {
        *self.entries = [[[EMPTY_MOVE; 64]; 64]; 2];
    }
}

/// Capture history indexed by `[attacker][to][victim]`.
pub struct CaptureHistory {
    entries: Box<[[[i32; 6]; 64]; 6]>,
    cap: i32,
}

impl Default for CaptureHistory {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

impl CaptureHistory {
    #[must_use]
    pub fn new(cap: i32) -> Self {
        CaptureHistory {
            entries: Box::new([[[0; 6]; 64]; 6]),
            cap,
        }
    }

    /// Score for a capture; quiet moves score zero.
    #[must_use]
    pub fn score(&self, mv: Move) -> i32 {
        mv.captured().map_or(0, |victim| {
            self.entries[mv.piece().index()][mv.to().index()][victim.index()]
        })
    }

    pub fn set_cap(&mut self, cap: i32) {
        self.cap = cap;
    }

    pub fn update(&mut self, mv: Move, depth: u32) {
        let Some(victim) = mv.captured() else {
            return;
        };
        let entry = &mut self.entries[mv.piece().index()][mv.to().index()][victim.index()];
        *entry = entry.saturating_add(bonus(depth));
        if *entry > self.cap {
            self.age();
        }
    }

    pub fn age(&mut self) {
        for piece in self.entries.iter_mut() {
            for sq in piece.iter_mut() {
                for entry in sq.iter_mut() {
                    *entry >>= 1;
                }
            }
        }
    }

    pub fn reset(&mut self) {
        *self.entries = [[[0; 6]; 64]; 6];
    }
}

#[inline]
fn bonus(depth: u32) -> i32 {
    let d = depth.min(1000) as i32;
    d * d
}

/// Tables used during search: the shared transposition table plus this
/// thread's killers, history, counter moves and capture history.
pub struct SearchTables {
    /// Shared across SMP workers
    pub tt: Arc<TranspositionTable>,
    pub killer_moves: KillerTable,
    pub history: HistoryTable,
    pub counter_moves: CounterMoveTable,
    pub capture_history: CaptureHistory,
}

impl SearchTables {
    #[must_use]
    pub fn new(tt: Arc<TranspositionTable>, history_cap: i32) -> Self {
        SearchTables {
            tt,
            killer_moves: KillerTable::new(),
            history: HistoryTable::new(history_cap),
            counter_moves: CounterMoveTable::new(),
            capture_history: CaptureHistory::new(history_cap),
        }
    }

    /// Called before every search: killers are cleared, history is aged.
    pub fn new_search(&mut self) {
        self.killer_moves.reset();
        self.history.age();
        self.capture_history.age();
    }

    /// Drop everything learned, e.g. on a new game.
    pub fn reset(&mut self) {
        self.killer_moves.reset();
        self.history.reset();
        self.counter_moves.reset();
        self.capture_history.reset();
    }
}
