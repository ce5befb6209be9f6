//! Move-path enumeration for move generator verification.

use super::{Board, Move};

/// Hash-keyed cache of subtree counts for `perft_cached`.
///
/// Each slot stores the full key and `(nodes << 8) | depth`. The slot count
/// is a power of two so the index is a mask of the key.
pub struct PerftTable {
    keys: Vec<u64>,
    data: Vec<u64>,
    mask: usize,
}

impl PerftTable {
    /// Table using roughly `size_mb` megabytes (16 bytes per slot).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let count = (size_mb.max(1) * 1024 * 1024) / 16;
        let size = if count.is_power_of_two() {
            count
        } else {
            count.next_power_of_two() / 2
        };
        PerftTable {
            keys: vec![0; size],
            data: vec![0; size],
            mask: size - 1,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Cached count for `key` at exactly `depth`.
    #[must_use]
    pub fn probe(&self, key: u64, depth: usize) -> Option<u64> {
        let idx = (key as usize) & self.mask;
        let data = self.data[idx];
        (self.keys[idx] == key && (data & 0xFF) as usize == depth).then_some(data >> 8)
    }

    /// Store unless the slot already holds a deeper count for the same key.
    pub fn save(&mut self, key: u64, depth: usize, nodes: u64) {
        let idx = (key as usize) & self.mask;
        let stored_key = self.keys[idx];
        let stored_depth = (self.data[idx] & 0xFF) as usize;
        if stored_key == 0 || stored_key != key || depth >= stored_depth {
            self.keys[idx] = key;
            self.data[idx] = (nodes << 8) | (depth as u64 & 0xFF);
        }
    }

    pub fn clear(&mut self) {
        self.keys.fill(0);
        self.data.fill(0);
    }
}

impl Board {
    /// Number of leaf nodes of the legal move tree at `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in moves {
            let info = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, info);
        }

        nodes
    }

    /// `perft` with transpositions answered from `table`.
    pub fn perft_cached(&mut self, depth: usize, table: &mut PerftTable) -> u64 {
        if depth == 0 {
            return 1;
        }
        if let Some(nodes) = table.probe(self.hash, depth) {
            return nodes;
        }

        let moves = self.generate_moves();
        let nodes = if depth == 1 {
            moves.len() as u64
        } else {
            let mut nodes = 0;
            for m in moves {
                let info = self.make_move(m);
                nodes += self.perft_cached(depth - 1, table);
                self.unmake_move(m, info);
            }
            nodes
        };

        table.save(self.hash, depth, nodes);
        nodes
    }

    /// Per-root-move subtree counts, in generation order.
    pub fn divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        let moves = self.generate_moves();
        let mut out = Vec::with_capacity(moves.len());
        for m in moves {
            let info = self.make_move(m);
            let nodes = self.perft(depth.saturating_sub(1));
            self.unmake_move(m, info);
            out.push((m, nodes));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_table_depth_must_match() {
        let mut table = PerftTable::new(1);
        table.save(0xDEAD_BEEF, 3, 8902);
        assert_eq!(table.probe(0xDEAD_BEEF, 3), Some(8902));
        assert_eq!(table.probe(0xDEAD_BEEF, 2), None);
        assert_eq!(table.probe(0xBEEF, 3), None);
    }

    #[test]
    fn test_perft_table_keeps_deeper_entry_for_same_key() {
        let mut table = PerftTable::new(1);
        table.save(42, 4, 197_281);
        table.save(42, 2, 400);
        assert_eq!(table.probe(42, 4), Some(197_281));
        assert_eq!(table.probe(42, 2), None);
    }

    #[test]
    fn test_perft_table_capacity_is_power_of_two() {
        let table = PerftTable::new(3);
        assert!(table.capacity().is_power_of_two());
        assert!(table.capacity() * 16 <= 3 * 1024 * 1024);
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut board = Board::new();
        let split = board.divide(3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 8902);
    }

    #[test]
    fn test_cached_matches_plain() {
        let mut board = Board::new();
        let mut table = PerftTable::new(4);
        assert_eq!(board.perft_cached(4, &mut table), 197_281);
        // Second run is served from the table
        assert_eq!(board.perft_cached(4, &mut table), 197_281);
    }
}
