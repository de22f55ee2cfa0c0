// src/game/search/tt.rs

use std::collections::{HashMap, TryReserveError};

use thiserror::Error;

use crate::game::{Color, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("transposition table reached its limit of {limit} entries")]
    CapacityReached { limit: usize },
    #[error("transposition table allocation failed at {entries} entries")]
    AllocationFailed {
        entries: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Cache of search results for one side to move.
pub struct TranspositionTable<P> {
    table: HashMap<P, TTEntry>,
    limit: Option<usize>,
}

impl<P: Position> Default for TranspositionTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Position> TranspositionTable<P> {
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// A table that refuses to grow past `limit` entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            table: HashMap::new(),
            limit,
        }
    }

    /// Returns the entry for `pos` if it was searched to exactly `depth`. Results from
    /// other depths are never reused, which keeps depth-limited values identical with
    /// and without the table.
    pub fn probe(&self, pos: &P, depth: u32) -> Option<TTEntry> {
        self.table
            .get(pos)
            .filter(|entry| entry.depth == depth)
            .copied()
    }

    /// Inserts or replaces the entry for `pos`. An exact entry is never downgraded to a
    /// bound of the same depth.
    pub fn store(&mut self, pos: &P, entry: TTEntry) -> Result<(), TableError> {
        if let Some(existing) = self.table.get_mut(pos) {
            let keep = existing.depth == entry.depth
                && existing.bound == Bound::Exact
                && entry.bound != Bound::Exact;
            if !keep {
                *existing = entry;
            }
            return Ok(());
        }
        if let Some(limit) = self.limit {
            if self.table.len() >= limit {
                return Err(TableError::CapacityReached { limit });
            }
        }
        let entries = self.table.len();
        self.table
            .try_reserve(1)
            .map_err(|source| TableError::AllocationFailed { entries, source })?;
        self.table.insert(pos.clone(), entry);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of entries the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
}

/// One table per side to move. Lookups for Black never see White's entries.
pub struct TranspositionTables<P> {
    slots: [TranspositionTable<P>; 2],
}

impl<P: Position> Default for TranspositionTables<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Position> TranspositionTables<P> {
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            slots: [
                TranspositionTable::with_limit(limit),
                TranspositionTable::with_limit(limit),
            ],
        }
    }

    pub fn slot(&self, color: Color) -> &TranspositionTable<P> {
        &self.slots[color.index()]
    }

    pub fn slot_mut(&mut self, color: Color) -> &mut TranspositionTable<P> {
        &mut self.slots[color.index()]
    }

    pub fn probe(&self, pos: &P, depth: u32, color: Color) -> Option<TTEntry> {
        self.slot(color).probe(pos, depth)
    }

    pub fn store(&mut self, pos: &P, color: Color, entry: TTEntry) -> Result<(), TableError> {
        self.slot_mut(color).store(pos, entry)
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(TranspositionTable::is_empty)
    }

    /// Entry counts as `[black, white]`.
    pub fn sizes(&self) -> [usize; 2] {
        [self.slots[0].len(), self.slots[1].len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;

    fn exact(depth: u32, score: i32) -> TTEntry {
        TTEntry {
            depth,
            score,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn test_probe_miss() {
        let tt: TranspositionTable<Board> = TranspositionTable::new();
        assert_eq!(tt.probe(&Board::new(), 4), None);
    }

    #[test]
    fn test_store_and_probe_same_depth_only() {
        let mut tt = TranspositionTable::new();
        let board = Board::new();
        tt.store(&board, exact(6, -2)).unwrap();
        assert_eq!(tt.probe(&board, 6), Some(exact(6, -2)));
        assert_eq!(tt.probe(&board, 5), None);
        assert_eq!(tt.probe(&board, 7), None);
    }

    #[test]
    fn test_exact_entry_is_not_downgraded() {
        let mut tt = TranspositionTable::new();
        let board = Board::new();
        tt.store(&board, exact(6, -2)).unwrap();
        let lower = TTEntry {
            depth: 6,
            score: -10,
            bound: Bound::Lower,
        };
        tt.store(&board, lower).unwrap();
        assert_eq!(tt.probe(&board, 6), Some(exact(6, -2)));

        // A different depth replaces it.
        let deeper = TTEntry { depth: 7, ..lower };
        tt.store(&board, deeper).unwrap();
        assert_eq!(tt.probe(&board, 7), Some(deeper));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_bound_is_replaced_by_exact() {
        let mut tt = TranspositionTable::new();
        let board = Board::new();
        let upper = TTEntry {
            depth: 3,
            score: 4,
            bound: Bound::Upper,
        };
        tt.store(&board, upper).unwrap();
        tt.store(&board, exact(3, 1)).unwrap();
        assert_eq!(tt.probe(&board, 3), Some(exact(3, 1)));
    }

    #[test]
    fn test_limit_rejects_new_keys_but_allows_updates() {
        let mut tt = TranspositionTable::with_limit(Some(1));
        let board = Board::new();
        tt.store(&board, exact(2, 0)).unwrap();
        tt.store(&board, exact(3, 1)).unwrap();
        let other = board.play(Color::Black, 44);
        let err = tt.store(&other, exact(2, 0)).unwrap_err();
        assert!(matches!(err, TableError::CapacityReached { limit: 1 }));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_slots_are_separate_per_color() {
        let mut tables = TranspositionTables::new();
        let board = Board::new();
        tables.store(&board, Color::Black, exact(4, -2)).unwrap();
        assert_eq!(tables.probe(&board, 4, Color::Black), Some(exact(4, -2)));
        assert_eq!(tables.probe(&board, 4, Color::White), None);
        assert_eq!(tables.sizes(), [1, 0]);
    }

    #[test]
    fn test_clear_empties_both_slots() {
        let mut tables = TranspositionTables::new();
        let board = Board::new();
        tables.store(&board, Color::Black, exact(1, 3)).unwrap();
        tables.store(&board, Color::White, exact(1, 3)).unwrap();
        assert_eq!(tables.sizes(), [1, 1]);
        assert!(!tables.is_empty());
        tables.clear();
        assert!(tables.is_empty());
        assert_eq!(tables.sizes(), [0, 0]);
        assert!(tables.slot(Color::Black).is_empty());
        assert!(tables.slot(Color::White).is_empty());
    }
}
