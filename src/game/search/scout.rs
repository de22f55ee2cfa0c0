// src/game/search/scout.rs

//! Scout
//!
//! A value-only search. The first child is evaluated exactly; every later child is
//! first checked with a boolean `test` ("is its value at least this much?") and only
//! evaluated exactly when the test shows it improves on the best score so far.

use super::tt::{Bound, TableError};
use super::{is_leaf, leaf_value, successors, Searcher};
use crate::game::{Color, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    pub fn holds(self, value: i32, bound: i32) -> bool {
        match self {
            Comparison::Greater => value > bound,
            Comparison::GreaterOrEqual => value >= bound,
        }
    }

    /// `v > s` for a node means `child <= -s` for some child, i.e. not `child >= -s`.
    /// Likewise `v >= s` means not `child > -s` for some child.
    fn for_child(self) -> Self {
        match self {
            Comparison::Greater => Comparison::GreaterOrEqual,
            Comparison::GreaterOrEqual => Comparison::Greater,
        }
    }

    /// Table entry recording that the comparison against `bound` came out `outcome`.
    fn entry(self, bound: i32, outcome: bool) -> (i32, Bound) {
        match (self, outcome) {
            (Comparison::Greater, true) => (bound + 1, Bound::Lower),
            (Comparison::GreaterOrEqual, true) => (bound, Bound::Lower),
            (Comparison::Greater, false) => (bound, Bound::Upper),
            (Comparison::GreaterOrEqual, false) => (bound - 1, Bound::Upper),
        }
    }
}

impl<P: Position> Searcher<'_, P> {
    pub fn scout(&mut self, pos: &P, depth: u32, color: Color) -> Result<i32, TableError> {
        self.stats.generated += 1;

        if is_leaf(pos, depth) {
            return Ok(leaf_value(pos, color));
        }

        if let Some(entry) = self.probe(pos, depth, color) {
            if entry.bound == Bound::Exact {
                return Ok(entry.score);
            }
        }

        let start = self.stats.generated;
        let mut score = 0;
        let mut first_child = true;

        for child in successors(pos, color) {
            if first_child {
                first_child = false;
                score = -self.scout(&child, depth - 1, !color)?;
            } else if !self.test(
                &child,
                depth - 1,
                !color,
                -score,
                Comparison::GreaterOrEqual,
            )? {
                // The child is worth less than -score to the opponent, so more than
                // score to us.
                score = -self.scout(&child, depth - 1, !color)?;
            }
        }

        if first_child {
            score = -self.scout(pos, depth - 1, !color)?;
        }

        self.store(pos, depth, color, score, Bound::Exact, start)?;
        self.stats.expanded += 1;
        Ok(score)
    }

    /// Whether the value of `pos` for `color` satisfies `comparison` against `bound`.
    pub fn test(
        &mut self,
        pos: &P,
        depth: u32,
        color: Color,
        bound: i32,
        comparison: Comparison,
    ) -> Result<bool, TableError> {
        self.stats.generated += 1;

        if is_leaf(pos, depth) {
            return Ok(comparison.holds(leaf_value(pos, color), bound));
        }

        if let Some(entry) = self.probe(pos, depth, color) {
            let holds = comparison.holds(entry.score, bound);
            match entry.bound {
                Bound::Exact => return Ok(holds),
                Bound::Lower if holds => return Ok(true),
                Bound::Upper if !holds => return Ok(false),
                _ => {}
            }
        }

        let start = self.stats.generated;
        let child_comparison = comparison.for_child();
        let mut has_move = false;

        for child in successors(pos, color) {
            has_move = true;
            if !self.test(&child, depth - 1, !color, -bound, child_comparison)? {
                let (score, kind) = comparison.entry(bound, true);
                self.store(pos, depth, color, score, kind, start)?;
                return Ok(true);
            }
        }

        if !has_move && !self.test(pos, depth - 1, !color, -bound, child_comparison)? {
            let (score, kind) = comparison.entry(bound, true);
            self.store(pos, depth, color, score, kind, start)?;
            return Ok(true);
        }

        let (score, kind) = comparison.entry(bound, false);
        self.store(pos, depth, color, score, kind, start)?;
        self.stats.expanded += 1;
        Ok(false)
    }
}
