// src/game/search/negamax.rs

//! Plain negamax: every child of every node is searched.

use super::tt::{Bound, TableError};
use super::{is_leaf, leaf_value, successors, Searcher};
use crate::constants::INFINITY;
use crate::game::{Color, Position};

impl<P: Position> Searcher<'_, P> {
    pub fn negamax(&mut self, pos: &P, depth: u32, color: Color) -> Result<i32, TableError> {
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
        let mut best = -INFINITY;
        let mut has_move = false;

        for child in successors(pos, color) {
            has_move = true;
            let score = -self.negamax(&child, depth - 1, !color)?;
            best = best.max(score);
        }

        if !has_move {
            // No legal move: the turn passes and still costs a ply.
            best = best.max(-self.negamax(pos, depth - 1, !color)?);
        }

        self.store(pos, depth, color, best, Bound::Exact, start)?;
        self.stats.expanded += 1;
        Ok(best)
    }
}
