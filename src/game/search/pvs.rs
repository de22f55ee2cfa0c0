// src/game/search/pvs.rs

//! Negascout (Principal Variation Search)
//!
//! The first child is searched with the full window and sets the provisional
//! principal line. Every later child gets a null window (beta = alpha + 1) that only
//! proves whether it beats alpha. A child that does, and lands below beta, is searched
//! again with the window `(score, beta)` to get its exact value.

use super::tt::{Bound, TableError};
use super::{bound_for, is_leaf, leaf_value, successors, Searcher};
use crate::game::{Color, Position};

impl<P: Position> Searcher<'_, P> {
    pub fn negascout(
        &mut self,
        pos: &P,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        color: Color,
    ) -> Result<i32, TableError> {
        self.stats.generated += 1;

        if is_leaf(pos, depth) {
            return Ok(leaf_value(pos, color));
        }

        if let Some(score) = self.tighten(pos, depth, color, &mut alpha, &mut beta) {
            return Ok(score);
        }

        let start = self.stats.generated;
        let alpha_orig = alpha;
        let mut first_child = true;

        for child in successors(pos, color) {
            let score = if first_child {
                first_child = false;
                -self.negascout(&child, depth - 1, -beta, -alpha, !color)?
            } else {
                let probe = -self.negascout(&child, depth - 1, -alpha - 1, -alpha, !color)?;
                if alpha < probe && probe < beta {
                    -self.negascout(&child, depth - 1, -beta, -probe, !color)?
                } else {
                    probe
                }
            };

            if score >= beta {
                self.store(pos, depth, color, score, Bound::Lower, start)?;
                return Ok(score);
            }
            alpha = alpha.max(score);
        }

        if first_child {
            let score = -self.negascout(pos, depth - 1, -beta, -alpha, !color)?;
            alpha = alpha.max(score);
        }

        let bound = bound_for(alpha, alpha_orig, beta);
        self.store(pos, depth, color, alpha, bound, start)?;
        self.stats.expanded += 1;
        Ok(alpha)
    }
}
