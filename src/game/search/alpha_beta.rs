// src/game/search/alpha_beta.rs

use super::tt::{Bound, TableError};
use super::{bound_for, is_leaf, leaf_value, successors, Searcher};
use crate::game::{Color, Position};

impl<P: Position> Searcher<'_, P> {
    /// Negamax with alpha-beta pruning.
    ///
    /// Fails hard on the low side (returns at least `alpha`) and soft on the high side
    /// (returns the first child score that reaches `beta`).
    pub fn alpha_beta(
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
        let mut has_move = false;

        for child in successors(pos, color) {
            has_move = true;
            let score = -self.alpha_beta(&child, depth - 1, -beta, -alpha, !color)?;
            if score >= beta {
                self.store(pos, depth, color, score, Bound::Lower, start)?;
                return Ok(score);
            }
            alpha = alpha.max(score);
        }

        if !has_move {
            let score = -self.alpha_beta(pos, depth - 1, -beta, -alpha, !color)?;
            alpha = alpha.max(score);
        }

        let bound = bound_for(alpha, alpha_orig, beta);
        self.store(pos, depth, color, alpha, bound, start)?;
        self.stats.expanded += 1;
        Ok(alpha)
    }
}
