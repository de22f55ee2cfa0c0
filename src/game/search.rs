// src/game/search.rs

pub mod alpha_beta;
pub mod negamax;
pub mod pvs;
pub mod scout;
pub mod tt;


use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::constants::{DEFAULT_ALPHA, DEFAULT_BETA, TT_THRESHOLD};
use crate::game::{Color, Position};
use tt::{Bound, TTEntry, TableError, TranspositionTables};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SearchAlgorithm {
    Negamax,
    AlphaBeta,
    Scout,
    Negascout,
}

impl SearchAlgorithm {
    /// Numeric selector used on the command line.
    pub fn selector(self) -> u8 {
        match self {
            SearchAlgorithm::Negamax => 1,
            SearchAlgorithm::AlphaBeta => 2,
            SearchAlgorithm::Scout => 3,
            SearchAlgorithm::Negascout => 4,
        }
    }
}

impl TryFrom<u8> for SearchAlgorithm {
    type Error = u8;

    fn try_from(selector: u8) -> Result<Self, u8> {
        match selector {
            1 => Ok(SearchAlgorithm::Negamax),
            2 => Ok(SearchAlgorithm::AlphaBeta),
            3 => Ok(SearchAlgorithm::Scout),
            4 => Ok(SearchAlgorithm::Negascout),
            other => Err(other),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchAlgorithm::Negamax => "Negamax (minmax version)",
            SearchAlgorithm::AlphaBeta => "Negamax (alpha-beta version)",
            SearchAlgorithm::Scout => "Scout",
            SearchAlgorithm::Negascout => "Negascout",
        })
    }
}

/// Alpha-beta window, used by the windowed algorithms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    pub alpha: i32,
    pub beta: i32,
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA)
    }
}

impl Window {
    pub fn new(alpha: i32, beta: i32) -> Self {
        Self { alpha, beta }
    }
}

/// Node counters of one search call.
///
/// `generated` counts every call into the search. `expanded` counts calls that reach
/// the end of the node after looking at its children; leaves, table hits and
/// fail-high exits are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub expanded: u64,
    pub generated: u64,
}

impl SearchStats {
    pub fn nodes_per_second(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.generated as f64 / secs
        } else {
            0.0
        }
    }
}

/// Context threaded through one search: the node counters and, when caching is on, the
/// transposition tables lent by the caller.
pub struct Searcher<'t, P> {
    pub stats: SearchStats,
    tables: Option<&'t mut TranspositionTables<P>>,
    tt_threshold: u64,
}

impl<P: Position> Default for Searcher<'_, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, P: Position> Searcher<'t, P> {
    /// A searcher without caching.
    pub fn new() -> Self {
        Self {
            stats: SearchStats::default(),
            tables: None,
            tt_threshold: TT_THRESHOLD,
        }
    }

    /// A searcher that consults and fills `tables`. Nodes whose subtree generated fewer
    /// than `tt_threshold` nodes are not stored.
    pub fn with_tables(tables: &'t mut TranspositionTables<P>, tt_threshold: u64) -> Self {
        Self {
            stats: SearchStats::default(),
            tables: Some(tables),
            tt_threshold,
        }
    }

    /// Runs `algorithm` on `pos` for `color`. The window is ignored by the value-only
    /// algorithms.
    pub fn run(
        &mut self,
        algorithm: SearchAlgorithm,
        pos: &P,
        depth: u32,
        color: Color,
        window: Window,
    ) -> Result<i32, TableError> {
        match algorithm {
            SearchAlgorithm::Negamax => self.negamax(pos, depth, color),
            SearchAlgorithm::AlphaBeta => {
                self.alpha_beta(pos, depth, window.alpha, window.beta, color)
            }
            SearchAlgorithm::Scout => self.scout(pos, depth, color),
            SearchAlgorithm::Negascout => {
                self.negascout(pos, depth, window.alpha, window.beta, color)
            }
        }
    }

    fn probe(&self, pos: &P, depth: u32, color: Color) -> Option<TTEntry> {
        self.tables
            .as_ref()
            .and_then(|tables| tables.probe(pos, depth, color))
    }

    /// Stores a result if the subtree below it, which started at generated count
    /// `start`, was large enough.
    fn store(
        &mut self,
        pos: &P,
        depth: u32,
        color: Color,
        score: i32,
        bound: Bound,
        start: u64,
    ) -> Result<(), TableError> {
        if self.stats.generated - start < self.tt_threshold {
            return Ok(());
        }
        match self.tables.as_mut() {
            Some(tables) => tables.store(pos, color, TTEntry { depth, score, bound }),
            None => Ok(()),
        }
    }

    /// Applies a table entry to the window. Returns the value when the entry settles
    /// the node on its own.
    fn tighten(
        &self,
        pos: &P,
        depth: u32,
        color: Color,
        alpha: &mut i32,
        beta: &mut i32,
    ) -> Option<i32> {
        let entry = self.probe(pos, depth, color)?;
        match entry.bound {
            Bound::Exact => return Some(entry.score),
            Bound::Lower => {
                if entry.score >= *beta {
                    return Some(entry.score);
                }
                *alpha = (*alpha).max(entry.score);
            }
            Bound::Upper => {
                if entry.score <= *alpha {
                    return Some(entry.score);
                }
                *beta = (*beta).min(entry.score);
            }
        }
        None
    }
}

/// Leaf rule shared by every algorithm.
#[inline]
fn is_leaf<P: Position>(pos: &P, depth: u32) -> bool {
    depth == 0 || pos.is_terminal()
}

/// Static value seen by `color`.
#[inline]
fn leaf_value<P: Position>(pos: &P, color: Color) -> i32 {
    color.sign() * pos.value()
}

/// Children of `pos` for `color` in ascending cell order.
fn successors<P: Position>(pos: &P, color: Color) -> impl Iterator<Item = P> + '_ {
    (0..P::CELLS)
        .filter(move |&cell| pos.outflank(color, cell))
        .map(move |cell| pos.play(color, cell))
}

/// Bound kind of a windowed result.
fn bound_for(score: i32, alpha: i32, beta: i32) -> Bound {
    if score <= alpha {
        Bound::Upper
    } else if score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    }
}
