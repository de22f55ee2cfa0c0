// game/mod.rs

pub mod board;
pub mod pv;
pub mod search;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::ops::Not;

use crate::constants::BOARD_CELLS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// +1 for Black, -1 for White. Static values are always from Black's point of
    /// view, so `color.sign() * value` turns them into the mover's point of view.
    pub fn sign(self) -> i32 {
        match self {
            Color::Black => 1,
            Color::White => -1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Side to move after `plies` plies from the initial position (passes count as plies).
    pub fn after_plies(plies: usize) -> Self {
        if plies % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("Black"),
            Color::White => f.write_str("White"),
        }
    }
}

/// The game state as seen by the search.
///
/// Implementations must be pure values: `play` returns the successor and leaves the
/// receiver untouched. `Hash` and `Eq` identify a position in the transposition table.
pub trait Position: Clone + Eq + Hash {
    /// Number of cells the search enumerates when generating moves.
    const CELLS: usize = BOARD_CELLS;

    /// Whether `color` may place a disc on `cell`.
    fn outflank(&self, color: Color, cell: usize) -> bool;

    /// The position after `color` places a disc on `cell`. Only called when
    /// `outflank(color, cell)` holds.
    fn play(&self, color: Color, cell: usize) -> Self;

    /// No side has a legal move.
    fn is_terminal(&self) -> bool;

    /// Static evaluation from Black's point of view.
    fn value(&self) -> i32;
}
