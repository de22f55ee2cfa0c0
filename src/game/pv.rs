// src/game/pv.rs

//! Principal variations in move-list notation (`e6 d6 c5 ... pass ... h1`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::board::Board;
use super::{Color, Position};
use crate::constants::BOARD_SIDE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ply {
    Place(usize),
    Pass,
}

impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Ply::Pass => f.write_str("pass"),
            Ply::Place(cell) => {
                let file = (b'a' + (cell % BOARD_SIDE) as u8) as char;
                write!(f, "{}{}", file, cell / BOARD_SIDE + 1)
            }
        }
    }
}

impl FromStr for Ply {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        if token == "pass" || token == "--" {
            return Ok(Ply::Pass);
        }
        let bytes = token.as_bytes();
        if bytes.len() != 2 {
            return Err(PvError::InvalidPly(s.to_string()));
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(PvError::InvalidPly(s.to_string()));
        }
        let col = (file - b'a') as usize;
        let row = (rank - b'1') as usize;
        Ok(Ply::Place(row * BOARD_SIDE + col))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PvError {
    #[error("invalid ply {0:?}, expected a cell like \"e6\" or \"pass\"")]
    InvalidPly(String),
    #[error("principal variation is empty")]
    Empty,
    #[error("ply {index} ({ply}) is not a legal move for {color}")]
    IllegalMove { index: usize, ply: Ply, color: Color },
    #[error("ply {index}: {color} passes but has a legal move")]
    IllegalPass { index: usize, color: Color },
}

/// An ordered list of plies starting from the initial position with Black to move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalVariation {
    plies: Vec<Ply>,
}

impl PrincipalVariation {
    pub fn new(plies: Vec<Ply>) -> Result<Self, PvError> {
        if plies.is_empty() {
            return Err(PvError::Empty);
        }
        Ok(Self { plies })
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    /// Plays the variation out. Element `k` is the position after `k` plies, so the
    /// result has `len() + 1` entries and the side to move at `k` is
    /// `Color::after_plies(k)`.
    pub fn positions(&self) -> Result<Vec<Board>, PvError> {
        let mut positions = Vec::with_capacity(self.plies.len() + 1);
        let mut board = Board::new();
        positions.push(board);
        for (index, &ply) in self.plies.iter().enumerate() {
            let color = Color::after_plies(index);
            board = match ply {
                Ply::Place(cell) => {
                    if !board.outflank(color, cell) {
                        return Err(PvError::IllegalMove { index, ply, color });
                    }
                    board.play(color, cell)
                }
                Ply::Pass => {
                    if board.legal_moves(color) != 0 {
                        return Err(PvError::IllegalPass { index, color });
                    }
                    board
                }
            };
            positions.push(board);
        }
        Ok(positions)
    }
}

impl FromStr for PrincipalVariation {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let plies = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Ply>, _>>()?;
        Self::new(plies)
    }
}

impl TryFrom<String> for PrincipalVariation {
    type Error = PvError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PrincipalVariation> for String {
    fn from(pv: PrincipalVariation) -> String {
        pv.to_string()
    }
}

impl fmt::Display for PrincipalVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ply) in self.plies.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{ply}")?;
        }
        Ok(())
    }
}
