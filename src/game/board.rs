// src/game/board.rs

//! Bitboard Othello position.
//!
//! Cell `row * 8 + col` maps to bit `row * 8 + col`, so `a1` is bit 0 and `h8` is
//! bit 63. Moves flip discs along the eight directions with shift-and-mask walks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Color, Position};
use crate::constants::{BOARD_CELLS, BOARD_SIDE};

const NOT_FILE_A: u64 = 0xfefe_fefe_fefe_fefe;
const NOT_FILE_H: u64 = 0x7f7f_7f7f_7f7f_7f7f;

#[derive(Clone, Copy, Debug)]
enum Direction {
    East,
    West,
    North,
    South,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

const DIRECTIONS: [Direction; 8] = [
    Direction::East,
    Direction::West,
    Direction::North,
    Direction::South,
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::SouthWest,
];

impl Direction {
    #[inline]
    fn shift(self, bb: u64) -> u64 {
        match self {
            Direction::East => (bb << 1) & NOT_FILE_A,
            Direction::West => (bb >> 1) & NOT_FILE_H,
            Direction::North => bb << 8,
            Direction::South => bb >> 8,
            Direction::NorthEast => (bb << 9) & NOT_FILE_A,
            Direction::NorthWest => (bb << 7) & NOT_FILE_H,
            Direction::SouthEast => (bb >> 7) & NOT_FILE_A,
            Direction::SouthWest => (bb >> 9) & NOT_FILE_H,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard opening position: d4/e5 white, d5/e4 black.
    pub fn new() -> Self {
        Self {
            black: (1 << 28) | (1 << 35),
            white: (1 << 27) | (1 << 36),
        }
    }

    pub fn from_bitboards(black: u64, white: u64) -> Self {
        debug_assert_eq!(black & white, 0, "a cell cannot hold two discs");
        Self { black, white }
    }

    pub fn discs(&self, color: Color) -> u64 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub fn count(&self, color: Color) -> u32 {
        self.discs(color).count_ones()
    }

    pub fn empties(&self) -> u64 {
        !(self.black | self.white)
    }

    /// Same discs with the colors swapped.
    pub fn inverted(&self) -> Self {
        Self {
            black: self.white,
            white: self.black,
        }
    }

    /// Bitmask of the cells where `color` can play.
    pub fn legal_moves(&self, color: Color) -> u64 {
        let own = self.discs(color);
        let opp = self.discs(!color);
        let empty = self.empties();
        let mut moves = 0;
        for dir in DIRECTIONS {
            let mut run = dir.shift(own) & opp;
            for _ in 0..5 {
                run |= dir.shift(run) & opp;
            }
            moves |= dir.shift(run) & empty;
        }
        moves
    }

    fn flips(&self, color: Color, cell: usize) -> u64 {
        let own = self.discs(color);
        let opp = self.discs(!color);
        let start = 1u64 << cell;
        let mut flipped = 0;
        for dir in DIRECTIONS {
            let mut line = 0;
            let mut probe = dir.shift(start);
            while probe & opp != 0 {
                line |= probe;
                probe = dir.shift(probe);
            }
            if probe & own != 0 {
                flipped |= line;
            }
        }
        flipped
    }
}

impl Position for Board {
    fn outflank(&self, color: Color, cell: usize) -> bool {
        self.empties() & (1 << cell) != 0 && self.flips(color, cell) != 0
    }

    fn play(&self, color: Color, cell: usize) -> Self {
        let flipped = self.flips(color, cell) | (1 << cell);
        match color {
            Color::Black => Self {
                black: self.black | flipped,
                white: self.white & !flipped,
            },
            Color::White => Self {
                black: self.black & !flipped,
                white: self.white | flipped,
            },
        }
    }

    fn is_terminal(&self) -> bool {
        self.legal_moves(Color::Black) == 0 && self.legal_moves(Color::White) == 0
    }

    fn value(&self) -> i32 {
        self.count(Color::Black) as i32 - self.count(Color::White) as i32
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in 0..BOARD_SIDE {
            write!(f, "{}", row + 1)?;
            for col in 0..BOARD_SIDE {
                let bit = 1u64 << (row * BOARD_SIDE + col);
                let c = if self.black & bit != 0 {
                    'X'
                } else if self.white & bit != 0 {
                    'O'
                } else {
                    '.'
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("unexpected character {0:?} in board diagram")]
    InvalidCell(char),
    #[error("board diagram has {0} cells, expected {BOARD_CELLS}")]
    WrongCellCount(usize),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses a diagram of 64 cells (`X`/`x`/`B` black, `O`/`o`/`W` white, `.`/`-`
    /// empty) from a1 to h8. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut black = 0u64;
        let mut white = 0u64;
        let mut cell = 0usize;
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if cell < BOARD_CELLS {
                match c {
                    'X' | 'x' | 'B' => black |= 1 << cell,
                    'O' | 'o' | 'W' => white |= 1 << cell,
                    '.' | '-' => {}
                    other => return Err(ParseBoardError::InvalidCell(other)),
                }
            }
            cell += 1;
        }
        if cell != BOARD_CELLS {
            return Err(ParseBoardError::WrongCellCount(cell));
        }
        Ok(Self { black, white })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(mask: u64) -> Vec<usize> {
        (0..BOARD_CELLS).filter(|c| mask & (1 << c) != 0).collect()
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        assert_eq!(board.count(Color::Black), 2);
        assert_eq!(board.count(Color::White), 2);
        assert_eq!(board.value(), 0);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_initial_moves_for_black() {
        // d3, c4, f5, e6
        let board = Board::new();
        assert_eq!(cells(board.legal_moves(Color::Black)), vec![19, 26, 37, 44]);
        let by_outflank: Vec<usize> = (0..BOARD_CELLS)
            .filter(|&c| board.outflank(Color::Black, c))
            .collect();
        assert_eq!(by_outflank, vec![19, 26, 37, 44]);
    }

    #[test]
    fn test_initial_moves_for_white() {
        // e3, f4, c5, d6
        let board = Board::new();
        assert_eq!(cells(board.legal_moves(Color::White)), vec![20, 29, 34, 43]);
    }

    #[test]
    fn test_play_flips_and_keeps_receiver() {
        let board = Board::new();
        let next = board.play(Color::Black, 44); // e6 flips e5
        assert_eq!(board, Board::new());
        assert_eq!(next.count(Color::Black), 4);
        assert_eq!(next.count(Color::White), 1);
        assert_eq!(next.value(), 3);
        assert!(next.discs(Color::Black) & (1 << 36) != 0);
    }

    #[test]
    fn test_occupied_cell_is_not_a_move() {
        let board = Board::new();
        assert!(!board.outflank(Color::Black, 27));
        assert!(!board.outflank(Color::Black, 28));
    }

    #[test]
    fn test_moves_do_not_wrap_around_edges() {
        // Black h1, white a2: walking west from b2 must not wrap from a2 onto h1.
        let board: Board = "
            . . . . . . . X
            O . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
        "
        .parse()
        .unwrap();
        assert!(!board.outflank(Color::Black, 9));
        assert_eq!(board.legal_moves(Color::Black), 0);
    }

    #[test]
    fn test_full_board_is_terminal() {
        let board = Board::from_bitboards(0xffff_ffff_0000_0000, 0x0000_0000_ffff_ffff);
        assert!(board.is_terminal());
        assert_eq!(board.value(), 0);
    }

    #[test]
    fn test_one_sided_board_is_terminal() {
        let board = Board::from_bitboards(1 << 27, 0);
        assert!(board.is_terminal());
        assert_eq!(board.value(), 1);
    }

    #[test]
    fn test_inverted_swaps_colors() {
        let board = Board::new().play(Color::Black, 44);
        let inverted = board.inverted();
        assert_eq!(inverted.value(), -board.value());
        assert_eq!(inverted.inverted(), board);
        assert_eq!(
            inverted.legal_moves(Color::Black),
            board.legal_moves(Color::White)
        );
    }

    #[test]
    fn test_display_and_parse_roundtrip() {
        let board = Board::new().play(Color::Black, 19);
        let text = board.to_string();
        let diagram: String = text
            .lines()
            .skip(1)
            .map(|line| &line[1..])
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(diagram.parse::<Board>().unwrap(), board);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("X O".parse::<Board>(), Err(ParseBoardError::WrongCellCount(2)));
        assert_eq!(
            "Z".repeat(64).parse::<Board>(),
            Err(ParseBoardError::InvalidCell('Z'))
        );
    }
}
