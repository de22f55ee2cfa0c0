// Board
pub const BOARD_CELLS: usize = 64;
pub const BOARD_SIDE: usize = 8;

// Search
pub const INFINITY: i32 = 10_000_000;
// More than the empties of any position, so searches run to the end.
pub const DEFAULT_DEPTH: u32 = 33;
pub const DEFAULT_ALPHA: i32 = -200;
pub const DEFAULT_BETA: i32 = 200;

// Transposition table
pub const TT_THRESHOLD: u64 = 32; // minimum subtree size (generated nodes) worth caching

// Reference game replayed by the benchmark. Black moves first; a side without a legal
// move plays `pass`.
pub const REFERENCE_PV: &str = "e6 d6 c5 b6 c3 e3 c6 e7 c4 b3 f6 g6 d7 e8 a3 b4 f3 f4 f7 f8 \
h6 f5 c7 b5 d3 c8 a5 g4 a6 c2 d2 d1 h4 e2 f2 f1 g5 h5 h3 h7 h8 a4 c1 a7 a8 e1 g1 g3 d8 \
b8 g8 b1 a1 g7 a2 b7 b2 pass h2 g2 h1";
