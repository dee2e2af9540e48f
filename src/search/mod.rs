//! Search: Zobrist hashing, transposition caching, threat-space move
//! generation, and the iterative-deepening alpha-beta controller

pub mod alphabeta;
pub mod movegen;
pub mod tt;
pub mod zobrist;

// Re-exports
pub use alphabeta::{SearchOutcome, Searcher, WIN};
pub use tt::{Bound, TranspositionTable, TtEntry, TtStats};
pub use zobrist::ZobristTable;
