//! Gomoku move-search core
//!
//! A move-search engine for 15x15 five-in-a-row against a human opponent.
//! The crate owns only the search: rendering, input handling, networking,
//! and persistence formats belong to the caller.
//!
//! # Architecture
//!
//! - [`board`]: grid primitives and per-side bitboards
//! - [`state`]: the shared game position with make/unmake mutation
//! - [`rules`]: move legality and five-in-a-row detection
//! - [`eval`]: 3^9 window pattern table and the incremental evaluator
//! - [`search`]: Zobrist hashing, transposition table, threat-space move
//!   generation, iterative-deepening alpha-beta
//! - [`engine`]: difficulty levels, strategies, opening-book hook
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use gomoku_core::{Difficulty, Engine, GameState, Pos};
//!
//! let mut engine = Engine::new(Difficulty::Expert);
//! let mut state = GameState::new();
//!
//! // Human opens; the AI answers within the time budget
//! state.apply_move(Pos::new(7, 7)).unwrap();
//! if let Some(reply) = engine.choose_move(&mut state, Duration::from_millis(100)) {
//!     state.apply_move(reply).unwrap();
//! }
//! ```
//!
//! # Search Priority
//!
//! 1. Opening book reply, when a book is attached
//! 2. Immediate winning move
//! 3. Block of an immediate opponent win
//! 4. Iterative-deepening alpha-beta within the wall-clock budget
//!
//! The search always yields a legal move while one exists: if not even
//! depth 1 completes in time, the best immediately generated candidate
//! is returned.

pub mod board;
pub mod engine;
pub mod eval;
pub mod rules;
pub mod search;
pub mod state;

// Re-export commonly used types for convenience
pub use board::{Board, Player, Pos, BOARD_SIZE};
pub use engine::{Difficulty, Engine, OpeningBook, Strategy};
pub use search::{SearchOutcome, Searcher};
pub use state::{GameSnapshot, GameState, MoveError};
