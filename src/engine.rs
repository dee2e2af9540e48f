//! AI engine: difficulty levels, move strategies, and the opening-book
//! hook
//!
//! One polymorphic capability, [`Strategy::choose_move`], with three
//! concrete strategies behind it, selected by [`Difficulty`] at
//! construction time:
//!
//! - [`RandomStrategy`]: uniform over all legal cells
//! - [`PlainMinimax`]: fixed-depth alpha-beta, full-board evaluation
//! - [`OptimizedMinimax`]: the iterative-deepening searcher with
//!   transposition table and incremental evaluation
//!
//! The [`Engine`] facade consults an optional [`OpeningBook`] before
//! searching; a book hit skips the search for that turn. The engine
//! never renders, blocks on input, or owns any I/O.

use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::board::{Player, Pos, TOTAL_CELLS};
use crate::eval::Evaluator;
use crate::rules;
use crate::search::{movegen, Searcher, WIN};
use crate::state::GameState;

/// AI difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Difficulty::Easy => "Random moves - good for beginners",
            Difficulty::Medium => "Strategic AI - balanced gameplay",
            Difficulty::Hard => "Advanced AI - challenging opponent",
            Difficulty::Expert => "Master level - maximum challenge",
        }
    }
}

/// A move-choosing capability.
///
/// The strategy exclusively borrows the `GameState` for the duration of
/// the call and restores it before returning (make/unmake discipline).
/// Returns `None` only when no legal move exists.
pub trait Strategy {
    fn choose_move(&mut self, state: &mut GameState, budget: Duration) -> Option<Pos>;
}

/// External opening knowledge, consulted before any search. The engine
/// works without one; book content is not this crate's concern.
pub trait OpeningBook {
    /// Suggested reply for the given move sequence, if the book knows it.
    fn lookup(&self, moves: &[Pos]) -> Option<Pos>;
}

// =============================================================================
// Strategies
// =============================================================================

/// Uniformly random legal moves.
pub struct RandomStrategy {
    rng: Pcg64,
}

impl RandomStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Seeded variant for reproducible games.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn choose_move(&mut self, state: &mut GameState, _budget: Duration) -> Option<Pos> {
        if state.is_over() {
            return None;
        }
        let legal: Vec<Pos> = (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(|&p| state.board().is_empty(p))
            .collect();
        if legal.is_empty() {
            return None;
        }
        Some(legal[self.rng.gen_range(0..legal.len())])
    }
}

/// Fixed-depth alpha-beta minimax with full-board static evaluation.
///
/// No transposition table, no iterative deepening, proximity-only move
/// ordering; the budget parameter is ignored. The depth is small (2-4)
/// by construction, so a move completes quickly regardless.
pub struct PlainMinimax {
    depth: u8,
}

impl PlainMinimax {
    #[must_use]
    pub fn new(depth: u8) -> Self {
        Self {
            depth: depth.max(1),
        }
    }

    fn negamax(&self, state: &mut GameState, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        if state.is_over() {
            return match state.winner() {
                Some(_) => -(WIN + i32::from(depth)),
                None => 0,
            };
        }
        if depth == 0 {
            let score = Evaluator::static_score(state.board());
            return match state.side_to_move() {
                Player::Black => score,
                Player::White => -score,
            };
        }

        let moves = Self::moves_by_proximity(state);
        if moves.is_empty() {
            return 0;
        }

        let mut best = -(WIN * 2);
        for pos in moves {
            if state.apply_move(pos).is_err() {
                continue;
            }
            let score = -self.negamax(state, depth - 1, -beta, -alpha);
            let _ = state.undo_move(pos);

            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }

    /// Candidates sorted by distance to the nearest stone, closest first.
    fn moves_by_proximity(state: &GameState) -> Vec<Pos> {
        let mut moves = movegen::candidates(state.board());
        let board = state.board();
        moves.sort_by_key(|&pos| {
            board
                .occupied()
                .map(|stone| pos.manhattan(stone))
                .min()
                .unwrap_or(0)
        });
        moves
    }
}

impl Strategy for PlainMinimax {
    fn choose_move(&mut self, state: &mut GameState, _budget: Duration) -> Option<Pos> {
        if state.is_over() {
            return None;
        }
        let side = state.side_to_move();
        let moves = Self::moves_by_proximity(state);
        if moves.is_empty() {
            return None;
        }

        // Take a win on the spot, then block the opponent's
        for &pos in &moves {
            if movegen::creates_five(state.board_mut(), pos, side) {
                return Some(pos);
            }
        }
        for &pos in &moves {
            if movegen::creates_five(state.board_mut(), pos, side.opponent()) {
                return Some(pos);
            }
        }

        let mut best_move = moves[0];
        let mut best_score = -(WIN * 2);
        let mut alpha = -(WIN * 2);
        let beta = WIN * 2;

        for pos in moves {
            if state.apply_move(pos).is_err() {
                continue;
            }
            let score = -self.negamax(state, self.depth - 1, -beta, -alpha);
            let _ = state.undo_move(pos);

            if score > best_score {
                best_score = score;
                best_move = pos;
            }
            alpha = alpha.max(score);
        }

        Some(best_move)
    }
}

/// The full searcher: iterative deepening, transposition table,
/// incremental evaluation, threat-space ordering.
pub struct OptimizedMinimax {
    searcher: Searcher,
    max_depth: u8,
}

impl OptimizedMinimax {
    /// Default configuration: 16 MB table, depth 8.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(16, 8)
    }

    /// Custom transposition table size (MB) and depth cap.
    #[must_use]
    pub fn with_config(tt_size_mb: usize, max_depth: u8) -> Self {
        Self {
            searcher: Searcher::new(tt_size_mb),
            max_depth: max_depth.max(1),
        }
    }

    /// Forget cached search results (new game).
    pub fn clear(&mut self) {
        self.searcher.clear();
    }
}

impl Default for OptimizedMinimax {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for OptimizedMinimax {
    fn choose_move(&mut self, state: &mut GameState, budget: Duration) -> Option<Pos> {
        let outcome = self.searcher.search(state, budget, self.max_depth);
        debug!(
            "search: depth={} score={} nodes={} elapsed={:?}",
            outcome.depth, outcome.score, outcome.nodes, outcome.elapsed
        );
        outcome.best_move
    }
}

// =============================================================================
// Engine facade
// =============================================================================

/// Move-choosing engine for one AI player.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gomoku_core::{Difficulty, Engine, GameState, Pos};
///
/// let mut engine = Engine::new(Difficulty::Expert);
/// let mut state = GameState::new();
///
/// let mov = engine.choose_move(&mut state, Duration::from_millis(50));
/// assert_eq!(mov, Some(Pos::new(7, 7)));
/// ```
pub struct Engine {
    strategy: Box<dyn Strategy>,
    book: Option<Box<dyn OpeningBook>>,
}

impl Engine {
    /// Build an engine for a difficulty level.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        let strategy: Box<dyn Strategy> = match difficulty {
            Difficulty::Easy => Box::new(RandomStrategy::new()),
            Difficulty::Medium => Box::new(PlainMinimax::new(2)),
            Difficulty::Hard => Box::new(PlainMinimax::new(3)),
            Difficulty::Expert => Box::new(OptimizedMinimax::new()),
        };
        Self {
            strategy,
            book: None,
        }
    }

    /// Build an engine around a caller-supplied strategy.
    #[must_use]
    pub fn with_strategy(strategy: Box<dyn Strategy>) -> Self {
        Self {
            strategy,
            book: None,
        }
    }

    /// Attach an opening book.
    #[must_use]
    pub fn with_book(mut self, book: Box<dyn OpeningBook>) -> Self {
        self.book = Some(book);
        self
    }

    /// Choose a move for the side to move, or `None` when the game is
    /// over or no legal move exists.
    ///
    /// The opening book, when present, is consulted first; a legal book
    /// reply skips the search entirely for this turn.
    pub fn choose_move(&mut self, state: &mut GameState, budget: Duration) -> Option<Pos> {
        if state.is_over() {
            return None;
        }

        if let Some(book) = &self.book {
            if let Some(pos) = book.lookup(state.history()) {
                if rules::is_legal(state.board(), pos) {
                    debug!("opening book move: ({}, {})", pos.row, pos.col);
                    return Some(pos);
                }
            }
        }

        self.strategy.choose_move(state, budget)
    }
}
