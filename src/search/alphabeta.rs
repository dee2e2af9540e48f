//! Iterative-deepening alpha-beta search
//!
//! The searcher runs depth 1, 2, 3, ... under a wall-clock budget,
//! keeping the best move of the last fully completed depth. The time
//! check is cooperative and coarse (once per node), so the worst-case
//! overrun is roughly one node's remaining work. A depth abandoned
//! mid-search is discarded entirely: a partially evaluated depth can
//! prefer a worse move than the completed depth before it.
//!
//! Search state (board, incremental score, hash) lives in one
//! exclusively borrowed `GameState` plus the searcher's evaluator and
//! running hash, mutated by make/unmake around each recursion. Nothing
//! is cloned per node.

use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Pos};
use crate::eval::Evaluator;
use crate::state::GameState;

use super::movegen;
use super::tt::{Bound, TranspositionTable, TtStats};
use super::zobrist::ZobristTable;

/// Score of a proven win. The incremental evaluation sums pattern scores
/// over every covering window, so pattern sums can exceed the raw Five
/// constant; WIN sits above anything a non-terminal position can reach.
pub const WIN: i32 = 1_000_000;

/// Alpha-beta infinity, outside every reachable score.
const INF: i32 = WIN + 256;

/// Result of one search call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best move found, `None` only when no empty cell exists
    pub best_move: Option<Pos>,
    /// Score of the best move, side-to-move perspective
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u8,
    /// Nodes visited
    pub nodes: u64,
    /// Wall-clock time consumed
    pub elapsed: Duration,
    /// Transposition-table counters for this call
    pub tt: TtStats,
}

/// Alpha-beta searcher with transposition table and incremental
/// evaluation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gomoku_core::search::Searcher;
/// use gomoku_core::{GameState, Pos};
///
/// let mut searcher = Searcher::new(16); // 16 MB transposition table
/// let mut state = GameState::new();
///
/// let outcome = searcher.search(&mut state, Duration::from_millis(50), 4);
/// assert_eq!(outcome.best_move, Some(Pos::new(7, 7)));
/// ```
pub struct Searcher {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    eval: Evaluator,
    hash: u64,
    nodes: u64,
    deadline: Instant,
    stopped: bool,
}

impl Searcher {
    /// Create a searcher with the given transposition table size in
    /// megabytes.
    #[must_use]
    pub fn new(tt_size_mb: usize) -> Self {
        Self {
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(tt_size_mb),
            eval: Evaluator::new(&Board::new()),
            hash: 0,
            nodes: 0,
            deadline: Instant::now(),
            stopped: false,
        }
    }

    /// Forget cached search results (new game).
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    /// Find the best move for the side to move.
    ///
    /// Runs iterative deepening up to `max_depth` within `budget`.
    /// Returns `None` as the best move only when the position has no
    /// empty cell; a zero budget still yields the best immediately
    /// generated candidate.
    pub fn search(
        &mut self,
        state: &mut GameState,
        budget: Duration,
        max_depth: u8,
    ) -> SearchOutcome {
        let start = Instant::now();
        self.deadline = start + budget;
        self.stopped = false;
        self.nodes = 0;

        // The position may have changed outside the searcher since the
        // last call; rebuild the incremental state once, then maintain
        // it move by move.
        self.eval.rebuild(state.board());
        self.hash = self.zobrist.hash(state.board());

        let side = state.side_to_move();
        let hint = self.tt.lookup(self.hash, u8::MAX, -INF, INF).1;
        let root_moves = movegen::ordered_moves(state.board_mut(), side, hint);

        if state.is_over() || root_moves.is_empty() {
            return self.outcome(None, 0, 0, start);
        }

        // Immediate win: play it without searching
        for &(pos, _) in &root_moves {
            if movegen::creates_five(state.board_mut(), pos, side) {
                return self.outcome(Some(pos), WIN, 0, start);
            }
        }
        // Opponent would win there next turn: block without searching
        for &(pos, _) in &root_moves {
            if movegen::creates_five(state.board_mut(), pos, side.opponent()) {
                return self.outcome(Some(pos), 0, 0, start);
            }
        }

        // Fallback before any depth completes: the top-ordered candidate
        let mut best_move = root_moves[0].0;
        let mut best_score = 0;
        let mut completed_depth = 0u8;

        for depth in 1..=max_depth {
            if self.check_time() {
                break;
            }

            let (mov, score) = self.search_root(state, depth);
            if self.stopped {
                break; // partial depth: keep the previous result
            }
            if let Some(mov) = mov {
                best_move = mov;
                best_score = score;
                completed_depth = depth;
            }

            debug!(
                "depth {} complete: best=({},{}) score={} nodes={}",
                depth, best_move.row, best_move.col, best_score, self.nodes
            );

            if best_score >= WIN {
                break; // forced win found; deeper search cannot improve it
            }
        }

        self.outcome(Some(best_move), best_score, completed_depth, start)
    }

    fn outcome(
        &self,
        best_move: Option<Pos>,
        score: i32,
        depth: u8,
        start: Instant,
    ) -> SearchOutcome {
        SearchOutcome {
            best_move,
            score,
            depth,
            nodes: self.nodes,
            elapsed: start.elapsed(),
            tt: self.tt.stats(),
        }
    }

    /// One full-window root iteration.
    fn search_root(&mut self, state: &mut GameState, depth: u8) -> (Option<Pos>, i32) {
        let side = state.side_to_move();
        let root_hash = self.hash;
        let hint = self.tt.lookup(root_hash, depth, -INF, INF).1;
        let moves = movegen::ordered_moves(state.board_mut(), side, hint);

        let mut alpha = -INF;
        let beta = INF;
        let mut best_move = None;
        let mut best_score = -INF;

        for (pos, _) in moves {
            let Some(token) = self.make(state, pos) else {
                continue;
            };
            let score = -self.negamax(state, depth - 1, -beta, -alpha);
            self.unmake(state, pos, token);

            if self.stopped {
                break;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(pos);
            }
            alpha = alpha.max(score);
        }

        if !self.stopped {
            // Root searches the full window, so the result is exact
            self.tt.store(root_hash, depth, best_score, Bound::Exact, best_move);
        }

        (best_move, best_score)
    }

    /// Recursive alpha-beta with negamax formulation.
    fn negamax(&mut self, state: &mut GameState, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        // Sole cancellation point: once per node
        if self.check_time() {
            return 0;
        }

        // The move leading here may have ended the game. A set winner is
        // always the player who just moved, i.e. a loss for the side to
        // move; the remaining depth makes shallower wins worth more.
        if state.is_over() {
            return match state.winner() {
                Some(_) => -(WIN + i32::from(depth)),
                None => 0, // board full, draw
            };
        }

        if depth == 0 {
            return self.eval.score_for(state.side_to_move());
        }

        let node_hash = self.hash;
        let (tt_score, hint) = self.tt.lookup(node_hash, depth, alpha, beta);
        if let Some(score) = tt_score {
            return score;
        }

        let side = state.side_to_move();
        let moves = movegen::ordered_moves(state.board_mut(), side, hint);
        if moves.is_empty() {
            return 0; // nothing left in threat space: draw
        }

        let mut best_score = -INF;
        let mut best_move = None;
        let mut bound = Bound::Upper;

        for (pos, _) in moves {
            let Some(token) = self.make(state, pos) else {
                continue;
            };
            let score = -self.negamax(state, depth - 1, -beta, -alpha);
            self.unmake(state, pos, token);

            if self.stopped {
                return 0;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(pos);
            }
            if score >= beta {
                bound = Bound::Lower;
                break;
            }
            if score > alpha {
                alpha = score;
                bound = Bound::Exact;
            }
        }

        self.tt.store(node_hash, depth, best_score, bound, best_move);
        best_score
    }

    /// Apply a move and bring evaluator + hash along in lockstep.
    /// Candidate moves are always legal; a rejected move is skipped.
    fn make(&mut self, state: &mut GameState, pos: Pos) -> Option<crate::eval::EvalToken> {
        let side = state.side_to_move();
        state.apply_move(pos).ok()?;
        let token = self.eval.apply(state.board(), pos);
        self.hash = self.zobrist.toggle(self.hash, pos, side);
        Some(token)
    }

    /// Reverse a matching [`Searcher::make`].
    fn unmake(&mut self, state: &mut GameState, pos: Pos, token: crate::eval::EvalToken) {
        let mover = state.side_to_move().opponent();
        if state.undo_move(pos).is_ok() {
            self.hash = self.zobrist.toggle(self.hash, pos, mover);
            self.eval.undo(state.board(), pos, token);
        }
    }

    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.stopped && Instant::now() >= self.deadline {
            self.stopped = true;
        }
        self.stopped
    }
}
