//! Incremental position evaluation
//!
//! The evaluator maintains, for every (cell, axis) pair, the last
//! classified pattern pair of the 9-cell window centered there, plus a
//! running aggregate score. Placing or removing a stone only touches the
//! windows that contain it, at most 9 per axis, so leaf evaluation
//! during search is O(1) instead of a full-board rescan.
//!
//! The aggregate is kept Black-positive: the sum over all 4x225 windows
//! of `score(black pattern) - score(white pattern)`. [`Evaluator::score_for`]
//! flips the sign for White, which keeps the value symmetric between the
//! sides as negamax requires.
//!
//! Undo must restore the aggregate bit-for-bit: the search discards
//! millions of speculative moves, and any drift would corrupt every
//! evaluation that follows.

use crate::board::{Board, Player, Pos, AXES, TOTAL_CELLS};

use super::patterns::{encode_window, Pattern, PatternTable, WINDOW_RADIUS};

/// Pattern pair of one window: the classification for each side's stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternPair {
    pub black: Pattern,
    pub white: Pattern,
}

impl PatternPair {
    const EMPTY: PatternPair = PatternPair {
        black: Pattern::None,
        white: Pattern::None,
    };

    /// Window score contribution, Black-positive.
    #[inline]
    fn net(self) -> i32 {
        self.black.score() - self.white.score()
    }
}

/// Undo token recording exactly what an apply displaced.
#[derive(Debug)]
pub struct EvalToken {
    pos: Pos,
    saved: Vec<(u16, u8, PatternPair)>,
    prev_score: i32,
}

/// Incrementally maintained potential-lines map and board score.
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Pattern pair per (cell, axis) window.
    lines: Vec<[PatternPair; 4]>,
    /// Running aggregate, Black-positive.
    score: i32,
}

impl Evaluator {
    /// Build an evaluator for the current board contents.
    #[must_use]
    pub fn new(board: &Board) -> Self {
        let mut eval = Self {
            lines: vec![[PatternPair::EMPTY; 4]; TOTAL_CELLS],
            score: 0,
        };
        eval.rebuild(board);
        eval
    }

    /// Recompute every window from scratch. Used at construction, after
    /// externally applied moves, and as the recovery path for a
    /// corrupted undo token.
    pub fn rebuild(&mut self, board: &Board) {
        let table = PatternTable::global();
        self.score = 0;
        for idx in 0..TOTAL_CELLS {
            let center = Pos::from_index(idx);
            for (axis_idx, &axis) in AXES.iter().enumerate() {
                let pair = window_pair(table, board, center, axis);
                self.lines[idx][axis_idx] = pair;
                self.score += pair.net();
            }
        }
    }

    /// Current board score from `side`'s perspective. O(1).
    #[inline]
    #[must_use]
    pub fn score_for(&self, side: Player) -> i32 {
        match side {
            Player::Black => self.score,
            Player::White => -self.score,
        }
    }

    /// Account for a stone just placed at `pos` (the board already
    /// contains it). Returns the token that [`Evaluator::undo`] needs
    /// for exact reversal.
    #[must_use]
    pub fn apply(&mut self, board: &Board, pos: Pos) -> EvalToken {
        let table = PatternTable::global();
        let mut token = EvalToken {
            pos,
            saved: Vec::with_capacity(4 * (2 * WINDOW_RADIUS as usize + 1)),
            prev_score: self.score,
        };

        for (axis_idx, &axis) in AXES.iter().enumerate() {
            for k in -WINDOW_RADIUS..=WINDOW_RADIUS {
                let Some(center) = pos.offset(axis, k) else {
                    continue;
                };
                let idx = center.to_index();
                let old = self.lines[idx][axis_idx];
                let new = window_pair(table, board, center, axis);
                self.score += new.net() - old.net();
                self.lines[idx][axis_idx] = new;
                token.saved.push((idx as u16, axis_idx as u8, old));
            }
        }

        token
    }

    /// Reverse a matching [`Evaluator::apply`] (the stone has already
    /// been removed from the board).
    ///
    /// A token/position mismatch means the make/unmake pairing broke;
    /// that state is unrecoverable incrementally, so the map is rebuilt
    /// from the board instead of silently drifting.
    pub fn undo(&mut self, board: &Board, pos: Pos, token: EvalToken) {
        if token.pos != pos {
            log::error!(
                "evaluator undo token mismatch: expected {:?}, got {:?}; rebuilding",
                token.pos,
                pos
            );
            self.rebuild(board);
            return;
        }

        for &(idx, axis_idx, old) in token.saved.iter().rev() {
            self.lines[idx as usize][axis_idx as usize] = old;
        }
        self.score = token.prev_score;
    }

    /// Full-board score computed from scratch, Black-positive. The
    /// plain-minimax strategy evaluates leaves with this directly.
    #[must_use]
    pub fn static_score(board: &Board) -> i32 {
        let table = PatternTable::global();
        let mut score = 0;
        for idx in 0..TOTAL_CELLS {
            let center = Pos::from_index(idx);
            for &axis in &AXES {
                score += window_pair(table, board, center, axis).net();
            }
        }
        score
    }
}

/// Classify one window for both sides.
///
/// Each side is encoded from its own perspective: off-board cells encode
/// as blockers, and they must block both sides, so the swapped half of a
/// single table entry cannot be reused near an edge.
#[inline]
fn window_pair(table: &PatternTable, board: &Board, center: Pos, axis: (i8, i8)) -> PatternPair {
    PatternPair {
        black: table
            .classify(encode_window(board, center, axis, Player::Black))
            .0,
        white: table
            .classify(encode_window(board, center, axis, Player::White))
            .0,
    }
}
