//! Threat-space move generation and ordering
//!
//! Search only considers empty cells within radius 2 of an existing
//! stone. Full-board branching makes depth-3+ search intractable at
//! 15×15; every move worth playing touches the existing fight.
//!
//! Ordering ladder, highest first:
//! 1. the transposition-table move hint;
//! 2. moves that win on the spot;
//! 3. moves that block an opponent win;
//! 4. attacking pattern score plus 0.9× the defending pattern score the
//!    move would create;
//! 5. a proximity bonus favoring cells near the action.

use crate::board::{Board, Player, Pos, AXES, BOARD_SIZE};
use crate::eval::patterns::{encode_window_with_move, PatternTable};
use crate::rules;

/// Candidate neighborhood radius around occupied cells.
const CANDIDATE_RADIUS: i32 = 2;

/// Ordering tiers. The heuristic tier below BLOCK stays under 100_000:
/// the largest attack+defense sum short of a five is an open four in all
/// four axes, well below the block tier, and five-makers are already
/// caught by the win tier.
const HINT_SCORE: i32 = 10_000_000;
const WIN_SCORE: i32 = 1_000_000;
const BLOCK_SCORE: i32 = 100_000;

/// Empty cells within radius 2 (both axes independently) of any stone.
/// An empty board yields only the center.
#[must_use]
pub fn candidates(board: &Board) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![Pos::center()];
    }

    let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];
    let mut moves = Vec::with_capacity(64);

    for stone in board.occupied() {
        for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
                let r = i32::from(stone.row) + dr;
                let c = i32::from(stone.col) + dc;
                if !Pos::is_valid(r, c) {
                    continue;
                }
                #[allow(clippy::cast_sign_loss)]
                let (ru, cu) = (r as usize, c as usize);
                if seen[ru][cu] {
                    continue;
                }
                seen[ru][cu] = true;

                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let pos = Pos::new(r as u8, c as u8);
                if board.is_empty(pos) {
                    moves.push(pos);
                }
            }
        }
    }

    moves
}

/// Would placing `side`'s stone at `pos` complete five in a row?
/// Speculative apply + terminal check + undo.
#[must_use]
pub fn creates_five(board: &mut Board, pos: Pos, side: Player) -> bool {
    board.place_stone(pos, side);
    let win = rules::check_win(board, pos, side);
    board.remove_stone(pos);
    win
}

/// Heuristic ordering value of a quiet move: the attacking patterns it
/// would create, 0.9× the opponent patterns it denies, and a bonus for
/// staying near existing stones.
#[must_use]
pub fn heuristic_score(board: &Board, pos: Pos, side: Player) -> i32 {
    let attack = pattern_sum(board, pos, side);
    let defense = pattern_sum(board, pos, side.opponent());
    attack + defense * 9 / 10 + proximity_bonus(board, pos)
}

/// Candidate moves ranked by the ordering ladder.
pub fn ordered_moves(board: &mut Board, side: Player, hint: Option<Pos>) -> Vec<(Pos, i32)> {
    let cands = candidates(board);
    let mut scored = Vec::with_capacity(cands.len());

    for pos in cands {
        let score = if hint == Some(pos) {
            HINT_SCORE
        } else if creates_five(board, pos, side) {
            WIN_SCORE
        } else if creates_five(board, pos, side.opponent()) {
            BLOCK_SCORE
        } else {
            heuristic_score(board, pos, side)
        };
        scored.push((pos, score));
    }

    scored.sort_unstable_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// Sum over the four axes of the pattern score `side` would hold in the
/// window centered at `pos` after playing there.
fn pattern_sum(board: &Board, pos: Pos, side: Player) -> i32 {
    let table = PatternTable::global();
    AXES.iter()
        .map(|&axis| {
            let code = encode_window_with_move(board, pos, axis, side);
            table.classify(code).0.score()
        })
        .sum()
}

/// `max(0, 10 − Manhattan distance to the nearest stone)`.
fn proximity_bonus(board: &Board, pos: Pos) -> i32 {
    let mut min_dist = i32::MAX;
    for stone in board.occupied() {
        min_dist = min_dist.min(pos.manhattan(stone));
    }
    if min_dist == i32::MAX {
        0
    } else {
        (10 - min_dist).max(0)
    }
}
