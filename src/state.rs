//! Game state: board, side to move, history, and terminal status
//!
//! `GameState` is the single mutable position shared between the caller
//! and the search. All mutation goes through [`GameState::apply_move`]
//! and [`GameState::undo_move`]; the search temporarily mutates one
//! shared instance (make/unmake) rather than cloning the board per node.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, Player, Pos, TOTAL_CELLS};
use crate::rules;

/// Rejection reasons for a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("position is outside the board")]
    OutOfBounds,
    #[error("cell is already occupied")]
    Occupied,
    #[error("the game is already over")]
    GameOver,
    #[error("position is not the most recent move")]
    NotLastMove,
}

/// Full game position.
///
/// # Example
///
/// ```
/// use gomoku_core::{GameState, Player, Pos};
///
/// let mut state = GameState::new();
/// state.apply_move(Pos::new(7, 7)).unwrap();
/// assert_eq!(state.board().get(Pos::new(7, 7)), Some(Player::Black));
/// assert_eq!(state.side_to_move(), Player::White);
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Player,
    history: Vec<Pos>,
    winner: Option<Player>,
    over: bool,
}

/// Serializable snapshot of a game, consumed by external persistence.
/// The engine itself performs no file I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub moves: Vec<Pos>,
    pub side_to_move: Player,
    pub winner: Option<Player>,
    pub over: bool,
}

impl GameState {
    /// New game on an empty board, Black to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            side_to_move: Player::Black,
            history: Vec::with_capacity(TOTAL_CELLS),
            winner: None,
            over: false,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board access for search-internal speculative probes (win/block
    /// checks place and immediately remove a stone).
    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Moves played so far, in order. First entry is Black's.
    #[inline]
    pub fn history(&self) -> &[Pos] {
        &self.history
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Play a stone for the side to move.
    ///
    /// Rejects out-of-board and occupied targets without touching the
    /// state. Sets the terminal flag when the move completes five in a
    /// row or fills the board.
    pub fn apply_move(&mut self, pos: Pos) -> Result<(), MoveError> {
        if self.over {
            return Err(MoveError::GameOver);
        }
        if !Pos::is_valid(i32::from(pos.row), i32::from(pos.col)) {
            return Err(MoveError::OutOfBounds);
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied);
        }

        let mover = self.side_to_move;
        self.board.place_stone(pos, mover);
        self.history.push(pos);

        if rules::check_win(&self.board, pos, mover) {
            self.winner = Some(mover);
            self.over = true;
        } else if self.board.is_full() {
            self.over = true; // draw
        }

        self.side_to_move = mover.opponent();
        Ok(())
    }

    /// Retract the most recent move (search unmake).
    ///
    /// `pos` must be the last move played; a mismatch indicates a
    /// make/unmake pairing bug in the caller and is rejected.
    pub fn undo_move(&mut self, pos: Pos) -> Result<(), MoveError> {
        match self.history.last() {
            Some(&last) if last == pos => {}
            _ => return Err(MoveError::NotLastMove),
        }

        self.history.pop();
        self.board.remove_stone(pos);
        self.side_to_move = self.side_to_move.opponent();
        self.winner = None;
        self.over = false;
        Ok(())
    }

    /// Reset to an empty board.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Snapshot for external serialization.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            moves: self.history.clone(),
            side_to_move: self.side_to_move,
            winner: self.winner,
            over: self.over,
        }
    }

    /// Rebuild a state from a snapshot by replaying its move list.
    pub fn restore(snapshot: &GameSnapshot) -> Result<Self, MoveError> {
        let mut state = Self::new();
        for &pos in &snapshot.moves {
            state.apply_move(pos)?;
        }
        Ok(state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_alternates_sides() {
        let mut state = GameState::new();
        assert_eq!(state.side_to_move(), Player::Black);

        state.apply_move(Pos::new(7, 7)).unwrap();
        assert_eq!(state.side_to_move(), Player::White);

        state.apply_move(Pos::new(7, 8)).unwrap();
        assert_eq!(state.side_to_move(), Player::Black);
        assert_eq!(state.history(), &[Pos::new(7, 7), Pos::new(7, 8)]);
    }

    #[test]
    fn test_occupied_rejected() {
        let mut state = GameState::new();
        state.apply_move(Pos::new(7, 7)).unwrap();
        assert_eq!(state.apply_move(Pos::new(7, 7)), Err(MoveError::Occupied));
        // Rejection leaves the state untouched
        assert_eq!(state.side_to_move(), Player::White);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_win_sets_terminal() {
        let mut state = GameState::new();
        // Black plays (7,3)..(7,7), White answers far away
        for i in 0..4 {
            state.apply_move(Pos::new(7, 3 + i)).unwrap();
            state.apply_move(Pos::new(0, i)).unwrap();
        }
        state.apply_move(Pos::new(7, 7)).unwrap();

        assert!(state.is_over());
        assert_eq!(state.winner(), Some(Player::Black));
        assert_eq!(state.apply_move(Pos::new(10, 10)), Err(MoveError::GameOver));
    }

    #[test]
    fn test_undo_restores_state() {
        let mut state = GameState::new();
        state.apply_move(Pos::new(7, 7)).unwrap();
        state.apply_move(Pos::new(8, 8)).unwrap();

        state.undo_move(Pos::new(8, 8)).unwrap();
        assert_eq!(state.side_to_move(), Player::White);
        assert!(state.board().is_empty(Pos::new(8, 8)));

        state.undo_move(Pos::new(7, 7)).unwrap();
        assert_eq!(state.side_to_move(), Player::Black);
        assert!(state.board().is_board_empty());
    }

    #[test]
    fn test_undo_clears_terminal() {
        let mut state = GameState::new();
        for i in 0..4 {
            state.apply_move(Pos::new(7, 3 + i)).unwrap();
            state.apply_move(Pos::new(0, i)).unwrap();
        }
        state.apply_move(Pos::new(7, 7)).unwrap();
        assert!(state.is_over());

        state.undo_move(Pos::new(7, 7)).unwrap();
        assert!(!state.is_over());
        assert_eq!(state.winner(), None);
        assert_eq!(state.side_to_move(), Player::Black);
    }

    #[test]
    fn test_undo_wrong_pos_rejected() {
        let mut state = GameState::new();
        state.apply_move(Pos::new(7, 7)).unwrap();
        assert!(state.undo_move(Pos::new(0, 0)).is_err());
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = GameState::new();
        state.apply_move(Pos::new(7, 7)).unwrap();
        state.apply_move(Pos::new(8, 8)).unwrap();
        state.apply_move(Pos::new(7, 8)).unwrap();

        let snap = state.snapshot();
        let restored = GameState::restore(&snap).unwrap();

        assert_eq!(restored.snapshot(), snap);
        assert_eq!(restored.side_to_move(), state.side_to_move());
        for pos in state.history() {
            assert_eq!(restored.board().get(*pos), state.board().get(*pos));
        }
    }
}
