//! Game rules: move legality and five-in-a-row win detection
//!
//! The search core consults these for terminal checks; everything else
//! (input handling, UI validation) lives outside this crate.

use crate::board::{Board, Player, Pos, AXES};

/// A move is legal when the target cell is on the board and empty.
#[inline]
#[must_use]
pub fn is_legal(board: &Board, pos: Pos) -> bool {
    Pos::is_valid(i32::from(pos.row), i32::from(pos.col)) && board.is_empty(pos)
}

/// Check whether the stone at `pos` completes five or more in a row
/// for `player`, in any of the four axes.
///
/// Only lines through `pos` are examined, so this is meant to be called
/// right after a stone is placed there.
#[must_use]
pub fn check_win(board: &Board, pos: Pos, player: Player) -> bool {
    for &axis in &AXES {
        let mut count = 1; // the stone at pos itself

        // Scan both ways from pos
        for sign in [1i32, -1] {
            let mut k = sign;
            while let Some(p) = pos.offset(axis, k) {
                if board.get(p) != Some(player) {
                    break;
                }
                count += 1;
                k += sign;
            }
        }

        if count >= 5 {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_legal() {
        let mut board = Board::new();
        let pos = Pos::new(7, 7);

        assert!(is_legal(&board, pos));
        board.place_stone(pos, Player::Black);
        assert!(!is_legal(&board, pos));
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        for col in 3..8 {
            board.place_stone(Pos::new(7, col), Player::Black);
        }

        // Every stone of the line sees the win
        for col in 3..8 {
            assert!(check_win(&board, Pos::new(7, col), Player::Black));
        }
        assert!(!check_win(&board, Pos::new(7, 3), Player::White));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for row in 0..5 {
            board.place_stone(Pos::new(row, 14), Player::White);
        }
        assert!(check_win(&board, Pos::new(2, 14), Player::White));
    }

    #[test]
    fn test_diagonal_wins() {
        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(5 + i, 5 + i), Player::Black);
        }
        assert!(check_win(&board, Pos::new(7, 7), Player::Black));

        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(10 - i, 2 + i), Player::White);
        }
        assert!(check_win(&board, Pos::new(8, 4), Player::White));
    }

    #[test]
    fn test_four_is_not_a_win() {
        let mut board = Board::new();
        for col in 3..7 {
            board.place_stone(Pos::new(7, col), Player::Black);
        }
        assert!(!check_win(&board, Pos::new(7, 4), Player::Black));
    }

    #[test]
    fn test_overline_counts() {
        // Six in a row is still a win (overlines allowed)
        let mut board = Board::new();
        for col in 2..8 {
            board.place_stone(Pos::new(0, col), Player::Black);
        }
        assert!(check_win(&board, Pos::new(0, 5), Player::Black));
    }

    #[test]
    fn test_broken_line_is_not_a_win() {
        let mut board = Board::new();
        for col in [3, 4, 5, 7, 8] {
            board.place_stone(Pos::new(7, col), Player::Black);
        }
        board.place_stone(Pos::new(7, 6), Player::White);
        assert!(!check_win(&board, Pos::new(7, 5), Player::Black));
        assert!(!check_win(&board, Pos::new(7, 7), Player::Black));
    }
}
