//! End-of-game detection.

use crate::board::{Board, Coord};

/// Is the game over?
///
/// True when the last move is a resignation, or when the last two recorded
/// moves are both passes. A fresh board has no recorded moves, so it is never
/// terminal. Move-count caps are left to the host.
pub fn is_terminal(board: &Board) -> bool {
    match (board.last_move(), board.last_move2()) {
        (Some(last), _) if last.coord == Coord::Resign => true,
        (Some(last), Some(prev)) => last.coord.is_pass() && prev.coord.is_pass(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Move};
    use crate::moves::play_in_place;

    #[test]
    fn test_fresh_board_is_not_terminal() {
        for size in [1, 9, 19, 25] {
            assert!(!is_terminal(&Board::new(size).unwrap()));
        }
    }

    #[test]
    fn test_two_passes_end_the_game() {
        let mut board = Board::new(9).unwrap();
        play_in_place(&mut board, Move::pass(Color::Black)).unwrap();
        assert!(!is_terminal(&board));
        play_in_place(&mut board, Move::pass(Color::White)).unwrap();
        assert!(is_terminal(&board));
    }

    #[test]
    fn test_pass_move_pass_is_not_terminal() {
        let mut board = Board::new(9).unwrap();
        play_in_place(&mut board, Move::pass(Color::Black)).unwrap();
        let e5 = board.parse_coord("E5").unwrap();
        play_in_place(&mut board, Move::new(e5, Color::White)).unwrap();
        play_in_place(&mut board, Move::pass(Color::Black)).unwrap();
        assert!(!is_terminal(&board));
    }

    #[test]
    fn test_resign_ends_the_game() {
        let mut board = Board::new(9).unwrap();
        play_in_place(&mut board, Move::resign(Color::White)).unwrap();
        assert!(is_terminal(&board));
    }
}
