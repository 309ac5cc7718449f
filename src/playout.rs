//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays random legal moves until two consecutive passes (or the
//! length cap), then scores the result with [`fast_score`]. Playouts never
//! fill their own true eyes, so groups with two eyes survive them.

use fastrand::Rng;

use crate::board::{Board, Color, Coord};
use crate::constants::PLAYOUT_LEN_FACTOR;
use crate::moves::play_random_in_place;
use crate::score::fast_score;
use crate::termination::is_terminal;

/// Play the position out to the end, `to_play` moving first.
///
/// When `amaf` is given, the first color to play each point is recorded in it
/// (points already marked are left alone). Returns the final score, positive
/// when White wins.
pub fn playout(
    board: &mut Board,
    mut to_play: Color,
    rng: &mut Rng,
    mut amaf: Option<&mut [Option<Color>]>,
) -> f32 {
    let max_moves = board.moves() + board.size() * board.size() * PLAYOUT_LEN_FACTOR;

    while !is_terminal(board) && board.moves() < max_moves {
        let coord = play_random_in_place(board, to_play, rng);
        if let (Coord::Point(pt), Some(map)) = (coord, amaf.as_deref_mut()) {
            if map[pt].is_none() {
                map[pt] = Some(to_play);
            }
        }
        to_play = to_play.other();
    }

    fast_score(board)
}

/// Winner of a finished playout given its score.
#[inline]
pub fn winner(score: f32) -> Color {
    if score > 0.0 { Color::White } else { Color::Black }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playout_ends_the_game() {
        let mut board = Board::new(7).unwrap();
        let mut rng = Rng::with_seed(3);
        let score = playout(&mut board, Color::Black, &mut rng, None);
        assert!(is_terminal(&board) || board.moves() >= 7 * 7 * PLAYOUT_LEN_FACTOR);
        // Every point ends up as a stone or a one-color eye, plus komi
        assert!(score.abs() <= 49.0 + board.komi());
    }

    #[test]
    fn test_playout_records_amaf() {
        let mut board = Board::new(5).unwrap();
        let mut rng = Rng::with_seed(11);
        let mut amaf = vec![None; board.grid_len()];
        playout(&mut board, Color::Black, &mut rng, Some(&mut amaf));
        assert!(amaf.iter().any(|c| *c == Some(Color::Black)));
        assert!(amaf.iter().any(|c| *c == Some(Color::White)));
    }

    #[test]
    fn test_winner_follows_sign() {
        assert_eq!(winner(0.5), Color::White);
        assert_eq!(winner(-0.5), Color::Black);
    }
}
