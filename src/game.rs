//! Engine-vs-engine games over one shared board.

use std::rc::Rc;

use tracing::{debug, info};

use crate::board::{Board, Color, Coord, Move};
use crate::engine::{Engine, SharedBoard};
use crate::error::Result;
use crate::moves::play_in_place;
use crate::playout::winner;
use crate::score::official_score;
use crate::termination::is_terminal;

/// One side of a game.
pub struct Player<'a> {
    pub engine: &'a mut Engine,
    /// Time control passed to every `generate_move`
    pub time_spec: &'a str,
}

/// How a finished game went.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<Move>,
    pub final_board: Board,
    /// Official score, positive for White; `None` after a resignation
    pub score: Option<f32>,
    pub winner: Color,
}

impl GameRecord {
    pub fn resigned(&self) -> bool {
        self.moves.last().is_some_and(|m| m.coord.is_resign())
    }
}

/// Play until the position is terminal or `max_moves` moves have been made.
///
/// Black moves first unless the board already has history. Every move is
/// applied to `board` and reported to both engines.
///
/// # Errors
/// Any engine error, or an illegal move returned by an engine.
pub fn play_game(
    board: &SharedBoard,
    black: Player<'_>,
    white: Player<'_>,
    max_moves: usize,
) -> Result<GameRecord> {
    let Player { engine: black, time_spec: black_time } = black;
    let Player { engine: white, time_spec: white_time } = white;
    debug_assert!(Rc::ptr_eq(board, black.board()) && Rc::ptr_eq(board, white.board()));

    let mut moves = Vec::new();
    let mut color = board.borrow().to_play();

    while moves.len() < max_moves && !is_terminal(&board.borrow()) {
        let (mover, time_spec) = match color {
            Color::Black => (&mut *black, black_time),
            Color::White => (&mut *white, white_time),
        };
        let coord = mover.generate_move(color, time_spec)?;
        let mv = Move::new(coord, color);
        play_in_place(&mut board.borrow_mut(), mv)?;
        debug!(
            n = moves.len() + 1,
            %color,
            mv = %board.borrow().coord_to_string(coord),
            "move played"
        );
        black.notify(coord, color)?;
        white.notify(coord, color)?;
        moves.push(mv);
        color = color.other();
    }

    let final_board = board.borrow().clone();
    let (score, winner) = match moves.last() {
        Some(Move {
            coord: Coord::Resign,
            color,
        }) => (None, color.other()),
        _ => {
            let score = official_score(&final_board);
            (Some(score), winner(score))
        }
    };
    info!(moves = moves.len(), ?score, %winner, "game over");

    Ok(GameRecord {
        moves,
        final_board,
        score,
        winner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shared;

    #[test]
    fn test_random_game_ends() {
        let board = shared(Board::new(5).unwrap());
        let mut black = Engine::new(Rc::clone(&board), "random", "seed=1").unwrap();
        let mut white = Engine::new(Rc::clone(&board), "random", "seed=2").unwrap();
        let record = play_game(
            &board,
            Player { engine: &mut black, time_spec: "" },
            Player { engine: &mut white, time_spec: "" },
            500,
        )
        .unwrap();

        assert!(!record.moves.is_empty());
        assert_eq!(record.final_board, *board.borrow());
        assert_eq!(record.moves[0].color, Color::Black);
        assert!(record.moves.windows(2).all(|w| w[0].color != w[1].color));
        assert!(!record.resigned());
        assert!(record.score.is_some());
    }

    #[test]
    fn test_move_cap() {
        let board = shared(Board::new(9).unwrap());
        let mut black = Engine::new(Rc::clone(&board), "random", "seed=3").unwrap();
        let mut white = Engine::new(Rc::clone(&board), "random", "seed=4").unwrap();
        let record = play_game(
            &board,
            Player { engine: &mut black, time_spec: "" },
            Player { engine: &mut white, time_spec: "" },
            10,
        )
        .unwrap();
        assert_eq!(record.moves.len(), 10);
        assert_eq!(board.borrow().moves(), 10);
    }
}
