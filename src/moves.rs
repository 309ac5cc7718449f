//! Move legality and move execution.
//!
//! Two legality predicates exist:
//! - [`is_valid_play`]: the point is empty and is not a ko retake.
//! - [`is_valid_play_no_suicide`]: additionally, the move is not suicide.
//!
//! Moves are applied in place with [`play_in_place`], or on a fresh clone with
//! [`play`]. The clone variants never touch the original board, so each
//! speculative continuation owns its own position and may be explored on its
//! own thread.

use fastrand::Rng;

use crate::board::{Board, Color, Coord, Move, Point, Stone};
use crate::error::{Error, MoveError, Result};

/// Permissive legality: empty point that does not retake a ko.
///
/// Suicide moves pass this check; applying them still fails.
pub fn is_valid_play(board: &Board, color: Color, pt: Point) -> bool {
    board.at(pt) == Stone::Empty && board.ko() != Some(Move::new(Coord::Point(pt), color))
}

/// Legality with suicide filtering.
pub fn is_valid_play_no_suicide(board: &Board, color: Color, pt: Point) -> bool {
    is_valid_play(board, color, pt) && !is_suicide(board, color, pt)
}

/// Would a stone of `color` at the empty point `pt` have no liberties after
/// captures are resolved?
pub fn is_suicide(board: &Board, color: Color, pt: Point) -> bool {
    let own = Stone::from(color);
    let enemy = Stone::from(color.other());
    for n in board.neighbors(pt) {
        match board.at(n) {
            Stone::Empty => return false,
            // `pt` is one of this group's liberties; it needs another one
            s if s == own && board.group_liberties(n) > 1 => return false,
            // playing here captures the neighbor
            s if s == enemy && board.group_liberties(n) == 1 => return false,
            _ => {}
        }
    }
    true
}

/// All legal moves for `color`: `pass` first, then every valid point in scan order.
pub fn legal_moves(board: &Board, color: Color, filter_suicides: bool) -> Vec<Coord> {
    let valid = if filter_suicides {
        is_valid_play_no_suicide
    } else {
        is_valid_play
    };
    std::iter::once(Coord::Pass)
        .chain(
            board
                .points()
                .filter(|&pt| valid(board, color, pt))
                .map(Coord::Point),
        )
        .collect()
}

/// Apply a move without building a diagnostic error.
///
/// On failure the board is left exactly as it was. On success returns the
/// number of stones captured.
pub(crate) fn try_play(board: &mut Board, mv: Move) -> std::result::Result<usize, MoveError> {
    let pt = match mv.coord {
        Coord::Pass | Coord::Resign => {
            board.ko = None;
            record(board, mv);
            return Ok(0);
        }
        Coord::Point(pt) => pt,
    };

    match board.at(pt) {
        Stone::Empty => {}
        Stone::Offboard => return Err(MoveError::OffBoard),
        Stone::Black | Stone::White => return Err(MoveError::Occupied),
    }
    if board.ko == Some(mv) {
        return Err(MoveError::Ko);
    }

    // Playing into an enemy eye and capturing one stone sets up a ko
    let in_enemy_eye = board.is_eyeish(pt) == Some(mv.color.other());
    let enemy = Stone::from(mv.color.other());

    board.grid[pt] = Stone::from(mv.color);
    let mut to_remove: Vec<Point> = Vec::new();
    for n in board.neighbors(pt) {
        if board.grid[n] == enemy && !to_remove.contains(&n) && board.group_liberties(n) == 0 {
            board.collect_group(n, &mut to_remove);
        }
    }

    if to_remove.is_empty() && board.group_liberties(pt) == 0 {
        board.grid[pt] = Stone::Empty;
        return Err(MoveError::Suicide);
    }

    for &r in &to_remove {
        board.grid[r] = Stone::Empty;
    }

    board.ko = match to_remove.as_slice() {
        [single] if in_enemy_eye => Some(Move::new(Coord::Point(*single), mv.color.other())),
        _ => None,
    };
    board.captures[mv.color.index()] += to_remove.len() as u32;
    record(board, mv);
    Ok(to_remove.len())
}

fn record(board: &mut Board, mv: Move) {
    board.last_move2 = board.last_move;
    board.last_move = Some(mv);
    board.moves += 1;
}

/// Play a move on `board`.
///
/// # Errors
/// [`Error::IllegalMove`] if the point is occupied or off the board, the move
/// retakes a ko, or it is suicide. The board is unchanged in that case.
pub fn play_in_place(board: &mut Board, mv: Move) -> Result<()> {
    try_play(board, mv).map(|_| ()).map_err(|reason| Error::IllegalMove {
        color: mv.color,
        coord: board.coord_to_string(mv.coord),
        reason,
        board: board.to_string(),
    })
}

/// Play a move on a clone of `board` and return the clone.
///
/// `board` itself is never modified, whether or not the move is legal.
pub fn play(board: &Board, mv: Move) -> Result<Board> {
    let mut next = board.clone();
    play_in_place(&mut next, mv)?;
    Ok(next)
}

/// Play a uniformly chosen move for `color` and return its coordinate.
///
/// Candidates are the empty points that are not `color`'s own true eyes;
/// they are tried in random order until one is legal. Passes when none is.
pub fn play_random_in_place(board: &mut Board, color: Color, rng: &mut Rng) -> Coord {
    let mut candidates: Vec<Point> = board
        .points()
        .filter(|&pt| board.at(pt) == Stone::Empty && board.is_eye(pt) != Some(color))
        .collect();

    // Partial Fisher-Yates: draw candidates one at a time until a legal one turns up
    let n = candidates.len();
    for i in 0..n {
        let j = i + rng.usize(..n - i);
        candidates.swap(i, j);
        let coord = Coord::Point(candidates[i]);
        if try_play(board, Move::new(coord, color)).is_ok() {
            return coord;
        }
    }

    let pass = Move::pass(color);
    // passing cannot fail
    let _ = try_play(board, pass);
    Coord::Pass
}

/// Clone `board`, play a random move for `color` on the clone, and return both.
pub fn play_random(board: &Board, color: Color, rng: &mut Rng) -> (Board, Coord) {
    let mut next = board.clone();
    let coord = play_random_in_place(&mut next, color, rng);
    (next, coord)
}
