//! Scoring.
//!
//! Scores are signed from White's point of view: positive means White is
//! ahead, negative means Black is ahead. Komi is always included.

use crate::board::{Board, Point, Stone};
use crate::ownermap::dead_groups;

/// Cheap area estimate without dead-stone removal.
///
/// Counts stones, plus empty points whose on-board neighbors all belong to
/// one color. Used inside playouts and search.
pub fn fast_score(board: &Board) -> f32 {
    let mut s = board.komi();
    for pt in board.points() {
        let owner = match board.at(pt) {
            Stone::Empty => board.is_eyeish(pt).map(Stone::from),
            stone => Some(stone),
        };
        match owner {
            Some(Stone::White) => s += 1.0,
            Some(Stone::Black) => s -= 1.0,
            _ => {}
        }
    }
    s
}

/// End-of-game area score with dead groups removed.
///
/// Dead groups are judged from a freshly estimated ownership map.
pub fn official_score(board: &Board) -> f32 {
    let dead = dead_groups(board, None);
    official_score_with(board, &dead)
}

/// Area score after removing the stones at `dead`.
///
/// Stones count for their color; each empty region counts for a color when
/// every stone bordering it has that color.
pub fn official_score_with(board: &Board, dead: &[Point]) -> f32 {
    let mut grid: Vec<Stone> = (0..board.grid_len()).map(|pt| board.at(pt)).collect();
    for &pt in dead {
        grid[pt] = Stone::Empty;
    }

    let mut s = board.komi();
    let mut seen = vec![false; grid.len()];
    for start in board.points() {
        match grid[start] {
            Stone::White => s += 1.0,
            Stone::Black => s -= 1.0,
            Stone::Empty if !seen[start] => {
                let (region, borders) = flood_region(board, &grid, start, &mut seen);
                match (borders[0], borders[1]) {
                    (true, false) => s -= region as f32,
                    (false, true) => s += region as f32,
                    _ => {}
                }
            }
            _ => {}
        }
    }
    s
}

/// Flood the empty region at `start`. Returns its size and whether it
/// touches [black, white] stones.
fn flood_region(board: &Board, grid: &[Stone], start: Point, seen: &mut [bool]) -> (usize, [bool; 2]) {
    let mut stack = vec![start];
    let mut borders = [false; 2];
    let mut size = 0;
    seen[start] = true;

    while let Some(pt) = stack.pop() {
        size += 1;
        for n in board.neighbors(pt) {
            match grid[n] {
                Stone::Empty if !seen[n] => {
                    seen[n] = true;
                    stack.push(n);
                }
                Stone::Black => borders[0] = true,
                Stone::White => borders[1] = true,
                _ => {}
            }
        }
    }
    (size, borders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Move};
    use crate::moves::play_in_place;

    fn put(board: &mut Board, stones: &[&str], color: Color) {
        for s in stones {
            let coord = board.parse_coord(s).unwrap();
            play_in_place(board, Move::new(coord, color)).unwrap();
        }
    }

    #[test]
    fn test_empty_board_scores_komi() {
        let board = Board::new(9).unwrap();
        assert_eq!(fast_score(&board), 7.5);
        assert_eq!(official_score_with(&board, &[]), 7.5);
    }

    #[test]
    fn test_fast_score_counts_stones_and_eyes() {
        let mut board = Board::new(9).unwrap();
        board.set_komi(0.0);
        put(&mut board, &["A2", "B1"], Color::Black);
        // two stones plus the A1 eye
        assert_eq!(fast_score(&board), -3.0);
    }

    #[test]
    fn test_official_score_counts_regions() {
        let mut board = Board::new(3).unwrap();
        board.set_komi(0.5);
        put(&mut board, &["B1", "B2", "B3"], Color::White);
        // whole board is white area
        assert_eq!(official_score_with(&board, &[]), 9.5);
        // the A and C columns are not eye-like point by point
        assert_eq!(fast_score(&board), 3.5);
    }

    #[test]
    fn test_dead_stones_become_territory() {
        let mut board = Board::new(3).unwrap();
        board.set_komi(0.0);
        put(&mut board, &["B1", "B2", "B3"], Color::White);
        put(&mut board, &["A1"], Color::Black);
        let a1 = board.parse_coord("A1").unwrap().point().unwrap();
        // A1 black stone, A2 neutral: white 3 stones + C column 3
        assert_eq!(official_score_with(&board, &[]), 6.0 - 1.0);
        assert_eq!(official_score_with(&board, &[a1]), 9.0);
    }
}
