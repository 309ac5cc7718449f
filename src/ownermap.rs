//! Statistical ownership estimation and dead-group judgement.
//!
//! An [`OwnerMap`] counts, over a number of random playouts from one board
//! snapshot, who ends up owning each point: the color of the stone on it, or
//! the color surrounding it for an empty eye-like point. A point is *sure*
//! for a color when that color owns it in at least `threshold` of the
//! playouts. A group is dead when all of its points are sure for the
//! opponent.
//!
//! A map belongs to exactly one scoring call; it is never cached across
//! positions.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::board::{Board, Color, Point, Stone};
use crate::constants::{GJ_MINGAMES, GJ_THRES, OWNERMAP_PLAYOUTS};
use crate::playout::playout;

/// Per-point ownership counts collected from playouts.
#[derive(Debug, Clone)]
pub struct OwnerMap {
    playouts: u32,
    /// Indexed by point: [unowned, black, white]
    counts: Vec<[u32; 3]>,
}

/// Verdict for a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointJudgement {
    /// Too few playouts to say anything
    Unknown,
    /// Contested or neutral
    Dame,
    Sure(Color),
}

/// Verdict for a group of stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Unknown,
    Alive,
    Dead,
}

/// Tunables for turning ownership counts into verdicts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupJudge {
    /// Share of playouts a color must own a point in for it to be sure
    pub threshold: f32,
    /// Minimum playouts before any point is judged
    pub min_playouts: u32,
}

impl Default for GroupJudge {
    fn default() -> Self {
        Self {
            threshold: GJ_THRES,
            min_playouts: GJ_MINGAMES,
        }
    }
}

fn owner_slot(stone: Stone) -> usize {
    match stone {
        Stone::Black => 1,
        Stone::White => 2,
        Stone::Empty | Stone::Offboard => 0,
    }
}

impl OwnerMap {
    /// An empty map sized for `board`.
    pub fn new(board: &Board) -> Self {
        Self {
            playouts: 0,
            counts: vec![[0; 3]; board.grid_len()],
        }
    }

    /// Run `playouts` random games from `board` and collect ownership.
    pub fn estimate(board: &Board, playouts: u32, rng: &mut Rng) -> Self {
        let mut map = Self::new(board);
        let to_play = board.to_play();
        for _ in 0..playouts {
            let mut scratch = board.clone();
            playout(&mut scratch, to_play, rng, None);
            map.fill(&scratch);
        }
        trace!(playouts, size = board.size(), "ownership map estimated");
        map
    }

    /// Record one finished position.
    pub fn fill(&mut self, finished: &Board) {
        for pt in finished.points() {
            let owner = match finished.at(pt) {
                Stone::Empty => finished.is_eyeish(pt).map_or(Stone::Empty, Stone::from),
                stone => stone,
            };
            self.counts[pt][owner_slot(owner)] += 1;
        }
        self.playouts += 1;
    }

    pub fn playouts(&self) -> u32 {
        self.playouts
    }

    /// Number of playouts in which `owner` held `pt`.
    pub fn count(&self, pt: Point, owner: Stone) -> u32 {
        self.counts[pt][owner_slot(owner)]
    }

    pub fn judge_point(&self, pt: Point, judge: &GroupJudge) -> PointJudgement {
        if self.playouts < judge.min_playouts || self.playouts == 0 {
            return PointJudgement::Unknown;
        }
        let needed = self.playouts as f32 * judge.threshold;
        let [_, black, white] = self.counts[pt];
        if black as f32 >= needed {
            PointJudgement::Sure(Color::Black)
        } else if white as f32 >= needed {
            PointJudgement::Sure(Color::White)
        } else {
            PointJudgement::Dame
        }
    }

    /// Judge the group at `stones`, all of which belong to `color`.
    pub fn judge_group(&self, stones: &[Point], color: Color, judge: &GroupJudge) -> GroupStatus {
        let mut dead = true;
        let mut alive = true;
        for &pt in stones {
            match self.judge_point(pt, judge) {
                PointJudgement::Unknown => return GroupStatus::Unknown,
                PointJudgement::Sure(c) if c == color => dead = false,
                PointJudgement::Sure(_) => alive = false,
                PointJudgement::Dame => {
                    dead = false;
                    alive = false;
                }
            }
        }
        match (dead, alive) {
            (true, false) => GroupStatus::Dead,
            (false, true) => GroupStatus::Alive,
            _ => GroupStatus::Unknown,
        }
    }
}

/// Build a fresh ownership map for `board` with the default number of playouts.
pub fn ownership_map(board: &Board) -> OwnerMap {
    OwnerMap::estimate(board, OWNERMAP_PLAYOUTS, &mut Rng::new())
}

/// Stones of all dead groups, in scan order.
///
/// Computes an ownership map on the spot when `ownermap` is `None`.
pub fn dead_groups(board: &Board, ownermap: Option<&OwnerMap>) -> Vec<Point> {
    dead_groups_with(board, ownermap, &GroupJudge::default())
}

/// [`dead_groups`] with explicit judgement tunables.
pub fn dead_groups_with(board: &Board, ownermap: Option<&OwnerMap>, judge: &GroupJudge) -> Vec<Point> {
    let computed;
    let map = match ownermap {
        Some(map) => map,
        None => {
            computed = ownership_map(board);
            &computed
        }
    };

    let mut seen = vec![false; board.grid_len()];
    let mut dead = Vec::new();
    for pt in board.points() {
        let Some(color) = board.at(pt).color() else {
            continue;
        };
        if seen[pt] {
            continue;
        }
        let mut group = Vec::new();
        board.collect_group(pt, &mut group);
        for &g in &group {
            seen[g] = true;
        }
        if map.judge_group(&group, color, judge) == GroupStatus::Dead {
            dead.extend_from_slice(&group);
        }
    }
    dead.sort_unstable();
    debug!(dead = dead.len(), playouts = map.playouts(), "dead groups judged");
    dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;
    use crate::moves::play_in_place;

    #[test]
    fn test_under_sampled_map_judges_nothing() {
        let board = Board::new(5).unwrap();
        let map = OwnerMap::estimate(&board, 3, &mut Rng::with_seed(1));
        let judge = GroupJudge::default();
        for pt in board.points() {
            assert_eq!(map.judge_point(pt, &judge), PointJudgement::Unknown);
        }
    }

    #[test]
    fn test_fill_counts_stones_and_eyes() {
        let mut board = Board::new(3).unwrap();
        let b2 = board.parse_coord("B2").unwrap();
        play_in_place(&mut board, Move::new(b2, Color::White)).unwrap();
        for s in ["A2", "B1", "B3", "C2"] {
            let coord = board.parse_coord(s).unwrap();
            play_in_place(&mut board, Move::new(coord, Color::Black)).unwrap();
        }
        // B2 captured; A1 is a black eye, B2 is black-surrounded
        let mut map = OwnerMap::new(&board);
        map.fill(&board);
        let judge = GroupJudge { threshold: 0.8, min_playouts: 1 };
        let a1 = board.parse_coord("A1").unwrap().point().unwrap();
        let b2 = b2.point().unwrap();
        assert_eq!(map.judge_point(a1, &judge), PointJudgement::Sure(Color::Black));
        assert_eq!(map.judge_point(b2, &judge), PointJudgement::Sure(Color::Black));
        assert_eq!(map.count(b2, Stone::White), 0);
        assert_eq!(board.at(b2), Stone::Empty);
    }

    #[test]
    fn test_group_status() {
        let board = Board::new(3).unwrap();
        let mut map = OwnerMap::new(&board);
        let a1 = board.point_xy(1, 1).unwrap();
        map.counts[a1] = [0, 1, 9];
        map.playouts = 10;
        let judge = GroupJudge { threshold: 0.8, min_playouts: 5 };
        assert_eq!(map.judge_group(&[a1], Color::Black, &judge), GroupStatus::Dead);
        assert_eq!(map.judge_group(&[a1], Color::White, &judge), GroupStatus::Alive);
        map.counts[a1] = [0, 5, 5];
        assert_eq!(map.judge_group(&[a1], Color::Black, &judge), GroupStatus::Unknown);
    }
}
