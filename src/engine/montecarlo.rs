//! Flat Monte Carlo: random first moves, each scored by one playout.

use fastrand::Rng;
use tracing::debug;

use crate::board::{Board, Color, Coord};
use crate::constants::{MC_GAMES, MC_RESIGN_RATIO};
use crate::error::Result;
use crate::moves::play_random_in_place;
use crate::playout::{playout, winner};
use crate::time::MoveLimit;

use super::strategy::{Strategy, StrategyConfig};

pub struct MonteCarloStrategy {
    rng: Rng,
    resign_ratio: f64,
}

impl MonteCarloStrategy {
    pub fn new(_board: &Board, config: &StrategyConfig) -> Result<Self> {
        config.ensure_known("montecarlo", &["seed", "resign_ratio"])?;
        Ok(Self {
            rng: config.get::<u64>("seed")?.map_or_else(Rng::new, Rng::with_seed),
            resign_ratio: config.get("resign_ratio")?.unwrap_or(MC_RESIGN_RATIO),
        })
    }
}

impl Strategy for MonteCarloStrategy {
    fn name(&self) -> &'static str {
        "montecarlo"
    }

    fn default_simulations(&self) -> u32 {
        MC_GAMES
    }

    fn genmove(&mut self, board: &Board, color: Color, limit: &MoveLimit) -> Result<Coord> {
        // [wins, games] per first move
        let mut stats = vec![[0u32; 2]; board.grid_len()];
        let mut games = 0;

        while games == 0 || !limit.exhausted(games) {
            games += 1;
            let mut scratch = board.clone();
            let first = play_random_in_place(&mut scratch, color, &mut self.rng);
            // Random play only passes when no stone move is left
            let Coord::Point(pt) = first else {
                break;
            };
            let score = playout(&mut scratch, color.other(), &mut self.rng, None);
            stats[pt][1] += 1;
            if winner(score) == color {
                stats[pt][0] += 1;
            }
        }

        let best = stats
            .iter()
            .enumerate()
            .filter(|(_, s)| s[1] > 0)
            // smoothed so that a single lucky game does not win the move
            .map(|(pt, s)| (pt, (s[0] + 1) as f64 / (s[1] + 2) as f64, s[1]))
            .max_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

        let Some((pt, winrate, visits)) = best else {
            return Ok(Coord::Pass);
        };
        debug!(
            games,
            best = %board.coord_to_string(Coord::Point(pt)),
            winrate,
            visits,
            elapsed = ?limit.elapsed(),
            "montecarlo move"
        );
        if winrate < self.resign_ratio {
            return Ok(Coord::Resign);
        }
        Ok(Coord::Point(pt))
    }
}
