//! Uniform random play.

use fastrand::Rng;

use crate::board::{Board, Color, Coord};
use crate::error::Result;
use crate::moves::play_random_in_place;
use crate::time::MoveLimit;

use super::strategy::{Strategy, StrategyConfig};

/// Plays a random legal move that does not fill its own eye; ignores the budget.
pub struct RandomStrategy {
    rng: Rng,
}

impl RandomStrategy {
    pub fn new(_board: &Board, config: &StrategyConfig) -> Result<Self> {
        config.ensure_known("random", &["seed"])?;
        let rng = config.get::<u64>("seed")?.map_or_else(Rng::new, Rng::with_seed);
        Ok(Self { rng })
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn default_simulations(&self) -> u32 {
        1
    }

    fn genmove(&mut self, board: &Board, color: Color, _limit: &MoveLimit) -> Result<Coord> {
        let mut scratch = board.clone();
        Ok(play_random_in_place(&mut scratch, color, &mut self.rng))
    }
}
