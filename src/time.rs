//! Time controls for move generation.
//!
//! A [`TimeBudget`] is parsed once from a short text specification:
//!
//! | Spec    | Meaning                                  |
//! |---------|------------------------------------------|
//! | `""`    | no limit (the strategy's default effort) |
//! | `=NUM`  | fixed number of simulations per move     |
//! | `NUM`   | seconds per move (may be fractional)     |
//! | `_NUM`  | seconds for the whole game               |
//!
//! Each `genmove` turns the budget into a [`MoveLimit`], which the strategy
//! polls while it searches.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use goban_engine::time::TimeBudget;
//!
//! assert_eq!(TimeBudget::parse("=500").unwrap(), TimeBudget::Simulations(500));
//! assert_eq!(TimeBudget::parse("2.5").unwrap(), TimeBudget::PerMove(Duration::from_millis(2500)));
//! assert_eq!(TimeBudget::parse("_60").unwrap(), TimeBudget::PerGame(Duration::from_secs(60)));
//! assert!(TimeBudget::parse("abc").is_err());
//! ```

use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::constants::MIN_MOVES_LEFT;
use crate::error::{Error, Result};

/// Normalized time control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBudget {
    /// No limit given; strategies use their default simulation count
    #[default]
    Unlimited,
    /// Fixed number of simulations per move
    Simulations(u32),
    /// Wall-clock time per move
    PerMove(Duration),
    /// Wall-clock time for the whole game
    PerGame(Duration),
}

fn invalid_spec(spec: &str) -> Error {
    Error::Config(format!(
        "Invalid time control specification: {spec}\n\
         Format:\n\
         *   =NUM - fixed number of simulations per move\n\
         *   NUM - number of seconds to spend per move (can be fractional)\n\
         *   _NUM - number of seconds to spend per game"
    ))
}

fn parse_seconds(spec: &str, secs: &str) -> Result<Duration> {
    let value: f64 = secs.parse().map_err(|_| invalid_spec(spec))?;
    Duration::try_from_secs_f64(value).map_err(|_| invalid_spec(spec))
}

impl TimeBudget {
    /// Parse a time control specification.
    ///
    /// # Errors
    /// [`Error::Config`] listing the accepted forms when `spec` is malformed.
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Ok(TimeBudget::Unlimited);
        }
        if let Some(sims) = trimmed.strip_prefix('=') {
            return match sims.parse::<u32>() {
                Ok(n) if n > 0 => Ok(TimeBudget::Simulations(n)),
                _ => Err(invalid_spec(spec)),
            };
        }
        if let Some(secs) = trimmed.strip_prefix('_') {
            return parse_seconds(spec, secs).map(TimeBudget::PerGame);
        }
        parse_seconds(spec, trimmed).map(TimeBudget::PerMove)
    }

    /// Limit for the next move.
    ///
    /// `default_sims` applies to [`TimeBudget::Unlimited`]. For a per-game
    /// budget, the time not yet used is spread over an estimate of the moves
    /// left (half the empty points, at least `MIN_MOVES_LEFT`).
    pub fn move_limit(&self, default_sims: u32, board: &Board, game_time_used: Duration) -> MoveLimit {
        match *self {
            TimeBudget::Unlimited => MoveLimit::simulations(default_sims),
            TimeBudget::Simulations(n) => MoveLimit::simulations(n),
            TimeBudget::PerMove(d) => MoveLimit::time(d),
            TimeBudget::PerGame(total) => {
                let remaining = total.saturating_sub(game_time_used);
                let moves_left = (board.empty_count() / 2).max(MIN_MOVES_LEFT);
                MoveLimit::time(remaining / moves_left as u32)
            }
        }
    }
}

impl FromStr for TimeBudget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Stop condition for one move's search.
#[derive(Debug, Clone, Copy)]
pub struct MoveLimit {
    sims: Option<u32>,
    deadline: Option<Instant>,
    started: Instant,
}

impl MoveLimit {
    /// Stop after `n` simulations.
    pub fn simulations(n: u32) -> Self {
        Self {
            sims: Some(n),
            deadline: None,
            started: Instant::now(),
        }
    }

    /// Stop once `budget` has elapsed from now.
    ///
    /// A budget too large to express as an instant never runs out.
    pub fn time(budget: Duration) -> Self {
        let started = Instant::now();
        Self {
            sims: None,
            deadline: started.checked_add(budget),
            started,
        }
    }

    /// Simulation cap, if this limit counts simulations.
    pub fn sims(&self) -> Option<u32> {
        self.sims
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Has the search used up its budget after `done` simulations?
    pub fn exhausted(&self, done: u32) -> bool {
        if self.sims.is_some_and(|n| done >= n) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
