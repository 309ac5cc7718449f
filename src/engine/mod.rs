//! Engine adapter: drives a [`Strategy`] over a shared board under a time budget.
//!
//! An [`Engine`] is built from a strategy name and an option string, and keeps
//! a handle to the board it plays on. The host applies moves to that board
//! and tells every engine about them through [`Engine::notify`].
//!
//! ## Lifecycle
//!
//! `Ready` after construction, `GeneratingMove` for the duration of each
//! [`Engine::generate_move`], and `Stopped` once torn down. Teardown stops the
//! strategy, lets it finalize, then drops it; it runs on [`Engine::shutdown`]
//! or when the engine is dropped.
//!
//! Engines are not `Send`: a host that wants engines on several threads
//! builds each one, with its own board, on the thread that uses it.

pub mod montecarlo;
pub mod random;
pub mod strategy;
pub mod uct;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::board::{Board, Color, Coord, Move};
use crate::error::{Error, Result};
use crate::moves::is_valid_play_no_suicide;
use crate::time::TimeBudget;

pub use montecarlo::MonteCarloStrategy;
pub use random::RandomStrategy;
pub use strategy::{Strategy, StrategyConfig, StrategyFactory, StrategyRegistry};
pub use uct::UctStrategy;

/// Board handle shared between a host and its engines.
pub type SharedBoard = Rc<RefCell<Board>>;

/// Wrap a board for sharing with engines.
pub fn shared(board: Board) -> SharedBoard {
    Rc::new(RefCell::new(board))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    GeneratingMove,
    Stopped,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Ready => "ready",
            EngineState::GeneratingMove => "generating move",
            EngineState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// A strategy bound to a board.
pub struct Engine {
    name: String,
    config: String,
    board: SharedBoard,
    strategy: Option<Box<dyn Strategy>>,
    state: EngineState,
    game_time_used: Duration,
}

impl Engine {
    /// Create an engine from the default strategy registry.
    ///
    /// # Errors
    /// [`Error::Config`] for an unknown strategy or bad options.
    pub fn new(board: SharedBoard, strategy: &str, config: &str) -> Result<Self> {
        Self::with_registry(&StrategyRegistry::default(), board, strategy, config)
    }

    pub fn with_registry(
        registry: &StrategyRegistry,
        board: SharedBoard,
        strategy: &str,
        config: &str,
    ) -> Result<Self> {
        let effective = registry.effective_config(strategy, config)?;
        let options = StrategyConfig::parse(&effective)?;
        let instance = registry.create(strategy, &board.borrow(), &options)?;
        info!(strategy, config = %effective, size = board.borrow().size(), "engine created");
        Ok(Self {
            name: strategy.to_string(),
            config: effective,
            board,
            strategy: Some(instance),
            state: EngineState::Ready,
            game_time_used: Duration::ZERO,
        })
    }

    /// Name the engine was created with.
    pub fn strategy_name(&self) -> &str {
        &self.name
    }

    /// Option string the strategy was initialized with.
    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    /// Search time spent in this game under a per-game budget.
    pub fn game_time_used(&self) -> Duration {
        self.game_time_used
    }

    fn stopped(&self) -> Error {
        Error::Engine(format!("{}: engine is stopped", self.name))
    }

    fn strategy_error(&self, err: Error) -> Error {
        match err {
            Error::Engine(msg) => Error::Engine(msg),
            other => Error::Engine(format!("{}: {other}", self.name)),
        }
    }

    /// Choose a move for `color` on the shared board.
    ///
    /// The board is not modified; the host plays the returned move and
    /// notifies the engines. The result is pass, resign, or a point that is
    /// legal for `color` without suicide.
    ///
    /// # Errors
    /// - [`Error::Config`] if `time_spec` is malformed
    /// - [`Error::Engine`] if the strategy fails, returns an illegal move, or
    ///   the engine has been stopped
    pub fn generate_move(&mut self, color: Color, time_spec: &str) -> Result<Coord> {
        let budget = TimeBudget::parse(time_spec)?;
        let board = Rc::clone(&self.board);
        let board = board.borrow();

        let Some(strategy) = self.strategy.as_mut() else {
            return Err(self.stopped());
        };
        let limit = budget.move_limit(strategy.default_simulations(), &board, self.game_time_used);

        self.state = EngineState::GeneratingMove;
        let result = strategy.genmove(&board, color, &limit);
        self.state = EngineState::Ready;

        let elapsed = limit.elapsed();
        if let TimeBudget::PerGame(_) = budget {
            self.game_time_used += elapsed;
        }
        let coord = result.map_err(|e| self.strategy_error(e))?;
        let name = &self.name;

        match coord {
            Coord::Point(pt) if !is_valid_play_no_suicide(&board, color, pt) => {
                warn!(strategy = %name, mv = %board.coord_to_string(coord), "strategy returned an illegal move");
                Err(Error::Engine(format!(
                    "{name}: strategy returned illegal move {} for {color}",
                    board.coord_to_string(coord)
                )))
            }
            _ => {
                debug!(
                    strategy = %name,
                    %color,
                    mv = %board.coord_to_string(coord),
                    ?elapsed,
                    "generated move"
                );
                Ok(coord)
            }
        }
    }

    /// Tell the strategy that `coord` was played by `color` on the shared board.
    ///
    /// # Errors
    /// [`Error::Engine`] if the strategy fails or the engine has been stopped.
    pub fn notify(&mut self, coord: Coord, color: Color) -> Result<()> {
        let board = Rc::clone(&self.board);
        let Some(strategy) = self.strategy.as_mut() else {
            return Err(self.stopped());
        };
        strategy
            .notify(&board.borrow(), Move::new(coord, color))
            .map_err(|e| self.strategy_error(e))
    }

    /// Forget per-game state (time used) for a new game on the same board.
    pub fn new_game(&mut self) {
        self.game_time_used = Duration::ZERO;
    }

    /// Tear the engine down now instead of on drop.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut strategy) = self.strategy.take() {
            strategy.stop();
            strategy.finalize();
            drop(strategy);
            debug!(strategy = %self.name, "engine stopped");
        }
        self.state = EngineState::Stopped;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::legal_moves;

    #[test]
    fn test_random_engine_move_is_legal() {
        let board = shared(Board::new(9).unwrap());
        let mut engine = Engine::new(Rc::clone(&board), "random", "seed=1").unwrap();
        assert_eq!(engine.state(), EngineState::Ready);
        let coord = engine.generate_move(Color::Black, "").unwrap();
        assert!(legal_moves(&board.borrow(), Color::Black, true).contains(&coord));
        assert_eq!(engine.state(), EngineState::Ready);
        // generating a move leaves the board alone
        assert_eq!(board.borrow().moves(), 0);
    }

    #[test]
    fn test_unknown_strategy() {
        let board = shared(Board::new(9).unwrap());
        let err = Engine::new(board, "gnugo", "").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("gnugo"));
    }

    #[test]
    fn test_tree_search_forces_pondering_off() {
        let board = shared(Board::new(5).unwrap());
        let engine = Engine::new(board, "tree-search", "seed=2").unwrap();
        assert_eq!(engine.config(), "seed=2,pondering=0");
        assert_eq!(engine.strategy_name(), "tree-search");
    }

    #[test]
    fn test_bad_time_spec_keeps_engine_ready() {
        let board = shared(Board::new(9).unwrap());
        let mut engine = Engine::new(board, "random", "").unwrap();
        assert!(matches!(
            engine.generate_move(Color::Black, "abc"),
            Err(Error::Config(_))
        ));
        assert_eq!(engine.state(), EngineState::Ready);
        assert!(engine.generate_move(Color::Black, "=1").is_ok());
    }

    #[test]
    fn test_per_game_time_is_tracked() {
        let board = shared(Board::new(5).unwrap());
        let mut engine = Engine::new(board, "montecarlo", "seed=4").unwrap();
        engine.generate_move(Color::Black, "_1").unwrap();
        assert!(engine.game_time_used() > Duration::ZERO);
        engine.new_game();
        assert_eq!(engine.game_time_used(), Duration::ZERO);

        engine.generate_move(Color::Black, "=5").unwrap();
        assert_eq!(engine.game_time_used(), Duration::ZERO);
    }
}
