//! The capability every move-selection strategy implements, its
//! configuration string, and the name-keyed registry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Color, Coord, Move};
use crate::error::{Error, Result};
use crate::time::MoveLimit;

use super::montecarlo::MonteCarloStrategy;
use super::random::RandomStrategy;
use super::uct::UctStrategy;

/// A move-selection strategy driven by [`super::Engine`].
///
/// Construction is the strategy's initialization step (see
/// [`StrategyFactory`]). Teardown calls [`Strategy::stop`], then
/// [`Strategy::finalize`], then drops the strategy.
pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Simulations per move when the time budget is unlimited.
    fn default_simulations(&self) -> u32;

    /// Choose a move for `color` on `board` within `limit`.
    ///
    /// Must not modify the board and must return pass, resign, or a
    /// suicide-free legal point.
    fn genmove(&mut self, board: &Board, color: Color, limit: &MoveLimit) -> Result<Coord>;

    /// A move was played on the shared board.
    fn notify(&mut self, _board: &Board, _mv: Move) -> Result<()> {
        Ok(())
    }

    /// Abort any in-flight computation.
    fn stop(&mut self) {}

    /// Release internal resources before the strategy is dropped.
    fn finalize(&mut self) {}
}

/// Builds a strategy for a board from its options.
pub type StrategyFactory = Box<dyn Fn(&Board, &StrategyConfig) -> Result<Box<dyn Strategy>>>;

/// Parsed `key=value,key=value` option string.
///
/// Later keys override earlier ones; a bare `key` means `key=1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyConfig {
    options: Vec<(String, String)>,
}

impl StrategyConfig {
    pub fn parse(config: &str) -> Result<Self> {
        let mut options = Vec::new();
        for item in config.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = item.split_once('=').unwrap_or((item, "1"));
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::Config(format!("missing option name in '{item}'")));
            }
            options.push((key.to_string(), value.trim().to_string()));
        }
        Ok(Self { options })
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Typed value of `key`, if present.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.raw(key)
            .map(|v| {
                v.parse()
                    .map_err(|_| Error::Config(format!("invalid value for option {key}: '{v}'")))
            })
            .transpose()
    }

    /// Boolean value of `key` (`1`/`0`/`true`/`false`), if present.
    pub fn flag(&self, key: &str) -> Result<Option<bool>> {
        self.raw(key)
            .map(|v| match v {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                _ => Err(Error::Config(format!("invalid value for option {key}: '{v}'"))),
            })
            .transpose()
    }

    /// Reject options not listed in `known`.
    pub fn ensure_known(&self, strategy: &str, known: &[&str]) -> Result<()> {
        match self.options.iter().find(|(k, _)| !known.contains(&k.as_str())) {
            Some((k, _)) => Err(Error::Config(format!(
                "unknown option '{k}' for engine {strategy} (known: {})",
                known.join(", ")
            ))),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

struct StrategyEntry {
    factory: StrategyFactory,
    /// Appended to every configuration string for this strategy
    forced_options: Option<&'static str>,
}

/// Strategies available to [`super::Engine`], keyed by name.
///
/// The default registry knows `random`, `montecarlo` (alias
/// `flat-monte-carlo`) and `uct` (alias `tree-search`). Hosts may register
/// their own.
pub struct StrategyRegistry {
    entries: BTreeMap<String, StrategyEntry>,
}

impl StrategyRegistry {
    /// A registry with no strategies.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Board, &StrategyConfig) -> Result<Box<dyn Strategy>> + 'static,
    {
        self.insert(name, Box::new(factory), None);
    }

    /// Register a strategy whose configuration always ends with `forced`.
    pub fn register_with_options<F>(&mut self, name: &str, factory: F, forced: &'static str)
    where
        F: Fn(&Board, &StrategyConfig) -> Result<Box<dyn Strategy>> + 'static,
    {
        self.insert(name, Box::new(factory), Some(forced));
    }

    fn insert(&mut self, name: &str, factory: StrategyFactory, forced_options: Option<&'static str>) {
        self.entries.insert(
            name.to_string(),
            StrategyEntry {
                factory,
                forced_options,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The configuration string `name` is actually initialized with.
    pub fn effective_config(&self, name: &str, config: &str) -> Result<String> {
        let entry = self.entry(name)?;
        Ok(match entry.forced_options {
            Some(forced) if config.trim().is_empty() => forced.to_string(),
            Some(forced) => format!("{config},{forced}"),
            None => config.to_string(),
        })
    }

    /// Initialize strategy `name` for `board`.
    pub fn create(&self, name: &str, board: &Board, config: &StrategyConfig) -> Result<Box<dyn Strategy>> {
        (self.entry(name)?.factory)(board, config)
    }

    fn entry(&self, name: &str) -> Result<&StrategyEntry> {
        self.entries.get(name).ok_or_else(|| {
            Error::Config(format!(
                "engine not supported: {name} (known: {})",
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("random", |board, config| {
            Ok(Box::new(RandomStrategy::new(board, config)?))
        });
        for name in ["montecarlo", "flat-monte-carlo"] {
            registry.register(name, |board, config| {
                Ok(Box::new(MonteCarloStrategy::new(board, config)?))
            });
        }
        // Background search is never enabled for tree search
        for name in ["uct", "tree-search"] {
            registry.register_with_options(
                name,
                |board, config| Ok(Box::new(UctStrategy::new(board, config)?)),
                "pondering=0",
            );
        }
        registry
    }
}
