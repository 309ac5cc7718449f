//! Constants for board bounds, scoring, search parameters and priors.
//!
//! Everything here is a default. Board size is chosen at runtime, and the
//! search strategies let most of these be overridden through their
//! configuration string.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 1;

/// Largest supported board size (limited by the 25 column letters, `I` is skipped).
pub const MAX_BOARD_SIZE: usize = 25;

/// Column letters used in coordinate strings. `I` is skipped by Go convention.
pub const COLUMN_LETTERS: &[u8; MAX_BOARD_SIZE] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f32 = 7.5;

/// Playouts stop after this many moves per board point (3 times board area,
/// leaving room for captures and replays).
pub const PLAYOUT_LEN_FACTOR: usize = 3;

// =============================================================================
// Ownership Estimation / Group Judgement
// =============================================================================

/// Number of playouts used to build an ownership map for official scoring.
pub const OWNERMAP_PLAYOUTS: u32 = 200;

/// Share of playouts a color must own a point in for the point to count as sure.
pub const GJ_THRES: f32 = 0.8;

/// Below this many playouts the ownership map refuses to judge any point.
pub const GJ_MINGAMES: u32 = 100;

// =============================================================================
// Time Management
// =============================================================================

/// Lower bound on the number of moves assumed to remain when splitting a
/// per-game time budget.
pub const MIN_MOVES_LEFT: usize = 20;

// =============================================================================
// Flat Monte Carlo Parameters
// =============================================================================

/// Default number of games per move when no budget is given.
pub const MC_GAMES: u32 = 2000;

/// Winrate of the best first move under which flat Monte Carlo resigns.
pub const MC_RESIGN_RATIO: f64 = 0.1;

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// Default number of simulations per move.
pub const N_SIMS: u32 = 1400;

/// RAVE equivalence parameter - controls RAVE vs UCB balance.
pub const RAVE_EQUIV: f64 = 3500.0;

/// Minimum visits before expanding a node.
pub const EXPAND_VISITS: u32 = 8;

/// Winrate threshold below which the engine resigns.
pub const RESIGN_THRES: f64 = 0.2;

/// Root visits required before resignation is considered.
pub const RESIGN_MIN_VISITS: u32 = 200;

/// Fast-play threshold at 20% of simulations.
pub const FASTPLAY20_THRES: f64 = 0.8;

/// Fast-play threshold at 5% of simulations.
pub const FASTPLAY5_THRES: f64 = 0.95;

// =============================================================================
// Prior Values (for MCTS node initialization)
// =============================================================================

/// Base prior for all moves (ensures exploration).
pub const PRIOR_EVEN: u32 = 10;

/// Negative prior for self-atari moves.
pub const PRIOR_SELFATARI: u32 = 10;

/// Prior bonus for capturing a single stone.
pub const PRIOR_CAPTURE_ONE: u32 = 15;

/// Prior bonus for capturing multiple stones.
pub const PRIOR_CAPTURE_MANY: u32 = 30;

/// Prior bonus by distance from last move (CFG distance 1, 2, 3).
pub const PRIOR_CFG: [u32; 3] = [24, 22, 8];

/// Negative prior for moves in empty areas.
pub const PRIOR_EMPTYAREA: u32 = 10;
