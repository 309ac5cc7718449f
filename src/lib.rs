//! goban-engine: Go board state, rules, scoring, and pluggable engines.
//!
//! This crate keeps the authoritative state of a Go game, checks and applies
//! moves, detects the end of the game, scores it (with dead-stone judgement
//! from random playouts), and drives move-generation strategies under a time
//! budget.
//!
//! ## Modules
//!
//! - [`constants`] - Board-size bounds and engine parameters
//! - [`board`] - Board, stones, coordinates and moves
//! - [`moves`] - Legality, legal-move lists, move application
//! - [`termination`] - End-of-game detection
//! - [`playout`] - Random game simulation for position evaluation
//! - [`ownermap`] - Ownership estimate and dead groups
//! - [`score`] - Fast and official scores
//! - [`time`] - Time-control parsing
//! - [`engine`] - Engine adapter, strategies and their registry
//! - [`game`] - Engine-vs-engine games
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use goban_engine::board::{Board, Color, Move};
//! use goban_engine::engine::{Engine, shared};
//! use goban_engine::moves::{legal_moves, play, play_in_place};
//!
//! let mut board = Board::new(9).unwrap();
//! assert_eq!(legal_moves(&board, Color::Black, false).len(), 82);
//!
//! // Copy-on-write: `play` leaves the original alone
//! let d4 = board.parse_coord("D4").unwrap();
//! let next = play(&board, Move::new(d4, Color::Black)).unwrap();
//! assert_ne!(next, board);
//! play_in_place(&mut board, Move::new(d4, Color::Black)).unwrap();
//! assert_eq!(next, board);
//!
//! // Ask an engine for White's reply
//! let board = shared(board);
//! let mut engine = Engine::new(Rc::clone(&board), "random", "seed=1").unwrap();
//! let reply = engine.generate_move(Color::White, "").unwrap();
//! println!("White plays {}", board.borrow().coord_to_string(reply));
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod game;
pub mod gtp;
pub mod moves;
pub mod ownermap;
pub mod playout;
pub mod score;
pub mod termination;
pub mod time;

pub use board::{Board, Color, Coord, Move, Point, Stone};
pub use error::{Error, MoveError, Result};
