//! Go Text Protocol (GTP) front end.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements a subset of GTP version 2 over any reader/writer
//! pair, so the engine can sit behind interfaces like Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Start over on a new board (1 to 25)
//! - `clear_board` - Reset the board to empty
//! - `komi <value>`
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Generate and play a move for the given color
//! - `showboard`
//! - `final_score` - Official score with dead stones removed
//!
//! ## Example
//!
//! ```
//! use goban_engine::gtp::GtpEngine;
//!
//! let mut gtp = GtpEngine::new(9, "random", "seed=1", "").unwrap();
//! let mut out = Vec::new();
//! gtp.run("boardsize 5\nplay black C3\nquit\n".as_bytes(), &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("= \n\n= \n\n"));
//! ```

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::board::{Board, Color, Move};
use crate::engine::{Engine, SharedBoard, shared};
use crate::error::Result;
use crate::moves::play_in_place;
use crate::score::official_score;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP session state.
pub struct GtpEngine {
    board: SharedBoard,
    engine: Engine,
    strategy: String,
    config: String,
    /// Time control for `genmove`
    time_spec: String,
}

impl GtpEngine {
    /// Start a session on an empty `size` board.
    ///
    /// # Errors
    /// [`crate::Error::Config`] for a bad size, strategy, or option string.
    pub fn new(size: usize, strategy: &str, config: &str, time_spec: &str) -> Result<Self> {
        let board = shared(Board::new(size)?);
        let engine = Engine::new(Rc::clone(&board), strategy, config)?;
        Ok(Self {
            board,
            engine,
            strategy: strategy.to_string(),
            config: config.to_string(),
            time_spec: time_spec.to_string(),
        })
    }

    /// Replace the position and start a fresh engine on it.
    fn reset(&mut self, board: Board) -> Result<()> {
        *self.board.borrow_mut() = board;
        self.engine = Engine::new(Rc::clone(&self.board), &self.strategy, &self.config)?;
        Ok(())
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            if !success {
                warn!(%command, %message, "gtp command failed");
            }
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(arg: &str) -> Option<Color> {
        match arg.to_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }

    /// Apply a move to the shared board and tell the engine.
    fn play(&mut self, mv: Move) -> Result<()> {
        play_in_place(&mut self.board.borrow_mut(), mv)?;
        self.engine.notify(mv.coord, mv.color)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        debug!(command, ?args, "gtp");
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                let komi = self.board.borrow().komi();
                match Board::new(size) {
                    Ok(mut board) => {
                        board.set_komi(komi);
                        match self.reset(board) {
                            Ok(()) => (true, String::new()),
                            Err(e) => (false, e.to_string()),
                        }
                    }
                    Err(_) => (false, "unacceptable size".to_string()),
                }
            }

            "clear_board" => {
                let mut board = self.board.borrow().clone();
                board.clear();
                match self.reset(board) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f32>() {
                    Ok(komi) => {
                        self.board.borrow_mut().set_komi(komi);
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Self::parse_color(args[0]) else {
                    return (false, "invalid color".to_string());
                };
                let coord = match self.board.borrow().parse_coord(args[1]) {
                    Ok(coord) => coord,
                    Err(_) => return (false, "invalid vertex".to_string()),
                };
                match self.play(Move::new(coord, color)) {
                    Ok(()) => (true, String::new()),
                    Err(_) => (false, "illegal move".to_string()),
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|a| Self::parse_color(a)) else {
                    return (false, "invalid color".to_string());
                };
                let coord = match self.engine.generate_move(color, &self.time_spec) {
                    Ok(coord) => coord,
                    Err(e) => return (false, e.to_string()),
                };
                if let Err(e) = self.play(Move::new(coord, color)) {
                    return (false, e.to_string());
                }
                (true, self.board.borrow().coord_to_string(coord))
            }

            "showboard" => (true, format!("\n{}", self.board.borrow())),

            "final_score" => {
                let score = official_score(&self.board.borrow());
                let result = if score > 0.0 {
                    format!("W+{score}")
                } else if score < 0.0 {
                    format!("B+{}", -score)
                } else {
                    "0".to_string()
                };
                (true, result)
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
