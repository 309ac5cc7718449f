//! goban: Go engine command line.
//!
//! ## Usage
//!
//! - `goban` - Show a demo
//! - `goban gtp` - Start GTP server for GUI integration
//! - `goban selfplay` - Play two engines against each other
//! - `goban demo` - Run the demo

use std::io;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban_engine::board::{Board, Color};
use goban_engine::engine::{Engine, shared};
use goban_engine::game::{Player, play_game};
use goban_engine::gtp::GtpEngine;
use goban_engine::moves::legal_moves;
use goban_engine::ownermap::dead_groups;
use goban_engine::score::{fast_score, official_score};

/// goban: Go board, rules and engines
#[derive(Parser)]
#[command(name = "goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp {
        #[arg(long, default_value_t = 9)]
        size: usize,
        /// random, montecarlo or uct
        #[arg(long, default_value = "uct")]
        strategy: String,
        /// Strategy options, e.g. "seed=1,rave_equiv=3000"
        #[arg(long, default_value = "")]
        config: String,
        /// =SIMS, SECONDS per move, or _SECONDS per game
        #[arg(long, default_value = "")]
        time: String,
    },
    /// Play one game between two engines
    Selfplay {
        #[arg(long, default_value_t = 9)]
        size: usize,
        #[arg(long, default_value = "random")]
        black: String,
        #[arg(long, default_value = "uct")]
        white: String,
        #[arg(long, default_value = "")]
        black_time: String,
        #[arg(long, default_value = "=200")]
        white_time: String,
        #[arg(long, default_value_t = 500)]
        max_moves: usize,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries GTP responses.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp {
            size,
            strategy,
            config,
            time,
        }) => {
            let mut gtp = GtpEngine::new(size, &strategy, &config, &time)?;
            gtp.run(io::stdin().lock(), io::stdout().lock())
                .context("GTP session failed")?;
        }
        Some(Commands::Selfplay {
            size,
            black,
            white,
            black_time,
            white_time,
            max_moves,
        }) => run_selfplay(size, &black, &white, &black_time, &white_time, max_moves)?,
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_selfplay(
    size: usize,
    black: &str,
    white: &str,
    black_time: &str,
    white_time: &str,
    max_moves: usize,
) -> Result<()> {
    let board = shared(Board::new(size)?);
    let mut black_engine = Engine::new(Rc::clone(&board), black, "")
        .with_context(|| format!("creating black engine '{black}'"))?;
    let mut white_engine = Engine::new(Rc::clone(&board), white, "")
        .with_context(|| format!("creating white engine '{white}'"))?;

    let record = play_game(
        &board,
        Player {
            engine: &mut black_engine,
            time_spec: black_time,
        },
        Player {
            engine: &mut white_engine,
            time_spec: white_time,
        },
        max_moves,
    )?;

    println!("Final board state:");
    println!("{}", record.final_board);
    match record.score {
        Some(score) => println!("Final score: {score}"),
        None => println!("{} resigned", record.winner.other()),
    }
    println!("{} wins!", record.winner);
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("goban: Go board and engines\n");

    println!("=== Board Demo ===");
    let board = shared(Board::new(9)?);
    println!(
        "Legal moves for black on an empty board: {}",
        legal_moves(&board.borrow(), Color::Black, true).len()
    );

    println!("\n=== Engine Demo ===");
    let mut black = Engine::new(Rc::clone(&board), "uct", "")?;
    let mut white = Engine::new(Rc::clone(&board), "montecarlo", "")?;
    let record = play_game(
        &board,
        Player {
            engine: &mut black,
            time_spec: "=100",
        },
        Player {
            engine: &mut white,
            time_spec: "=100",
        },
        12,
    )?;
    for mv in &record.moves {
        println!("{} {}", mv.color, record.final_board.coord_to_string(mv.coord));
    }
    println!("{}", record.final_board);

    println!("\n=== Scoring Demo ===");
    let final_board = &record.final_board;
    println!("Fast score: {:.1}", fast_score(final_board));
    println!("Dead stones: {}", dead_groups(final_board, None).len());
    println!("Official score: {:.1}", official_score(final_board));
    Ok(())
}
