//! Play command - run a match between human, computer or broker-driven players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_match(), play_match(), report_outcome()
//! - Level 3: human_turn(), broker_turn(), computer_turn()
//! - Level 4: input and broker utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;

use wargame_core::{CoordPair, Game, Options, Player, Searcher};

use crate::args::GameArgs;
use crate::broker::BrokerClient;
use crate::report::{format_search_report, group_thousands, MoveContext};
use crate::trace::TraceLog;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Directory for the game trace file
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub trace_dir: PathBuf,

    /// Do not write a game trace file
    #[arg(long)]
    pub no_trace: bool,
}

/// How a match ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    /// Win by the game rules
    Winner(Player),
    /// The computer side had no move; the other side wins
    Forfeit(Player),
}

/// Broker connection: the client plus the runtime that drives it
struct Broker {
    runtime: tokio::runtime::Runtime,
    client: BrokerClient,
}

struct Match {
    game: Game,
    searcher: Searcher,
    trace: TraceLog,
    broker: Option<Broker>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Build options and set up the match
/// 2. Play turns until someone wins
/// 3. Report the outcome
pub fn run(args: PlayArgs) -> Result<ExitCode> {
    let options = args.game.to_options()?;

    tracing::info!(
        "Starting match: {} (depth={}, time={}s, alpha_beta={}, heuristic={:?})",
        options.game_type.play_mode(),
        options.max_depth,
        options.max_time,
        options.alpha_beta,
        options.heuristic
    );

    let mut m = setup_match(options, &args)?;

    let stdin = io::stdin();
    let outcome = play_match(&mut m, &mut stdin.lock())?;

    report_outcome(&mut m, outcome)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Create the game, searcher, trace file and broker connection
fn setup_match(options: Options, args: &PlayArgs) -> Result<Match> {
    let trace = if args.no_trace {
        TraceLog::disabled()
    } else {
        let (mut trace, path) = TraceLog::create(args.trace_dir.clone(), &options)
            .with_context(|| format!("Failed to create trace file in {}", args.trace_dir.display()))?;
        trace.header(&options)?;
        tracing::info!("Writing game trace to {}", path.display());
        trace
    };

    let broker = match &options.broker {
        Some(url) => Some(connect_broker(url)?),
        None => None,
    };

    Ok(Match {
        searcher: Searcher::new(&options),
        game: Game::new(options),
        trace,
        broker,
    })
}

/// Main game loop
fn play_match(m: &mut Match, input: &mut dyn BufRead) -> Result<Outcome> {
    loop {
        println!();
        println!("{}", m.game);
        m.trace.board(&m.game)?;

        if let Some(winner) = m.game.has_winner() {
            return Ok(Outcome::Winner(winner));
        }

        let player = m.game.next_player();
        if m.game.options().game_type.is_computer(player) {
            if computer_turn(m)?.is_none() {
                return Ok(Outcome::Forfeit(player.opponent()));
            }
        } else if m.broker.is_some() {
            broker_turn(m)?;
        } else {
            human_turn(m, input)?;
        }
    }
}

/// Print and trace the winner; a forfeit exits with status 1
fn report_outcome(m: &mut Match, outcome: Outcome) -> Result<ExitCode> {
    let evals = m.searcher.stats().total_evaluations();
    let turns = m.game.turns_played();

    let (winner, code) = match outcome {
        Outcome::Winner(winner) => (winner, ExitCode::SUCCESS),
        Outcome::Forfeit(winner) => {
            println!("Computer doesn't know what to do!!!");
            (winner, ExitCode::from(1))
        }
    };

    println!("{} wins!", winner);
    println!("Cumulative evals: {}\n", group_thousands(evals));
    m.trace.winner(winner, turns, evals)?;

    tracing::info!("{} wins in {} turns", winner, turns);
    Ok(code)
}

// ============================================================================
// LEVEL 3 - TURNS
// ============================================================================

/// Read moves from `input` until one is legal, then apply it
fn human_turn(m: &mut Match, input: &mut dyn BufRead) -> Result<()> {
    let player = m.game.next_player();
    loop {
        let mv = read_move(&m.game, input)?;
        let ctx = MoveContext::capture(&m.game, mv);
        match m.game.perform_move(mv) {
            Ok(action) => {
                let line = ctx.describe(action);
                println!("Player {}: {}", player, line);
                m.trace.action("Player", player, &line)?;
                m.game.next_turn();
                return Ok(());
            }
            Err(err) => println!("The move is not valid ({})! Try again.", err),
        }
    }
}

/// Poll the broker until the opponent's move for this turn arrives
fn broker_turn(m: &mut Match) -> Result<()> {
    let Some(broker) = &m.broker else {
        bail!("no broker configured");
    };
    let player = m.game.next_player();
    let turns_played = m.game.turns_played();
    let game = &mut m.game;

    println!("Getting next move with auto-retry from game broker...");
    let (_, line) = broker.runtime.block_on(broker.client.wait_for_move(turns_played, |mv| {
        let ctx = MoveContext::capture(game, mv);
        game.perform_move(mv).map(|action| ctx.describe(action))
    }));

    println!("Broker {}: {}", player, line);
    m.trace.action("Broker", player, &line)?;
    m.game.next_turn();
    Ok(())
}

/// Search, apply and report; posts the move to the broker if there is one
///
/// Returns None when the computer has no legal move.
fn computer_turn(m: &mut Match) -> Result<Option<CoordPair>> {
    let player = m.game.next_player();
    println!("Computer {} is thinking...", player);

    let report = m.searcher.suggest_move(&m.game);
    let Some(mv) = report.best_move else {
        return Ok(None);
    };

    let ctx = MoveContext::capture(&m.game, mv);
    let action = m
        .game
        .perform_move(mv)
        .with_context(|| format!("search suggested an illegal move: {}", mv))?;

    let stats = format_search_report(&report, m.searcher.stats());
    println!("{}", stats);
    m.trace.search(&stats)?;

    let line = ctx.describe(action);
    println!("Computer {}: {}", player, line);
    m.trace.action("Computer", player, &line)?;

    m.game.next_turn();

    if let Some(broker) = &m.broker {
        post_to_broker(broker, mv, m.game.turns_played());
    }

    Ok(Some(mv))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Prompt until the input parses as a move with both ends on the board
fn read_move(game: &Game, input: &mut dyn BufRead) -> Result<CoordPair> {
    loop {
        print!("Player {}, enter your move: ", game.next_player());
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before {} moved", game.next_player());
        }

        match line.parse::<CoordPair>() {
            Ok(mv) if game.is_valid_coord(mv.src) && game.is_valid_coord(mv.dst) => return Ok(mv),
            Ok(_) => println!("Coordinates are off the board! Try again."),
            Err(err) => println!("Invalid coordinates ({})! Try again.", err),
        }
    }
}

fn connect_broker(url: &str) -> Result<Broker> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start broker runtime")?;
    tracing::info!("Playing via game broker at {}", url);
    Ok(Broker {
        runtime,
        client: BrokerClient::new(url),
    })
}

/// Broker failures are logged, never fatal
fn post_to_broker(broker: &Broker, mv: CoordPair, turn: u32) {
    match broker.runtime.block_on(broker.client.post_move(mv, turn)) {
        Ok(()) => tracing::debug!(%mv, turn, "posted move to broker"),
        Err(err) => tracing::warn!(%err, "broker error"),
    }
}

// ============================================================================
// TESTS
// ============================================================================
