//! Game trace log
//!
//! Plain-text record of a match: a header with the options, then every board,
//! every action and the computer's search statistics, then the winner.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use wargame_core::{Game, Options, Player};

use crate::report::group_thousands;

/// `gameTrace-{alpha_beta}-{max_time}-{max_turns}.txt`
pub fn trace_file_name(options: &Options) -> String {
    let max_turns = match options.max_turns {
        Some(n) => n.to_string(),
        None => "none".to_string(),
    };
    format!(
        "gameTrace-{}-{:?}-{}.txt",
        options.alpha_beta, options.max_time, max_turns
    )
}

pub struct TraceLog<W: Write = Box<dyn Write>> {
    out: W,
}

impl TraceLog {
    /// Create (truncating) the trace file in `dir`
    pub fn create(dir: PathBuf, options: &Options) -> io::Result<(Self, PathBuf)> {
        let path = dir.join(trace_file_name(options));
        let file = File::create(&path)?;
        Ok((Self::new(Box::new(BufWriter::new(file))), path))
    }

    /// Trace that discards everything
    pub fn disabled() -> Self {
        Self::new(Box::new(io::sink()))
    }
}

impl<W: Write> TraceLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self, options: &Options) -> io::Result<()> {
        let now = chrono::Local::now();
        writeln!(self.out, "Game started: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(self.out, "Timeout: {} seconds", options.max_time)?;
        writeln!(self.out, "Play mode: {}", options.game_type.play_mode())?;
        match options.max_turns {
            Some(n) => writeln!(self.out, "Maximum number of turns: {}", n)?,
            None => writeln!(self.out, "Maximum number of turns: unlimited")?,
        }
        writeln!(self.out, "Alpha-Beta: {}", options.alpha_beta)?;
        writeln!(self.out, "Heuristic: {:?}", options.heuristic)?;
        self.out.flush()
    }

    pub fn board(&mut self, game: &Game) -> io::Result<()> {
        writeln!(self.out, "{}", game)?;
        self.out.flush()
    }

    /// Action line prefixed with who played it, e.g. `Computer Defender: dT9 attacked aV9`
    pub fn action(&mut self, who: &str, player: Player, line: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}: {}\n", who, player, line)?;
        self.out.flush()
    }

    pub fn search(&mut self, report: &str) -> io::Result<()> {
        writeln!(self.out, "{}\n", report)?;
        self.out.flush()
    }

    pub fn winner(&mut self, winner: Player, turns: u32, cumulative_evals: u64) -> io::Result<()> {
        writeln!(self.out, "{} wins in {} turns\n", winner, turns)?;
        writeln!(self.out, "Cumulative evals: {}\n", group_thousands(cumulative_evals))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
