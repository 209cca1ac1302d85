//! Human-readable move and search reports (stdout and trace log)

use std::fmt::Write;

use wargame_core::{Action, CoordPair, Game, SearchReport, SearchStats, Unit};

/// Units at both ends of a move, captured before it is applied
#[derive(Clone, Copy, Debug)]
pub struct MoveContext {
    pub mv: CoordPair,
    pub src: Option<Unit>,
    pub dst: Option<Unit>,
}

impl MoveContext {
    pub fn capture(game: &Game, mv: CoordPair) -> Self {
        Self {
            mv,
            src: game.get(mv.src).copied(),
            dst: game.get(mv.dst).copied(),
        }
    }

    /// One-line description, e.g. `dT9 attacked aV9`
    pub fn describe(&self, action: Action) -> String {
        let unit = |u: Option<Unit>| u.map(|u| u.to_string()).unwrap_or_else(|| "?".to_string());
        match action {
            Action::Move => format!("move from {} to {}", self.mv.src, self.mv.dst),
            Action::Attack => format!("{} attacked {}", unit(self.src), unit(self.dst)),
            Action::Repair => format!("{} repaired {}", unit(self.src), unit(self.dst)),
            Action::SelfDestruct => format!("{} self-destructed", unit(self.src)),
        }
    }
}

/// Statistics block printed after each computer move
pub fn format_search_report(report: &SearchReport, stats: &SearchStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Search ran for {:.4} seconds", report.elapsed.as_secs_f64());
    if report.timed_out {
        let _ = writeln!(out, "Search stopped at the time limit");
    }
    let _ = writeln!(out, "Heuristic score: {}", report.score);

    let plies = report
        .evaluations_per_ply
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{}={}", i + 1, n))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Evals by depth: {}", plies);

    let shares = report
        .ply_percentages()
        .iter()
        .enumerate()
        .map(|(i, pct)| format!("{}={:.1}%", i + 1, pct))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Evals by depth (%): {}", shares);

    let _ = writeln!(out, "Cumulative evals: {}", group_thousands(stats.total_evaluations()));
    if let Some(rate) = stats.evaluation_rate() {
        let _ = writeln!(out, "Eval perf.: {:.1}k/s", rate / 1000.0);
    }
    let _ = write!(out, "Elapsed time: {:.1}s", report.elapsed.as_secs_f64());

    out
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
