//! UCI command handling.
//!
//! Only the subset a depth- or time-limited GUI needs. Every reply is
//! written to `out`; diagnostics go through `tracing` so stdout stays a
//! clean protocol channel.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chess_core::{move_to_uci, set_position_from_uci, Engine, Position, SearchLimits};
use metrics_engine::{MetricsEngine, MATE, MATE_BOUND, MAX_DEPTH};
use tracing::{debug, warn};

/// What the read loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Driver {
    engine: MetricsEngine,
    pos: Position,
}

impl Driver {
    pub fn new(engine: MetricsEngine) -> Self {
        Self {
            engine,
            pos: Position::startpos(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Handle one input line. Errors are I/O errors on `out` only.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(Flow::Continue);
        };

        match command {
            "uci" => self.identify(out)?,
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => {
                self.engine.new_game();
                self.pos = Position::startpos();
            }
            "position" => {
                // Moves before an illegal one stay applied.
                if let Err(e) = set_position_from_uci(&mut self.pos, &parts[1..]) {
                    warn!(error = %e, "bad position command");
                }
            }
            "go" => self.go(&parts[1..], out)?,
            "setoption" => self.set_option(&parts[1..]),
            "eval" => {
                let metrics = self.engine.evaluate(&self.pos);
                writeln!(out, "{}", serde_json::to_string(&metrics)?)?;
            }
            "quit" => return Ok(Flow::Quit),
            other => debug!(command = other, "ignoring unknown command"),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn identify(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "id name {}", self.engine.name())?;
        writeln!(out, "id author {}", self.engine.author())?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {MAX_DEPTH}",
            self.engine.depth()
        )?;
        let vars: String = self
            .engine
            .profile_names()
            .iter()
            .map(|n| format!(" var {n}"))
            .collect();
        writeln!(
            out,
            "option name Profile type combo default {}{vars}",
            self.engine.profile().name()
        )?;
        writeln!(
            out,
            "option name EvalMode type combo default exact var exact var approximate"
        )?;
        writeln!(out, "uciok")?;
        Ok(())
    }

    /// `go [depth N] [movetime MS]`; anything else is ignored.
    fn go(&mut self, args: &[&str], out: &mut impl Write) -> Result<()> {
        let mut limits = SearchLimits::depth(self.engine.depth());
        let mut it = args.iter();
        while let Some(&key) = it.next() {
            match key {
                "depth" => {
                    if let Some(d) = it.next().and_then(|v| v.parse::<u8>().ok()) {
                        limits.depth = d.clamp(1, MAX_DEPTH);
                    }
                }
                "movetime" => {
                    if let Some(ms) = it.next().and_then(|v| v.parse::<u64>().ok()) {
                        limits.move_time = Some(Duration::from_millis(ms));
                    }
                }
                _ => {}
            }
        }

        let result = self.engine.search(&self.pos, limits);
        writeln!(
            out,
            "info depth {} score {} nodes {}",
            result.depth,
            uci_score(result.score),
            result.nodes
        )?;
        match result.best_move {
            Some(mv) => writeln!(out, "bestmove {}", move_to_uci(mv))?,
            None => writeln!(out, "bestmove 0000")?,
        }
        Ok(())
    }

    /// `setoption name <id> [value <x>]`; ids may contain spaces.
    fn set_option(&mut self, args: &[&str]) {
        let Some(name_at) = args.iter().position(|&a| a == "name") else {
            return;
        };
        let value_at = args.iter().position(|&a| a == "value");
        let name_end = value_at.unwrap_or(args.len());
        if name_end <= name_at {
            return;
        }
        let name = args[name_at + 1..name_end].join(" ");
        let value = value_at
            .map(|i| args[i + 1..].join(" "))
            .unwrap_or_default();
        if !self.engine.set_option(&name, &value) {
            warn!(name = %name, value = %value, "option not applied");
        }
    }
}

/// `cp <centipawns>` or `mate <moves>`; one metric unit counts as a pawn.
pub fn uci_score(score: f64) -> String {
    if score.abs() >= MATE_BOUND {
        let plies = (MATE - score.abs()).round() as i64;
        let moves = (plies + 1) / 2;
        if plies == 0 {
            // Already mated: there is no sign to give.
            "mate 0".to_string()
        } else if score > 0.0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {}", (score * 100.0).round() as i64)
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod driver_tests;
