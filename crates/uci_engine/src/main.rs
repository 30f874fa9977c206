//! UCI front end for the metrics engine.
//!
//! Reads commands from stdin, answers on stdout, logs to stderr. Set
//! `CHESS_METRICS_CONFIG` to a TOML file to override search settings and
//! add profiles; `RUST_LOG` controls log verbosity.

mod driver;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use metrics_engine::{EngineConfig, MetricsEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::driver::{Driver, Flow};

const CONFIG_ENV: &str = "CHESS_METRICS_CONFIG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = EngineConfig::load_or_default(config_path.as_deref());
    let engine = MetricsEngine::new(config).context("building engine from configuration")?;
    info!(profile = engine.profile().name(), "engine ready");

    let mut driver = Driver::new(engine);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if driver.handle(&line, &mut stdout)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
