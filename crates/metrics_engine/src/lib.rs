//! Metrics Chess Engine
//!
//! Scores positions by four per-side metrics (material, mobility, offense,
//! defense) weighted by an evaluation profile, searches them with
//! alpha-beta, and screens root moves with a material-safety overlay.

pub mod cache;
pub mod config;
pub mod error;
pub mod eval;
pub mod ordering;
pub mod profile;
mod quiescence;
pub mod safety;
pub mod search;
pub mod tt;

use chess_core::{Engine, Position, SearchLimits, SearchResult};
use tracing::warn;

pub use config::{EngineConfig, SearchConfig};
pub use error::{EngineError, EngineResult};
pub use eval::{DefenseScale, EvalMode, Evaluator, MetricDeltas, Metrics, SideMetrics};
pub use profile::EvaluationProfile;
pub use safety::{assess_move, SafetyAssessment};
pub use search::{RootMoveReport, SearchOutcome, SearchSession, SearchStats, MATE, MATE_BOUND, VETOED};

/// Depth used when the caller does not ask for one.
pub const DEFAULT_DEPTH: u8 = 3;
/// Deepest search accepted through `setoption`.
pub const MAX_DEPTH: u8 = 12;

/// The metrics engine behind the [`Engine`] trait.
///
/// Owns one [`SearchSession`], so transposition and metrics caches persist
/// between moves of a game until [`Engine::new_game`].
#[derive(Debug)]
pub struct MetricsEngine {
    config: EngineConfig,
    session: SearchSession,
    profile: EvaluationProfile,
    depth: u8,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let profile = config.default_profile()?;
        Ok(Self {
            session: SearchSession::new(config.search.clone()),
            config,
            profile,
            depth: DEFAULT_DEPTH,
        })
    }

    pub fn profile(&self) -> &EvaluationProfile {
        &self.profile
    }

    /// Configured profiles first, then the built-ins they do not shadow.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .config
            .profiles
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        for p in EvaluationProfile::builtins() {
            if !names.iter().any(|n| n == p.name()) {
                names.push(p.name().to_string());
            }
        }
        names
    }

    pub fn set_profile(&mut self, name: &str) -> EngineResult<()> {
        self.profile = self.config.profile(name)?;
        Ok(())
    }

    /// Depth for searches where the caller gives none.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.depth = depth.clamp(1, MAX_DEPTH);
    }

    pub fn set_eval_mode(&mut self, mode: EvalMode) {
        self.session.set_eval_mode(mode);
    }

    /// Metrics of `pos` under the current evaluation mode.
    pub fn evaluate(&mut self, pos: &Position) -> Metrics {
        let mut pos = pos.clone();
        self.session.metrics(&mut pos)
    }

    /// Full search outcome, including the per-root-move report.
    pub fn analyze(&mut self, pos: &Position, limits: SearchLimits) -> SearchOutcome {
        self.session.best_move(pos, &self.profile, limits)
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            session: SearchSession::default(),
            profile: EvaluationProfile::default(),
            depth: DEFAULT_DEPTH,
        }
    }
}

impl Engine for MetricsEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult {
        let out = self.analyze(pos, limits);
        SearchResult {
            best_move: out.best_move,
            score: out.score,
            depth: out.depth,
            nodes: out.nodes,
            stopped: out.stopped,
        }
    }

    fn name(&self) -> &str {
        "Metrics v0.1"
    }

    fn new_game(&mut self) {
        self.session.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        if name.eq_ignore_ascii_case("Depth") {
            match value.parse::<u8>() {
                Ok(d) => {
                    self.set_depth(d);
                    true
                }
                Err(_) => {
                    warn!(value, "ignoring non-numeric depth");
                    false
                }
            }
        } else if name.eq_ignore_ascii_case("Profile") {
            match self.set_profile(value) {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "keeping profile '{}'", self.profile.name());
                    false
                }
            }
        } else if name.eq_ignore_ascii_case("EvalMode") {
            let mode = match value.to_ascii_lowercase().as_str() {
                "exact" => EvalMode::Exact,
                "approximate" => EvalMode::Approximate,
                _ => {
                    warn!(value, "unknown evaluation mode");
                    return false;
                }
            };
            self.set_eval_mode(mode);
            true
        } else {
            false
        }
    }
}
