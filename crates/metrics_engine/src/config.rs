//! Engine configuration loaded from TOML.
//!
//! ```toml
//! default_profile = "cautious"
//!
//! [search]
//! null_move = false
//! eval_mode = "approximate"
//!
//! [[profiles]]
//! name = "cautious"
//! material = 1.0
//! mobility = 0.5
//! offense = 1.0
//! defense = 3.0
//! safety_weight = 5.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::eval::{DefenseScale, EvalMode};
use crate::profile::EvaluationProfile;

/// Search feature toggles and capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub transposition_table: bool,
    pub null_move: bool,
    pub futility: bool,
    pub late_move_reduction: bool,
    /// Delta pruning and the losing-exchange filter in quiescence.
    pub quiescence_pruning: bool,
    pub safety_overlay: bool,
    pub eval_mode: EvalMode,
    pub defense_scale: DefenseScale,
    pub tt_capacity: usize,
    pub metrics_cache_capacity: usize,
    /// Nodes between clock checks when a deadline is set.
    pub check_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            transposition_table: true,
            null_move: true,
            futility: true,
            late_move_reduction: true,
            quiescence_pruning: true,
            safety_overlay: true,
            eval_mode: EvalMode::Exact,
            defense_scale: DefenseScale::Sqrt,
            tt_capacity: 1 << 18,
            metrics_cache_capacity: 1 << 17,
            check_interval: 1024,
        }
    }
}

impl SearchConfig {
    /// Plain alpha-beta: every window-dependent pruning switched off.
    pub fn exhaustive() -> Self {
        Self {
            null_move: false,
            futility: false,
            late_move_reduction: false,
            quiescence_pruning: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub default_profile: String,
    /// Extra profiles; a name here shadows a built-in of the same name.
    pub profiles: Vec<EvaluationProfile>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            default_profile: "default".to_string(),
            profiles: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        for p in &config.profiles {
            p.validate()?;
        }
        // Fail on a dangling default now rather than on the first search.
        config.profile(&config.default_profile)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path` when given, falling back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "using default engine configuration");
                Self::default()
            }
        }
    }

    /// Configured profile named `name`, else the built-in one.
    pub fn profile(&self, name: &str) -> EngineResult<EvaluationProfile> {
        self.profiles
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .or_else(|| EvaluationProfile::builtin(name))
            .ok_or_else(|| EngineError::UnknownProfile(name.to_string()))
    }

    pub fn default_profile(&self) -> EngineResult<EvaluationProfile> {
        self.profile(&self.default_profile)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
