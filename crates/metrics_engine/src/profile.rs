//! Evaluation profiles: named weightings of the four metrics.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Safety weight for a profile that weighs offense and defense equally.
pub const BASE_SAFETY_WEIGHT: f64 = 2.0;

/// Name + four non-negative weights, plus an optional explicit weight for
/// the root safety overlay. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationProfile {
    name: String,
    material: f64,
    mobility: f64,
    offense: f64,
    defense: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    safety_weight: Option<f64>,
}

impl EvaluationProfile {
    pub fn new(
        name: impl Into<String>,
        material: f64,
        mobility: f64,
        offense: f64,
        defense: f64,
    ) -> EngineResult<Self> {
        let p = Self {
            name: name.into(),
            material,
            mobility,
            offense,
            defense,
            safety_weight: None,
        };
        p.validate()?;
        Ok(p)
    }

    /// Same weights with an explicit safety weight.
    pub fn with_safety_weight(self, weight: f64) -> EngineResult<Self> {
        let p = Self {
            safety_weight: Some(weight),
            ..self
        };
        p.validate()?;
        Ok(p)
    }

    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        let weights = [
            ("material", self.material),
            ("mobility", self.mobility),
            ("offense", self.offense),
            ("defense", self.defense),
            ("safety_weight", self.safety_weight.unwrap_or(0.0)),
        ];
        for (weight, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidWeight {
                    profile: self.name.clone(),
                    weight,
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn material(&self) -> f64 {
        self.material
    }
    pub fn mobility(&self) -> f64 {
        self.mobility
    }
    pub fn offense(&self) -> f64 {
        self.offense
    }
    pub fn defense(&self) -> f64 {
        self.defense
    }

    /// Weight applied to the safety term at the root.
    ///
    /// Without an explicit value, profiles leaning on defense weigh safety
    /// higher: `BASE_SAFETY_WEIGHT × clamp(defense / offense, 0.5, 2.0)`.
    pub fn safety_weight(&self) -> f64 {
        if let Some(w) = self.safety_weight {
            return w;
        }
        let ratio = if self.offense > 0.0 {
            self.defense / self.offense
        } else if self.defense > 0.0 {
            2.0
        } else {
            1.0
        };
        BASE_SAFETY_WEIGHT * ratio.clamp(0.5, 2.0)
    }

    /// The built-in profiles, `default` first.
    pub fn builtins() -> Vec<EvaluationProfile> {
        [
            ("default", 1.0, 1.0, 1.0, 1.0),
            ("offense-first", 1.0, 1.0, 2.0, 1.0),
            ("defense-first", 1.0, 1.0, 1.0, 2.0),
            ("board-coverage", 1.0, 2.0, 1.0, 1.0),
            ("materialist", 2.0, 1.0, 1.0, 1.0),
        ]
        .into_iter()
        .map(|(name, material, mobility, offense, defense)| EvaluationProfile {
            name: name.to_string(),
            material,
            mobility,
            offense,
            defense,
            safety_weight: None,
        })
        .collect()
    }

    pub fn builtin(name: &str) -> Option<EvaluationProfile> {
        Self::builtins().into_iter().find(|p| p.name == name)
    }
}

impl Default for EvaluationProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            material: 1.0,
            mobility: 1.0,
            offense: 1.0,
            defense: 1.0,
            safety_weight: None,
        }
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod profile_tests;
