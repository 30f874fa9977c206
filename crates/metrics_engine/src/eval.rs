//! Four-metric position evaluation
//!
//! Each side gets material, mobility, offense and defense values. A profile
//! turns the White − Black deltas into one number.

use chess_core::{piece_reaches, Color, Move, MoveGenerator, PieceKind, Position, StandardMoveGen};
use serde::{Deserialize, Serialize};

use crate::profile::EvaluationProfile;

/// How much work the evaluator does per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalMode {
    /// Legal moves, and defense verified by relocating the defender.
    #[default]
    Exact,
    /// Pseudo-legal moves, and defense counted without the king check.
    Approximate,
}

/// Contribution of one defended piece of value `v` to the defense metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseScale {
    /// `√v`: keeps heavy defended pieces from dominating.
    #[default]
    Sqrt,
    /// `v`
    Linear,
}

impl DefenseScale {
    #[inline]
    pub fn apply(self, value: i32) -> f64 {
        match self {
            DefenseScale::Sqrt => (value as f64).sqrt(),
            DefenseScale::Linear => value as f64,
        }
    }
}

/// Offense credited for an en-passant capture, whatever the pawn table says.
pub const EN_PASSANT_OFFENSE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SideMetrics {
    pub material: i32,
    pub mobility: i32,
    pub offense: i32,
    pub defense: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub white: SideMetrics,
    pub black: SideMetrics,
}

/// White − Black, per component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub material: i32,
    pub mobility: i32,
    pub offense: i32,
    pub defense: f64,
}

impl Metrics {
    pub fn side(&self, c: Color) -> &SideMetrics {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn deltas(&self) -> MetricDeltas {
        MetricDeltas {
            material: self.white.material - self.black.material,
            mobility: self.white.mobility - self.black.mobility,
            offense: self.white.offense - self.black.offense,
            defense: self.white.defense - self.black.defense,
        }
    }

    /// Material lead of `c` (negative when behind).
    pub fn material_lead(&self, c: Color) -> i32 {
        self.side(c).material - self.side(c.other()).material
    }

    /// Offense lead of `c` (negative when behind).
    pub fn offense_lead(&self, c: Color) -> i32 {
        self.side(c).offense - self.side(c.other()).offense
    }
}

/// Computes metrics through a pluggable move generator.
#[derive(Debug, Clone)]
pub struct Evaluator<G = StandardMoveGen> {
    gen: G,
    mode: EvalMode,
    scale: DefenseScale,
    buf: Vec<Move>,
}

impl Evaluator<StandardMoveGen> {
    pub fn new(mode: EvalMode, scale: DefenseScale) -> Self {
        Self::with_generator(StandardMoveGen, mode, scale)
    }

    /// Σ weight × (White − Black), from White's point of view.
    pub fn score(metrics: &Metrics, profile: &EvaluationProfile) -> f64 {
        let d = metrics.deltas();
        profile.material() * d.material as f64
            + profile.mobility() * d.mobility as f64
            + profile.offense() * d.offense as f64
            + profile.defense() * d.defense
    }

    /// [`Evaluator::score`] from `side`'s point of view.
    pub fn score_for(metrics: &Metrics, profile: &EvaluationProfile, side: Color) -> f64 {
        let s = Self::score(metrics, profile);
        match side {
            Color::White => s,
            Color::Black => -s,
        }
    }
}

impl Default for Evaluator<StandardMoveGen> {
    fn default() -> Self {
        Self::new(EvalMode::default(), DefenseScale::default())
    }
}

impl<G: MoveGenerator> Evaluator<G> {
    pub fn with_generator(gen: G, mode: EvalMode, scale: DefenseScale) -> Self {
        Self {
            gen,
            mode,
            scale,
            buf: Vec::with_capacity(64),
        }
    }

    pub fn generator(&self) -> &G {
        &self.gen
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn scale(&self) -> DefenseScale {
        self.scale
    }

    pub fn set_mode(&mut self, mode: EvalMode) {
        self.mode = mode;
    }

    /// Metrics for both sides. `pos` is restored before returning.
    pub fn metrics(&mut self, pos: &mut Position) -> Metrics {
        Metrics {
            white: self.side_metrics(pos, Color::White),
            black: self.side_metrics(pos, Color::Black),
        }
    }

    pub fn side_metrics(&mut self, pos: &mut Position, side: Color) -> SideMetrics {
        let material = pos
            .pieces()
            .filter(|(_, pc)| pc.color == side)
            .map(|(_, pc)| pc.kind.value())
            .sum();

        match self.mode {
            EvalMode::Exact => self.gen.legal_moves_into(pos, side, &mut self.buf),
            EvalMode::Approximate => self.gen.pseudo_moves_into(pos, side, &mut self.buf),
        }
        let (mut mobility, mut offense) = (0, 0);
        for mv in &self.buf {
            match mv.captured {
                _ if mv.is_en_passant => offense += EN_PASSANT_OFFENSE,
                Some(victim) => offense += victim.value(),
                None => mobility += 1,
            }
        }

        SideMetrics {
            material,
            mobility,
            offense,
            defense: self.defense(pos, side),
        }
    }

    /// Sum over (defended X, defender A) pairs of `scale(value(X))`.
    ///
    /// A defends X when it reaches X's square and, in exact mode, standing
    /// there would not leave the own king in check. The king is never a
    /// defended piece.
    fn defense(&self, pos: &mut Position, side: Color) -> f64 {
        let own: Vec<(u8, PieceKind)> = pos
            .pieces()
            .filter(|(_, pc)| pc.color == side)
            .map(|(s, pc)| (s, pc.kind))
            .collect();

        // Pair counts per defended kind, summed in a fixed kind order so
        // mirrored positions give bit-identical totals.
        let mut pairs = [0u32; 6];
        for &(x, kind) in &own {
            if kind == PieceKind::King {
                continue;
            }
            for &(a, _) in &own {
                if a == x || !piece_reaches(pos, a, x) {
                    continue;
                }
                let holds = match self.mode {
                    EvalMode::Exact => pos.with_relocated(a, x, |p| !p.in_check(side)),
                    EvalMode::Approximate => true,
                };
                if holds {
                    pairs[kind.idx()] += 1;
                }
            }
        }
        PieceKind::ALL
            .iter()
            .map(|k| pairs[k.idx()] as f64 * self.scale.apply(k.value()))
            .sum()
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
