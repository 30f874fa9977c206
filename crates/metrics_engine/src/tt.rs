//! Transposition table keyed by position fingerprint.
//!
//! Mate scores are stored relative to the node rather than the root, and
//! converted back on probe, so an entry stays valid at any ply.

use chess_core::Move;

use crate::cache::BoundedCache;
use crate::eval::Metrics;
use crate::search::MATE_BOUND;

/// How a stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Score >= beta (fail-high)
    Lower,
    /// Score <= alpha (fail-low)
    Upper,
}

#[derive(Debug, Clone)]
pub struct TtEntry {
    pub score: f64,
    pub depth: u8,
    pub bound: Bound,
    pub best_move: Option<Move>,
    /// Metrics at the end of the principal line below this node.
    pub leaf: Option<Metrics>,
}

impl TtEntry {
    /// The stored score, if it settles a window of `(alpha, beta)` at `depth`.
    /// `score` must already be converted with [`score_from_tt`].
    pub fn cutoff(&self, score: f64, depth: u8, alpha: f64, beta: f64) -> Option<f64> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: BoundedCache<u64, TtEntry>,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BoundedCache::new(capacity),
        }
    }

    pub fn probe(&self, hash: u64) -> Option<&TtEntry> {
        self.entries.get(&hash)
    }

    /// Depth-preferred: a shallower result never replaces a deeper one.
    pub fn store(&mut self, hash: u64, entry: TtEntry) {
        if let Some(existing) = self.entries.get(&hash) {
            if existing.depth > entry.depth {
                return;
            }
        }
        self.entries.insert(hash, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Node-relative form of a root-relative score.
#[inline]
pub fn score_to_tt(score: f64, ply: u32) -> f64 {
    if score >= MATE_BOUND {
        score + ply as f64
    } else if score <= -MATE_BOUND {
        score - ply as f64
    } else {
        score
    }
}

/// Root-relative form of a stored score, probed at `ply`.
#[inline]
pub fn score_from_tt(score: f64, ply: u32) -> f64 {
    if score >= MATE_BOUND {
        score - ply as f64
    } else if score <= -MATE_BOUND {
        score + ply as f64
    } else {
        score
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
