//! Move ordering: TT move, promotions, captures (MVV-LVA), killers,
//! history, castling, the rest.
//!
//! The sort is stable over the generator's canonical order, so equal keys
//! keep text order and ordering stays deterministic.

use std::cmp::Reverse;

use chess_core::Move;

const TT_MOVE: i64 = 10_000_000;
const PROMOTION: i64 = 9_000_000;
const CAPTURE: i64 = 8_000_000;
const KILLER_PRIMARY: i64 = 7_000_000;
const KILLER_SECONDARY: i64 = 6_900_000;
const HISTORY_BASE: i64 = 2_000_000;
const CASTLE: i64 = 1_000_000;

/// History scores saturate here so they never reach the killer band.
pub const HISTORY_MAX: i64 = 999_999;

/// Most valuable victim first, least valuable attacker as tie-break.
#[inline]
pub fn mvv_lva(mv: &Move) -> i64 {
    let victim = mv.captured.map_or(0, |v| v.value()) as i64;
    victim * 16 - mv.piece.value() as i64
}

/// Two quiet cutoff moves per ply, most recent first.
#[derive(Debug, Clone, Default)]
pub struct KillerTable {
    slots: Vec<[Option<Move>; 2]>,
}

impl KillerTable {
    pub fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None, None])
    }

    pub fn record(&mut self, ply: usize, mv: Move) {
        if self.slots.len() <= ply {
            self.slots.resize(ply + 1, [None, None]);
        }
        let slot = &mut self.slots[ply];
        if slot[0] != Some(mv) {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Cutoff credit per (origin, destination).
#[derive(Debug, Clone)]
pub struct HistoryTable {
    scores: Box<[[i64; 64]; 64]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            scores: Box::new([[0; 64]; 64]),
        }
    }
}

impl HistoryTable {
    pub fn get(&self, mv: &Move) -> i64 {
        self.scores[mv.from as usize][mv.to as usize]
    }

    /// Credit a quiet move that caused a cutoff at `depth`.
    pub fn reward(&mut self, mv: &Move, depth: u8) {
        let s = &mut self.scores[mv.from as usize][mv.to as usize];
        *s = (*s + depth as i64 * depth as i64).min(HISTORY_MAX);
    }

    pub fn clear(&mut self) {
        for row in self.scores.iter_mut() {
            row.fill(0);
        }
    }
}

/// Ordering key for one move; higher searches first.
pub fn move_score(
    mv: &Move,
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    history: &HistoryTable,
) -> i64 {
    if tt_move == Some(*mv) {
        TT_MOVE
    } else if mv.is_promotion {
        PROMOTION
    } else if mv.is_capture() {
        CAPTURE + mvv_lva(mv)
    } else if killers[0] == Some(*mv) {
        KILLER_PRIMARY
    } else if killers[1] == Some(*mv) {
        KILLER_SECONDARY
    } else if history.get(mv) > 0 {
        HISTORY_BASE + history.get(mv)
    } else if mv.is_castle {
        CASTLE
    } else {
        0
    }
}

pub fn order_moves(
    moves: &mut [Move],
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    history: &HistoryTable,
) {
    moves.sort_by_cached_key(|mv| Reverse(move_score(mv, tt_move, killers, history)));
}

/// Captures only, MVV-LVA first (stable over canonical order).
pub fn order_captures(moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| Reverse(mvv_lva(mv)));
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
