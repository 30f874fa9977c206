//! Negamax search with alpha-beta pruning
//!
//! Iterative deepening over the root moves, each searched with its own
//! aspiration window. Below the root: transposition table, null move,
//! futility pruning and late move reductions, ending in a capture-only
//! quiescence search (see `quiescence.rs`).
//!
//! Every node score is from the side to move's point of view, in weighted
//! metric units. Mate scores sit near ±[`MATE`] and encode the distance from
//! the root so shorter mates score higher.

use std::cmp::Ordering;

use chess_core::{Color, Move, MoveGenerator, Position, SearchLimits, StandardMoveGen, TimeControl};
use tracing::{debug, info};

use crate::cache::BoundedCache;
use crate::config::SearchConfig;
use crate::eval::{EvalMode, Evaluator, Metrics};
use crate::ordering::{order_moves, HistoryTable, KillerTable};
use crate::profile::EvaluationProfile;
use crate::safety::{assess_move, SafetyAssessment};
use crate::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable, TtEntry};

/// Score of being mated right now; a mate `n` plies away scores `MATE - n`.
pub const MATE: f64 = 1.0e9;
/// Anything beyond this magnitude is a mate score.
pub const MATE_BOUND: f64 = MATE - 1000.0;
/// Combined root score of a vetoed move: below every mate score.
pub const VETOED: f64 = -2.0 * MATE;
/// Window bound standing in for infinity. Finite so negation stays exact.
pub const INF: f64 = 4.0 * MATE;

/// Half-width of the first aspiration window around a root move's score.
pub const ASPIRATION_WINDOW: f64 = 1.0;
/// Futility margin per remaining ply.
pub const FUTILITY_MARGIN: f64 = 3.0;
/// Slack added to the material gain before a capture is delta-pruned.
pub const DELTA_MARGIN: f64 = 2.0;
/// Extra plies quiescence may add below the nominal depth.
pub const QS_MAX_DEPTH: u8 = 4;

const NULL_MOVE_REDUCTION: u8 = 3;
const NULL_MOVE_MIN_DEPTH: u8 = 3;
const FUTILITY_MAX_DEPTH: u8 = 2;
const LMR_MIN_INDEX: usize = 4;
const LMR_MIN_DEPTH: u8 = 3;
/// Width of a null window. Scores are real-valued, so "beta - 1" does not work.
const NULL_WINDOW: f64 = 1.0e-6;
const ASPIRATION_GROWTH: f64 = 4.0;
const ASPIRATION_MAX_FAILURES: u32 = 2;

/// Result of one node: its score and the metrics at the end of its line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub score: f64,
    pub leaf: Option<Metrics>,
}

impl Node {
    /// Returned while unwinding after the deadline; never used as a score.
    pub(crate) const ABORTED: Node = Node {
        score: 0.0,
        leaf: None,
    };

    pub(crate) fn terminal(in_check: bool, ply: usize) -> Node {
        Node {
            score: if in_check { -(MATE - ply as f64) } else { 0.0 },
            leaf: None,
        }
    }
}

/// Everything the root learned about one move.
#[derive(Debug, Clone)]
pub struct RootMoveReport {
    pub mv: Move,
    /// Negamax score from the root side's point of view.
    pub search_score: f64,
    pub safety: Option<SafetyAssessment>,
    /// Search score plus weighted safety, or [`VETOED`].
    pub combined: f64,
    /// Material lead lost between the root and the move's principal leaf.
    pub material_swing: i32,
    /// Offense lead lost between the root and the move's principal leaf.
    pub offense_swing: i32,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// None when the root has no legal move.
    pub best_move: Option<Move>,
    /// Search score of the chosen move, root side's point of view.
    pub score: f64,
    /// Last fully completed depth (0 if none).
    pub depth: u8,
    pub nodes: u64,
    /// The deadline cut the search short.
    pub stopped: bool,
    /// Root moves of the last completed depth, best first.
    pub root_moves: Vec<RootMoveReport>,
    pub stats: SearchStats,
}

/// How often each pruning rule fired during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub null_move_tries: u64,
    pub null_move_cutoffs: u64,
    pub futility_prunes: u64,
    pub lmr_reductions: u64,
    /// Reduced searches that beat alpha and were repeated at full depth.
    pub lmr_researches: u64,
    pub aspiration_researches: u64,
    pub delta_prunes: u64,
    pub losing_exchange_skips: u64,
}

/// Root move carried between iterations.
#[derive(Debug, Clone, Copy)]
struct RootEntry {
    mv: Move,
    safety: Option<SafetyAssessment>,
    previous: Option<f64>,
}

/// All mutable search state. One session per game (or per thread).
///
/// The transposition table survives between searches with the same profile
/// and is dropped when the profile changes. Killers and history are reset
/// at the start of every search.
#[derive(Debug)]
pub struct SearchSession<G: MoveGenerator = StandardMoveGen> {
    pub(crate) config: SearchConfig,
    pub(crate) evaluator: Evaluator<G>,
    pub(crate) metrics_cache: BoundedCache<u64, Metrics>,
    pub(crate) tt: TranspositionTable,
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    pub(crate) nodes: u64,
    pub(crate) stats: SearchStats,
    pub(crate) tc: TimeControl,
    pub(crate) profile: EvaluationProfile,
}

impl SearchSession<StandardMoveGen> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_generator(StandardMoveGen, config)
    }
}

impl Default for SearchSession<StandardMoveGen> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<G: MoveGenerator> SearchSession<G> {
    pub fn with_generator(gen: G, config: SearchConfig) -> Self {
        Self {
            evaluator: Evaluator::with_generator(gen, config.eval_mode, config.defense_scale),
            metrics_cache: BoundedCache::new(config.metrics_cache_capacity),
            tt: TranspositionTable::new(config.tt_capacity),
            killers: KillerTable::default(),
            history: HistoryTable::default(),
            nodes: 0,
            stats: SearchStats::default(),
            tc: TimeControl::default(),
            profile: EvaluationProfile::default(),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tt_len(&self) -> usize {
        self.tt.len()
    }

    /// Switch evaluation mode. Cached metrics and scores are dropped.
    pub fn set_eval_mode(&mut self, mode: EvalMode) {
        if self.config.eval_mode == mode {
            return;
        }
        self.config.eval_mode = mode;
        self.evaluator.set_mode(mode);
        self.clear();
    }

    /// Forget everything learned: TT, metrics cache, killers, history.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.metrics_cache.clear();
        self.killers.clear();
        self.history.clear();
    }

    /// Metrics of `pos`, through the fingerprint-keyed cache.
    pub fn metrics(&mut self, pos: &mut Position) -> Metrics {
        let key = pos.hash();
        if let Some(m) = self.metrics_cache.get(&key) {
            return *m;
        }
        let m = self.evaluator.metrics(pos);
        self.metrics_cache.insert(key, m);
        m
    }

    /// Static score of `pos` for the side to move.
    pub(crate) fn static_eval(&mut self, pos: &mut Position) -> (f64, Metrics) {
        let m = self.metrics(pos);
        (
            Evaluator::score_for(&m, &self.profile, pos.side_to_move()),
            m,
        )
    }

    /// Count a node and poll the clock. True once the search must unwind.
    pub(crate) fn tick(&mut self) -> bool {
        self.nodes += 1;
        if self.tc.has_deadline() && self.tc.should_check_time(self.nodes) {
            self.tc.check_time();
        }
        self.tc.is_stopped()
    }

    pub(crate) fn legal_moves(&self, pos: &mut Position, side: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.evaluator
            .generator()
            .legal_moves_into(pos, side, &mut moves);
        moves
    }

    /// Pick a move for `pos` under `profile`.
    ///
    /// `pos` is not modified. Searches depths 1..=`limits.depth` (at least
    /// one) and answers from the last depth that completed.
    pub fn best_move(
        &mut self,
        pos: &Position,
        profile: &EvaluationProfile,
        limits: SearchLimits,
    ) -> SearchOutcome {
        if self.profile != *profile {
            // Stored scores are weighted by the old profile.
            self.tt.clear();
            self.profile = profile.clone();
        }
        self.killers.clear();
        self.history.clear();
        self.nodes = 0;
        self.stats = SearchStats::default();
        self.tc = limits
            .time_control()
            .with_check_interval(self.config.check_interval);
        self.tc.start();

        let mut root = pos.clone();
        let root_side = root.side_to_move();
        let mut moves = self.legal_moves(&mut root, root_side);
        if moves.is_empty() {
            let score = Node::terminal(root.in_check(root_side), 0).score;
            info!(score, "no legal moves at the root");
            return SearchOutcome {
                best_move: None,
                score,
                depth: 0,
                nodes: self.nodes,
                stopped: false,
                root_moves: Vec::new(),
                stats: self.stats,
            };
        }

        let root_metrics = self.metrics(&mut root);
        order_moves(&mut moves, None, [None, None], &self.history);
        let mut entries: Vec<RootEntry> = moves
            .iter()
            .map(|&mv| {
                let safety = self.config.safety_overlay.then(|| assess_move(&mut root, mv));
                if let Some(s) = safety.filter(SafetyAssessment::is_vetoed) {
                    debug!(mv = %mv, net_loss = s.net_loss(), "vetoed: leaves material hanging");
                }
                RootEntry {
                    mv,
                    safety,
                    previous: None,
                }
            })
            .collect();

        let max_depth = limits.depth.max(1);
        let mut completed: Vec<RootMoveReport> = Vec::new();
        let mut depth_reached = 0;

        for depth in 1..=max_depth {
            let mut reports = Vec::with_capacity(entries.len());
            for entry in &entries {
                let Some(node) = self.search_root_move(&mut root, entry, depth) else {
                    break;
                };
                reports.push(self.report(entry, node, &root_metrics, root_side));
            }
            if self.tc.is_stopped() {
                break;
            }

            reports.sort_by(compare_root);
            debug!(
                depth,
                best = %reports[0].mv,
                score = reports[0].search_score,
                combined = reports[0].combined,
                nodes = self.nodes,
                "iteration complete"
            );
            entries = reports
                .iter()
                .map(|r| RootEntry {
                    mv: r.mv,
                    safety: r.safety,
                    previous: Some(r.search_score),
                })
                .collect();
            completed = reports;
            depth_reached = depth;
        }

        let (best_move, score) = match completed.first() {
            Some(best) => (best.mv, best.search_score),
            None => (entries[0].mv, 0.0),
        };
        let stopped = self.tc.is_stopped();
        info!(
            best = %best_move,
            score,
            depth = depth_reached,
            nodes = self.nodes,
            stopped,
            elapsed_ms = self.tc.elapsed().as_millis() as u64,
            "search finished"
        );
        debug!(stats = ?self.stats, "pruning");

        SearchOutcome {
            best_move: Some(best_move),
            score,
            depth: depth_reached,
            nodes: self.nodes,
            stopped,
            root_moves: completed,
            stats: self.stats,
        }
    }

    /// Exact score of one root move at `depth`, or None on deadline.
    fn search_root_move(&mut self, root: &mut Position, entry: &RootEntry, depth: u8) -> Option<Node> {
        let undo = root.make_move(entry.mv);
        let mut window = ASPIRATION_WINDOW;
        let mut failures = 0;

        let result = loop {
            let (alpha, beta) = match entry.previous {
                Some(prev) if failures < ASPIRATION_MAX_FAILURES => (prev - window, prev + window),
                _ => (-INF, INF),
            };
            let child = self.negamax(root, depth - 1, -beta, -alpha, 1, true);
            if self.tc.is_stopped() {
                break None;
            }
            let score = -child.score;
            let bounded = alpha > -INF || beta < INF;
            if bounded && (score <= alpha || score >= beta) {
                failures += 1;
                window *= ASPIRATION_GROWTH;
                self.stats.aspiration_researches += 1;
                continue;
            }
            break Some(Node {
                score,
                leaf: child.leaf,
            });
        };

        root.unmake_move(undo);
        result
    }

    fn report(&self, entry: &RootEntry, node: Node, root_metrics: &Metrics, side: Color) -> RootMoveReport {
        let combined = match entry.safety {
            Some(s) if s.is_vetoed() => VETOED,
            Some(s) => node.score + self.profile.safety_weight() * s.term() as f64,
            None => node.score,
        };
        let (material_swing, offense_swing) = match node.leaf {
            Some(leaf) => (
                root_metrics.material_lead(side) - leaf.material_lead(side),
                root_metrics.offense_lead(side) - leaf.offense_lead(side),
            ),
            None => (0, 0),
        };
        RootMoveReport {
            mv: entry.mv,
            search_score: node.score,
            safety: entry.safety,
            combined,
            material_swing,
            offense_swing,
        }
    }

    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: f64,
        beta: f64,
        ply: usize,
        allow_null: bool,
    ) -> Node {
        if self.tick() {
            return Node::ABORTED;
        }
        if pos.is_fifty_move_draw() {
            return Node {
                score: 0.0,
                leaf: None,
            };
        }

        let alpha_orig = alpha;
        let hash = pos.hash();
        let mut tt_move = None;
        if self.config.transposition_table {
            if let Some(entry) = self.tt.probe(hash) {
                tt_move = entry.best_move;
                let score = score_from_tt(entry.score, ply as u32);
                if let Some(score) = entry.cutoff(score, depth, alpha, beta) {
                    return Node {
                        score,
                        leaf: entry.leaf,
                    };
                }
            }
        }

        if depth == 0 {
            return self.quiescence(pos, alpha, beta, ply, 0);
        }

        let side = pos.side_to_move();
        let mut moves = self.legal_moves(pos, side);
        let in_check = pos.in_check(side);
        if moves.is_empty() {
            return Node::terminal(in_check, ply);
        }

        let mate_window = alpha.abs() >= MATE_BOUND || beta.abs() >= MATE_BOUND;

        if self.config.null_move
            && allow_null
            && depth >= NULL_MOVE_MIN_DEPTH
            && !in_check
            && !mate_window
            && pos.has_non_pawn_material(side)
        {
            self.stats.null_move_tries += 1;
            let undo = pos.make_null_move();
            let child = self.negamax(
                pos,
                depth - NULL_MOVE_REDUCTION,
                -beta,
                -beta + NULL_WINDOW,
                ply + 1,
                false,
            );
            pos.unmake_null_move(undo);
            if self.tc.is_stopped() {
                return Node::ABORTED;
            }
            let score = -child.score;
            if score >= beta {
                self.stats.null_move_cutoffs += 1;
                // A mate found after passing proves nothing about this node.
                let score = if score >= MATE_BOUND { beta } else { score };
                return Node {
                    score,
                    leaf: child.leaf,
                };
            }
        }

        if self.config.futility && depth <= FUTILITY_MAX_DEPTH && !in_check && !mate_window {
            let (stand, metrics) = self.static_eval(pos);
            if stand + FUTILITY_MARGIN * depth as f64 <= alpha {
                self.stats.futility_prunes += 1;
                return Node {
                    score: stand,
                    leaf: Some(metrics),
                };
            }
        }

        order_moves(&mut moves, tt_move, self.killers.get(ply), &self.history);

        let mut best = Node {
            score: -INF,
            leaf: None,
        };
        let mut best_move = None;
        for (i, &mv) in moves.iter().enumerate() {
            let undo = pos.make_move(mv);
            let gives_check = pos.in_check(side.other());
            let reduce = self.config.late_move_reduction
                && i >= LMR_MIN_INDEX
                && depth >= LMR_MIN_DEPTH
                && !in_check
                && !mv.is_capture()
                && !mv.is_promotion
                && !gives_check;

            let mut child = if reduce {
                self.stats.lmr_reductions += 1;
                self.negamax(pos, depth - 2, -alpha - NULL_WINDOW, -alpha, ply + 1, true)
            } else {
                self.negamax(pos, depth - 1, -beta, -alpha, ply + 1, true)
            };
            if reduce && !self.tc.is_stopped() && -child.score > alpha {
                self.stats.lmr_researches += 1;
                child = self.negamax(pos, depth - 1, -beta, -alpha, ply + 1, true);
            }
            pos.unmake_move(undo);
            if self.tc.is_stopped() {
                return Node::ABORTED;
            }

            let score = -child.score;
            if score > best.score {
                best = Node {
                    score,
                    leaf: child.leaf,
                };
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if !mv.is_capture() && !mv.is_promotion {
                    self.killers.record(ply, mv);
                    self.history.reward(&mv, depth);
                }
                break;
            }
        }

        if self.config.transposition_table {
            let bound = if best.score <= alpha_orig {
                Bound::Upper
            } else if best.score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(
                hash,
                TtEntry {
                    score: score_to_tt(best.score, ply as u32),
                    depth,
                    bound,
                    best_move,
                    leaf: best.leaf,
                },
            );
        }
        best
    }
}

/// Best first: combined score, then smaller material swing, then smaller
/// offense swing, then canonical text.
fn compare_root(a: &RootMoveReport, b: &RootMoveReport) -> Ordering {
    b.combined
        .total_cmp(&a.combined)
        .then(a.material_swing.cmp(&b.material_swing))
        .then(a.offense_swing.cmp(&b.offense_swing))
        .then(a.mv.sort_key().cmp(&b.mv.sort_key()))
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
