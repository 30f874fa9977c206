use super::*;
use std::time::Duration;

use chess_core::{legal_moves, PieceKind};

const MATE_IN_ONE: &str = "6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1";
const KNIGHT_TRAP: &str = "7k/8/8/8/p7/3p4/6PP/N6K w - - 0 1";
const SMALL_MIDDLEGAME: &str = "4k3/pp3ppp/2n5/3p4/3P4/2N5/PP3PPP/4K3 w - - 0 1";
const TACTIC: &str = "4k3/8/3q4/8/3R4/2N5/5PPP/6K1 w - - 0 1";
/// Only g1h1 walks into Ra1 mate.
const BACK_RANK: &str = "r5k1/5ppp/8/8/8/8/5PPP/6K1 w - - 0 1";
/// Qxd5 is the only capture and e6 guards d5.
const GUARDED_PAWN: &str = "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1";

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid FEN")
}

fn find_move(p: &Position, text: &str) -> Move {
    *legal_moves(p)
        .iter()
        .find(|m| m.to_text() == text)
        .unwrap_or_else(|| panic!("{text} not legal"))
}

fn plain_alpha_beta() -> SearchConfig {
    SearchConfig {
        transposition_table: false,
        ..SearchConfig::exhaustive()
    }
}

fn search(config: SearchConfig, fen: &str, depth: u8) -> SearchOutcome {
    let mut session = SearchSession::new(config);
    session.best_move(&pos(fen), &EvaluationProfile::default(), SearchLimits::depth(depth))
}

#[test]
fn test_start_position_returns_legal_move() {
    let start = Position::startpos();
    let out = search(SearchConfig::default(), chess_core::START_FEN, 2);
    let mv = out.best_move.expect("start position has moves");
    assert!(legal_moves(&start).contains(&mv));
    assert_eq!(out.depth, 2);
    assert!(!out.stopped);
    assert!(out.nodes > 0);
    assert_eq!(out.root_moves.len(), 20);
}

#[test]
fn test_finds_mate_in_one() {
    for depth in 1..=3 {
        let out = search(SearchConfig::default(), MATE_IN_ONE, depth);
        assert_eq!(out.best_move.unwrap().to_text(), "e1e8", "depth {depth}");
        assert_eq!(out.score, MATE - 1.0);
    }
}

#[test]
fn test_checkmated_root_has_no_move() {
    let out = search(SearchConfig::default(), "7k/6Q1/6K1/8/8/8/8/8 b - - 0 1", 3);
    assert!(out.best_move.is_none());
    assert_eq!(out.score, -MATE);
}

#[test]
fn test_stalemated_root_scores_zero() {
    let out = search(SearchConfig::default(), "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
    assert!(out.best_move.is_none());
    assert_eq!(out.score, 0.0);
}

#[test]
fn test_fifty_move_counter_draws() {
    // Every move is a quiet piece move, so each child hits the counter.
    let out = search(SearchConfig::default(), "4k3/8/8/8/8/8/8/R3K3 w - - 99 80", 3);
    assert!(!out.root_moves.is_empty());
    assert!(out.root_moves.iter().all(|r| r.search_score == 0.0));
}

#[test]
fn test_deterministic_across_sessions() {
    let a = search(SearchConfig::default(), SMALL_MIDDLEGAME, 3);
    let b = search(SearchConfig::default(), SMALL_MIDDLEGAME, 3);
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
    assert_eq!(a.nodes, b.nodes);
    let moves_a: Vec<Move> = a.root_moves.iter().map(|r| r.mv).collect();
    let moves_b: Vec<Move> = b.root_moves.iter().map(|r| r.mv).collect();
    assert_eq!(moves_a, moves_b);
}

#[test]
fn test_transposition_table_is_sound() {
    for fen in [SMALL_MIDDLEGAME, TACTIC] {
        let with_tt = search(SearchConfig::exhaustive(), fen, 3);
        let without_tt = search(
            SearchConfig {
                transposition_table: false,
                ..SearchConfig::exhaustive()
            },
            fen,
            3,
        );

        let scores = |out: &SearchOutcome| {
            let mut v: Vec<(u32, f64)> = out
                .root_moves
                .iter()
                .map(|r| (r.mv.sort_key(), r.search_score))
                .collect();
            v.sort_by_key(|&(k, _)| k);
            v
        };
        assert_eq!(scores(&with_tt), scores(&without_tt), "{fen}");
        assert_eq!(with_tt.best_move, without_tt.best_move, "{fen}");
    }
}

#[test]
fn test_no_profile_plays_the_hanging_knight() {
    for profile in EvaluationProfile::builtins() {
        for depth in 1..=3 {
            let mut session = SearchSession::default();
            let out = session.best_move(&pos(KNIGHT_TRAP), &profile, SearchLimits::depth(depth));
            let mv = out.best_move.unwrap();
            assert_ne!(mv.piece, PieceKind::Knight, "{} at depth {depth}: {mv}", profile.name());

            let mut vetoed: Vec<String> = out
                .root_moves
                .iter()
                .filter(|r| r.combined == VETOED)
                .map(|r| r.mv.to_text())
                .collect();
            vetoed.sort();
            assert_eq!(vetoed, vec!["a1b3", "a1c2"]);
        }
    }
}

#[test]
fn test_overlay_off_reports_no_safety() {
    let config = SearchConfig {
        safety_overlay: false,
        ..SearchConfig::default()
    };
    let out = search(config, KNIGHT_TRAP, 1);
    assert!(out.root_moves.iter().all(|r| r.safety.is_none()));
    assert!(out.root_moves.iter().all(|r| r.combined == r.search_score));
}

#[test]
fn test_root_moves_sorted_best_first() {
    let out = search(SearchConfig::default(), TACTIC, 2);
    assert_eq!(out.root_moves.len(), legal_moves(&pos(TACTIC)).len());
    for pair in out.root_moves.windows(2) {
        assert_ne!(compare_root(&pair[0], &pair[1]), Ordering::Greater);
    }
    assert_eq!(out.best_move, Some(out.root_moves[0].mv));
}

#[test]
fn test_deadline_falls_back_to_first_ordered_move() {
    let config = SearchConfig {
        check_interval: 1,
        ..SearchConfig::default()
    };
    let mut session = SearchSession::new(config);
    let start = Position::startpos();
    let out = session.best_move(
        &start,
        &EvaluationProfile::default(),
        SearchLimits::depth_and_time(10, Duration::ZERO),
    );
    assert!(out.stopped);
    assert_eq!(out.depth, 0);
    assert_eq!(out.best_move.unwrap().to_text(), "a2a3");
    assert!(out.root_moves.is_empty());
}

#[test]
fn test_search_leaves_caller_position_alone() {
    let original = pos(TACTIC);
    let mut session = SearchSession::default();
    let _ = session.best_move(&original, &EvaluationProfile::default(), SearchLimits::depth(3));
    assert_eq!(original.to_fen(), TACTIC);
    assert_eq!(original.undo_depth(), 0);
}

#[test]
fn test_clear_and_profile_switch_drop_the_table() {
    let mut session = SearchSession::default();
    let p = pos(SMALL_MIDDLEGAME);
    let _ = session.best_move(&p, &EvaluationProfile::default(), SearchLimits::depth(3));
    assert!(session.tt_len() > 0);
    session.clear();
    assert_eq!(session.tt_len(), 0);

    let _ = session.best_move(&p, &EvaluationProfile::default(), SearchLimits::depth(3));
    let before = session.tt_len();
    let materialist = EvaluationProfile::builtin("materialist").unwrap();
    let _ = session.best_move(&p, &materialist, SearchLimits::depth(1));
    assert!(session.tt_len() < before);
}

#[test]
fn test_eval_mode_switch() {
    let mut session = SearchSession::default();
    let mut p = pos(SMALL_MIDDLEGAME);
    let exact = session.metrics(&mut p);
    session.set_eval_mode(EvalMode::Approximate);
    assert_eq!(session.config().eval_mode, EvalMode::Approximate);
    let approx = session.metrics(&mut p);
    // No pins here, so both modes agree on mobility but are computed afresh.
    assert_eq!(exact.white.mobility, approx.white.mobility);
}

#[test]
fn test_takes_the_loose_queen() {
    for depth in 1..=2 {
        let out = search(SearchConfig::default(), TACTIC, depth);
        assert_eq!(out.best_move.unwrap().to_text(), "d4d6", "depth {depth}");
        assert!(out.score > 5.0);
    }
}

#[test]
fn test_quiescence_without_captures_is_static() {
    let mut session = SearchSession::default();
    let mut start = Position::startpos();
    let (stand, metrics) = session.static_eval(&mut start);
    let node = session.quiescence(&mut start, -INF, INF, 0, 0);
    assert_eq!(node.score, stand);
    assert_eq!(node.leaf, Some(metrics));
    assert_eq!(start.undo_depth(), 0);
}

#[test]
fn test_huge_move_counters_do_not_overflow() {
    let out = search(
        SearchConfig::default(),
        "4k3/8/8/8/8/8/8/4K2R b - - 0 4294967295",
        2,
    );
    assert!(out.best_move.is_some());
    assert_eq!(out.depth, 2);
}

fn null_move_tries(config: SearchConfig, fen: &str) -> u64 {
    let mut session = SearchSession::new(config);
    let mut p = pos(fen);
    // Children sit below the null-move depth, so only this node may pass.
    let _ = session.negamax(&mut p, 3, -100.0, 100.0, 1, true);
    session.stats.null_move_tries
}

#[test]
fn test_null_move_only_when_allowed() {
    assert_eq!(null_move_tries(SearchConfig::default(), "4k3/8/8/8/8/8/8/R3K3 w - - 0 1"), 1);
    // In check from the h1 rook.
    assert_eq!(null_move_tries(SearchConfig::default(), "4k3/8/8/8/8/8/8/R3K2r w - - 0 1"), 0);
    // Kings and pawns only.
    assert_eq!(null_move_tries(SearchConfig::default(), "4k3/4p3/8/8/8/8/4P3/4K3 w - - 0 1"), 0);
    let off = SearchConfig {
        null_move: false,
        ..SearchConfig::default()
    };
    assert_eq!(null_move_tries(off, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1"), 0);
}

#[test]
fn test_futility_returns_static_score_far_below_alpha() {
    let mut session = SearchSession::default();
    let mut start = Position::startpos();
    let (stand, _) = session.static_eval(&mut start);
    let node = session.negamax(&mut start, 1, stand + 10.0, stand + 20.0, 1, true);
    assert_eq!(node.score, stand);
    assert_eq!(session.stats.futility_prunes, 1);
    assert_eq!(session.nodes, 1);

    let mut session = SearchSession::new(SearchConfig {
        futility: false,
        ..SearchConfig::default()
    });
    let _ = session.negamax(&mut start, 1, stand + 10.0, stand + 20.0, 1, true);
    assert_eq!(session.stats.futility_prunes, 0);
    assert!(session.nodes > 20);
}

#[test]
fn test_aspiration_failures_widen_to_the_full_window() {
    let mut root = pos(BACK_RANK);
    let mv = find_move(&root, "g1f1");
    let score_with = |session: &mut SearchSession, root: &mut Position, previous: Option<f64>| {
        let entry = RootEntry {
            mv,
            safety: None,
            previous,
        };
        session.search_root_move(root, &entry, 3).unwrap().score
    };

    let mut session = SearchSession::new(plain_alpha_beta());
    let exact = score_with(&mut session, &mut root, None);
    assert_eq!(session.stats.aspiration_researches, 0);

    let mut session = SearchSession::new(plain_alpha_beta());
    assert_eq!(score_with(&mut session, &mut root, Some(exact)), exact);
    assert_eq!(session.stats.aspiration_researches, 0);

    // Both the narrow and the widened window miss.
    let mut session = SearchSession::new(plain_alpha_beta());
    assert_eq!(score_with(&mut session, &mut root, Some(exact + 50.0)), exact);
    assert_eq!(session.stats.aspiration_researches, 2);
    assert_eq!(root.to_fen(), BACK_RANK);
}

#[test]
fn test_score_jump_between_depths_is_researched() {
    let out = search(plain_alpha_beta(), BACK_RANK, 2);
    assert!(out.stats.aspiration_researches >= 2);

    let walk_into_mate = out
        .root_moves
        .iter()
        .find(|r| r.mv.to_text() == "g1h1")
        .unwrap();
    assert_eq!(walk_into_mate.search_score, -(MATE - 2.0));

    let mut root = pos(BACK_RANK);
    for report in &out.root_moves {
        let mut fresh = SearchSession::new(plain_alpha_beta());
        let entry = RootEntry {
            mv: report.mv,
            safety: None,
            previous: None,
        };
        let full = fresh.search_root_move(&mut root, &entry, 2).unwrap();
        assert_eq!(report.search_score, full.score, "{}", report.mv);
    }
}

#[test]
fn test_late_move_reductions_keep_the_tactic() {
    let exhaustive = search(SearchConfig::exhaustive(), TACTIC, 4);
    let reduced = search(
        SearchConfig {
            late_move_reduction: true,
            ..SearchConfig::exhaustive()
        },
        TACTIC,
        4,
    );
    assert_eq!(exhaustive.stats.lmr_reductions, 0);
    assert!(reduced.stats.lmr_reductions > 0);
    assert_eq!(reduced.best_move, exhaustive.best_move);
    assert_eq!(reduced.best_move.unwrap().to_text(), "d4d6");
}

#[test]
fn test_quiescence_skips_queen_for_guarded_pawn() {
    let mut p = pos(GUARDED_PAWN);
    let mut session = SearchSession::default();
    let (stand, _) = session.static_eval(&mut p);
    let node = session.quiescence(&mut p, -INF, INF, 0, 0);
    assert_eq!(node.score, stand);
    assert_eq!(session.stats.losing_exchange_skips, 1);
    assert_eq!(session.nodes, 1);

    let mut session = SearchSession::new(SearchConfig {
        quiescence_pruning: false,
        ..SearchConfig::default()
    });
    let node = session.quiescence(&mut p, -INF, INF, 0, 0);
    assert_eq!(session.stats.losing_exchange_skips, 0);
    assert!(session.nodes > 1);
    // Qxd5 exd5 loses the queen, so standing pat still wins.
    assert_eq!(node.score, stand);
    assert_eq!(p.to_fen(), GUARDED_PAWN);
}

#[test]
fn test_delta_pruning_skips_captures_that_cannot_reach_alpha() {
    let mut p = pos(GUARDED_PAWN);
    let mut session = SearchSession::default();
    let (stand, _) = session.static_eval(&mut p);
    let node = session.quiescence(&mut p, stand + 10.0, stand + 20.0, 0, 0);
    assert_eq!(node.score, stand);
    assert_eq!(session.stats.delta_prunes, 1);
    assert_eq!(session.stats.losing_exchange_skips, 0);
}
