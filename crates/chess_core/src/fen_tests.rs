use super::*;
use crate::movegen::legal_moves;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_startpos_round_trip() {
    let pos = Position::from_fen(START_FEN).unwrap();
    assert_eq!(pos.to_fen(), START_FEN);
    assert_eq!(Position::startpos().to_fen(), START_FEN);
    assert_eq!(pos.hash(), Position::startpos().hash());
}

#[test]
fn test_known_positions_round_trip() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
        "3r2k1/8/8/2p5/3P4/8/3R4/3Q2K1 w - - 0 1",
        "4k3/8/8/8/8/8/8/4K3 b Kq - 57 103",
    ] {
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
    }
}

#[test]
fn test_random_play_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _game in 0..10 {
        let mut pos = Position::startpos();
        for _ply in 0..80 {
            let moves = legal_moves(&pos);
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            let _ = pos.make_move(mv);
            let fen = pos.to_fen();
            let reparsed = Position::from_fen(&fen).unwrap();
            assert_eq!(reparsed.to_fen(), fen);
            assert_eq!(reparsed.hash(), pos.hash());
        }
    }
}

#[test]
fn test_errors_name_the_field() {
    let cases = [
        (
            "8/8/8/8/8/8/8/8 w - - 0",
            FenError::FieldCount(5),
        ),
        (
            "8/8/8/8/8/8/8 w - - 0 1",
            FenError::RankCount(7),
        ),
        (
            "9/8/8/8/8/8/8/8 w - - 0 1",
            FenError::PieceLetter('9'),
        ),
        (
            "8/8/8/8/8/8/8/7 w - - 0 1",
            FenError::RankWidth { rank: 7 },
        ),
        (
            "ppppppppp/8/8/8/8/8/8/8 w - - 0 1",
            FenError::RankWidth { rank: 0 },
        ),
        (
            "8/8/8/8/8/8/8/x7 w - - 0 1",
            FenError::PieceLetter('x'),
        ),
        (
            "8/8/8/8/8/8/8/8 x - - 0 1",
            FenError::SideToMove("x".to_string()),
        ),
        (
            "8/8/8/8/8/8/8/8 w KX - 0 1",
            FenError::Castling("KX".to_string()),
        ),
        (
            "8/8/8/8/8/8/8/8 w KK - 0 1",
            FenError::Castling("KK".to_string()),
        ),
        (
            "8/8/8/8/8/8/8/8 w - e4 0 1",
            FenError::EnPassant("e4".to_string()),
        ),
        (
            "8/8/8/8/8/8/8/8 w - - x 1",
            FenError::HalfmoveClock("x".to_string()),
        ),
        (
            "8/8/8/8/8/8/8/8 w - - 0 -1",
            FenError::FullmoveNumber("-1".to_string()),
        ),
    ];
    for (fen, expected) in cases {
        assert_eq!(Position::from_fen(fen).unwrap_err(), expected, "{fen}");
    }
}
