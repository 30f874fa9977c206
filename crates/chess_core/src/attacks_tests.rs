use super::*;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid FEN")
}

#[test]
fn test_pawn_reaches_only_diagonals() {
    // White pawn on e4, black pawn on e5, black knight on d5
    let p = pos("4k3/8/8/3np3/4P3/8/8/4K3 w - - 0 1");
    let e4 = coord_to_sq("e4").unwrap();
    assert!(piece_reaches(&p, e4, coord_to_sq("d5").unwrap()));
    assert!(piece_reaches(&p, e4, coord_to_sq("f5").unwrap()));
    assert!(!piece_reaches(&p, e4, coord_to_sq("e5").unwrap()));
    assert!(!piece_reaches(&p, e4, coord_to_sq("d3").unwrap()));
}

#[test]
fn test_black_pawn_reaches_downward() {
    let p = pos("4k3/8/8/3p4/8/8/8/4K3 b - - 0 1");
    let d5 = coord_to_sq("d5").unwrap();
    assert!(piece_reaches(&p, d5, coord_to_sq("c4").unwrap()));
    assert!(piece_reaches(&p, d5, coord_to_sq("e4").unwrap()));
    assert!(!piece_reaches(&p, d5, coord_to_sq("c6").unwrap()));
}

#[test]
fn test_slider_blocked_by_intervening_piece() {
    // Rook a1, own pawn a3, target a5
    let p = pos("4k3/8/8/8/8/P7/8/R3K3 w - - 0 1");
    let a1 = coord_to_sq("a1").unwrap();
    assert!(piece_reaches(&p, a1, coord_to_sq("a3").unwrap()));
    assert!(!piece_reaches(&p, a1, coord_to_sq("a5").unwrap()));
    assert!(piece_reaches(&p, a1, coord_to_sq("d1").unwrap()));
    // Rook does not reach the king's square past it
    assert!(!piece_reaches(&p, a1, coord_to_sq("f1").unwrap()));
}

#[test]
fn test_knight_and_king_geometry() {
    let p = pos("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1");
    let e4 = coord_to_sq("e4").unwrap();
    assert!(piece_reaches(&p, e4, coord_to_sq("f6").unwrap()));
    assert!(piece_reaches(&p, e4, coord_to_sq("c3").unwrap()));
    assert!(!piece_reaches(&p, e4, coord_to_sq("e5").unwrap()));

    let e1 = coord_to_sq("e1").unwrap();
    assert!(piece_reaches(&p, e1, coord_to_sq("d2").unwrap()));
    assert!(!piece_reaches(&p, e1, coord_to_sq("e3").unwrap()));
}

#[test]
fn test_empty_origin_reaches_nothing() {
    let p = Position::startpos();
    assert!(!piece_reaches(&p, coord_to_sq("e4").unwrap(), coord_to_sq("e5").unwrap()));
}

#[test]
fn test_king_zone_sizes() {
    assert_eq!(king_zone(coord_to_sq("e4").unwrap()).count(), 9);
    assert_eq!(king_zone(coord_to_sq("a1").unwrap()).count(), 4);
    assert_eq!(king_zone(coord_to_sq("h5").unwrap()).count(), 6);
}

#[test]
fn test_pieces_reaching_counts_each_piece() {
    // Black rook d8 and bishop a4 both reach d1; knight b8 does not.
    let p = pos("1n1rk3/8/8/8/b7/8/8/3K4 w - - 0 1");
    let d1 = coord_to_sq("d1").unwrap();
    let found: Vec<u8> = pieces_reaching(&p, d1, Color::Black).collect();
    assert_eq!(found.len(), 2);
    assert!(found.contains(&coord_to_sq("d8").unwrap()));
    assert!(found.contains(&coord_to_sq("a4").unwrap()));
}
