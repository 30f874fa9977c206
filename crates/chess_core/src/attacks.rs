//! Movement geometry shared by move generation, attack detection and the
//! evaluator's defense test.
//!
//! Everything here works on the 64-slot mailbox directly: offsets are
//! `(file, rank)` deltas and rays walk square by square until they leave the
//! board or hit an occupied square.

use crate::board::Position;
use crate::types::*;

pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_STEPS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Rank direction a pawn of `c` advances in.
#[inline]
pub fn pawn_dir(c: Color) -> i8 {
    match c {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Whether the piece standing on `from` could reach `to` by its ordinary
/// movement rule, whatever occupies `to`.
///
/// Pawns only count their capture diagonals. Sliders need every square
/// strictly between `from` and `to` to be empty. Returns `false` for an empty
/// `from` or when `from == to`.
pub fn piece_reaches(pos: &Position, from: u8, to: u8) -> bool {
    let Some(pc) = pos.piece_at(from) else {
        return false;
    };
    if from == to {
        return false;
    }
    let df = file_of(to) - file_of(from);
    let dr = rank_of(to) - rank_of(from);

    match pc.kind {
        PieceKind::Pawn => dr == pawn_dir(pc.color) && df.abs() == 1,
        PieceKind::Knight => KNIGHT_JUMPS.contains(&(df, dr)),
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
        PieceKind::Bishop => df.abs() == dr.abs() && ray_clear(pos, from, df, dr),
        PieceKind::Rook => (df == 0 || dr == 0) && ray_clear(pos, from, df, dr),
        PieceKind::Queen => {
            (df.abs() == dr.abs() || df == 0 || dr == 0) && ray_clear(pos, from, df, dr)
        }
    }
}

/// Squares strictly between `from` and `from + (df, dr)` are all empty.
fn ray_clear(pos: &Position, from: u8, df: i8, dr: i8) -> bool {
    let steps = df.abs().max(dr.abs());
    let (sf, sr) = (df.signum(), dr.signum());
    let (f0, r0) = (file_of(from), rank_of(from));
    (1..steps).all(|i| match sq(f0 + sf * i, r0 + sr * i) {
        Some(s) => pos.piece_at(s).is_none(),
        None => false,
    })
}

/// Squares of `by`'s pieces that reach `target` (see [`piece_reaches`]).
pub fn pieces_reaching(pos: &Position, target: u8, by: Color) -> impl Iterator<Item = u8> + '_ {
    pos.pieces()
        .filter(move |&(s, pc)| pc.color == by && piece_reaches(pos, s, target))
        .map(|(s, _)| s)
}

/// The king's square and every on-board neighbour.
pub fn king_zone(king: u8) -> impl Iterator<Item = u8> {
    let (f, r) = (file_of(king), rank_of(king));
    std::iter::once(king).chain(KING_STEPS.iter().filter_map(move |(df, dr)| sq(f + df, r + dr)))
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
