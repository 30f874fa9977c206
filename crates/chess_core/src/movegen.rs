use crate::attacks::{pawn_dir, DIAGONALS, KING_STEPS, KNIGHT_JUMPS, ORTHOGONALS};
use crate::{board::Position, types::*};

/// Strategy for producing moves. The evaluator and the search are generic
/// over it, so a faster generator can be swapped in without touching either.
///
/// Implementations must return legal moves sorted by canonical text, and
/// must leave `pos` exactly as they found it.
pub trait MoveGenerator {
    /// Legal moves of `side` into `out` (cleared first), sorted by text.
    fn legal_moves_into(&self, pos: &mut Position, side: Color, out: &mut Vec<Move>);

    /// Pseudo-legal moves of `side` into `out` (cleared first).
    fn pseudo_moves_into(&self, pos: &Position, side: Color, out: &mut Vec<Move>);
}

/// The built-in mailbox generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardMoveGen;

impl MoveGenerator for StandardMoveGen {
    fn legal_moves_into(&self, pos: &mut Position, side: Color, out: &mut Vec<Move>) {
        legal_moves_for(pos, side, out);
    }

    fn pseudo_moves_into(&self, pos: &Position, side: Color, out: &mut Vec<Move>) {
        out.clear();
        pseudo_moves_for(pos, side, out);
    }
}

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the position only once.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Legal moves of the side to move into the provided buffer.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    let side = pos.side_to_move();
    legal_moves_for(pos, side, out);
}

/// Legal moves of `side`, whichever side is to move.
pub fn legal_moves_for(pos: &mut Position, side: Color, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves_for(pos, side, out);

    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(side);
        pos.unmake_move(undo);
        !illegal
    });
    out.sort_by_key(Move::sort_key);
}

/// Pseudo-legal moves of `side`, appended to `out`.
///
/// En-passant is only produced when `side` is to move, since the target
/// square belongs to the side to move.
pub fn pseudo_moves_for(pos: &Position, side: Color, out: &mut Vec<Move>) {
    for (from, pc) in pos.pieces() {
        if pc.color != side {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, side, out),
            PieceKind::Knight => gen_steps(pos, from, pc, &KNIGHT_JUMPS, out),
            PieceKind::Bishop => gen_slider(pos, from, pc, &DIAGONALS, out),
            PieceKind::Rook => gen_slider(pos, from, pc, &ORTHOGONALS, out),
            PieceKind::Queen => {
                gen_slider(pos, from, pc, &DIAGONALS, out);
                gen_slider(pos, from, pc, &ORTHOGONALS, out);
            }
            PieceKind::King => {
                gen_steps(pos, from, pc, &KING_STEPS, out);
                gen_castle(pos, from, side, out);
            }
        }
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);

    let dir = pawn_dir(c);
    let start_rank: i8 = match c {
        Color::White => 1,
        Color::Black => 6,
    };
    let promo_rank: i8 = match c {
        Color::White => 7,
        Color::Black => 0,
    };

    // forward 1
    if let Some(to) = sq(f, r + dir) {
        if pos.piece_at(to).is_none() {
            let mv = Move::quiet(from, to, PieceKind::Pawn);
            if rank_of(to) == promo_rank {
                out.push(mv.promoting());
            } else {
                out.push(mv);

                // forward 2 from start
                if r == start_rank {
                    if let Some(to2) = sq(f, r + 2 * dir) {
                        if pos.piece_at(to2).is_none() {
                            out.push(Move::quiet(from, to2, PieceKind::Pawn));
                        }
                    }
                }
            }
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(tpc) if tpc.color != c => {
                let mv = Move::capture(from, to, PieceKind::Pawn, tpc.kind);
                if rank_of(to) == promo_rank {
                    out.push(mv.promoting());
                } else {
                    out.push(mv);
                }
            }
            None if c == pos.side_to_move() && pos.en_passant() == Some(to) => {
                // The victim must really be there: an enemy pawn beside us.
                let victim = sq(f + df, r).and_then(|s| pos.piece_at(s));
                if victim.is_some_and(|v| v.color != c && v.kind == PieceKind::Pawn) {
                    out.push(Move::en_passant(from, to));
                }
            }
            _ => {}
        }
    }
}

/// Single-step pieces: knight jumps and king steps.
fn gen_steps(pos: &Position, from: u8, pc: Piece, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match pos.piece_at(to) {
                None => out.push(Move::quiet(from, to, pc.kind)),
                Some(t) if t.color != pc.color => {
                    out.push(Move::capture(from, to, pc.kind, t.kind))
                }
                _ => {}
            }
        }
    }
}

fn gen_slider(pos: &Position, from: u8, pc: Piece, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::quiet(from, to, pc.kind)),
                Some(t) if t.color != pc.color => {
                    out.push(Move::capture(from, to, pc.kind, t.kind));
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let rights = pos.castling();
    let home = match c {
        Color::White => 0u8,
        Color::Black => 56u8,
    };
    // Must be on original king square
    if from != home + 4 {
        return;
    }
    let kingside = rights.has(crate::board::CastlingRights::kingside(c));
    let queenside = rights.has(crate::board::CastlingRights::queenside(c));
    if !kingside && !queenside {
        return;
    }

    // Can't castle out of/through check: check squares must not be attacked.
    if pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    let own_rook = |s: u8| {
        pos.piece_at(s)
            .is_some_and(|p| p.color == c && p.kind == PieceKind::Rook)
    };
    let empty = |s: u8| pos.piece_at(s).is_none();
    let safe = |s: u8| !pos.is_square_attacked(s, enemy);

    // King side: e->g, f and g empty and not attacked
    if kingside
        && own_rook(home + 7)
        && empty(home + 5)
        && empty(home + 6)
        && safe(home + 5)
        && safe(home + 6)
    {
        out.push(Move::castle(from, home + 6));
    }
    // Queen side: e->c, d, c, b empty; d and c not attacked
    if queenside
        && own_rook(home)
        && empty(home + 3)
        && empty(home + 2)
        && empty(home + 1)
        && safe(home + 3)
        && safe(home + 2)
    {
        out.push(Move::castle(from, home + 2));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
