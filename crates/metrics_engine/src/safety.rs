//! Root-level material and king safety.
//!
//! Applied once per root move on top of the search score. It catches moves
//! that leave material en prise where the search horizon or its pruning
//! would not, and can veto such a move outright.

use chess_core::{king_zone, pieces_reaching, rank_of, Color, Move, PieceKind, Position};

/// Net material loss (hanging minus captured) that vetoes a move.
pub const VETO_THRESHOLD: i32 = 3;
/// Non-castling king move before move 10.
pub const EARLY_KING_MOVE: i32 = -3;
/// King off its home rank with thin cover, or standing in an attacked square.
pub const EXPOSED_KING: i32 = -5;
/// Distinct enemy pieces on the king zone before each one costs a point.
pub const ZONE_ATTACKER_MIN: usize = 3;

/// Safety of one root move, from the mover's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafetyAssessment {
    /// Value of own non-king pieces left attacked and undefended.
    pub hanging: i32,
    /// Value taken by the move itself.
    pub captured: i32,
    /// King term, zero or negative.
    pub king: i32,
    pub gives_check: bool,
}

impl SafetyAssessment {
    /// Material term plus king term.
    pub fn term(&self) -> i32 {
        -self.hanging + self.king
    }

    pub fn net_loss(&self) -> i32 {
        self.hanging - self.captured
    }

    /// Giving check stands in for tactical compensation. It is a heuristic
    /// and knowingly lets some real blunders through.
    pub fn is_vetoed(&self) -> bool {
        self.net_loss() >= VETO_THRESHOLD && !self.gives_check
    }
}

/// Play `mv`, assess the result, take it back.
pub fn assess_move(pos: &mut Position, mv: Move) -> SafetyAssessment {
    let side = pos.side_to_move();

    let undo = pos.make_move(mv);
    let gives_check = pos.in_check(side.other());
    let hanging = hanging_value(pos, side);
    let king = king_term(pos, side, &mv);
    pos.unmake_move(undo);

    SafetyAssessment {
        hanging,
        captured: mv.captured.map_or(0, |k| k.value()),
        king,
        gives_check,
    }
}

/// Total value of `side`'s non-king pieces that the opponent attacks and
/// nothing defends. Each piece counts once.
pub fn hanging_value(pos: &mut Position, side: Color) -> i32 {
    let own: Vec<(u8, PieceKind)> = pos
        .pieces()
        .filter(|(_, pc)| pc.color == side && pc.kind != PieceKind::King)
        .map(|(s, pc)| (s, pc.kind))
        .collect();

    own.into_iter()
        .filter(|&(s, _)| pos.is_square_attacked(s, side.other()) && !is_defended(pos, s, side))
        .map(|(_, kind)| kind.value())
        .sum()
}

/// Another own piece reaches `target` and could stand there without
/// exposing the king.
pub fn is_defended(pos: &mut Position, target: u8, side: Color) -> bool {
    let defenders: Vec<u8> = pieces_reaching(pos, target, side)
        .filter(|&a| a != target)
        .collect();
    defenders
        .into_iter()
        .any(|a| pos.with_relocated(a, target, |p| !p.in_check(side)))
}

/// Read after `mv` is applied, so a Black king move on move 9 already
/// counts as move 10.
fn king_term(pos: &Position, side: Color, mv: &Move) -> i32 {
    let mut term = 0;
    if mv.piece == PieceKind::King && !mv.is_castle && pos.fullmove_number() < 10 {
        term += EARLY_KING_MOVE;
    }

    let Some(king) = pos.king_sq(side) else {
        return term;
    };
    let cover = king_zone(king)
        .filter(|&s| s != king)
        .filter(|&s| pos.piece_at(s).is_some_and(|pc| pc.color == side))
        .count();
    let off_home = rank_of(king) != side.home_rank();
    if (off_home && cover < 2) || pos.is_square_attacked(king, side.other()) {
        term += EXPOSED_KING;
    }

    let attackers = zone_attackers(pos, king, side.other());
    if attackers >= ZONE_ATTACKER_MIN {
        term -= attackers as i32;
    }
    term
}

/// Distinct pieces of `by` reaching the king square or a neighbour.
pub fn zone_attackers(pos: &Position, king: u8, by: Color) -> usize {
    let mut seen = [false; 64];
    for s in king_zone(king) {
        for a in pieces_reaching(pos, s, by) {
            seen[a as usize] = true;
        }
    }
    seen.iter().filter(|&&x| x).count()
}

#[cfg(test)]
#[path = "safety_tests.rs"]
mod safety_tests;
