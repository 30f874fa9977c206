//! Canonical move text and the UCI `position` command.

use thiserror::Error;

use crate::fen::FenError;
use crate::{board::Position, movegen::legal_moves, types::*};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionCommandError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error("expected 'startpos' or 'fen', found '{0}'")]
    Origin(String),
    #[error("move '{0}' is not legal here")]
    IllegalMove(String),
}

pub fn move_to_uci(mv: Move) -> String {
    mv.to_text()
}

/// Match `txt` against the legal moves of the side to move.
///
/// Matching against the generated list means castle and en-passant flags
/// come out right. A promotion suffix must be `q`; a missing suffix on a
/// promoting move is accepted.
pub fn parse_move_text(pos: &Position, txt: &str) -> Option<Move> {
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return None;
    }
    let from = coord_to_sq(&txt[0..2])?;
    let to = coord_to_sq(&txt[2..4])?;
    let wants_promo = match txt.as_bytes().get(4) {
        None => false,
        Some(b'q') | Some(b'Q') => true,
        Some(_) => return None,
    };

    legal_moves(pos)
        .into_iter()
        .find(|m| m.from == from && m.to == to && (m.is_promotion || !wants_promo))
}

/// Apply the arguments of a UCI `position` command:
/// `startpos [moves ...]` or `fen <six fields> [moves ...]`.
///
/// On an illegal move the moves before it stay applied.
pub fn set_position_from_uci(pos: &mut Position, args: &[&str]) -> Result<(), PositionCommandError> {
    let moves_at = args.iter().position(|a| *a == "moves");
    let (setup, moves) = match moves_at {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &args[args.len()..]),
    };

    *pos = match setup.first().copied() {
        None | Some("startpos") => Position::startpos(),
        Some("fen") => Position::from_fen(&setup[1..].join(" "))?,
        Some(other) => return Err(PositionCommandError::Origin(other.to_string())),
    };

    for txt in moves {
        let mv = parse_move_text(pos, txt)
            .ok_or_else(|| PositionCommandError::IllegalMove(txt.to_string()))?;
        // Game history: the record stays on the undo stack.
        let _ = pos.make_move(mv);
    }
    Ok(())
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
