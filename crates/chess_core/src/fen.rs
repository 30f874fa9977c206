//! Board notation (FEN): six space-separated fields.

use thiserror::Error;

use crate::board::{CastlingRights, Position};
use crate::types::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Malformed notation; each variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: usize },
    #[error("unknown piece letter '{0}'")]
    PieceLetter(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid castling rights '{0}'")]
    Castling(String),
    #[error("invalid en-passant square '{0}'")]
    EnPassant(String),
    #[error("invalid halfmove clock '{0}'")]
    HalfmoveClock(String),
    #[error("invalid fullmove number '{0}'")]
    FullmoveNumber(String),
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let board = parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = parse_castling(parts[2])?;

        let en_passant = match parts[3] {
            "-" => None,
            s => match coord_to_sq(s) {
                Some(ep) if rank_of(ep) == 2 || rank_of(ep) == 5 => Some(ep),
                _ => return Err(FenError::EnPassant(s.to_string())),
            },
        };

        let halfmove_clock: u32 = parts[4]
            .parse()
            .map_err(|_| FenError::HalfmoveClock(parts[4].to_string()))?;
        let fullmove_number: u32 = parts[5]
            .parse()
            .map_err(|_| FenError::FullmoveNumber(parts[5].to_string()))?;

        Ok(Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8i8).rev() {
            let mut empty = 0;
            for file in 0..8i8 {
                let s = (rank * 8 + file) as u8;
                match self.piece_at(s) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let rights = self.castling();
        let before = out.len();
        for (flag, ch) in [
            (CastlingRights::WHITE_KING, 'K'),
            (CastlingRights::WHITE_QUEEN, 'Q'),
            (CastlingRights::BLACK_KING, 'k'),
            (CastlingRights::BLACK_QUEEN, 'q'),
        ] {
            if rights.has(flag) {
                out.push(ch);
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant() {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }

        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        out
    }
}

fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut board = [None; 64];
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
        let mut file: i8 = 0;
        for ch in rank_str.chars() {
            match ch {
                '1'..='8' => file += (ch as u8 - b'0') as i8,
                _ => {
                    let kind = PieceKind::from_letter(ch).ok_or(FenError::PieceLetter(ch))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let s = sq(file, rank).ok_or(FenError::RankWidth { rank: rank_idx })?;
                    board[s as usize] = Some(Piece::new(color, kind));
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::RankWidth { rank: rank_idx });
            }
        }
        if file != 8 {
            return Err(FenError::RankWidth { rank: rank_idx });
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let flag = match c {
            'K' => CastlingRights::WHITE_KING,
            'Q' => CastlingRights::WHITE_QUEEN,
            'k' => CastlingRights::BLACK_KING,
            'q' => CastlingRights::BLACK_QUEEN,
            _ => return Err(FenError::Castling(field.to_string())),
        };
        if rights.has(flag) {
            return Err(FenError::Castling(field.to_string()));
        }
        rights.set(flag);
    }
    Ok(rights)
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
