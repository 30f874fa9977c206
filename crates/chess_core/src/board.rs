use crate::attacks::{DIAGONALS, KING_STEPS, KNIGHT_JUMPS, ORTHOGONALS};
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Castling rights as four independent flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KING: u8 = 1;
    pub const WHITE_QUEEN: u8 = 2;
    pub const BLACK_KING: u8 = 4;
    pub const BLACK_QUEEN: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(15);
    pub const NONE: CastlingRights = CastlingRights(0);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 15)
    }
    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn kingside(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KING,
            Color::Black => Self::BLACK_KING,
        }
    }
    pub fn queenside(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEEN,
            Color::Black => Self::BLACK_QUEEN,
        }
    }

    /// Flag tied to a rook home square, if `sq` is one.
    fn for_rook_home(sq: u8) -> Option<u8> {
        match sq {
            0 => Some(Self::WHITE_QUEEN),
            7 => Some(Self::WHITE_KING),
            56 => Some(Self::BLACK_QUEEN),
            63 => Some(Self::BLACK_KING),
            _ => None,
        }
    }
}

/// Stack depth right after a push. Reversal must present the top handle.
#[must_use = "the handle is needed to reverse the move"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoHandle(usize);

impl UndoHandle {
    pub fn depth(self) -> usize {
        self.0
    }
}

/// Saved state for exactly one application. `mv` is `None` for a null move.
#[derive(Clone, Debug)]
struct Undo {
    mv: Option<Move>,
    moved: Option<Piece>,
    captured: Option<Piece>,
    captured_sq: Option<u8>,
    rook_move: Option<(u8, u8)>, // (rook_from, rook_to) for castling
    castling: CastlingRights,
    en_passant: Option<u8>,
    halfmove_clock: u32,
    fullmove_number: u32,
    side_to_move: Color,
    hash: u64,
}

#[derive(Clone, Debug)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<u8>, // square behind a pawn that just advanced 2
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    undo_stack: Vec<Undo>,
}

impl Position {
    /// Assemble a position from its parts; the fingerprint is computed here.
    pub fn from_parts(
        board: [Option<Piece>; 64],
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<u8>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut p = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            undo_stack: Vec::with_capacity(64),
        };
        p.hash = crate::zobrist::compute_hash(&p);
        p
    }

    pub fn startpos() -> Self {
        let mut board = [None; 64];

        // Pawns
        for f in 0..8 {
            board[8 + f] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board[48 + f] = Some(Piece::new(Color::Black, PieceKind::Pawn));
        }
        // Back ranks
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            board[f] = Some(Piece::new(Color::White, kind));
            board[56 + f] = Some(Piece::new(Color::Black, kind));
        }
        Self::from_parts(board, Color::White, CastlingRights::ALL, None, 0, 1)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }
    pub fn en_passant(&self) -> Option<u8> {
        self.en_passant
    }
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
    /// Incrementally maintained fingerprint.
    pub fn hash(&self) -> u64 {
        self.hash
    }
    /// Number of applications not yet reversed.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (u8, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, pc)| pc.map(|p| (i as u8, p)))
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.pieces()
            .find(|(_, pc)| pc.color == c && pc.kind == PieceKind::King)
            .map(|(s, _)| s)
    }

    /// Fifty-move counter reached: 100 halfmoves without a pawn move or capture.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Whether `c` has any piece other than pawns and the king.
    pub fn has_non_pawn_material(&self, c: Color) -> bool {
        self.pieces().any(|(_, pc)| {
            pc.color == c && !matches!(pc.kind, PieceKind::Pawn | PieceKind::King)
        })
    }

    /// Panics if `c` has no king: every evaluated position must contain one.
    pub fn in_check(&self, c: Color) -> bool {
        let ksq = self
            .king_sq(c)
            .unwrap_or_else(|| panic!("position has no {c:?} king"));
        self.is_square_attacked(ksq, c.other())
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let tf = file_of(target);
        let tr = rank_of(target);
        let holds = |s: Option<u8>, kind: PieceKind| {
            s.and_then(|s| self.piece_at(s))
                .is_some_and(|pc| pc.color == by && pc.kind == kind)
        };

        // Pawn attacks: the attacking pawn sits one rank behind the target.
        let pawn_rank = match by {
            Color::White => tr - 1,
            Color::Black => tr + 1,
        };
        if holds(sq(tf - 1, pawn_rank), PieceKind::Pawn)
            || holds(sq(tf + 1, pawn_rank), PieceKind::Pawn)
        {
            return true;
        }

        if KNIGHT_JUMPS
            .iter()
            .any(|(df, dr)| holds(sq(tf + df, tr + dr), PieceKind::Knight))
        {
            return true;
        }

        if KING_STEPS
            .iter()
            .any(|(df, dr)| holds(sq(tf + df, tr + dr), PieceKind::King))
        {
            return true;
        }

        let ray_hits = |dirs: &[(i8, i8)], kind: PieceKind| {
            dirs.iter().any(|&(df, dr)| {
                let mut f = tf + df;
                let mut r = tr + dr;
                while let Some(s) = sq(f, r) {
                    if let Some(pc) = self.piece_at(s) {
                        return pc.color == by && (pc.kind == kind || pc.kind == PieceKind::Queen);
                    }
                    f += df;
                    r += dr;
                }
                false
            })
        };

        ray_hits(&ORTHOGONALS, PieceKind::Rook) || ray_hits(&DIAGONALS, PieceKind::Bishop)
    }

    /// Run `f` with the piece on `from` standing on `to` instead.
    ///
    /// Whatever occupied `to` is restored afterwards. The fingerprint is not
    /// updated while `f` runs.
    pub fn with_relocated<R>(&mut self, from: u8, to: u8, f: impl FnOnce(&Position) -> R) -> R {
        let mover = self.board[from as usize].take();
        let displaced = std::mem::replace(&mut self.board[to as usize], mover);
        let out = f(self);
        self.board[from as usize] = self.board[to as usize].take();
        self.board[to as usize] = displaced;
        out
    }

    // =========================================================================
    // Apply / reverse
    // =========================================================================

    pub fn make_move(&mut self, mv: Move) -> UndoHandle {
        let from = mv.from;
        let to = mv.to;
        let moved = self
            .piece_at(from)
            .unwrap_or_else(|| panic!("make_move {mv}: no piece on {}", sq_to_coord(from)));
        debug_assert_eq!(moved.kind, mv.piece, "move piece kind disagrees with board");

        let mut undo = Undo {
            mv: Some(mv),
            moved: Some(moved),
            captured: None,
            captured_sq: None,
            rook_move: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            side_to_move: self.side_to_move,
            hash: self.hash,
        };
        let mut h = self.hash;

        if let Some(ep) = self.en_passant.take() {
            h ^= ZOBRIST.ep_key(file_of(ep) as u8);
        }

        // The en-passant victim sits beside the destination, on the origin rank.
        let cap_sq = if mv.is_en_passant {
            match moved.color {
                Color::White => to - 8,
                Color::Black => to + 8,
            }
        } else {
            to
        };
        if let Some(victim) = self.board[cap_sq as usize].take() {
            h ^= ZOBRIST.piece_key(victim, cap_sq);
            undo.captured = Some(victim);
            undo.captured_sq = Some(cap_sq);
        }

        self.board[from as usize] = None;
        h ^= ZOBRIST.piece_key(moved, from);
        let placed = if mv.is_promotion {
            Piece::new(moved.color, PieceKind::Queen)
        } else {
            moved
        };
        self.board[to as usize] = Some(placed);
        h ^= ZOBRIST.piece_key(placed, to);

        if mv.is_castle {
            let (rf, rt) = castle_rook_squares(to)
                .unwrap_or_else(|| panic!("castle {mv}: unexpected destination"));
            let rook = self.board[rf as usize]
                .take()
                .unwrap_or_else(|| panic!("castle {mv}: no rook on {}", sq_to_coord(rf)));
            self.board[rt as usize] = Some(rook);
            h ^= ZOBRIST.piece_key(rook, rf) ^ ZOBRIST.piece_key(rook, rt);
            undo.rook_move = Some((rf, rt));
        }

        // Castling rights
        let mut rights = self.castling;
        if moved.kind == PieceKind::King {
            rights.remove(CastlingRights::kingside(moved.color));
            rights.remove(CastlingRights::queenside(moved.color));
        }
        if moved.kind == PieceKind::Rook {
            if let Some(flag) = CastlingRights::for_rook_home(from) {
                rights.remove(flag);
            }
        }
        if undo.captured.is_some_and(|c| c.kind == PieceKind::Rook) {
            if let Some(flag) = CastlingRights::for_rook_home(cap_sq) {
                rights.remove(flag);
            }
        }
        h ^= crate::zobrist::castling_hash(self.castling) ^ crate::zobrist::castling_hash(rights);
        self.castling = rights;

        // Double pawn push sets en-passant square
        if moved.kind == PieceKind::Pawn && (rank_of(from) - rank_of(to)).abs() == 2 {
            let ep = (from + to) / 2;
            self.en_passant = Some(ep);
            h ^= ZOBRIST.ep_key(file_of(ep) as u8);
        }

        self.halfmove_clock = if moved.kind == PieceKind::Pawn || undo.captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.other();
        h ^= ZOBRIST.side_to_move;

        self.hash = h;
        self.undo_stack.push(undo);
        UndoHandle(self.undo_stack.len())
    }

    /// Reverse the most recent application and return the move it applied.
    pub fn unmake_move(&mut self, handle: UndoHandle) -> Move {
        let undo = self.pop_undo(handle);
        let mv = undo
            .mv
            .unwrap_or_else(|| panic!("unmake_move on a null-move record"));

        if let Some((rf, rt)) = undo.rook_move {
            self.board[rf as usize] = self.board[rt as usize].take();
        }
        self.board[mv.to as usize] = None;
        self.board[mv.from as usize] = undo.moved;
        if let Some(cs) = undo.captured_sq {
            self.board[cs as usize] = undo.captured;
        }
        self.restore_scalars(&undo);
        mv
    }

    /// Pass the turn without moving. Clears the en-passant target.
    pub fn make_null_move(&mut self) -> UndoHandle {
        let undo = Undo {
            mv: None,
            moved: None,
            captured: None,
            captured_sq: None,
            rook_move: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            side_to_move: self.side_to_move,
            hash: self.hash,
        };
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.ep_key(file_of(ep) as u8);
        }
        self.side_to_move = self.side_to_move.other();
        self.hash ^= ZOBRIST.side_to_move;
        self.undo_stack.push(undo);
        UndoHandle(self.undo_stack.len())
    }

    pub fn unmake_null_move(&mut self, handle: UndoHandle) {
        let undo = self.pop_undo(handle);
        assert!(undo.mv.is_none(), "unmake_null_move on a real move record");
        self.restore_scalars(&undo);
    }

    fn pop_undo(&mut self, handle: UndoHandle) -> Undo {
        assert_eq!(
            handle.0,
            self.undo_stack.len(),
            "undo out of order: handle {} but stack depth {}",
            handle.0,
            self.undo_stack.len()
        );
        match self.undo_stack.pop() {
            Some(u) => u,
            None => panic!("undo with an empty stack"),
        }
    }

    fn restore_scalars(&mut self, undo: &Undo) {
        self.side_to_move = undo.side_to_move;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
    }
}

/// Rook origin and destination for a castling king landing on `king_to`.
pub fn castle_rook_squares(king_to: u8) -> Option<(u8, u8)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
