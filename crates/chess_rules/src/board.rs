use std::fmt;

use tracing::{debug, trace};

use crate::error::RulesError;
use crate::layout::{STANDARD_LAYOUT, parse_rows, render_rows};
use crate::piece::{EnPassant, attack_set, pawn_candidates};
use crate::square_set::SquareSet;
use crate::types::*;

/// Terminal result for the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Checkmate,
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// What `move_piece` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing was captured.
    Quiet,
    /// The piece taken off the board, now owned by the caller.
    Capture(Piece),
    /// A pawn reached the far rank and waits for `Board::promote`.
    Promotion {
        square: Square,
        captured: Option<Piece>,
    },
}

impl MoveOutcome {
    pub fn captured(&self) -> Option<Piece> {
        match *self {
            MoveOutcome::Quiet => None,
            MoveOutcome::Capture(pc) => Some(pc),
            MoveOutcome::Promotion { captured, .. } => captured,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    en_passant: Option<EnPassant>,
    pending_promotion: Option<Square>,
}

/// Grid contents of the squares a probe touches, for putting them back.
struct Probe {
    from: Square,
    to: Square,
    moved: Option<Piece>,
    target: Option<Piece>,
    lifted: Option<(Square, Piece)>,
    attacks: [SquareSet; 64],
}

impl Board {
    /// Board with the standard starting layout.
    pub fn new() -> Self {
        match Board::from_rows(&STANDARD_LAYOUT) {
            Ok(board) => board,
            Err(e) => unreachable!("standard layout is well-formed: {e}"),
        }
    }

    /// Board from eight layout rows, top row first.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, RulesError> {
        let mut board = Board {
            squares: parse_rows(rows)?,
            en_passant: None,
            pending_promotion: None,
        };
        board.update_all_attack_sets();
        Ok(board)
    }

    pub fn to_rows(&self) -> Vec<String> {
        render_rows(&self.squares)
    }

    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.squares[sq.index()].as_ref()
    }

    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    /// Occupied squares with their pieces, top-left first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, pc)| pc.as_ref().map(|pc| (Square::from_index(i as u8), pc)))
    }

    pub fn occupied(&self) -> SquareSet {
        self.pieces().map(|(sq, _)| sq).collect()
    }

    pub fn occupied_by(&self, color: Color) -> SquareSet {
        self.pieces()
            .filter(|(_, pc)| pc.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn king_sq(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, pc)| pc.color == color && pc.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Recompute every piece's attack set against the current grid.
    pub fn update_all_attack_sets(&mut self) {
        let occupied = self.occupied();
        for (i, slot) in self.squares.iter_mut().enumerate() {
            if let Some(pc) = slot {
                let from = Square::from_index(i as u8);
                pc.attacks = attack_set(pc.kind, pc.color, from, occupied);
            }
        }
    }

    /// Union of the attack sets of every `color` piece.
    pub fn attacked_by(&self, color: Color) -> SquareSet {
        self.pieces()
            .filter(|(_, pc)| pc.color == color)
            .fold(SquareSet::EMPTY, |acc, (_, pc)| acc | pc.attacks)
    }

    /// Whether `color`'s king stands on a square the other side attacks.
    /// A board without that king answers `false`.
    pub fn is_king_attacked(&self, color: Color) -> bool {
        match self.king_sq(color) {
            Some(ksq) => self.attacked_by(color.other()).contains(ksq),
            None => false,
        }
    }

    /// Self-check filter: can the piece on `from` go to `to` without leaving
    /// its own king attacked?
    ///
    /// The move is played on the grid, judged and taken back. Grid and attack
    /// sets are exactly as before when this returns.
    pub fn can_move_to(&mut self, from: Square, to: Square) -> bool {
        let mover = match self.piece_at(from) {
            Some(pc) => *pc,
            None => return false,
        };
        if let Some(target) = self.piece_at(to) {
            if target.color == mover.color {
                return false;
            }
        }

        let probe = self.begin_probe(from, to);
        let safe = !self.is_king_attacked(mover.color);
        self.end_probe(probe);
        trace!(%from, %to, safe, "legality probe");
        safe
    }

    fn begin_probe(&mut self, from: Square, to: Square) -> Probe {
        let mut attacks = [SquareSet::EMPTY; 64];
        for (slot, pc) in attacks.iter_mut().zip(self.squares.iter()) {
            if let Some(pc) = pc {
                *slot = pc.attacks;
            }
        }

        let moved = self.squares[from.index()].take();
        let target = self.squares[to.index()];
        let lifted = match moved {
            Some(pc) => self
                .en_passant_victim(self.en_passant, &pc, from, to)
                .and_then(|sq| self.squares[sq.index()].take().map(|cap| (sq, cap))),
            None => None,
        };
        self.squares[to.index()] = moved;
        self.update_all_attack_sets();

        Probe {
            from,
            to,
            moved,
            target,
            lifted,
            attacks,
        }
    }

    fn end_probe(&mut self, probe: Probe) {
        self.squares[probe.from.index()] = probe.moved;
        self.squares[probe.to.index()] = probe.target;
        if let Some((sq, pc)) = probe.lifted {
            self.squares[sq.index()] = Some(pc);
        }
        for (pc, attacks) in self.squares.iter_mut().zip(probe.attacks) {
            if let Some(pc) = pc {
                pc.attacks = attacks;
            }
        }
    }

    /// Square of the pawn an en-passant capture `from -> to` would remove.
    fn en_passant_victim(
        &self,
        ep: Option<EnPassant>,
        pc: &Piece,
        from: Square,
        to: Square,
    ) -> Option<Square> {
        let ep = ep?;
        if pc.kind != PieceKind::Pawn || from.file == to.file || to != ep.landing {
            return None;
        }
        match self.piece_at(ep.captured) {
            Some(victim) if victim.kind == PieceKind::Pawn && victim.color != pc.color => {
                Some(ep.captured)
            }
            _ => None,
        }
    }

    /// Squares the piece could move to before the self-check filter.
    fn candidates(&mut self, from: Square) -> SquareSet {
        let pc = match self.piece_at(from) {
            Some(pc) => *pc,
            None => return SquareSet::EMPTY,
        };
        match pc.kind {
            PieceKind::Pawn => pawn_candidates(
                pc.color,
                from,
                pc.has_moved,
                self.occupied(),
                self.occupied_by(pc.color.other()),
                self.en_passant,
            ),
            PieceKind::King => pc.attacks | self.castling_targets(pc.color, from),
            _ => pc.attacks,
        }
    }

    fn castling_targets(&mut self, color: Color, from: Square) -> SquareSet {
        let mut out = SquareSet::EMPTY;
        for rook_file in [0u8, 7] {
            if self.can_castle(color, rook_file) {
                let dir: i8 = if rook_file == 0 { -1 } else { 1 };
                if let Some(to) = from.offset(2 * dir, 0) {
                    out.insert(to);
                }
            }
        }
        out
    }

    /// Where the piece on `sq` may legally move. Empty for an empty square.
    /// The board is unchanged afterwards.
    pub fn legal_destinations(&mut self, sq: Square) -> SquareSet {
        self.candidates(sq)
            .iter()
            .filter(|&to| self.can_move_to(sq, to))
            .collect()
    }

    /// Castling test for `color` with the rook that starts on `rook_file`.
    ///
    /// King and rook must be on their home squares and unmoved, the squares
    /// between them empty, the king not in check, and each square the king
    /// crosses (its destination included) safe for it.
    pub fn can_castle(&mut self, color: Color, rook_file: u8) -> bool {
        let rank = color.home_rank();
        let king_sq = Square::new(4, rank);
        let rook_sq = Square::new(rook_file, rank);

        match (self.piece_at(king_sq), self.piece_at(rook_sq)) {
            (Some(king), Some(rook))
                if king.kind == PieceKind::King
                    && king.color == color
                    && !king.has_moved
                    && rook.kind == PieceKind::Rook
                    && rook.color == color
                    && !rook.has_moved => {}
            _ => return false,
        }

        let (lo, hi) = if rook_file < king_sq.file {
            (rook_file + 1, king_sq.file)
        } else {
            (king_sq.file + 1, rook_file)
        };
        if (lo..hi).any(|file| self.piece_at(Square::new(file, rank)).is_some()) {
            return false;
        }

        if self.is_king_attacked(color) {
            return false;
        }

        let dir: i8 = if rook_file < king_sq.file { -1 } else { 1 };
        (1..=2).all(|step| match king_sq.offset(dir * step, 0) {
            Some(through) => self.can_move_to(king_sq, through),
            None => false,
        })
    }

    /// Play `from -> to` without checking legality.
    ///
    /// Captures silently, marks the piece as moved, then applies promotion,
    /// castling and en-passant side effects. Attack sets are current when this
    /// returns.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<MoveOutcome, RulesError> {
        if let Some(sq) = self.pending_promotion {
            return Err(RulesError::PromotionPending(sq));
        }
        let mut moved = self.squares[from.index()]
            .take()
            .ok_or(RulesError::EmptySquare(from))?;
        moved.has_moved = true;
        let mut captured = self.squares[to.index()].replace(moved);
        self.update_all_attack_sets();
        debug!(%from, %to, kind = %moved.kind, color = %moved.color, "move");

        let prev_ep = self.en_passant.take();

        if moved.kind == PieceKind::Pawn && to.rank == moved.color.promotion_rank() {
            self.pending_promotion = Some(to);
            debug!(square = %to, "promotion pending");
            return Ok(MoveOutcome::Promotion {
                square: to,
                captured,
            });
        }

        let df = to.file as i8 - from.file as i8;
        let dr = to.rank as i8 - from.rank as i8;

        if moved.kind == PieceKind::King && df.abs() == 2 {
            let (rook_from, rook_to) = if df > 0 {
                (Square::new(7, to.rank), Square::new(to.file - 1, to.rank))
            } else {
                (Square::new(0, to.rank), Square::new(to.file + 1, to.rank))
            };
            if let Some(mut rook) = self.squares[rook_from.index()].take() {
                rook.has_moved = true;
                self.squares[rook_to.index()] = Some(rook);
                self.update_all_attack_sets();
                debug!(%rook_from, %rook_to, "castling rook");
            }
        } else if moved.kind == PieceKind::Pawn {
            if dr.abs() == 2 {
                if let Some(landing) = from.offset(0, dr / 2) {
                    self.en_passant = Some(EnPassant {
                        captured: to,
                        landing,
                    });
                }
            } else if let Some(victim) = self.en_passant_victim(prev_ep, &moved, from, to) {
                captured = self.squares[victim.index()].take();
                self.update_all_attack_sets();
                debug!(square = %victim, "en passant capture");
            }
        }

        Ok(match captured {
            Some(pc) => MoveOutcome::Capture(pc),
            None => MoveOutcome::Quiet,
        })
    }

    /// `move_piece` guarded by `legal_destinations`.
    pub fn execute_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, RulesError> {
        if let Some(sq) = self.pending_promotion {
            return Err(RulesError::PromotionPending(sq));
        }
        if self.piece_at(from).is_none() {
            return Err(RulesError::EmptySquare(from));
        }
        if !self.legal_destinations(from).contains(to) {
            return Err(RulesError::IllegalMove { from, to });
        }
        self.move_piece(from, to)
    }

    /// Replace the pawn waiting on `sq` with a new piece of `kind`.
    pub fn promote(&mut self, sq: Square, kind: PieceKind) -> Result<(), RulesError> {
        if !kind.is_promotion_choice() {
            return Err(RulesError::InvalidPromotion(kind));
        }
        if self.pending_promotion != Some(sq) {
            return Err(RulesError::NoPendingPromotion);
        }
        let color = match self.piece_at(sq) {
            Some(pc) => pc.color,
            None => return Err(RulesError::NoPendingPromotion),
        };

        let mut piece = Piece::new(kind, color);
        piece.has_moved = true;
        self.squares[sq.index()] = Some(piece);
        self.pending_promotion = None;
        self.update_all_attack_sets();
        debug!(square = %sq, %kind, "promoted");
        Ok(())
    }

    /// `None` while `color` still has a legal move; otherwise checkmate or
    /// stalemate depending on whether its king is attacked.
    pub fn check_for_win(&mut self, color: Color) -> Option<GameStatus> {
        let in_check = self.is_king_attacked(color);
        let own: Vec<Square> = self.occupied_by(color).iter().collect();
        for sq in own {
            if !self.legal_destinations(sq).is_empty() {
                return None;
            }
        }
        Some(if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.to_rows().iter().enumerate() {
            writeln!(f, "{} {}", 8 - rank, row)?;
        }
        write!(f, "  abcdefgh")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
