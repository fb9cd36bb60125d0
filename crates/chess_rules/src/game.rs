//! A two-player session on top of [`Board`]: whose turn it is, what each side
//! has captured, and whether the game has ended.

use tracing::{info, warn};

use crate::board::{Board, GameStatus, MoveOutcome};
use crate::config::GameConfig;
use crate::error::RulesError;
use crate::square_set::SquareSet;
use crate::types::{Color, Piece, PieceKind, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    /// The side to move owes a promotion choice for the pawn on this square.
    PromotionPending(Square),
    Finished(GameStatus),
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    initial: Board,
    first_to_move: Color,
    turn: Color,
    status: Option<GameStatus>,
    /// Pieces taken, indexed by the capturing color.
    captures: [Vec<Piece>; 2],
}

impl Game {
    /// Standard layout, White to move.
    pub fn new() -> Self {
        Self::with_board(Board::new(), Color::White)
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, RulesError> {
        Ok(Self::with_board(config.board()?, config.first_to_move))
    }

    fn with_board(board: Board, first_to_move: Color) -> Self {
        let mut game = Game {
            initial: board.clone(),
            board,
            first_to_move,
            turn: first_to_move,
            status: None,
            captures: [Vec::new(), Vec::new()],
        };
        game.refresh_status();
        game
    }

    /// Throw the current game away and set the opening position up again.
    pub fn restart(&mut self) {
        self.board = self.initial.clone();
        self.turn = self.first_to_move;
        self.captures = [Vec::new(), Vec::new()];
        self.status = None;
        self.refresh_status();
        info!(turn = %self.turn, "game restarted");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn state(&self) -> GameState {
        if let Some(status) = self.status {
            return GameState::Finished(status);
        }
        match self.board.pending_promotion() {
            Some(sq) => GameState::PromotionPending(sq),
            None => GameState::Ongoing,
        }
    }

    /// The side that delivered mate, if the game ended that way.
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            Some(GameStatus::Checkmate) => Some(self.turn.other()),
            _ => None,
        }
    }

    /// Pieces `color` has taken from the other side, oldest first.
    pub fn captures(&self, color: Color) -> &[Piece] {
        &self.captures[color.idx()]
    }

    /// Legal destinations for the piece on `sq`. Empty unless the piece
    /// belongs to the side to move and a move may be played now.
    pub fn legal_destinations(&mut self, sq: Square) -> SquareSet {
        if self.state() != GameState::Ongoing {
            return SquareSet::EMPTY;
        }
        match self.board.piece_at(sq) {
            Some(pc) if pc.color == self.turn => self.board.legal_destinations(sq),
            _ => SquareSet::EMPTY,
        }
    }

    /// Play `from -> to` for the side to move.
    ///
    /// The turn passes unless the move leaves a promotion pending, in which
    /// case it passes after `promote`.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, RulesError> {
        let outcome = self.try_play(from, to).inspect_err(|e| {
            warn!(%from, %to, error = %e, "move rejected");
        })?;

        if let Some(pc) = outcome.captured() {
            self.captures[self.turn.idx()].push(pc);
        }
        if !matches!(outcome, MoveOutcome::Promotion { .. }) {
            self.end_turn();
        }
        Ok(outcome)
    }

    fn try_play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, RulesError> {
        if let Some(status) = self.status {
            return Err(RulesError::GameOver(status));
        }
        match self.board.piece_at(from) {
            None => return Err(RulesError::EmptySquare(from)),
            Some(pc) if pc.color != self.turn => {
                return Err(RulesError::NotYourTurn {
                    square: from,
                    turn: self.turn,
                });
            }
            Some(_) => {}
        }
        self.board.execute_move(from, to)
    }

    /// Resolve the pending promotion and pass the turn.
    pub fn promote(&mut self, kind: PieceKind) -> Result<(), RulesError> {
        let sq = self.board.pending_promotion().ok_or(RulesError::NoPendingPromotion);
        let result = sq.and_then(|sq| self.board.promote(sq, kind));
        if let Err(e) = &result {
            warn!(%kind, error = %e, "promotion rejected");
            return result;
        }
        self.end_turn();
        Ok(())
    }

    fn end_turn(&mut self) {
        self.turn = self.turn.other();
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        self.status = self.board.check_for_win(self.turn);
        if let Some(status) = self.status {
            info!(%status, loser = %self.turn, "game over");
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
