use thiserror::Error;

use crate::types::{Color, PieceKind, Square};
use crate::GameStatus;

/// Domain errors for the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("a pawn cannot promote to a {0}")]
    InvalidPromotion(PieceKind),

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("the pawn on {0} must be promoted first")]
    PromotionPending(Square),

    #[error("the piece on {square} is not {turn}'s")]
    NotYourTurn { square: Square, turn: Color },

    #[error("game is already over: {0}")]
    GameOver(GameStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a square name: {0:?}")]
pub struct ParseSquareError(pub String);
