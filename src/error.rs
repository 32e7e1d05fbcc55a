use thiserror::Error;

use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// Everything the rules engine or a game session can refuse to do.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A row or column outside `0..=7` was handed to the engine.
    #[error("square ({row}, {col}) is off the board")]
    OutOfRange { row: i32, col: i32 },

    /// The board has no king of this color, so check cannot be evaluated.
    #[error("there is no {color} king on the board")]
    KingMissing { color: Color },

    #[error("there is no piece on {square}")]
    EmptySquare { square: Square },

    #[error("it is {expected}'s turn, not {found}'s")]
    WrongTurn { expected: Color, found: Color },

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// A pawn reached the far row but no replacement kind was chosen.
    #[error("the move {from} -> {to} needs a promotion piece")]
    PromotionRequired { from: Square, to: Square },

    #[error("cannot promote to {kind:?} here")]
    InvalidPromotion { kind: PieceKind },

    #[error("the game is already over")]
    GameOver,

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),
}
