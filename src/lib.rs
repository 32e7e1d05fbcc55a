pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod play;
pub mod rules;
pub mod square;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use crate::board::Board;
pub use crate::error::Error;
pub use crate::game::{Game, GameConfig, GameStatus};
pub use crate::moves::{CastleSide, Move};
pub use crate::piece::{Color, Piece, PieceKind};
pub use crate::square::Square;
