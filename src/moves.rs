use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::Error;
use crate::piece::PieceKind;
use crate::square::Square;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub fn rook_col(self) -> usize {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column the king lands on, two steps from column 4.
    pub fn king_target_col(self) -> usize {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Column the king passes over, which is where the rook ends up.
    pub fn rook_target_col(self) -> usize {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// Columns strictly between king and rook; all must be empty.
    pub fn between_cols(self) -> &'static [usize] {
        match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        }
    }

    /// Columns the king stands on during the castle; none may be attacked.
    pub fn transit_cols(self) -> [usize; 3] {
        match self {
            CastleSide::Kingside => [4, 5, 6],
            CastleSide::Queenside => [4, 3, 2],
        }
    }
}

/// A move as played: the squares, the promotion choice, and the side
/// effects it carries.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            promotion: None,
            castle: None,
            en_passant: false,
        }
    }

    /// Build the move `from -> to` and work out its side effects from the
    /// position it is about to be played in.
    pub fn classify(board: &Board, from: Square, to: Square, promotion: Option<PieceKind>) -> Move {
        let mut mv = Move {
            promotion,
            ..Move::new(from, to)
        };
        let Some(piece) = board.get(from) else {
            return mv;
        };

        match piece.kind {
            PieceKind::King if from.col() == 4 && from.row() == to.row() => {
                mv.castle = match to.col() {
                    6 => Some(CastleSide::Kingside),
                    2 => Some(CastleSide::Queenside),
                    _ => None,
                };
            }
            PieceKind::Pawn => {
                mv.en_passant = from.col() != to.col() && board.get(to).is_none();
            }
            _ => {}
        }
        mv
    }

    /// Coordinate notation, e.g. "e2e4", "a7a8q". Row 0 is rank 8.
    pub fn to_uci(&self) -> String {
        let fc = (b'a' + self.from.col() as u8) as char;
        let fr = (b'8' - self.from.row() as u8) as char;
        let tc = (b'a' + self.to.col() as u8) as char;
        let tr = (b'8' - self.to.row() as u8) as char;
        let promo = match self.promotion {
            Some(PieceKind::Queen) => "q",
            Some(PieceKind::Rook) => "r",
            Some(PieceKind::Bishop) => "b",
            Some(PieceKind::Knight) => "n",
            _ => "",
        };
        format!("{fc}{fr}{tc}{tr}{promo}")
    }

    /// Parse coordinate notation. Side-effect flags are left unset; use
    /// [`Move::classify`] against a board to fill them in.
    pub fn from_uci(s: &str) -> Result<Move, Error> {
        let invalid = || Error::InvalidNotation(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 4 && bytes.len() != 5 {
            return Err(invalid());
        }

        let square = |file: u8, rank: u8| -> Result<Square, Error> {
            if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
                return Err(invalid());
            }
            let col = (file - b'a') as i32;
            let row = b'8' as i32 - rank as i32;
            Square::new(row, col)
        };
        let from = square(bytes[0], bytes[1])?;
        let to = square(bytes[2], bytes[3])?;

        let promotion = match bytes.get(4) {
            None => None,
            Some(b'q') => Some(PieceKind::Queen),
            Some(b'r') => Some(PieceKind::Rook),
            Some(b'b') => Some(PieceKind::Bishop),
            Some(b'n') => Some(PieceKind::Knight),
            Some(_) => return Err(invalid()),
        };

        Ok(Move {
            promotion,
            ..Move::new(from, to)
        })
    }
}
