use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The grid and whose turn it is. Storage only: nothing here checks whether
/// a move is legal.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    current_player: Color,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            current_player: Color::White,
        }
    }

    /// The standard starting arrangement, White to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let home = color.home_row();
            for (col, kind) in BACK_RANK.iter().enumerate() {
                board.squares[home][col] = Some(Piece::new(*kind, color));
            }
            for sq in &mut board.squares[color.pawn_row()] {
                *sq = Some(Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }

    pub fn is_valid_tile(row: i32, col: i32) -> bool {
        (0..=7).contains(&row) && (0..=7).contains(&col)
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row()][sq.col()]
    }

    pub fn get_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.squares[sq.row()][sq.col()].as_mut()
    }

    /// Look up raw coordinates, failing loudly when they are off the board.
    pub fn try_get(&self, row: i32, col: i32) -> Result<Option<Piece>, Error> {
        Square::new(row, col).map(|sq| self.get(sq))
    }

    /// Overwrite a cell, handing back whatever was there.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[sq.row()][sq.col()], piece)
    }

    /// Move whatever stands on `from` to `to`, returning the piece it
    /// displaced. No flags are touched and nothing else is removed.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        if from == to {
            return None;
        }
        let piece = self.squares[from.row()][from.col()].take();
        self.set(to, piece)
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn set_current_player(&mut self, color: Color) {
        self.current_player = color;
    }

    /// Hand the turn to the other side and return who moves now.
    pub fn toggle_player(&mut self) -> Color {
        self.current_player = self.current_player.opposite();
        self.current_player
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.get(sq)
                .map(|p| p.kind == PieceKind::King && p.color == color)
                .unwrap_or(false)
        })
    }

    pub fn require_king(&self, color: Color) -> Result<Square, Error> {
        self.king_square(color).ok_or(Error::KingMissing { color })
    }

    /// Every piece of one color with its square, row by row.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /// Close every en-passant window on the board.
    pub fn clear_double_steps(&mut self) {
        for piece in self.squares.iter_mut().flatten().flatten() {
            piece.just_double_stepped = false;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.squares {
            let line: String = row
                .iter()
                .map(|cell| cell.map(|p| p.symbol()).unwrap_or('.'))
                .collect();
            writeln!(f, "{line}")?;
        }
        write!(f, "{} to move", self.current_player)
    }
}
