use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::CastleSide;
use crate::rules::{self, Flank};
use crate::square::Square;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row holding this side's king and rooks at the start.
    pub fn home_row(self) -> usize {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row this side's pawns start on (and may double-step from).
    pub fn pawn_row(self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row delta of a pawn step: White moves toward row 0, Black toward row 7.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The opponent's home row, where this side's pawns promote.
    pub fn promotion_row(self) -> usize {
        self.opposite().home_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Kinds a pawn may turn into on the far row.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-1, -2), (1, -2), (-1, 2), (1, 2),
    (-2, -1), (2, -1), (-2, 1), (2, 1),
];
pub(crate) const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

/// A piece on the board. It has no identity beyond the cell that holds it.
///
/// `has_moved` only matters for kings and rooks (castling), and
/// `just_double_stepped` only for pawns (en passant).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
    pub just_double_stepped: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            has_moved: false,
            just_double_stepped: false,
        }
    }

    pub fn kind_and_color(&self) -> (PieceKind, Color) {
        (self.kind, self.color)
    }

    /// Record that this piece has left its starting square.
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Set or clear the en-passant window. Ignored for anything but pawns.
    pub fn set_double_step(&mut self, value: bool) {
        if self.kind == PieceKind::Pawn {
            self.just_double_stepped = value;
        }
    }

    /// One-letter label, uppercase for White.
    pub fn symbol(&self) -> char {
        let c = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Destinations this piece reaches from `from` by its movement pattern
    /// alone, without asking whether its own king ends up attacked.
    pub fn pseudo_legal_moves(&self, board: &Board, from: Square) -> Vec<Square> {
        match self.kind {
            PieceKind::King => self.step_moves(board, from, &KING_OFFSETS),
            PieceKind::Queen => {
                let mut moves = self.sliding_moves(board, from, &ORTHOGONAL);
                moves.extend(self.sliding_moves(board, from, &DIAGONAL));
                moves
            }
            PieceKind::Rook => self.sliding_moves(board, from, &ORTHOGONAL),
            PieceKind::Bishop => self.sliding_moves(board, from, &DIAGONAL),
            PieceKind::Knight => self.step_moves(board, from, &KNIGHT_OFFSETS),
            PieceKind::Pawn => self.pawn_moves(board, from),
        }
    }

    /// Destinations for this piece standing on `from`.
    ///
    /// With `check_check` the result only holds moves that leave the mover's
    /// king unattacked, and a king also gets its castling targets. Without it
    /// the raw pseudo-legal set comes back; the attack detector relies on that
    /// mode to avoid recursing into the legality filter.
    pub fn moves(&self, board: &Board, from: Square, check_check: bool) -> Vec<Square> {
        let pseudo = self.pseudo_legal_moves(board, from);
        if !check_check {
            return pseudo;
        }

        let mut legal = rules::filter_legal(board, from, &pseudo);
        if self.kind == PieceKind::King {
            legal.extend(self.castling_targets(board, from));
        }
        legal
    }

    fn castling_targets(&self, board: &Board, from: Square) -> Vec<Square> {
        let home = self.color.home_row();
        if self.has_moved || from != Square::at(home, 4) {
            return Vec::new();
        }
        if rules::is_attacked(board, from, self.color.opposite()) {
            return Vec::new();
        }
        [CastleSide::Kingside, CastleSide::Queenside]
            .into_iter()
            .filter(|&side| rules::can_castle_for(board, self.color, side))
            .map(|side| Square::at(home, side.king_target_col()))
            .collect()
    }

    fn sliding_moves(&self, board: &Board, from: Square, directions: &[(i32, i32)]) -> Vec<Square> {
        let mut moves = Vec::new();
        for &(dr, dc) in directions {
            let mut cursor = from.offset(dr, dc);
            while let Some(to) = cursor {
                match board.get(to) {
                    None => moves.push(to),
                    Some(p) => {
                        if p.color != self.color {
                            moves.push(to);
                        }
                        break;
                    }
                }
                cursor = to.offset(dr, dc);
            }
        }
        moves
    }

    fn step_moves(&self, board: &Board, from: Square, offsets: &[(i32, i32)]) -> Vec<Square> {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| board.get(to).map(|p| p.color != self.color).unwrap_or(true))
            .collect()
    }

    fn pawn_moves(&self, board: &Board, from: Square) -> Vec<Square> {
        let mut moves = Vec::new();
        let dir = self.color.forward();

        if let Some(one) = from.offset(dir, 0) {
            if board.get(one).is_none() {
                moves.push(one);
                if from.row() == self.color.pawn_row() {
                    if let Some(two) = one.offset(dir, 0) {
                        if board.get(two).is_none() {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        for flank in [Flank::Left, Flank::Right] {
            let Some(to) = from.offset(dir, flank.dc()) else {
                continue;
            };
            let is_capture = board.get(to).map(|p| p.color != self.color).unwrap_or(false);
            if is_capture || rules::can_en_passant(board, from, flank) {
                moves.push(to);
            }
        }

        moves
    }
}
