// Check, legality, castling, en passant and terminal positions.
//
// Everything here works on a shared `&Board`. Hypothetical positions (a
// candidate move, a king parked on a castling transit square) are built on a
// clone of the 8x8 grid, so the caller's board can never be left half-mutated.

use crate::board::Board;
use crate::error::Error;
use crate::moves::{CastleSide, Move};
use crate::piece::{Color, PieceKind};
use crate::square::Square;

/// Which neighbouring column an en-passant capture goes toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flank {
    Left,
    Right,
}

impl Flank {
    pub fn dc(self) -> i32 {
        match self {
            Flank::Left => -1,
            Flank::Right => 1,
        }
    }
}

/// True if any piece of `by` reaches `target` with its raw movement pattern.
///
/// Kings are scanned by adjacency instead of through their own move
/// generation, which would come straight back here.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    board.pieces(by).any(|(sq, piece)| match piece.kind {
        PieceKind::King => sq.is_adjacent(target),
        _ => piece.moves(board, sq, false).contains(&target),
    })
}

/// Is `color`'s king attacked right now?
pub fn is_in_check(board: &Board, color: Color) -> Result<bool, Error> {
    let king = board.require_king(color)?;
    Ok(is_attacked(board, king, color.opposite()))
}

/// Keep the candidates that do not leave the mover's own king attacked.
pub fn filter_legal(board: &Board, from: Square, candidates: &[Square]) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    candidates
        .iter()
        .copied()
        .filter(|&to| {
            let after = simulate(board, from, to);
            match after.king_square(piece.color) {
                Some(king) => !is_attacked(&after, king, piece.color.opposite()),
                None => true,
            }
        })
        .collect()
}

/// The position after `from -> to`, including the removal of a pawn taken
/// en passant.
fn simulate(board: &Board, from: Square, to: Square) -> Board {
    let mut after = board.clone();
    if let Some(p) = board.get(from) {
        if p.kind == PieceKind::Pawn && from.col() != to.col() && board.get(to).is_none() {
            after.set(Square::at(from.row(), to.col()), None);
        }
    }
    after.move_piece(from, to);
    after
}

/// Castling check for the side to move.
pub fn can_castle(board: &Board, side: CastleSide) -> bool {
    can_castle_for(board, board.current_player(), side)
}

pub fn can_castle_for(board: &Board, color: Color, side: CastleSide) -> bool {
    let home = color.home_row();
    let king_sq = Square::at(home, 4);
    let rook_sq = Square::at(home, side.rook_col());

    let unmoved = |sq: Square, kind: PieceKind| {
        board
            .get(sq)
            .map(|p| p.kind == kind && p.color == color && !p.has_moved)
            .unwrap_or(false)
    };
    if !unmoved(king_sq, PieceKind::King) || !unmoved(rook_sq, PieceKind::Rook) {
        return false;
    }

    if side
        .between_cols()
        .iter()
        .any(|&col| board.get(Square::at(home, col)).is_some())
    {
        return false;
    }

    let Some(king) = board.get(king_sq) else {
        return false;
    };
    side.transit_cols().iter().all(|&col| {
        let stop = Square::at(home, col);
        let mut probe = board.clone();
        probe.set(king_sq, None);
        probe.set(stop, Some(king));
        !is_attacked(&probe, stop, color.opposite())
    })
}

/// Can the pawn on `pawn_square` take the enemy pawn beside it on `flank`
/// en passant?
pub fn can_en_passant(board: &Board, pawn_square: Square, flank: Flank) -> bool {
    let Some(pawn) = board.get(pawn_square) else {
        return false;
    };
    if pawn.kind != PieceKind::Pawn {
        return false;
    }
    let (Some(beside), Some(landing)) = (
        pawn_square.offset(0, flank.dc()),
        pawn_square.offset(pawn.color.forward(), flank.dc()),
    ) else {
        return false;
    };

    let victim = board
        .get(beside)
        .map(|p| p.kind == PieceKind::Pawn && p.color != pawn.color && p.just_double_stepped)
        .unwrap_or(false);
    victim && board.get(landing).is_none()
}

pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces(color)
        .any(|(sq, piece)| !piece.moves(board, sq, true).is_empty())
}

/// Every legal move for `color`. Pawn moves onto the far row appear once per
/// promotion choice.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces(color) {
        for to in piece.moves(board, from, true) {
            if piece.kind == PieceKind::Pawn && to.row() == color.promotion_row() {
                moves.extend(
                    PieceKind::PROMOTIONS
                        .iter()
                        .map(|&kind| Move::classify(board, from, to, Some(kind))),
                );
            } else {
                moves.push(Move::classify(board, from, to, None));
            }
        }
    }
    moves
}

/// The side to move is in check and has nothing that gets it out. A side
/// without a king counts as mated.
pub fn is_checkmate(board: &Board) -> bool {
    let color = board.current_player();
    let Some(king) = board.king_square(color) else {
        return true;
    };
    is_attacked(board, king, color.opposite()) && !has_legal_move(board, color)
}

/// The side to move is not in check but has no legal move.
pub fn is_stalemate(board: &Board) -> bool {
    let color = board.current_player();
    let Some(king) = board.king_square(color) else {
        return false;
    };
    !is_attacked(board, king, color.opposite()) && !has_legal_move(board, color)
}
