use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::{Game as Session, GameStatus};
use crate::piece::{Color, PieceKind};
use crate::play::random_move;
use crate::rules;
use crate::square::Square;

#[derive(Serialize)]
struct SquarePiece {
    piece_type: String,
    color: String,
}

#[derive(Serialize)]
struct MoveJson {
    from: [usize; 2],
    to: [usize; 2],
    promotion: Option<String>,
    castle: bool,
    en_passant: bool,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: String,
    game_over: bool,
    result: Option<String>,
    is_in_check: bool,
    captured_white: Vec<String>,
    captured_black: Vec<String>,
    last_move: Option<MoveJson>,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

// Sprite/label names live here, on the presentation side only.
fn piece_type_to_string(pt: PieceKind) -> String {
    match pt {
        PieceKind::King => "King".to_string(),
        PieceKind::Queen => "Queen".to_string(),
        PieceKind::Rook => "Rook".to_string(),
        PieceKind::Bishop => "Bishop".to_string(),
        PieceKind::Knight => "Knight".to_string(),
        PieceKind::Pawn => "Pawn".to_string(),
    }
}

fn color_to_string(c: Color) -> String {
    match c {
        Color::White => "White".to_string(),
        Color::Black => "Black".to_string(),
    }
}

fn string_to_piece_type(s: &str) -> Option<PieceKind> {
    match s {
        "Queen" => Some(PieceKind::Queen),
        "Rook" => Some(PieceKind::Rook),
        "Bishop" => Some(PieceKind::Bishop),
        "Knight" => Some(PieceKind::Knight),
        _ => None,
    }
}

fn result_text(status: GameStatus) -> Option<String> {
    match status {
        GameStatus::Ongoing => None,
        GameStatus::Checkmate { winner: Color::White } => Some("White wins".to_string()),
        GameStatus::Checkmate { winner: Color::Black } => Some("Black wins".to_string()),
        GameStatus::Stalemate => Some("Draw".to_string()),
    }
}

fn build_board_state(session: &Session) -> BoardState {
    let board = session.board();
    let squares: Vec<Vec<Option<SquarePiece>>> = (0..8)
        .map(|r| {
            (0..8)
                .map(|c| {
                    board.try_get(r, c).ok().flatten().map(|p| SquarePiece {
                        piece_type: piece_type_to_string(p.kind),
                        color: color_to_string(p.color),
                    })
                })
                .collect()
        })
        .collect();

    let to_move = board.current_player();
    BoardState {
        squares,
        current_turn: color_to_string(to_move),
        game_over: session.status().is_over(),
        result: result_text(session.status()),
        is_in_check: rules::is_in_check(board, to_move).unwrap_or(false),
        captured_white: session.captured(Color::White).iter().map(|pt| piece_type_to_string(*pt)).collect(),
        captured_black: session.captured(Color::Black).iter().map(|pt| piece_type_to_string(*pt)).collect(),
        last_move: session.last_move().map(|m| MoveJson {
            from: [m.from.row(), m.from.col()],
            to: [m.to.row(), m.to.col()],
            promotion: m.promotion.map(piece_type_to_string),
            castle: m.castle.is_some(),
            en_passant: m.en_passant,
        }),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn error_result(message: String) -> JsValue {
    to_js(&MoveResult {
        board_state: None,
        error: Some(message),
    })
}

#[wasm_bindgen]
pub struct Game {
    session: Session,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game {
            session: Session::new(),
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.session))
    }

    /// Destinations to mark when the piece on (row, col) is picked up.
    pub fn get_legal_moves_for_square(&self, row: i32, col: i32) -> JsValue {
        let targets: Vec<[usize; 2]> = match Square::new(row, col) {
            Ok(sq) => self
                .session
                .moves_from(sq)
                .into_iter()
                .map(|to| [to.row(), to.col()])
                .collect(),
            Err(_) => Vec::new(),
        };
        to_js(&targets)
    }

    pub fn make_move(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
        promotion: Option<String>,
    ) -> JsValue {
        let squares = Square::new(from_row, from_col).and_then(|from| Ok((from, Square::new(to_row, to_col)?)));
        let (from, to) = match squares {
            Ok(pair) => pair,
            Err(e) => return error_result(e.to_string()),
        };
        let promo = promotion.as_deref().and_then(string_to_piece_type);

        match self.session.play(from, to, promo) {
            Ok(_) => to_js(&build_board_state(&self.session)),
            Err(e) => error_result(e.to_string()),
        }
    }

    pub fn make_random_move(&mut self) -> JsValue {
        if !self.session.status().is_over() {
            if let Some(mv) = random_move(self.session.board()) {
                if let Err(e) = self.session.play(mv.from, mv.to, mv.promotion) {
                    return error_result(e.to_string());
                }
            }
        }
        to_js(&build_board_state(&self.session))
    }
}
