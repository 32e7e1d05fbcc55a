// =============================================================================
// Game session
//
// The rules module answers questions about a position; this module changes
// positions. `apply_move` carries out every side effect a move has (rook hop
// on a castle, the pawn taken en passant, flag bookkeeping, promotion, turn
// flip). `Game` wraps a board with history, captures and a result, and only
// lets legal moves through.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::Error;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceKind};
use crate::rules;
use crate::square::Square;

/// Session settings.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// End the game as a draw when the side to move has no legal move and is
    /// not in check. When false such a position stays `Ongoing`.
    pub stalemate_is_draw: bool,
    /// Cap on plies for automated play. `None` means no cap.
    pub max_plies: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        GameConfig {
            stalemate_is_draw: true,
            max_plies: None,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// Play `mv` on `board` with all of its side effects and hand the turn over.
/// Returns the captured piece, if any. Legality is not checked here.
pub fn apply_move(board: &mut Board, mv: &Move) -> Option<Piece> {
    let piece = board.get(mv.from)?;

    // En-passant windows last exactly one turn.
    board.clear_double_steps();

    let mut captured = None;
    if mv.en_passant {
        captured = board.set(Square::at(mv.from.row(), mv.to.col()), None);
    }
    captured = board.move_piece(mv.from, mv.to).or(captured);

    if let Some(side) = mv.castle {
        let row = mv.from.row();
        let rook_to = Square::at(row, side.rook_target_col());
        board.move_piece(Square::at(row, side.rook_col()), rook_to);
        if let Some(rook) = board.get_mut(rook_to) {
            rook.mark_moved();
        }
    }

    if let Some(moved) = board.get_mut(mv.to) {
        moved.mark_moved();
        if piece.kind == PieceKind::Pawn && mv.from.row().abs_diff(mv.to.row()) == 2 {
            moved.set_double_step(true);
        }
    }

    if let Some(kind) = mv.promotion {
        let mut promoted = Piece::new(kind, piece.color);
        promoted.mark_moved();
        board.set(mv.to, Some(promoted));
    }

    board.toggle_player();
    captured
}

/// Evaluate the position for the side to move.
pub fn status_of(board: &Board, config: &GameConfig) -> GameStatus {
    if rules::is_checkmate(board) {
        GameStatus::Checkmate {
            winner: board.current_player().opposite(),
        }
    } else if config.stalemate_is_draw && rules::is_stalemate(board) {
        GameStatus::Stalemate
    } else {
        GameStatus::Ongoing
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Game {
    board: Board,
    config: GameConfig,
    status: GameStatus,
    history: Vec<Move>,
    captured_white: Vec<PieceKind>,
    captured_black: Vec<PieceKind>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::from_board(Board::new(), config)
    }

    /// Start a session from an arbitrary position.
    pub fn from_board(board: Board, config: GameConfig) -> Self {
        let status = status_of(&board, &config);
        Game {
            board,
            config,
            status,
            history: Vec::new(),
            captured_white: Vec::new(),
            captured_black: Vec::new(),
        }
    }

    /// Back to the starting position, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Kinds of `color`'s pieces that have been taken so far.
    pub fn captured(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::White => &self.captured_white,
            Color::Black => &self.captured_black,
        }
    }

    /// Legal destinations for the piece on `sq`. Empty when the square is
    /// empty or holds a piece of the side not to move.
    pub fn moves_from(&self, sq: Square) -> Vec<Square> {
        match self.board.get(sq) {
            Some(p) if p.color == self.board.current_player() => p.moves(&self.board, sq, true),
            _ => Vec::new(),
        }
    }

    /// Validate and play a move for the side to move.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, Error> {
        if self.status.is_over() {
            return Err(Error::GameOver);
        }
        let piece = self.board.get(from).ok_or(Error::EmptySquare { square: from })?;
        let to_move = self.board.current_player();
        if piece.color != to_move {
            return Err(Error::WrongTurn {
                expected: to_move,
                found: piece.color,
            });
        }
        if !piece.moves(&self.board, from, true).contains(&to) {
            return Err(Error::IllegalMove { from, to });
        }

        let promotes = piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row();
        match (promotes, promotion) {
            (true, None) => return Err(Error::PromotionRequired { from, to }),
            (true, Some(kind)) if !kind.is_promotion_choice() => {
                return Err(Error::InvalidPromotion { kind })
            }
            (false, Some(kind)) => return Err(Error::InvalidPromotion { kind }),
            _ => {}
        }

        let mv = Move::classify(&self.board, from, to, promotion);
        if let Some(taken) = apply_move(&mut self.board, &mv) {
            match taken.color {
                Color::White => self.captured_white.push(taken.kind),
                Color::Black => self.captured_black.push(taken.kind),
            }
        }
        self.history.push(mv.clone());
        self.status = status_of(&self.board, &self.config);
        Ok(mv)
    }

    /// Play a move given in coordinate notation such as "e2e4" or "e7e8q".
    pub fn play_uci(&mut self, text: &str) -> Result<Move, Error> {
        let mv = Move::from_uci(text)?;
        self.play(mv.from, mv.to, mv.promotion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, row: usize, col: usize, kind: PieceKind, color: Color) {
        board.set(Square::at(row, col), Some(Piece::new(kind, color)));
    }

    fn play_all(game: &mut Game, moves: &[&str]) {
        for text in moves {
            game.play_uci(text).unwrap();
        }
    }

    /// e2-e4 leaves the pawn on (4,4) and empties (6,4).
    #[test]
    fn king_pawn_opening() {
        let mut game = Game::new();
        let mv = game.play(Square::at(6, 4), Square::at(4, 4), None).unwrap();
        assert_eq!(mv.to_uci(), "e2e4");

        let board = game.board();
        assert_eq!(
            board.get(Square::at(4, 4)).map(|p| p.kind_and_color()),
            Some((PieceKind::Pawn, Color::White))
        );
        assert!(board.get(Square::at(6, 4)).is_none());
        assert_eq!(board.current_player(), Color::Black);
        assert!(board.get(Square::at(4, 4)).unwrap().just_double_stepped);
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut game = Game::new();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(rules::is_checkmate(game.board()));
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Black });
        assert_eq!(game.play_uci("e1f2"), Err(Error::GameOver));

        let mut board = game.board().clone();
        board.set(Square::at(4, 7), None);
        assert!(!rules::is_checkmate(&board));
    }

    #[test]
    fn refuses_bad_requests() {
        let mut game = Game::new();
        assert_eq!(
            game.play(Square::at(4, 4), Square::at(3, 4), None),
            Err(Error::EmptySquare { square: Square::at(4, 4) })
        );
        assert_eq!(
            game.play(Square::at(1, 4), Square::at(3, 4), None),
            Err(Error::WrongTurn { expected: Color::White, found: Color::Black })
        );
        assert_eq!(
            game.play(Square::at(6, 4), Square::at(3, 4), None),
            Err(Error::IllegalMove { from: Square::at(6, 4), to: Square::at(3, 4) })
        );
        assert_eq!(
            game.play(Square::at(6, 4), Square::at(4, 4), Some(PieceKind::Queen)),
            Err(Error::InvalidPromotion { kind: PieceKind::Queen })
        );
        assert!(game.history().is_empty());
        assert_eq!(game.board(), &Board::new());
    }

    /// King and rook move together and both lose their castling rights.
    #[test]
    fn kingside_castle_moves_both_pieces() {
        let mut board = Board::new();
        board.set(Square::at(7, 5), None);
        board.set(Square::at(7, 6), None);
        let mut game = Game::from_board(board, GameConfig::default());

        assert!(game.moves_from(Square::at(7, 4)).contains(&Square::at(7, 6)));
        let mv = game.play(Square::at(7, 4), Square::at(7, 6), None).unwrap();
        assert_eq!(mv.castle, Some(crate::moves::CastleSide::Kingside));

        let board = game.board();
        let king = board.get(Square::at(7, 6)).unwrap();
        let rook = board.get(Square::at(7, 5)).unwrap();
        assert_eq!(king.kind_and_color(), (PieceKind::King, Color::White));
        assert_eq!(rook.kind_and_color(), (PieceKind::Rook, Color::White));
        assert!(king.has_moved && rook.has_moved);
        assert!(board.get(Square::at(7, 4)).is_none());
        assert!(board.get(Square::at(7, 7)).is_none());
    }

    #[test]
    fn queenside_castle_for_black() {
        let mut board = Board::empty();
        place(&mut board, 0, 4, PieceKind::King, Color::Black);
        place(&mut board, 0, 0, PieceKind::Rook, Color::Black);
        place(&mut board, 7, 4, PieceKind::King, Color::White);
        board.set_current_player(Color::Black);
        let mut game = Game::from_board(board, GameConfig::default());

        game.play_uci("e8c8").unwrap();
        let board = game.board();
        assert_eq!(board.get(Square::at(0, 2)).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(board.get(Square::at(0, 3)).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(board.get(Square::at(0, 0)).is_none());
    }

    /// A rook that went away and came back can no longer castle.
    #[test]
    fn returning_rook_has_still_moved() {
        let mut board = Board::empty();
        place(&mut board, 7, 4, PieceKind::King, Color::White);
        place(&mut board, 7, 7, PieceKind::Rook, Color::White);
        place(&mut board, 0, 0, PieceKind::King, Color::Black);
        let mut game = Game::from_board(board, GameConfig::default());

        play_all(&mut game, &["h1h2", "a8b8", "h2h1", "b8a8"]);
        assert!(!game.moves_from(Square::at(7, 4)).contains(&Square::at(7, 6)));
    }

    fn en_passant_game() -> Game {
        let mut board = Board::empty();
        place(&mut board, 7, 4, PieceKind::King, Color::White);
        place(&mut board, 0, 4, PieceKind::King, Color::Black);
        place(&mut board, 3, 4, PieceKind::Pawn, Color::White);
        place(&mut board, 1, 3, PieceKind::Pawn, Color::Black);
        board.set_current_player(Color::Black);
        Game::from_board(board, GameConfig::default())
    }

    #[test]
    fn en_passant_right_after_the_double_step() {
        let mut game = en_passant_game();
        game.play_uci("d7d5").unwrap();
        assert!(game.moves_from(Square::at(3, 4)).contains(&Square::at(2, 3)));

        let mv = game.play_uci("e5d6").unwrap();
        assert!(mv.en_passant);
        let board = game.board();
        assert!(board.get(Square::at(3, 3)).is_none());
        assert_eq!(board.get(Square::at(2, 3)).map(|p| p.kind), Some(PieceKind::Pawn));
        assert_eq!(game.captured(Color::Black), &[PieceKind::Pawn]);
    }

    /// The window closes once another move has been played.
    #[test]
    fn en_passant_expires_after_one_turn() {
        let mut game = en_passant_game();
        play_all(&mut game, &["d7d5", "e1f1", "e8f8"]);
        assert!(!game.moves_from(Square::at(3, 4)).contains(&Square::at(2, 3)));
        assert!(matches!(
            game.play_uci("e5d6"),
            Err(Error::IllegalMove { .. })
        ));
    }

    #[test]
    fn promotion_requires_a_choice() {
        let mut board = Board::empty();
        place(&mut board, 7, 4, PieceKind::King, Color::White);
        place(&mut board, 2, 7, PieceKind::King, Color::Black);
        place(&mut board, 1, 0, PieceKind::Pawn, Color::White);
        let mut game = Game::from_board(board, GameConfig::default());

        assert_eq!(
            game.play_uci("a7a8"),
            Err(Error::PromotionRequired { from: Square::at(1, 0), to: Square::at(0, 0) })
        );
        assert_eq!(
            game.play(Square::at(1, 0), Square::at(0, 0), Some(PieceKind::King)),
            Err(Error::InvalidPromotion { kind: PieceKind::King })
        );
        game.play_uci("a7a8n").unwrap();
        assert_eq!(
            game.board().get(Square::at(0, 0)).map(|p| p.kind_and_color()),
            Some((PieceKind::Knight, Color::White))
        );
    }

    /// Ka1 against Qb3 + Kc2, reached by the queen's last move.
    #[test]
    fn stalemate_follows_the_config() {
        let mut board = Board::empty();
        place(&mut board, 7, 0, PieceKind::King, Color::White);
        place(&mut board, 4, 1, PieceKind::Queen, Color::Black);
        place(&mut board, 6, 2, PieceKind::King, Color::Black);
        board.set_current_player(Color::Black);

        let mut drawn = Game::from_board(board.clone(), GameConfig::default());
        drawn.play_uci("b4b3").unwrap();
        assert_eq!(drawn.status(), GameStatus::Stalemate);

        let config = GameConfig {
            stalemate_is_draw: false,
            ..GameConfig::default()
        };
        let mut open = Game::from_board(board, config);
        open.play_uci("b4b3").unwrap();
        assert_eq!(open.status(), GameStatus::Ongoing);
    }

    /// Every legal move, once played, leaves the mover's king unattacked,
    /// and every destination is on the board.
    #[test]
    fn legal_moves_never_leave_the_king_attacked() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "d8h4"]);
        let mut pinned = Board::empty();
        place(&mut pinned, 7, 4, PieceKind::King, Color::White);
        place(&mut pinned, 6, 4, PieceKind::Knight, Color::White);
        place(&mut pinned, 5, 5, PieceKind::Pawn, Color::White);
        place(&mut pinned, 2, 4, PieceKind::Rook, Color::Black);
        place(&mut pinned, 4, 7, PieceKind::Bishop, Color::Black);
        place(&mut pinned, 0, 0, PieceKind::King, Color::Black);

        for board in [Board::new(), game.board().clone(), pinned] {
            let mover = board.current_player();
            for mv in rules::legal_moves(&board, mover) {
                assert!(Board::is_valid_tile(mv.to.row() as i32, mv.to.col() as i32));
                let mut after = board.clone();
                apply_move(&mut after, &mv);
                let king = after.king_square(mover).unwrap();
                assert!(
                    !rules::is_attacked(&after, king, mover.opposite()),
                    "{} leaves the king attacked",
                    mv.to_uci()
                );
            }
        }
    }

    #[test]
    fn reset_restores_the_start() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "e7e5"]);
        game.reset();
        assert_eq!(game.board(), &Board::new());
        assert!(game.history().is_empty());
        assert!(game.last_move().is_none());
    }
}
