// Random legal play, used by the self-play binary and the browser facade's
// "computer reply".

use crate::board::Board;
use crate::moves::Move;
use crate::rules;

/// Platform-appropriate random number in [0, 1).
/// Uses js_sys::Math::random() in WASM builds, rand crate natively.
fn random_f64() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Math::random()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }
}

/// A uniformly chosen legal move for the side to move, or `None` when there
/// is nothing to play.
pub fn random_move(board: &Board) -> Option<Move> {
    let mut moves = rules::legal_moves(board, board.current_player());
    if moves.is_empty() {
        return None;
    }
    let index = ((random_f64() * moves.len() as f64) as usize).min(moves.len() - 1);
    Some(moves.swap_remove(index))
}
