use chess_rules::game::{Game, GameConfig, GameStatus};
use chess_rules::play::random_move;

const DEFAULT_MAX_PLIES: u32 = 300;

fn main() {
    let json = std::env::args().any(|a| a == "--json");
    let config = GameConfig {
        max_plies: Some(DEFAULT_MAX_PLIES),
        ..GameConfig::new()
    };
    let limit = config.max_plies.unwrap_or(u32::MAX);

    let mut game = Game::with_config(config);
    let mut ply = 0;

    while !game.status().is_over() && ply < limit {
        let Some(mv) = random_move(game.board()) else {
            break;
        };
        if let Err(e) = game.play(mv.from, mv.to, mv.promotion) {
            eprintln!("engine offered a move it then refused ({}): {e}", mv.to_uci());
            std::process::exit(1);
        }
        ply += 1;
        eprintln!("{ply:>3}. {}", mv.to_uci());
    }

    let result = match game.status() {
        GameStatus::Checkmate { winner } => format!("{winner} wins by checkmate"),
        GameStatus::Stalemate => "draw by stalemate".to_string(),
        GameStatus::Ongoing => "unfinished".to_string(),
    };
    eprintln!("Game over after {ply} plies: {result}");

    if json {
        match serde_json::to_string_pretty(&game) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("could not serialize the game: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", game.board());
    }
}
