use std::io::{self, BufRead, Write};

use crate::board::{Board, DropMove, Player, COLS};
use crate::rules::Status;
use crate::search::{decide_move, SearchState};
use crate::types::EngineConfig;

/// Interactive game on stdin/stdout with the default engine config.
pub fn run() {
    run_with_config(EngineConfig::default());
}

pub fn run_with_config(config: EngineConfig) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let first = loop {
        print!("Who starts? (0 = you, 1 = engine) ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else { return };
        if let Some(player) = parse_first(&line) {
            break player;
        }
    };

    let mut state = match config.seed {
        Some(seed) => SearchState::with_seed(config.budget, seed),
        None => SearchState::new(config.budget),
    };
    let mut board = Board::new(first);

    loop {
        println!("\n{}", board);
        if board.status().is_terminal() {
            break;
        }

        if board.side_to_move() == Player::Human {
            print!("Which column? (0-{}) ", COLS - 1);
            let _ = io::stdout().flush();
            let Some(Ok(line)) = lines.next() else { return };
            let Some(col) = parse_column(&line) else {
                continue;
            };
            let Some(row) = board.drop_row(col) else {
                println!("Column {} is full.", col);
                continue;
            };
            match board.apply(DropMove::new(row, col)) {
                Ok(next) => board = next,
                Err(err) => println!("{}", err),
            }
        } else {
            match decide_move(&board, Player::Machine, &mut state) {
                Ok(result) => {
                    println!(
                        "Engine drops in column {} ({} iterations, {:.1}% win chance)",
                        result.best_move.col(),
                        result.iterations,
                        result.win_rate * 100.0
                    );
                    match board.apply(result.best_move) {
                        Ok(next) => board = next,
                        Err(err) => {
                            println!("engine error: {}", err);
                            return;
                        }
                    }
                }
                Err(err) => {
                    println!("engine error: {}", err);
                    return;
                }
            }
        }
    }

    match board.status() {
        Status::Won(Player::Machine) => println!("** The engine wins **"),
        Status::Draw => println!("Draw!"),
        _ => println!("** You beat the engine **"),
    }
}

fn parse_first(input: &str) -> Option<Player> {
    match input.trim() {
        "0" => Some(Player::Human),
        "1" => Some(Player::Machine),
        _ => None,
    }
}

fn parse_column(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&col| col < COLS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first() {
        assert_eq!(parse_first("0"), Some(Player::Human));
        assert_eq!(parse_first(" 1 "), Some(Player::Machine));
        assert_eq!(parse_first("2"), None);
        assert_eq!(parse_first("engine"), None);
        assert_eq!(parse_first(""), None);
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("0"), Some(0));
        assert_eq!(parse_column(" 6 "), Some(6));
        assert_eq!(parse_column("7"), None);
        assert_eq!(parse_column("-1"), None);
        assert_eq!(parse_column("x"), None);
    }
}
