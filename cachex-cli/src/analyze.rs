//! Analysis commands - query the engine on a board loaded from JSON
//!
//! Each command loads a board, runs one engine entry point, and prints the
//! result as text or JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use cachex_core::{
    best_connection, blocking::top_scoring, path_aggregator, place, score_blocking_moves,
    Board, Colour, Coord,
};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct BoardArgs {
    /// Board JSON file ({"n": 5, "board": [["b", 1, 2], ...]})
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Colour to analyse (red or blue)
    #[arg(long)]
    pub colour: Colour,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CaptureArgs {
    #[command(flatten)]
    pub target: BoardArgs,

    /// Row of the placed token
    #[arg(long)]
    pub row: usize,

    /// Column of the placed token
    #[arg(long)]
    pub col: usize,
}

// ============================================================================
// COMMANDS
// ============================================================================

pub fn run_path(args: BoardArgs) -> Result<()> {
    let board = load_board(&args)?;
    let best = best_connection(&board, args.colour);

    tracing::info!(
        "{} best connection: cost {} over {} path(s)",
        args.colour,
        best.cost,
        best.paths.len()
    );

    if args.json {
        print_json(&best)?;
    } else if !best.is_connected() {
        println!("{}: no connection possible", args.colour);
    } else {
        println!("{}: cost {}", args.colour, best.cost);
        for path in &best.paths {
            println!("  {}", format_coords(path));
        }
        println!("Candidate cells: {}", format_coords(&path_aggregator(&best.paths)));
    }
    Ok(())
}

pub fn run_capture(args: CaptureArgs) -> Result<()> {
    let mut board = load_board(&args.target)?;
    let coord = Coord::new(args.row, args.col);
    let captured = place(&mut board, args.target.colour, coord)
        .with_context(|| format!("Failed to place {} at {}", args.target.colour, coord))?;

    tracing::info!("{} at {} captured {} token(s)", args.target.colour, coord, captured.len());

    if args.target.json {
        #[derive(Serialize)]
        struct JsonOutput {
            captured: Vec<Coord>,
            board: serde_json::Value,
        }
        let output = JsonOutput {
            captured,
            board: serde_json::from_str(&board.to_json()?)?,
        };
        print_json(&output)?;
    } else {
        println!("Captured: {}", format_coords(&captured));
        print!("{}", board);
    }
    Ok(())
}

pub fn run_block(args: BoardArgs) -> Result<()> {
    let mut board = load_board(&args)?;
    let scores = score_blocking_moves(&mut board, args.colour)?;
    let best = top_scoring(&scores);

    tracing::info!("{} blocking: {} candidate(s), {} best", args.colour, scores.len(), best.len());

    if args.json {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            scores: &'a [cachex_core::MoveScore],
            best: Vec<Coord>,
        }
        print_json(&JsonOutput { scores: &scores, best })?;
    } else if scores.is_empty() {
        println!("{}: no candidate moves", args.colour);
    } else {
        for s in &scores {
            println!("  {} -> {:+}", s.coord, s.score);
        }
        println!("Best: {}", format_coords(&best));
    }
    Ok(())
}

// ============================================================================
// UTILITIES
// ============================================================================

fn load_board(args: &BoardArgs) -> Result<Board> {
    Board::load(&args.board)
        .with_context(|| format!("Failed to load board: {}", args.board.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_coords(coords: &[Coord]) -> String {
    if coords.is_empty() {
        return "-".to_string();
    }
    coords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(&[]), "-");
        assert_eq!(
            format_coords(&[Coord::new(0, 1), Coord::new(2, 3)]),
            "(0, 1) (2, 3)"
        );
    }

    #[test]
    fn test_load_board_reports_path() {
        let args = BoardArgs {
            board: PathBuf::from("/nonexistent/cachex-board.json"),
            colour: Colour::Red,
            json: false,
        };
        let err = load_board(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cachex-board.json"));
    }

    #[test]
    fn test_load_board_from_file() {
        let path = std::env::temp_dir().join(format!("cachex-cli-board-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"n": 3, "board": [["r", 0, 1]]}"#).unwrap();
        let args = BoardArgs {
            board: path.clone(),
            colour: Colour::Blue,
            json: true,
        };
        let board = load_board(&args);
        std::fs::remove_file(&path).ok();
        assert_eq!(board.unwrap().tokens(Colour::Red), vec![Coord::new(0, 1)]);
    }
}
