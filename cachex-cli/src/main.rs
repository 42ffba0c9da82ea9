//! Cachex CLI - Command-line interface
//!
//! Commands:
//! - path: Best connection(s) for a colour on a board
//! - capture: Place a token and resolve diamond captures
//! - block: Score blocking moves for a colour
//! - play: Self-play between two agents

mod analyze;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cachex")]
#[command(about = "Cachex board analysis engine and agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cheapest edge-to-edge connection for a colour
    Path(analyze::BoardArgs),
    /// Place a token and report captured cells
    Capture(analyze::CaptureArgs),
    /// Moves that most increase the opponent's connection cost
    Block(analyze::BoardArgs),
    /// Play agents against each other
    Play(play_cmd::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Path(args) => analyze::run_path(args),
        Commands::Capture(args) => analyze::run_capture(args),
        Commands::Block(args) => analyze::run_block(args),
        Commands::Play(args) => play_cmd::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_belongs_to_play() {
        let cli = Cli::try_parse_from(["cachex", "play", "--seed", "9"]).unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected play command");
        };
        assert_eq!(args.seed, Some(9));

        let analysis = ["cachex", "path", "--board", "b.json", "--colour", "red", "--seed", "9"];
        assert!(Cli::try_parse_from(analysis).is_err());
    }
}
