//! Play command - self-play between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cachex_core::{play_game, Action, AgentConfig, Colour, Strategy};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Blocking,
    Greedy,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Blocking => Strategy::Blocking,
            StrategyArg::Greedy => Strategy::Greedy,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// Board size
    #[arg(long, default_value = "5")]
    pub size: usize,

    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Random seed for reproducible play (overrides the config file's seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Agent configuration JSON file (shared by both sides)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override Red's strategy
    #[arg(long, value_enum)]
    pub red: Option<StrategyArg>,

    /// Override Blue's strategy
    #[arg(long, value_enum)]
    pub blue: Option<StrategyArg>,

    /// Print every action
    #[arg(long)]
    pub verbose: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    game_number: usize,
    winner: Option<Colour>,
    turns: usize,
    actions: Vec<(Colour, Action)>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameSummary>,
    red_wins: usize,
    blue_wins: usize,
    draws: usize,
    avg_turns: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let (red_config, blue_config) = load_config(&args)?;

    tracing::info!(
        "Starting self-play: {}x{} board, {} game(s), red={:?}, blue={:?}",
        args.size,
        args.size,
        args.games,
        red_config.strategy,
        blue_config.strategy
    );

    let results = play_match(&red_config, &blue_config, &args)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build both sides' configuration from the optional file and overrides
fn load_config(args: &PlayArgs) -> Result<(AgentConfig, AgentConfig)> {
    let base = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("Failed to load agent config: {}", path.display()))?,
        None => AgentConfig::default(),
    };

    let mut red = base.clone();
    let mut blue = base;
    if let Some(s) = args.red {
        red.strategy = s.into();
    }
    if let Some(s) = args.blue {
        blue.strategy = s.into();
    }
    Ok((red, blue))
}

/// Play all games in the match
fn play_match(
    red_config: &AgentConfig,
    blue_config: &AgentConfig,
    args: &PlayArgs,
) -> Result<MatchResults> {
    let seed = args.seed.or(red_config.seed).or(blue_config.seed);
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let summary = play_single_game(red_config, blue_config, game_num + 1, args.size, &mut rng)?;

        tracing::info!(
            "Game {}: {} ({} turns)",
            summary.game_number,
            format_winner(summary.winner),
            summary.turns
        );
        if args.verbose {
            for (colour, action) in &summary.actions {
                println!("  {:<4} {}", colour.name(), action);
            }
        }

        games.push(summary);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &PlayArgs) -> Result<()> {
    if args.json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game with fresh seeds drawn from the match RNG
fn play_single_game(
    red_config: &AgentConfig,
    blue_config: &AgentConfig,
    game_number: usize,
    size: usize,
    rng: &mut ChaCha8Rng,
) -> Result<GameSummary> {
    let red = AgentConfig {
        seed: Some(rng.gen()),
        ..red_config.clone()
    };
    let blue = AgentConfig {
        seed: Some(rng.gen()),
        ..blue_config.clone()
    };

    let record = play_game(size, red, blue)
        .with_context(|| format!("Game {} failed", game_number))?;

    Ok(GameSummary {
        game_number,
        winner: record.winner,
        turns: record.turns(),
        actions: record.actions,
    })
}

/// Compute aggregate statistics from game summaries
fn compute_match_statistics(games: Vec<GameSummary>) -> MatchResults {
    let red_wins = games
        .iter()
        .filter(|g| g.winner == Some(Colour::Red))
        .count();
    let blue_wins = games
        .iter()
        .filter(|g| g.winner == Some(Colour::Blue))
        .count();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let total_turns: usize = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    MatchResults {
        games,
        red_wins,
        blue_wins,
        draws,
        avg_turns,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn format_winner(winner: Option<Colour>) -> String {
    match winner {
        Some(colour) => format!("{} wins", colour),
        None => "draw".to_string(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<Colour>,
        turns: usize,
        actions: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        red_wins: usize,
        blue_wins: usize,
        draws: usize,
        avg_turns: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        draws: results.draws,
        avg_turns: results.avg_turns,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                turns: g.turns,
                actions: g
                    .actions
                    .iter()
                    .map(|(colour, action)| format!("{} {}", colour, action))
                    .collect(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Self-play Results ===");
    println!("Total games: {}", total);
    println!("Red wins:    {} ({:.1}%)", results.red_wins, percent(results.red_wins, total));
    println!("Blue wins:   {} ({:.1}%)", results.blue_wins, percent(results.blue_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg turns:   {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} turns",
            game.game_number,
            format_winner(game.winner),
            game.turns
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(game_number: usize, winner: Option<Colour>, turns: usize) -> GameSummary {
        GameSummary {
            game_number,
            winner,
            turns,
            actions: vec![],
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.red_wins, 0);
        assert_eq!(results.blue_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_turns, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            summary(1, Some(Colour::Red), 10),
            summary(2, Some(Colour::Blue), 20),
            summary(3, None, 30),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.red_wins, 1);
        assert_eq!(results.blue_wins, 1);
        assert_eq!(results.draws, 1);
        assert_eq!(results.avg_turns, 20.0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_load_config_overrides() {
        let args = PlayArgs {
            size: 4,
            games: 1,
            seed: None,
            config: None,
            red: Some(StrategyArg::Greedy),
            blue: None,
            verbose: false,
            json: false,
        };
        let (red, blue) = load_config(&args).unwrap();
        assert_eq!(red.strategy, Strategy::Greedy);
        assert_eq!(blue.strategy, Strategy::Blocking);
    }

    #[test]
    fn test_seeded_match_is_reproducible() {
        let args = PlayArgs {
            size: 3,
            games: 2,
            seed: Some(7),
            config: None,
            red: None,
            blue: Some(StrategyArg::Greedy),
            verbose: false,
            json: false,
        };
        let (red, blue) = load_config(&args).unwrap();
        let a = play_match(&red, &blue, &args).unwrap();
        let b = play_match(&red, &blue, &args).unwrap();
        assert_eq!(a.games.len(), 2);
        for (x, y) in a.games.iter().zip(&b.games) {
            assert_eq!(x.actions, y.actions);
            assert_eq!(x.winner, y.winner);
        }
    }

    #[test]
    fn test_config_file_seed_makes_match_reproducible() {
        let path = std::env::temp_dir().join(format!("cachex-play-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"strategy": "greedy", "seed": 5}"#).unwrap();
        let args = PlayArgs {
            size: 4,
            games: 2,
            seed: None,
            config: Some(path.clone()),
            red: None,
            blue: None,
            verbose: false,
            json: false,
        };
        let loaded = load_config(&args);
        std::fs::remove_file(&path).ok();
        let (red, blue) = loaded.unwrap();
        assert_eq!(red.seed, Some(5));

        let a = play_match(&red, &blue, &args).unwrap();
        let b = play_match(&red, &blue, &args).unwrap();
        for (x, y) in a.games.iter().zip(&b.games) {
            assert_eq!(x.actions, y.actions);
            assert_eq!(x.winner, y.winner);
        }
    }

    #[test]
    fn test_seed_flag_overrides_config_seed() {
        let args = PlayArgs {
            size: 4,
            games: 1,
            seed: Some(11),
            config: None,
            red: None,
            blue: None,
            verbose: false,
            json: false,
        };
        let flagged = AgentConfig::with_seed(Strategy::Greedy, 5);
        let plain = AgentConfig::with_seed(Strategy::Greedy, 11);
        let a = play_match(&flagged, &flagged, &args).unwrap();
        let b = play_match(&plain, &plain, &args).unwrap();
        assert_eq!(a.games[0].actions, b.games[0].actions);
    }

    #[test]
    fn test_json_report_succeeds() {
        let args = PlayArgs {
            size: 3,
            games: 1,
            seed: Some(3),
            config: None,
            red: None,
            blue: None,
            verbose: false,
            json: true,
        };
        let (red, blue) = load_config(&args).unwrap();
        let results = play_match(&red, &blue, &args).unwrap();
        assert!(report_results(&results, &args).is_ok());
    }

    #[test]
    fn test_format_winner() {
        assert_eq!(format_winner(Some(Colour::Blue)), "blue wins");
        assert_eq!(format_winner(None), "draw");
    }
}
