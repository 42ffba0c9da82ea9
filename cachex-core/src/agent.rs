//! Game-playing agent built on the analysis engine

use crate::blocking::best_blocking_moves;
use crate::board::{Board, Cell, Colour};
use crate::capture::place;
use crate::error::{EngineError, Result};
use crate::hex::Coord;
use crate::path::{best_connection, path_aggregator, winner};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Turn limit after which a game is a draw
pub const DEFAULT_MAX_TURNS: u32 = 343;

// ============================================================================
// ACTIONS AND CONFIGURATION
// ============================================================================

/// A single turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place(Coord),
    Steal,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Place(c) => write!(f, "PLACE {} {}", c.row, c.col),
            Action::Steal => write!(f, "STEAL"),
        }
    }
}

/// How the agent picks its placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Hurt the opponent's best connection as much as possible
    #[default]
    Blocking,
    /// Extend our own best connection
    Greedy,
}

/// Agent configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub strategy: Strategy,
    /// Random seed for tie-breaking (None = random)
    pub seed: Option<u64>,
    /// Consider stealing Red's opening token when playing Blue
    pub allow_steal: bool,
    /// Turns (both players) before a game is declared drawn
    pub max_turns: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Blocking,
            seed: None,
            allow_steal: true,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl AgentConfig {
    pub fn with_seed(strategy: Strategy, seed: u64) -> Self {
        Self {
            strategy,
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ============================================================================
// PLAYER
// ============================================================================

/// Agent holding its own view of the board
pub struct Player {
    colour: Colour,
    board: Board,
    config: AgentConfig,
    rng: ChaCha8Rng,
    turns_played: u32,
}

impl Player {
    pub fn new(colour: Colour, size: usize, config: AgentConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            colour,
            board: Board::new(size)?,
            config,
            rng,
            turns_played: 0,
        })
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Turns applied so far, by both players
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Choose the next action for our colour
    pub fn action(&mut self) -> Result<Action> {
        if self.should_steal() {
            debug!(colour = %self.colour, "stealing opening token");
            return Ok(Action::Steal);
        }
        let coord = self.choose_placement()?;
        debug!(colour = %self.colour, %coord, "placing");
        Ok(Action::Place(coord))
    }

    /// Apply an action by either player, returning any captured cells
    pub fn turn(&mut self, colour: Colour, action: Action) -> Result<Vec<Coord>> {
        let captured = match action {
            Action::Place(coord) => {
                if !self.board.get(coord)?.is_empty() {
                    return Err(EngineError::Occupied { row: coord.row, col: coord.col });
                }
                place(&mut self.board, colour, coord)?
            }
            Action::Steal => {
                if colour != Colour::Blue || !steal_is_legal(&self.board, self.turns_played) {
                    return Err(EngineError::IllegalSteal);
                }
                let tokens = self.board.tokens(Colour::Red);
                let [red] = tokens.as_slice() else {
                    return Err(EngineError::IllegalSteal);
                };
                self.board.set(*red, Cell::Empty)?;
                self.board.set(red.reflected(), Cell::Blue)?;
                Vec::new()
            }
        };

        self.turns_played += 1;
        if !captured.is_empty() {
            debug!(%colour, captured = captured.len(), "tokens captured");
        }
        Ok(captured)
    }

    /// Steal when the mirror of Red's opening lies on our best connection
    fn should_steal(&self) -> bool {
        if !self.config.allow_steal
            || self.colour != Colour::Blue
            || !steal_is_legal(&self.board, self.turns_played)
        {
            return false;
        }
        let Some(red) = self.board.tokens(Colour::Red).first().copied() else {
            return false;
        };
        let best = best_connection(&self.board, self.colour);
        path_aggregator(&best.paths).contains(&red.reflected())
    }

    fn choose_placement(&mut self) -> Result<Coord> {
        let mut pool = match self.config.strategy {
            Strategy::Blocking => best_blocking_moves(&mut self.board, self.colour)?,
            Strategy::Greedy => path_aggregator(&best_connection(&self.board, self.colour).paths),
        };
        if pool.is_empty() {
            pool = self.board.empty_cells();
        }
        pool.choose(&mut self.rng)
            .copied()
            .ok_or(EngineError::NoLegalMove)
    }
}

/// Blue's first turn, with Red's single opening token still on the board
fn steal_is_legal(board: &Board, turns_played: u32) -> bool {
    turns_played == 1 && board.count(Colour::Red) == 1 && board.count(Colour::Blue) == 0
}

// ============================================================================
// SELF PLAY
// ============================================================================

/// Outcome of a complete game
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub winner: Option<Colour>,
    pub actions: Vec<(Colour, Action)>,
    pub board: Board,
}

impl GameRecord {
    pub fn turns(&self) -> usize {
        self.actions.len()
    }
}

/// Play two agents against each other until a connection or the turn limit
///
/// The turn limit comes from Red's configuration.
pub fn play_game(size: usize, red_config: AgentConfig, blue_config: AgentConfig) -> Result<GameRecord> {
    let max_turns = red_config.max_turns;
    let mut red = Player::new(Colour::Red, size, red_config)?;
    let mut blue = Player::new(Colour::Blue, size, blue_config)?;
    let mut actions = Vec::new();
    let mut result = None;

    for turn in 0..max_turns {
        let mover = if turn % 2 == 0 { Colour::Red } else { Colour::Blue };
        if red.board().is_full() {
            break;
        }

        let action = match mover {
            Colour::Red => red.action()?,
            Colour::Blue => blue.action()?,
        };
        red.turn(mover, action)?;
        blue.turn(mover, action)?;
        actions.push((mover, action));

        if let Some(colour) = winner(red.board()) {
            result = Some(colour);
            break;
        }
    }

    debug!(winner = ?result, turns = actions.len(), "game finished");
    Ok(GameRecord {
        winner: result,
        actions,
        board: red.board().clone(),
    })
}
