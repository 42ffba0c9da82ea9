//! Cachex Core - Board analysis engine and agent
//!
//! This crate provides the decision core for Cachex:
//! - Board geometry (rhombus hex grid, cube coordinates)
//! - Connection cost search between a colour's two edges
//! - Diamond capture resolution
//! - One-ply blocking move evaluation
//! - A turn-taking agent and self-play loop

pub mod error;
pub mod hex;
pub mod board;
pub mod path;
pub mod capture;
pub mod blocking;
pub mod agent;

// Re-exports for convenient access
pub use error::{EngineError, Result};
pub use hex::{Coord, DIRECTIONS, HEX_STEPS, hex_distance, neighbours, offset_to_cube, cube_to_offset};
pub use board::{Board, Cell, Colour, UndoLog, MAX_BOARD_SIZE};
pub use path::{best_connection, path_aggregator, no_connection_cost, winner, BestConnection, ConnectionPath};
pub use capture::{apply_captures, find_captures, place, place_recorded, CAPTURE_PATTERNS};
pub use blocking::{best_blocking_moves, score_blocking_moves, MoveScore};
pub use agent::{play_game, Action, AgentConfig, GameRecord, Player, Strategy};
