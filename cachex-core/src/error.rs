//! Engine error types

/// Errors raised by board queries and the agent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("coordinate ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: i32, col: i32, size: usize },

    #[error("no token at ({row}, {col}) to resolve captures from")]
    EmptyCell { row: usize, col: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("invalid board size: {0}")]
    InvalidSize(usize),

    #[error("steal is only legal as blue's first move against a single red token")]
    IllegalSteal,

    #[error("no legal move available")]
    NoLegalMove,
}

pub type Result<T> = std::result::Result<T, EngineError>;
