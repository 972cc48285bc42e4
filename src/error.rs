//! Error types for the engine, the board harness and the game driver.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
    #[error("cell ({x}, {y}) has already been resolved")]
    AlreadyResolved { x: usize, y: usize },
    #[error("engine is no longer active")]
    Inactive,
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("malformed board description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid board description: {0}")]
    Invalid(String),
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("cell ({x}, {y}) was already probed")]
    AlreadyProbed { x: usize, y: usize },
    #[error("board is no longer active")]
    Inactive,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Board(#[from] BoardError),
}
