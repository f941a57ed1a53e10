use std::fmt;

use gridstar_core::Point;
use gridstar_heap::HeapError;
use thiserror::Error;

use crate::config::ConfigError;

/// Why a start or goal position was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The cell does not exist in the grid.
    OutOfBounds,
    /// The cell exists but is a wall.
    Blocked,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("out of bounds"),
            Self::Blocked => f.write_str("blocked"),
        }
    }
}

/// Errors returned by [`AStar`](crate::AStar).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Start or goal is outside the grid or on a blocked cell.
    #[error("invalid position {pos}: {reason}")]
    InvalidPosition { pos: Point, reason: InvalidReason },
    /// The open set was popped while empty.
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error("invalid search config: {0}")]
    Config(#[from] ConfigError),
}
