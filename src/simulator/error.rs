//! Rejections raised before any simulation work starts.

use thiserror::Error;

use crate::constants::{MAX_BOARD_COUNT, MAX_BOARD_SIZE, MAX_RANGE_SIZE, MAX_TOTAL_GAMES};

/// Invalid run configuration. Nothing is simulated when one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board size must be between 1 and {max} (got {0})", max = MAX_BOARD_SIZE)]
    BoardSize(usize),

    #[error("board count must be between 1 and {max} (got {0})", max = MAX_BOARD_COUNT)]
    BoardCount(usize),

    #[error("min number must be less than max number (got {min}..={max})")]
    NumberRange { min: i32, max: i32 },

    #[error("number range may span at most {max} values (got {got})", max = MAX_RANGE_SIZE)]
    RangeTooWide { got: usize },

    #[error("total games must be between 1 and {max} (got {got})", max = MAX_TOTAL_GAMES)]
    TotalGames { got: u32 },

    #[error("progress interval must be at least 1")]
    ProgressInterval,

    #[error("thread count must be at least 1")]
    Threads,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
