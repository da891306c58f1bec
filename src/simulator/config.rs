//! Simulation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::win::WinCondition;
use crate::constants::{
    DEFAULT_BOARD_COUNT, DEFAULT_BOARD_SIZE, DEFAULT_MAX_NUM, DEFAULT_MIN_NUM,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_TOTAL_GAMES, MAX_BOARD_COUNT, MAX_BOARD_SIZE,
    MAX_RANGE_SIZE, MAX_TOTAL_GAMES,
};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of each board
    pub board_size: usize,

    /// Number of boards in play per game
    pub board_count: usize,

    /// Lowest callable number (inclusive)
    pub min_num: i32,

    /// Highest callable number (inclusive)
    pub max_num: i32,

    /// Number of games to simulate
    pub total_games: u32,

    /// Pattern that ends a game
    pub win_condition: WinCondition,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Games between progress reports and cancellation checks
    pub progress_interval: u32,

    /// Run games across a worker pool instead of one at a time
    pub parallel: bool,

    /// Worker threads for parallel runs (None = one per core)
    pub threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            board_count: DEFAULT_BOARD_COUNT,
            min_num: DEFAULT_MIN_NUM,
            max_num: DEFAULT_MAX_NUM,
            total_games: DEFAULT_TOTAL_GAMES,
            win_condition: WinCondition::Any,
            seed: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            parallel: true,
            threads: None,
        }
    }
}

impl SimConfig {
    /// 75-ball hall game: 5x5 boards, numbers 1-75, any line wins.
    pub fn classic(board_count: usize) -> Self {
        Self {
            board_count,
            ..Default::default()
        }
    }

    /// Small sequential run, handy for smoke tests.
    pub fn quick(total_games: u32) -> Self {
        Self {
            total_games,
            parallel: false,
            ..Default::default()
        }
    }

    /// Load a run description from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 1 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if self.board_count < 1 || self.board_count > MAX_BOARD_COUNT {
            return Err(ConfigError::BoardCount(self.board_count));
        }
        if self.min_num >= self.max_num {
            return Err(ConfigError::NumberRange {
                min: self.min_num,
                max: self.max_num,
            });
        }
        if self.range_size() > MAX_RANGE_SIZE {
            return Err(ConfigError::RangeTooWide {
                got: self.range_size(),
            });
        }
        if self.total_games < 1 || self.total_games > MAX_TOTAL_GAMES {
            return Err(ConfigError::TotalGames {
                got: self.total_games,
            });
        }
        if self.progress_interval < 1 {
            return Err(ConfigError::ProgressInterval);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Threads);
        }
        Ok(())
    }

    /// Count of distinct callable numbers.
    pub fn range_size(&self) -> usize {
        (self.max_num as i64 - self.min_num as i64 + 1).max(0) as usize
    }

    /// Per-game parameters handed to the game runner.
    pub fn game_params(&self) -> GameParams {
        GameParams {
            board_size: self.board_size,
            board_count: self.board_count,
            min_num: self.min_num,
            max_num: self.max_num,
            win_condition: self.win_condition,
        }
    }
}

/// The subset of a run's configuration that shapes a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameParams {
    pub board_size: usize,
    pub board_count: usize,
    pub min_num: i32,
    pub max_num: i32,
    pub win_condition: WinCondition,
}
