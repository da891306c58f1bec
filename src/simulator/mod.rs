//! Monte Carlo bingo simulator.
//!
//! Plays thousands of independent games to estimate how many draws it takes
//! before some board wins, for a given board size, board count, number range
//! and win condition.
//!
//! - `board`: random board generation
//! - `draw`: per-game call order
//! - `win`: win detection
//! - `game`: one full game
//! - `runner`: batches with progress and cancellation
//! - `statistics`: summary statistics and distribution
//! - `report`: text, CSV and JSON output

pub mod board;
mod config;
pub mod draw;
mod error;
pub mod game;
mod report;
mod runner;
pub mod statistics;
pub mod win;

pub use board::{generate_board, Board, Cell};
pub use config::{GameParams, SimConfig};
pub use draw::DrawSequence;
pub use error::ConfigError;
pub use game::{play_game, play_out, GameResult};
pub use report::{default_csv_filename, SimReport};
pub use runner::{
    run_simulation, BatchOutcome, BatchProgress, BatchScheduler, CancelToken, ProgressHandle,
};
pub use statistics::{summarize, DistributionBin, DrawDistribution, SummaryStatistics};
pub use win::{evaluate, WinCondition, WinPattern};
