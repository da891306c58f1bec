//! Batch scheduling: runs many independent games with progress and cancellation.
//!
//! Games share no state, so a batch can run one game at a time or across a
//! rayon worker pool. Either way results come back ordered by game index and,
//! for a seeded run, identical between the two modes.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::{GameParams, SimConfig};
use super::error::ConfigError;
use super::game::{play_game_with_diagnostics, GameResult, PlayedGame};
use super::report::SimReport;

/// Cooperative stop request shared with a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop at the next check. Cannot be undone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Point-in-time progress of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: u32,
    pub total: u32,
}

impl BatchProgress {
    /// Rounded percentage complete, 0-100.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Default)]
struct ProgressCounters {
    completed: AtomicU32,
    total: AtomicU32,
}

/// Live progress counters, readable from any thread without blocking the batch.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<ProgressCounters>,
}

impl ProgressHandle {
    pub fn snapshot(&self) -> BatchProgress {
        BatchProgress {
            completed: self.inner.completed.load(Ordering::Relaxed),
            total: self.inner.total.load(Ordering::Relaxed),
        }
    }

    fn reset(&self, total: u32) {
        self.inner.total.store(total, Ordering::Relaxed);
        self.inner.completed.store(0, Ordering::Relaxed);
    }

    fn record_game(&self) {
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Everything a batch produced, complete or cut short.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Results for games `1..=completed`, in game-index order
    pub results: Vec<GameResult>,
    pub completed: u32,
    pub total: u32,
    /// True when the batch stopped on request before reaching `total`
    pub cancelled: bool,
    /// Boards that fell back to duplicate numbers
    pub degraded_boards: u64,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.completed == self.total
    }

    /// Games whose call order ran out without a winner.
    pub fn no_winner_games(&self) -> usize {
        self.results.iter().filter(|r| !r.has_winner()).count()
    }
}

/// Runs a validated configuration as a batch of independent games.
#[derive(Debug)]
pub struct BatchScheduler {
    config: SimConfig,
    cancel: CancelToken,
    progress: ProgressHandle,
}

impl BatchScheduler {
    /// Validate `config` up front; an invalid one never starts any work.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
            progress: ProgressHandle::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    pub fn run(&self) -> BatchOutcome {
        self.run_with_progress(|_| {})
    }

    /// Run the batch, calling `on_progress` after every `progress_interval`
    /// games and once more at the end if the last interval did not already
    /// report the final count.
    pub fn run_with_progress<F: FnMut(BatchProgress)>(&self, mut on_progress: F) -> BatchOutcome {
        let start = Instant::now();
        let total = self.config.total_games;
        self.progress.reset(total);

        info!(
            total,
            board_size = self.config.board_size,
            board_count = self.config.board_count,
            min_num = self.config.min_num,
            max_num = self.config.max_num,
            win_condition = %self.config.win_condition,
            parallel = self.config.parallel,
            "Starting simulation batch"
        );

        let mut last_reported = None;
        let mut report = |p: BatchProgress| {
            last_reported = Some(p.completed);
            on_progress(p);
        };
        let (mut played, cancelled) = if self.config.parallel {
            self.run_parallel(&mut report)
        } else {
            self.run_sequential(&mut report)
        };

        // Final ordering pass keeps output independent of scheduling
        played.sort_by_key(|p| p.result.game_index);

        let degraded_boards = played.iter().map(|p| p.degraded_boards as u64).sum();
        let results: Vec<GameResult> = played.into_iter().map(|p| p.result).collect();
        let completed = results.len() as u32;
        let elapsed = start.elapsed();

        let last = self.progress.snapshot();
        if last_reported != Some(last.completed) {
            on_progress(last);
        }

        if cancelled {
            info!(completed, total, "Simulation cancelled");
        } else {
            info!(
                completed,
                elapsed_ms = elapsed.as_millis() as u64,
                "Simulation complete"
            );
        }
        if degraded_boards > 0 {
            warn!(
                degraded_boards,
                "Number range too small for unique boards; duplicates were accepted"
            );
        }

        BatchOutcome {
            results,
            completed,
            total,
            cancelled,
            degraded_boards,
            elapsed,
        }
    }

    /// One game at a time; the token is checked before every game.
    fn run_sequential<F: FnMut(BatchProgress)>(&self, on_progress: &mut F) -> (Vec<PlayedGame>, bool) {
        let params = self.config.game_params();
        let interval = self.config.progress_interval;
        let mut played = Vec::with_capacity(self.config.total_games as usize);

        for index in 1..=self.config.total_games {
            if self.cancel.is_cancelled() {
                return (played, true);
            }
            played.push(self.play(&params, index));

            if index % interval == 0 {
                debug!(completed = index, "Progress");
                on_progress(self.progress.snapshot());
            }
        }
        (played, false)
    }

    /// Chunks of `progress_interval` games fanned out over the worker pool.
    /// The token is checked between chunks.
    fn run_parallel<F: FnMut(BatchProgress)>(&self, on_progress: &mut F) -> (Vec<PlayedGame>, bool) {
        let params = self.config.game_params();
        let total = self.config.total_games;
        let interval = self.config.progress_interval;
        let pool = self.config.threads.and_then(|n| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| warn!("Falling back to the global worker pool: {}", e))
                .ok()
        });

        let mut played = Vec::with_capacity(total as usize);
        let mut next = 1u32;
        while next <= total {
            if self.cancel.is_cancelled() {
                return (played, true);
            }
            let end = next.saturating_add(interval).min(total + 1);
            let run_chunk = || -> Vec<PlayedGame> {
                (next..end)
                    .into_par_iter()
                    .map(|index| self.play(&params, index))
                    .collect()
            };
            let chunk = match &pool {
                Some(pool) => pool.install(run_chunk),
                None => run_chunk(),
            };
            played.extend(chunk);
            next = end;

            debug!(completed = next - 1, "Progress");
            on_progress(self.progress.snapshot());
        }
        (played, false)
    }

    fn play(&self, params: &GameParams, index: u32) -> PlayedGame {
        let mut rng = game_rng(self.config.seed, index);
        let played = play_game_with_diagnostics(params, index, &mut rng);
        self.progress.record_game();
        played
    }
}

/// Independent RNG per game, so results don't depend on which worker ran it.
fn game_rng(seed: Option<u64>, index: u32) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Validate, run a full batch and build the report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport, ConfigError> {
    let scheduler = BatchScheduler::new(config.clone())?;
    let outcome = scheduler.run();
    Ok(SimReport::new(config.clone(), outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::win::WinCondition;

    fn seeded(total_games: u32, parallel: bool) -> SimConfig {
        SimConfig {
            total_games,
            seed: Some(42),
            parallel,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimConfig {
            min_num: 10,
            max_num: 1,
            ..Default::default()
        };
        assert!(BatchScheduler::new(config).is_err());
    }

    #[test]
    fn test_sequential_batch() {
        let outcome = BatchScheduler::new(seeded(200, false)).unwrap().run();
        assert!(outcome.is_complete());
        assert_eq!(outcome.completed, 200);
        let indices: Vec<u32> = outcome.results.iter().map(|r| r.game_index).collect();
        assert_eq!(indices, (1..=200).collect::<Vec<u32>>());
    }

    #[test]
    fn test_parallel_matches_sequential_with_seed() {
        let seq = BatchScheduler::new(seeded(300, false)).unwrap().run();
        let par = BatchScheduler::new(seeded(300, true)).unwrap().run();
        assert_eq!(seq.results, par.results);
    }

    #[test]
    fn test_explicit_thread_count() {
        let config = SimConfig {
            threads: Some(2),
            ..seeded(120, true)
        };
        let outcome = BatchScheduler::new(config).unwrap().run();
        assert_eq!(outcome.completed, 120);
    }

    #[test]
    fn test_progress_reported_per_interval() {
        let config = SimConfig {
            progress_interval: 25,
            ..seeded(100, false)
        };
        let scheduler = BatchScheduler::new(config).unwrap();
        let mut seen = Vec::new();
        scheduler.run_with_progress(|p| seen.push(p.completed));
        assert_eq!(seen, vec![25, 50, 75, 100]);

        let handle = scheduler.progress();
        assert_eq!(handle.snapshot(), BatchProgress { completed: 100, total: 100 });
        assert_eq!(handle.snapshot().percent(), 100);
    }

    #[test]
    fn test_final_progress_sent_for_partial_interval() {
        for parallel in [false, true] {
            let config = SimConfig {
                progress_interval: 40,
                ..seeded(100, parallel)
            };
            let mut seen = Vec::new();
            BatchScheduler::new(config)
                .unwrap()
                .run_with_progress(|p| seen.push(p.completed));
            assert_eq!(seen, vec![40, 80, 100], "parallel = {}", parallel);
        }

        let config = SimConfig {
            progress_interval: 25,
            ..seeded(100, true)
        };
        let mut seen = Vec::new();
        BatchScheduler::new(config)
            .unwrap()
            .run_with_progress(|p| seen.push(p.completed));
        assert_eq!(seen, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_cancel_before_start() {
        let scheduler = BatchScheduler::new(seeded(50, true)).unwrap();
        scheduler.cancel_token().cancel();
        let outcome = scheduler.run();
        assert!(outcome.cancelled);
        assert_eq!(outcome.completed, 0);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_cancel_in_parallel_stops_on_chunk_boundary() {
        let config = SimConfig {
            progress_interval: 10,
            ..seeded(1000, true)
        };
        let scheduler = BatchScheduler::new(config).unwrap();
        let token = scheduler.cancel_token();
        let outcome = scheduler.run_with_progress(|p| {
            if p.completed >= 30 {
                token.cancel();
            }
        });
        assert!(outcome.cancelled);
        assert_eq!(outcome.completed, 30);
        assert_eq!(outcome.results.last().map(|r| r.game_index), Some(30));
    }

    #[test]
    fn test_degraded_boards_counted() {
        let config = SimConfig {
            board_size: 5,
            board_count: 2,
            min_num: 1,
            max_num: 10,
            win_condition: WinCondition::Row,
            ..seeded(20, false)
        };
        let outcome = BatchScheduler::new(config).unwrap().run();
        assert_eq!(outcome.degraded_boards, 40);
        assert_eq!(outcome.no_winner_games(), 0);
    }

    #[test]
    fn test_run_simulation_builds_report() {
        let report = run_simulation(&seeded(50, true)).unwrap();
        assert_eq!(report.summary.count, 50);
        assert!(report.summary.mean > 0.0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(BatchProgress { completed: 1, total: 3 }.percent(), 33);
        assert_eq!(BatchProgress { completed: 0, total: 0 }.percent(), 0);
    }
}
