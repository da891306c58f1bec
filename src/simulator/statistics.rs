//! Summary statistics over draws-to-win.
//!
//! Everything here is computed over `draw_count` alone and recomputed from
//! scratch on each call.

use serde::{Deserialize, Serialize};

use super::game::GameResult;

/// Aggregate view of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of games summarised. Zero means "no data" and every other field is zero.
    pub count: usize,
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub p25: u32,
    pub p50: u32,
    pub p75: u32,
    pub p90: u32,
}

impl SummaryStatistics {
    /// Sentinel returned for an empty result set.
    pub fn no_data() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Summarise the draw counts of `results`.
pub fn summarize(results: &[GameResult]) -> SummaryStatistics {
    let draws: Vec<u32> = results.iter().map(|r| r.draw_count).collect();
    summarize_draws(&draws)
}

/// Summarise raw draw counts.
pub fn summarize_draws(draws: &[u32]) -> SummaryStatistics {
    if draws.is_empty() {
        return SummaryStatistics::no_data();
    }

    let count = draws.len();
    let mean = draws.iter().map(|&d| d as f64).sum::<f64>() / count as f64;
    let variance = draws
        .iter()
        .map(|&d| (d as f64 - mean).powi(2))
        .sum::<f64>()
        / count as f64;

    let mut sorted = draws.to_vec();
    sorted.sort_unstable();

    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] as f64 + sorted[count / 2] as f64) / 2.0
    } else {
        sorted[count / 2] as f64
    };

    SummaryStatistics {
        count,
        mean,
        min: sorted[0],
        max: sorted[count - 1],
        median,
        std_dev: variance.sqrt(),
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
    }
}

/// Nearest-rank percentile of ascending `sorted` data. Zero for empty input.
pub fn percentile(sorted: &[u32], p: f64) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// Games that finished after exactly `draws` draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionBin {
    pub draws: u32,
    pub games: u32,
    /// Share of games finished within `draws` draws, 0-100
    pub cumulative_percent: f64,
}

/// Histogram of draws-to-win with one bin per draw count from min to max.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawDistribution {
    pub bins: Vec<DistributionBin>,
}

impl DrawDistribution {
    pub fn from_results(results: &[GameResult]) -> Self {
        let (Some(min), Some(max)) = (
            results.iter().map(|r| r.draw_count).min(),
            results.iter().map(|r| r.draw_count).max(),
        ) else {
            return Self::default();
        };

        let mut counts = vec![0u32; (max - min + 1) as usize];
        for r in results {
            counts[(r.draw_count - min) as usize] += 1;
        }

        let total = results.len() as f64;
        let mut running = 0u32;
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, games)| {
                running += games;
                DistributionBin {
                    draws: min + i as u32,
                    games,
                    cumulative_percent: running as f64 / total * 100.0,
                }
            })
            .collect();

        Self { bins }
    }

    /// Draw count with the most games (the earliest one on ties).
    pub fn mode(&self) -> Option<u32> {
        self.bins
            .iter()
            .fold(None, |best: Option<&DistributionBin>, bin| match best {
                Some(b) if b.games >= bin.games => Some(b),
                _ => Some(bin),
            })
            .map(|b| b.draws)
    }

    /// Probability (0-100) that a game is won within `draws` draws.
    pub fn cumulative_at(&self, draws: u32) -> f64 {
        match self.bins.iter().rev().find(|b| b.draws <= draws) {
            Some(bin) => bin.cumulative_percent,
            None => 0.0,
        }
    }
}
