//! Simulation report generation and export.

use std::path::Path;

use serde::Serialize;

use super::config::SimConfig;
use super::game::GameResult;
use super::runner::BatchOutcome;
use super::statistics::{summarize, DrawDistribution, SummaryStatistics};

/// Results, statistics and inputs of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub config: SimConfig,
    pub total_games: u32,
    pub completed: u32,
    pub cancelled: bool,
    pub summary: SummaryStatistics,
    pub distribution: DrawDistribution,
    pub degraded_boards: u64,
    pub no_winner_games: usize,
    pub elapsed_ms: u64,
    pub results: Vec<GameResult>,
}

impl SimReport {
    pub fn new(config: SimConfig, outcome: BatchOutcome) -> Self {
        let summary = summarize(&outcome.results);
        let distribution = DrawDistribution::from_results(&outcome.results);
        let no_winner_games = outcome.no_winner_games();

        Self {
            config,
            total_games: outcome.total,
            completed: outcome.completed,
            cancelled: outcome.cancelled,
            summary,
            distribution,
            degraded_boards: outcome.degraded_boards,
            no_winner_games,
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            results: outcome.results,
        }
    }

    /// The last `n` results, most recent first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &GameResult> {
        self.results.iter().rev().take(n)
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();
        let s = &self.summary;

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                  BINGO SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        if self.cancelled {
            report.push_str(&format!(
                "Simulation stopped at {} of {} games\n\n",
                self.completed, self.total_games
            ));
        } else {
            report.push_str(&format!(
                "Simulation complete! {} games processed in {} ms\n\n",
                self.completed, self.elapsed_ms
            ));
        }

        report.push_str("── PARAMETERS ───────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Board Size:     {0}x{0}\n",
            self.config.board_size
        ));
        report.push_str(&format!("  Board Count:    {}\n", self.config.board_count));
        report.push_str(&format!(
            "  Number Range:   {}-{}\n",
            self.config.min_num, self.config.max_num
        ));
        report.push_str(&format!("  Win Type:       {}\n\n", self.config.win_condition));

        report.push_str("── DRAWS TO WIN ─────────────────────────────────────────────────\n");
        if s.is_empty() {
            report.push_str("  No simulation data\n\n");
        } else {
            report.push_str(&format!("  Games:          {}\n", s.count));
            report.push_str(&format!("  Average:        {:.2}\n", s.mean));
            report.push_str(&format!("  Median:         {:.1}\n", s.median));
            report.push_str(&format!("  Std Dev:        {:.2}\n", s.std_dev));
            report.push_str(&format!("  Min / Max:      {} / {}\n", s.min, s.max));
            report.push_str(&format!(
                "  P25 / P50 / P75 / P90: {} / {} / {} / {}\n\n",
                s.p25, s.p50, s.p75, s.p90
            ));

            report.push_str("── DISTRIBUTION ─────────────────────────────────────────────────\n");
            let peak = self.distribution.bins.iter().map(|b| b.games).max().unwrap_or(1).max(1);
            for bin in &self.distribution.bins {
                let bar_len = (bin.games as f64 / peak as f64 * 40.0).round() as usize;
                report.push_str(&format!(
                    "  {:4} {:6} {:>6.1}% {}\n",
                    bin.draws,
                    bin.games,
                    bin.cumulative_percent,
                    "█".repeat(bar_len)
                ));
            }
            report.push('\n');
        }

        if self.degraded_boards > 0 || self.no_winner_games > 0 {
            report.push_str("── WARNINGS ─────────────────────────────────────────────────────\n");
            if self.degraded_boards > 0 {
                report.push_str(&format!(
                    "  ⚠️  {} boards had duplicate numbers (range smaller than board)\n",
                    self.degraded_boards
                ));
            }
            if self.no_winner_games > 0 {
                report.push_str(&format!(
                    "  ⚠️  {} games ran out of numbers without a winner\n",
                    self.no_winner_games
                ));
            }
            report.push('\n');
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Export every game plus a summary block as CSV.
    ///
    /// Winning boards are 1-based; a game with no winner shows board `0` and type `none`.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Game,Draws to Win,Winning Board,Win Type\n");
        for r in &self.results {
            let board = r.winning_board_index.map(|i| i + 1).unwrap_or(0);
            let win_type = r.win_condition_matched.map(|p| p.as_str()).unwrap_or("none");
            csv.push_str(&format!("{},{},{},{}\n", r.game_index, r.draw_count, board, win_type));
        }

        let s = &self.summary;
        let c = &self.config;
        csv.push('\n');
        csv.push_str("Summary Statistics\n");
        csv.push_str(&format!("Total Games,{}\n", s.count));
        csv.push_str(&format!("Average Draws,{:.2}\n", s.mean));
        csv.push_str(&format!("Min Draws,{}\n", s.min));
        csv.push_str(&format!("Max Draws,{}\n", s.max));
        csv.push_str(&format!("Median Draws,{:.1}\n", s.median));
        csv.push_str(&format!("Std Dev,{:.2}\n", s.std_dev));
        csv.push_str(&format!("P25,{}\n", s.p25));
        csv.push_str(&format!("P50,{}\n", s.p50));
        csv.push_str(&format!("P75,{}\n", s.p75));
        csv.push_str(&format!("P90,{}\n", s.p90));
        csv.push_str(&format!("Board Size,{0}x{0}\n", c.board_size));
        csv.push_str(&format!("Board Count,{}\n", c.board_count));
        csv.push_str(&format!("Number Range,{}-{}\n", c.min_num, c.max_num));
        csv.push_str(&format!("Win Type,{}\n", c.win_condition));
        csv
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_csv())
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// `bingo_simulation_YYYY-MM-DD.csv` for today's date.
pub fn default_csv_filename() -> String {
    format!(
        "bingo_simulation_{}.csv",
        chrono::Local::now().format("%Y-%m-%d")
    )
}
