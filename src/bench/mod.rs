// src/bench/mod.rs

//! Benchmark driver.
//!
//! Replays the principal variation and searches every position on it, from the final
//! position back to the initial one, with a fresh table and fresh counters each time.

use crate::config::{BenchConfig, ConfigError};
use crate::game::board::Board;
use crate::game::search::tt::{TableError, TranspositionTables};
use crate::game::search::{SearchAlgorithm, SearchStats, Searcher};
use crate::game::Color;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;
use sysinfo::System;
use tracing::{debug, info, warn};

/// Outcome of searching one position of the variation.
#[derive(Clone, Debug, Serialize)]
pub struct PlyReport {
    /// 1-based number of the position along the variation.
    pub ply: usize,
    pub color: Color,
    /// Value for the side to move. `None` when the table ran out during the search.
    pub value: Option<i32>,
    pub black_value: Option<i32>,
    #[serde(flatten)]
    pub stats: SearchStats,
    pub seconds: f64,
    pub nodes_per_second: f64,
    pub tt_sizes: [usize; 2],
    pub table_exhausted: bool,
}

impl fmt::Display for PlyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = |v: Option<i32>| v.map_or_else(|| "n/a".to_string(), |v| v.to_string());
        write!(
            f,
            concat!(
                "{:>2}. {} moves: value={:>6} (black {:>4}), ",
                "#expanded={:>9}, #generated={:>9}, ",
                "seconds={:.6}, #generated/second={:>10.0}",
            ),
            self.ply,
            self.color,
            value(self.value),
            value(self.black_value),
            self.stats.expanded,
            self.stats.generated,
            self.seconds,
            self.nodes_per_second,
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchSummary {
    pub algorithm: SearchAlgorithm,
    /// Command-line number of the algorithm.
    pub selector: u8,
    pub use_tt: bool,
    pub depth: u32,
    pub pv_length: usize,
    pub reports: Vec<PlyReport>,
    /// Ply at which the table ran out and caching was switched off.
    pub tt_disabled_at: Option<usize>,
}

impl BenchSummary {
    pub fn total_generated(&self) -> u64 {
        self.reports.iter().map(|r| r.stats.generated).sum()
    }

    pub fn total_seconds(&self) -> f64 {
        self.reports.iter().map(|r| r.seconds).sum()
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

pub struct BenchRunner {
    config: BenchConfig,
    positions: Vec<Board>,
    tables: TranspositionTables<Board>,
    use_tt: bool,
}

impl BenchRunner {
    pub fn new(config: BenchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let positions = config.pv_positions()?;
        Ok(Self {
            tables: TranspositionTables::with_limit(config.tt_capacity),
            use_tt: config.use_tt,
            positions,
            config,
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Whether the next search will use the table.
    pub fn use_tt(&self) -> bool {
        self.use_tt
    }

    #[cfg(test)]
    pub fn tables(&self) -> &TranspositionTables<Board> {
        &self.tables
    }

    /// Searches the selected positions, calling `on_report` as each one finishes.
    pub fn run<F: FnMut(&PlyReport)>(&mut self, mut on_report: F) -> BenchSummary {
        let total = self.positions.len();
        let count = self.config.positions.map_or(total, |n| n.min(total));

        info!(
            algorithm = %self.config.algorithm,
            use_tt = self.use_tt,
            depth = self.config.depth,
            positions = count,
            "moving along the principal variation"
        );

        let mut summary = BenchSummary {
            algorithm: self.config.algorithm,
            selector: self.config.algorithm.selector(),
            use_tt: self.use_tt,
            depth: self.config.depth,
            pv_length: total - 1,
            reports: Vec::with_capacity(count),
            tt_disabled_at: None,
        };

        for plies in (total - count..total).rev() {
            let report = self.search_position(plies);
            if report.table_exhausted {
                summary.tt_disabled_at = Some(report.ply);
            }
            on_report(&report);
            summary.reports.push(report);
        }

        info!(
            generated = summary.total_generated(),
            seconds = summary.total_seconds(),
            "benchmark finished"
        );
        summary
    }

    /// Searches the position reached after `plies` plies.
    fn search_position(&mut self, plies: usize) -> PlyReport {
        let pos = self.positions[plies];
        let color = Color::after_plies(plies);
        let ply = plies + 1;

        self.tables.clear();
        let started = Instant::now();
        let (outcome, stats) = if self.use_tt {
            let threshold = self.config.tt_threshold;
            let mut searcher = Searcher::with_tables(&mut self.tables, threshold);
            let outcome = searcher.run(
                self.config.algorithm,
                &pos,
                self.config.depth,
                color,
                self.config.window,
            );
            (outcome, searcher.stats)
        } else {
            let mut searcher = Searcher::new();
            let outcome = searcher.run(
                self.config.algorithm,
                &pos,
                self.config.depth,
                color,
                self.config.window,
            );
            (outcome, searcher.stats)
        };
        let elapsed = started.elapsed();
        let tt_sizes = self.tables.sizes();

        let value = match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                self.recover_from_exhaustion(ply, &err);
                None
            }
        };

        if !self.tables.is_empty() {
            debug!(ply, black = tt_sizes[0], white = tt_sizes[1], "table sizes");
        }

        PlyReport {
            ply,
            color,
            value,
            black_value: value.map(|v| color.sign() * v),
            stats,
            seconds: elapsed.as_secs_f64(),
            nodes_per_second: stats.nodes_per_second(elapsed),
            tt_sizes,
            table_exhausted: value.is_none(),
        }
    }

    fn recover_from_exhaustion(&mut self, ply: usize, err: &TableError) {
        let mut sys = System::new();
        sys.refresh_memory();
        for color in [Color::Black, Color::White] {
            let slot = self.tables.slot(color);
            warn!(
                ply,
                slot = %color,
                size = slot.len(),
                capacity = slot.capacity(),
                "transposition table state"
            );
        }
        warn!(
            ply,
            used_memory = sys.used_memory(),
            total_memory = sys.total_memory(),
            "{err}; continuing without transposition table"
        );
        self.use_tt = false;
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::search::Window;
    use tempfile::tempdir;

    fn config(algorithm: SearchAlgorithm, use_tt: bool, positions: usize) -> BenchConfig {
        BenchConfig {
            algorithm,
            use_tt,
            positions: Some(positions),
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_runs_backwards_from_the_final_position() {
        let mut runner = BenchRunner::new(config(SearchAlgorithm::Negamax, false, 5)).unwrap();
        let mut seen = Vec::new();
        let summary = runner.run(|report| seen.push(report.ply));

        assert_eq!(seen, vec![62, 61, 60, 59, 58]);
        assert_eq!(summary.pv_length, 61);
        let colors: Vec<Color> = summary.reports.iter().map(|r| r.color).collect();
        assert_eq!(
            colors,
            vec![Color::White, Color::Black, Color::White, Color::Black, Color::White]
        );
        // The game ends 28 discs up for Black whichever side is asked.
        for report in &summary.reports {
            assert_eq!(report.black_value, Some(28));
            assert!(!report.table_exhausted);
        }
        assert_eq!(summary.reports[0].value, Some(-28));
        assert_eq!(summary.reports[0].stats.generated, 1);
    }

    #[test]
    fn test_positions_limit_is_capped_by_variation_length() {
        let mut runner = BenchRunner::new(BenchConfig {
            depth: 1,
            positions: Some(500),
            ..BenchConfig::default()
        })
        .unwrap();
        let summary = runner.run(|_| {});
        assert_eq!(summary.reports.len(), 62);
        assert_eq!(summary.reports.last().unwrap().ply, 1);
        assert_eq!(summary.reports.last().unwrap().value, Some(3));
    }

    #[test]
    fn test_table_is_cleared_before_each_position() {
        let mut runner = BenchRunner::new(BenchConfig {
            tt_threshold: 0,
            ..config(SearchAlgorithm::AlphaBeta, true, 8)
        })
        .unwrap();
        let summary = runner.run(|_| {});
        let positions = BenchConfig::default().pv_positions().unwrap();

        for report in &summary.reports {
            let plies = report.ply - 1;
            let mut tables = TranspositionTables::new();
            let mut searcher = Searcher::with_tables(&mut tables, 0);
            let value = searcher
                .alpha_beta(&positions[plies], 33, -200, 200, report.color)
                .unwrap();
            assert_eq!(report.value, Some(value));
            assert_eq!(report.tt_sizes, tables.sizes());
        }
    }

    #[test]
    fn test_exhausted_table_disables_caching_and_continues() {
        let mut runner = BenchRunner::new(BenchConfig {
            tt_threshold: 0,
            tt_capacity: Some(1),
            ..config(SearchAlgorithm::Negamax, true, 8)
        })
        .unwrap();
        let summary = runner.run(|_| {});

        let exhausted: Vec<usize> = summary
            .reports
            .iter()
            .filter(|r| r.table_exhausted)
            .map(|r| r.ply)
            .collect();
        assert_eq!(exhausted, vec![59]);
        assert_eq!(summary.tt_disabled_at, Some(59));
        assert!(!runner.use_tt());
        assert_eq!(runner.tables().sizes(), [0, 0]);

        let failed = &summary.reports[3];
        assert_eq!(failed.value, None);
        assert_eq!(failed.black_value, None);
        assert!(failed.to_string().contains("value=   n/a"));

        // Positions searched after the failure still get values, with an empty table.
        for report in &summary.reports[4..] {
            assert!(report.value.is_some());
            assert_eq!(report.tt_sizes, [0, 0]);
        }
        assert_eq!(summary.reports[7].black_value, Some(42));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_searching() {
        let result = BenchRunner::new(BenchConfig {
            window: Window::new(10, -10),
            ..BenchConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidWindow { .. })));

        let unbounded = BenchRunner::new(BenchConfig {
            algorithm: SearchAlgorithm::AlphaBeta,
            window: Window::new(i32::MIN, 200),
            ..BenchConfig::default()
        });
        assert!(matches!(unbounded, Err(ConfigError::InvalidWindow { .. })));
    }

    #[test]
    fn test_report_line() {
        let report = PlyReport {
            ply: 7,
            color: Color::White,
            value: Some(-4),
            black_value: Some(4),
            stats: SearchStats {
                expanded: 10,
                generated: 30,
            },
            seconds: 0.5,
            nodes_per_second: 60.0,
            tt_sizes: [0, 0],
            table_exhausted: false,
        };
        assert_eq!(
            report.to_string(),
            concat!(
                " 7. White moves: value=    -4 (black    4), ",
                "#expanded=       10, #generated=       30, ",
                "seconds=0.500000, #generated/second=        60",
            )
        );
    }

    #[test]
    fn test_summary_json() {
        let mut runner = BenchRunner::new(config(SearchAlgorithm::Scout, false, 3)).unwrap();
        let summary = runner.run(|_| {});
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        summary.save_json(&path).unwrap();

        let text = fs::read_to_string(path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["algorithm"], "Scout");
        assert_eq!(json["selector"], 3);
        assert_eq!(json["reports"].as_array().unwrap().len(), 3);
        assert_eq!(json["reports"][0]["ply"], 62);
        assert_eq!(json["reports"][0]["generated"], 1);
        assert!(json["tt_disabled_at"].is_null());
    }
}
