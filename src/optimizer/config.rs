//! Configuration and statistics for the opponents optimizer.
//!
//! [`OptimizerConfig`] tunes the search: which score to minimize, the
//! constants of the zero-meeting term, seeding and threading.

use serde::{Deserialize, Serialize};

/// Objective the local search minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFunction {
    /// Sum of per-player penalties only.
    Legacy,

    /// Per-player penalties plus a term pulling the number of players with
    /// exactly one never-met opponent towards `expected_zero_players`.
    #[default]
    ZeroBalanced,
}

/// Configuration for the opponents optimizer.
///
/// # Example
/// ```
/// use seating_optimizer::optimizer::{OptimizerConfig, ScoreFunction};
///
/// let config = OptimizerConfig::default().with_seed(7);
/// assert_eq!(config.score_function, ScoreFunction::ZeroBalanced);
/// assert_eq!(config.expected_zero_players, 12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Objective to minimize.
    pub score_function: ScoreFunction,

    /// Target number of players with exactly one never-met opponent.
    ///
    /// Twelve fits the reference table and round geometry.
    pub expected_zero_players: usize,

    /// Weight of the squared miss on `expected_zero_players`.
    pub zero_penalty_weight: f64,

    /// Iterations between progress reports.
    pub log_interval: u64,

    /// Threads for [`crate::optimizer::OptimizeOpponents::optimize_parallel`].
    ///
    /// `None` uses rayon's global pool.
    pub num_threads: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// Run `k` draws from `seed + k`, so sequential and parallel optimization
    /// give the same result. `None` seeds every run from entropy.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            score_function: ScoreFunction::ZeroBalanced,
            expected_zero_players: 12,
            zero_penalty_weight: 100.0,
            log_interval: 1000,
            num_threads: None,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Create a new OptimizerConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that minimizes the legacy score.
    pub fn legacy() -> Self {
        Self {
            score_function: ScoreFunction::Legacy,
            ..Default::default()
        }
    }

    /// Builder method: set the objective.
    pub fn with_score_function(mut self, score_function: ScoreFunction) -> Self {
        self.score_function = score_function;
        self
    }

    /// Builder method: set the expected number of zero players.
    pub fn with_expected_zero_players(mut self, expected: usize) -> Self {
        self.expected_zero_players = expected;
        self
    }

    /// Builder method: set the zero-penalty weight.
    pub fn with_zero_penalty_weight(mut self, weight: f64) -> Self {
        self.zero_penalty_weight = weight;
        self
    }

    /// Builder method: set the progress interval (at least 1).
    pub fn with_log_interval(mut self, interval: u64) -> Self {
        self.log_interval = interval.max(1);
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Statistics of one optimization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Zero-based run index.
    pub run: usize,
    /// Score of the initial schedule.
    pub initial_score: f64,
    /// Score after the last iteration; the lowest score of the run.
    pub final_score: f64,
    /// Iterations performed.
    pub iterations: u64,
    /// Swaps that improved the score and were kept.
    pub accepted: u64,
    /// Swaps that were tried and reverted.
    pub rejected: u64,
    /// Iterations that found nobody to swap.
    pub infeasible: u64,
    /// Wall-clock time of the run in seconds.
    pub elapsed_seconds: f64,
}

impl RunStats {
    /// Fraction of iterations that improved the schedule.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }
}

/// Statistics over all runs of one `optimize` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeStats {
    /// Per-run statistics in run order.
    pub runs: Vec<RunStats>,
    /// Index of the winning run.
    pub best_run: Option<usize>,
    /// Score of the winning run.
    pub best_score: Option<f64>,
    /// Total time spent in seconds.
    pub elapsed_seconds: f64,
}

impl OptimizeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = OptimizerConfig::new()
            .with_seed(3)
            .with_threads(2)
            .with_expected_zero_players(6)
            .with_zero_penalty_weight(10.0)
            .with_log_interval(0);

        assert_eq!(config.seed, Some(3));
        assert_eq!(config.num_threads, Some(2));
        assert_eq!(config.expected_zero_players, 6);
        assert_eq!(config.zero_penalty_weight, 10.0);
        assert_eq!(config.log_interval, 1);
        assert_eq!(OptimizerConfig::legacy().score_function, ScoreFunction::Legacy);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = OptimizerConfig::default().with_seed(11);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"zero_balanced\""));

        let parsed: OptimizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.seed, Some(11));
        assert_eq!(parsed.score_function, ScoreFunction::ZeroBalanced);
    }

    #[test]
    fn test_acceptance_rate() {
        let stats = RunStats {
            iterations: 200,
            accepted: 50,
            ..Default::default()
        };
        assert!((stats.acceptance_rate() - 0.25).abs() < 1e-12);
        assert_eq!(RunStats::default().acceptance_rate(), 0.0);
    }
}
