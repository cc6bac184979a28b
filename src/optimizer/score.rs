//! Objective function of the opponents search.
//!
//! [`score_schedule`] evaluates a schedule from scratch through [`Metrics`].
//! [`ScoreTracker`] keeps the opponents matrix and per-player penalties alive
//! between moves and only touches the rows a swap affects. Both combine the
//! per-player terms the same way, so they agree to the bit.

use rustc_hash::FxHashSet;

use crate::metrics::{row_penalty, row_zero_count, Metrics, OpponentsMatrix};
use crate::optimizer::config::{OptimizerConfig, ScoreFunction};
use crate::schedule::{PlayerId, Schedule};

/// Score a schedule from scratch. Lower is better.
pub fn score_schedule(schedule: &Schedule, config: &OptimizerConfig) -> f64 {
    let metrics = Metrics::new(schedule);
    let players = 0..schedule.num_players();

    let penalties = players.clone().map(|p| metrics.penalty_player(p));
    let zero_players = players
        .filter(|&p| metrics.calc_player_pairs_histogram(p).get(&0) == Some(&1))
        .count();

    combine(penalties, zero_players, config)
}

/// Penalty for missing the expected number of zero players.
pub fn zero_penalty(zero_players: usize, config: &OptimizerConfig) -> f64 {
    let miss = zero_players as f64 - config.expected_zero_players as f64;
    config.zero_penalty_weight * miss * miss
}

fn combine(
    penalties: impl Iterator<Item = f64>,
    zero_players: usize,
    config: &OptimizerConfig,
) -> f64 {
    let mut base = 0.0;
    for penalty in penalties {
        base += penalty;
    }

    match config.score_function {
        ScoreFunction::Legacy => base,
        ScoreFunction::ZeroBalanced => base + zero_penalty(zero_players, config),
    }
}

/// Incrementally maintained score of a schedule in slot form.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    matrix: OpponentsMatrix,
    target: f64,
    penalties: Vec<f64>,
    single_zero: Vec<bool>,
    config: OptimizerConfig,
}

impl ScoreTracker {
    /// Build the tracker from the schedule's current player sets.
    pub fn new(schedule: &Schedule, config: &OptimizerConfig) -> Self {
        let matrix = OpponentsMatrix::from_game_sets(schedule.num_players(), &schedule.game_sets());
        let size = matrix.size();

        let mut tracker = Self {
            matrix,
            target: schedule.configuration.ideal_opponent_meetings(),
            penalties: vec![0.0; size],
            single_zero: vec![false; size],
            config: config.clone(),
        };
        for player in 0..size {
            tracker.refresh(player);
        }
        tracker
    }

    /// Current score.
    pub fn score(&self) -> f64 {
        combine(
            self.penalties.iter().copied(),
            self.zero_players(),
            &self.config,
        )
    }

    /// Players with exactly one opponent they never met.
    pub fn zero_players(&self) -> usize {
        self.single_zero.iter().filter(|&&z| z).count()
    }

    /// The maintained opponents matrix.
    pub fn matrix(&self) -> &OpponentsMatrix {
        &self.matrix
    }

    /// Account for `player_one` leaving `one` for `two` and `player_two` going
    /// the other way. `one` and `two` are the player sets before the swap.
    pub fn swap(
        &mut self,
        one: &FxHashSet<PlayerId>,
        two: &FxHashSet<PlayerId>,
        player_one: PlayerId,
        player_two: PlayerId,
    ) {
        self.transfer(one, two, player_one, player_two, true);
    }

    /// Exactly undo a [`ScoreTracker::swap`] made with the same arguments.
    pub fn unswap(
        &mut self,
        one: &FxHashSet<PlayerId>,
        two: &FxHashSet<PlayerId>,
        player_one: PlayerId,
        player_two: PlayerId,
    ) {
        self.transfer(one, two, player_one, player_two, false);
    }

    fn transfer(
        &mut self,
        one: &FxHashSet<PlayerId>,
        two: &FxHashSet<PlayerId>,
        player_one: PlayerId,
        player_two: PlayerId,
        forward: bool,
    ) {
        for &p in one.iter().filter(|&&p| p != player_one) {
            if forward {
                self.matrix.decrement(player_one, p);
                self.matrix.increment(player_two, p);
            } else {
                self.matrix.increment(player_one, p);
                self.matrix.decrement(player_two, p);
            }
        }
        for &q in two.iter().filter(|&&q| q != player_two) {
            if forward {
                self.matrix.decrement(player_two, q);
                self.matrix.increment(player_one, q);
            } else {
                self.matrix.increment(player_two, q);
                self.matrix.decrement(player_one, q);
            }
        }

        self.refresh(player_one);
        self.refresh(player_two);
        for &p in one.iter().chain(two.iter()) {
            self.refresh(p);
        }
    }

    fn refresh(&mut self, player: PlayerId) {
        if player >= self.matrix.size() {
            return;
        }
        let row = self.matrix.row(player);
        self.penalties[player] = row_penalty(row, self.target, player);
        self.single_zero[player] = row_zero_count(row, player) == 1;
    }
}
