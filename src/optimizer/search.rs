//! Randomized local search over player swaps.
//!
//! Each run builds a fresh schedule, puts it into slot form and repeatedly
//! proposes swapping two players between two games. A swap is kept only if
//! it strictly lowers the score; otherwise it is undone exactly. Runs are
//! independent, and the run with the lowest final score wins.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::optimizer::config::{OptimizeStats, OptimizerConfig, RunStats};
use crate::optimizer::score::ScoreTracker;
use crate::participants::Participants;
use crate::schedule::{
    Configuration, GameId, PlayerId, RoundId, Schedule, ScheduleError, ScheduleFactory,
};

/// What a single search step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The swap improved the score and was kept.
    Accepted,
    /// The swap did not improve the score and was undone.
    Rejected,
    /// No pair of players could be swapped.
    Infeasible,
}

/// Progress report handed to callbacks.
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Zero-based run index.
    pub run: usize,
    /// Iterations completed in this run.
    pub iteration: u64,
    /// Iteration budget of this run.
    pub total_iterations: u64,
    /// Current score.
    pub score: f64,
    /// Accepted swaps so far.
    pub accepted: u64,
    /// Elapsed time of this run in seconds.
    pub elapsed_seconds: f64,
}

/// Best schedule found by an optimization.
#[derive(Debug, Clone)]
pub struct OptimizedSchedule {
    /// The schedule, back in game form.
    pub schedule: Schedule,
    /// Its score.
    pub score: f64,
    /// Index of the run that produced it.
    pub run: usize,
}

/// State of one optimization run.
///
/// Owns its schedule, score tracker and random generator; nothing is shared
/// with other runs.
pub struct SearchRun {
    schedule: Schedule,
    tracker: ScoreTracker,
    score: f64,
    rng: StdRng,
    single_table: bool,
    movable_rounds: Vec<RoundId>,
    stats: RunStats,
}

impl SearchRun {
    /// Start a run from the given schedule, switching it to slot form.
    pub fn new(mut schedule: Schedule, config: &OptimizerConfig, rng: StdRng, run: usize) -> Self {
        if !schedule.is_slot_form() {
            schedule.generate_slots_from_games();
        }

        let tracker = ScoreTracker::new(&schedule, config);
        let score = tracker.score();

        let single_table = schedule.configuration.num_tables == 1;
        let min_games = if single_table { 1 } else { 2 };
        let movable_rounds = schedule
            .rounds
            .iter()
            .enumerate()
            .filter(|(_, round)| round.game_ids.len() >= min_games)
            .map(|(idx, _)| idx)
            .collect();

        Self {
            schedule,
            tracker,
            score,
            rng,
            single_table,
            movable_rounds,
            stats: RunStats {
                run,
                initial_score: score,
                final_score: score,
                ..Default::default()
            },
        }
    }

    /// Current score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The schedule being optimized, in slot form.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Statistics so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Rounds a search step may draw from.
    pub fn movable_rounds(&self) -> &[RoundId] {
        &self.movable_rounds
    }

    /// Run `num_iterations` search steps.
    ///
    /// `callback` is called every `log_interval` iterations and once at the end.
    pub fn run<F>(&mut self, num_iterations: u64, log_interval: u64, mut callback: F)
    where
        F: FnMut(&RunProgress),
    {
        let start_time = Instant::now();
        let log_interval = log_interval.max(1);

        for i in 0..num_iterations {
            self.random_opponent_change();

            if (i + 1) % log_interval == 0 && i + 1 < num_iterations {
                let progress = self.progress(num_iterations, start_time);
                debug!(
                    run = progress.run,
                    iteration = progress.iteration,
                    accepted = progress.accepted,
                    score = progress.score,
                    "optimization progress"
                );
                callback(&progress);
            }
        }

        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        callback(&self.progress(num_iterations, start_time));
    }

    fn progress(&self, total_iterations: u64, start_time: Instant) -> RunProgress {
        RunProgress {
            run: self.stats.run,
            iteration: self.stats.iterations,
            total_iterations,
            score: self.score,
            accepted: self.stats.accepted,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        }
    }

    /// One search step: propose a random swap and keep it only if it helps.
    ///
    /// With a single table every round has one game, so players move between
    /// two rounds. Otherwise they move between two games of the same round.
    pub fn random_opponent_change(&mut self) -> MoveOutcome {
        self.stats.iterations += 1;

        let outcome = if self.single_table {
            match self.pick_two(self.movable_rounds.len()) {
                Some((i, j)) => {
                    let (one, two) = (self.movable_rounds[i], self.movable_rounds[j]);
                    self.swap_in_rounds(one, two)
                }
                None => MoveOutcome::Infeasible,
            }
        } else if self.movable_rounds.is_empty() {
            MoveOutcome::Infeasible
        } else {
            let round = self.movable_rounds[self.rng.gen_range(0..self.movable_rounds.len())];
            let num_games = self.schedule.rounds[round].game_ids.len();
            match self.pick_two(num_games) {
                Some((i, j)) => {
                    let game_ids = &self.schedule.rounds[round].game_ids;
                    let (one, two) = (game_ids[i], game_ids[j]);
                    self.swap_in_games(one, two)
                }
                None => MoveOutcome::Infeasible,
            }
        };

        match outcome {
            MoveOutcome::Accepted => self.stats.accepted += 1,
            MoveOutcome::Rejected => self.stats.rejected += 1,
            MoveOutcome::Infeasible => self.stats.infeasible += 1,
        }
        self.stats.final_score = self.score;
        outcome
    }

    /// Swap players between the single games of two rounds.
    pub fn swap_in_rounds(&mut self, round_one: RoundId, round_two: RoundId) -> MoveOutcome {
        let first_game = |round: RoundId| {
            self.schedule
                .rounds
                .get(round)
                .and_then(|r| r.game_ids.first().copied())
        };
        let (Some(game_one), Some(game_two)) = (first_game(round_one), first_game(round_two))
        else {
            return MoveOutcome::Infeasible;
        };
        let Some((busy_one, busy_two)) = self.busy_players(game_one, game_two) else {
            return MoveOutcome::Infeasible;
        };

        // Players of one game who are free in the other, in both directions.
        let pool_a: Vec<PlayerId> = busy_one.difference(&busy_two).copied().collect();
        let pool_b: Vec<PlayerId> = busy_two.difference(&busy_one).copied().collect();

        self.try_swap(game_one, game_two, &busy_one, &busy_two, pool_a, pool_b)
    }

    /// Swap players between two games of the same round.
    pub fn swap_in_games(&mut self, game_one: GameId, game_two: GameId) -> MoveOutcome {
        let Some((busy_one, busy_two)) = self.busy_players(game_one, game_two) else {
            return MoveOutcome::Infeasible;
        };

        // Empty whenever the round is disjoint, which it should be.
        let busy_both: FxHashSet<PlayerId> = busy_one.intersection(&busy_two).copied().collect();
        let pool_a: Vec<PlayerId> = busy_one.difference(&busy_both).copied().collect();
        let pool_b: Vec<PlayerId> = busy_two.difference(&busy_both).copied().collect();

        self.try_swap(game_one, game_two, &busy_one, &busy_two, pool_a, pool_b)
    }

    fn busy_players(
        &self,
        game_one: GameId,
        game_two: GameId,
    ) -> Option<(FxHashSet<PlayerId>, FxHashSet<PlayerId>)> {
        if game_one == game_two {
            return None;
        }
        let one = self.schedule.slot(game_one)?.players.clone();
        let two = self.schedule.slot(game_two)?.players.clone();
        Some((one, two))
    }

    fn try_swap(
        &mut self,
        game_one: GameId,
        game_two: GameId,
        busy_one: &FxHashSet<PlayerId>,
        busy_two: &FxHashSet<PlayerId>,
        mut pool_a: Vec<PlayerId>,
        mut pool_b: Vec<PlayerId>,
    ) -> MoveOutcome {
        if pool_a.is_empty() || pool_b.is_empty() {
            return MoveOutcome::Infeasible;
        }

        // Hash-set order is not part of the seed; sort before drawing.
        pool_a.sort_unstable();
        pool_b.sort_unstable();
        let player_a = pool_a[self.rng.gen_range(0..pool_a.len())];
        let player_b = pool_b[self.rng.gen_range(0..pool_b.len())];

        if !self
            .schedule
            .swap_slot_players(game_one, game_two, player_a, player_b)
        {
            return MoveOutcome::Infeasible;
        }
        self.tracker.swap(busy_one, busy_two, player_a, player_b);

        let candidate = self.tracker.score();
        if candidate < self.score {
            self.score = candidate;
            debug!(
                score = self.score,
                game_one,
                game_two,
                player_a,
                player_b,
                "accepted swap"
            );
            MoveOutcome::Accepted
        } else {
            let reverted = self
                .schedule
                .swap_slot_players(game_one, game_two, player_b, player_a);
            debug_assert!(reverted, "rejected swap could not be reverted");
            self.tracker.unswap(busy_one, busy_two, player_a, player_b);
            MoveOutcome::Rejected
        }
    }

    /// Two distinct indices below `len`, uniformly at random.
    fn pick_two(&mut self, len: usize) -> Option<(usize, usize)> {
        if len < 2 {
            return None;
        }
        let first = self.rng.gen_range(0..len);
        let mut second = self.rng.gen_range(0..len - 1);
        if second >= first {
            second += 1;
        }
        Some((first, second))
    }

    /// Leave slot form and hand back the schedule with its score and stats.
    pub fn finish(mut self) -> (Schedule, f64, RunStats) {
        self.schedule.update_games_from_slots();
        self.stats.final_score = self.score;
        (self.schedule, self.score, self.stats)
    }
}

/// Multi-restart opponents optimizer.
///
/// # Example
/// ```
/// use seating_optimizer::optimizer::{OptimizeOpponents, OptimizerConfig};
/// use seating_optimizer::participants::Participants;
/// use seating_optimizer::schedule::Configuration;
///
/// let configuration = Configuration::new(12, 1, 6, 6, 5);
/// let participants = Participants::create(12);
/// let mut optimizer = OptimizeOpponents::new(OptimizerConfig::default().with_seed(1));
///
/// let best = optimizer.optimize(&configuration, &participants, 2, 500).unwrap();
/// assert!(best.unwrap().schedule.is_valid());
/// ```
pub struct OptimizeOpponents {
    config: OptimizerConfig,
    stats: OptimizeStats,
}

impl OptimizeOpponents {
    /// Create an optimizer.
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            stats: OptimizeStats::new(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Statistics of the last optimization.
    pub fn stats(&self) -> &OptimizeStats {
        &self.stats
    }

    /// Run `num_runs` independent searches of `num_iterations` steps each and
    /// return the best schedule, or `None` when `num_runs` is zero.
    pub fn optimize(
        &mut self,
        configuration: &Configuration,
        participants: &Participants,
        num_runs: usize,
        num_iterations: u64,
    ) -> Result<Option<OptimizedSchedule>, ScheduleError> {
        self.optimize_with_callback(configuration, participants, num_runs, num_iterations, |_| {})
    }

    /// Like [`OptimizeOpponents::optimize`], reporting progress to `callback`
    /// every `log_interval` iterations of every run.
    pub fn optimize_with_callback<F>(
        &mut self,
        configuration: &Configuration,
        participants: &Participants,
        num_runs: usize,
        num_iterations: u64,
        mut callback: F,
    ) -> Result<Option<OptimizedSchedule>, ScheduleError>
    where
        F: FnMut(&RunProgress),
    {
        let start_time = Instant::now();
        self.stats = OptimizeStats::new();
        let mut best = None;

        for run in 0..num_runs {
            let outcome = execute_run(
                &self.config,
                run,
                configuration,
                participants,
                num_iterations,
                &mut callback,
            )?;
            self.merge(outcome, &mut best);
        }

        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(best)
    }

    /// Like [`OptimizeOpponents::optimize`], with runs spread over a rayon pool.
    ///
    /// For a fixed seed the result equals the sequential one.
    pub fn optimize_parallel(
        &mut self,
        configuration: &Configuration,
        participants: &Participants,
        num_runs: usize,
        num_iterations: u64,
    ) -> Result<Option<OptimizedSchedule>, ScheduleError> {
        let start_time = Instant::now();
        self.stats = OptimizeStats::new();
        configuration.validate()?;

        let config = &self.config;
        let run_all = || -> Vec<Result<RunOutcome, ScheduleError>> {
            (0..num_runs)
                .into_par_iter()
                .map(|run| {
                    execute_run(
                        config,
                        run,
                        configuration,
                        participants,
                        num_iterations,
                        &mut |_: &RunProgress| {},
                    )
                })
                .collect()
        };

        let results = match config.num_threads {
            Some(threads) if threads > 0 => {
                match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(run_all),
                    Err(err) => {
                        warn!(%err, "could not build thread pool, using the global pool");
                        run_all()
                    }
                }
            }
            _ => run_all(),
        };

        let mut best = None;
        for result in results {
            self.merge(result?, &mut best);
        }

        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        Ok(best)
    }

    /// Keep the outcome if it is strictly better than the best so far.
    fn merge(&mut self, outcome: RunOutcome, best: &mut Option<OptimizedSchedule>) {
        let RunOutcome {
            schedule,
            score,
            stats,
        } = outcome;
        let run = stats.run;
        self.stats.runs.push(stats);

        let improves = best.as_ref().map_or(true, |current| score < current.score);
        if improves {
            info!(run, score, "found best schedule");
            self.stats.best_run = Some(run);
            self.stats.best_score = Some(score);
            *best = Some(OptimizedSchedule {
                schedule,
                score,
                run,
            });
        }
    }
}

struct RunOutcome {
    schedule: Schedule,
    score: f64,
    stats: RunStats,
}

/// Random generator for run `run`.
pub fn run_rng(config: &OptimizerConfig, run: usize) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run as u64)),
        None => StdRng::from_entropy(),
    }
}

fn execute_run(
    config: &OptimizerConfig,
    run: usize,
    configuration: &Configuration,
    participants: &Participants,
    num_iterations: u64,
    callback: &mut dyn FnMut(&RunProgress),
) -> Result<RunOutcome, ScheduleError> {
    let mut rng = run_rng(config, run);
    let schedule = ScheduleFactory::create_initial_schedule(configuration, participants, &mut rng)?;
    if !schedule.is_valid() {
        warn!(
            run,
            errors = ?schedule.validation_errors(),
            "initial schedule breaks invariants"
        );
    }

    let mut search = SearchRun::new(schedule, config, rng, run);
    info!(run, score = search.score(), num_iterations, "optimization run started");

    search.run(num_iterations, config.log_interval, |progress| callback(progress));
    let (schedule, score, stats) = search.finish();

    info!(
        run,
        score,
        accepted = stats.accepted,
        iterations = stats.iterations,
        "optimization run finished"
    );
    Ok(RunOutcome {
        schedule,
        score,
        stats,
    })
}
