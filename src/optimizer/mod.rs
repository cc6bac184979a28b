//! Opponents optimizer.
//!
//! Improves an initial schedule so that every pair of players meets as close
//! to equally often as possible.
//!
//! # Overview
//!
//! Each run is a stochastic hill climb:
//! 1. Build a fresh schedule with [`crate::schedule::ScheduleFactory`]
//! 2. Switch it to slot form and score it
//! 3. Repeatedly swap two players between two games, keeping the swap only
//!    if the score strictly drops
//! 4. Switch back to game form
//!
//! The run with the lowest final score wins; ties keep the earlier run.
//!
//! # Score
//!
//! ```text
//! target  = 9 * num_attempts / (num_players - 1)
//! penalty = sum over players p, opponents q != p of (meetings(p, q) - target)^2
//! score   = penalty + 100 * (zero_players - 12)^2
//! ```
//!
//! where `zero_players` counts players who never met exactly one opponent.
//! [`ScoreFunction::Legacy`] drops the second term.
//!
//! # Example
//!
//! ```
//! use seating_optimizer::optimizer::{OptimizeOpponents, OptimizerConfig};
//! use seating_optimizer::participants::Participants;
//! use seating_optimizer::schedule::Configuration;
//!
//! let configuration = Configuration::new(20, 2, 10, 20, 10);
//! let participants = Participants::create(20);
//!
//! let mut optimizer = OptimizeOpponents::new(OptimizerConfig::default().with_seed(42));
//! let best = optimizer
//!     .optimize(&configuration, &participants, 1, 1_000)
//!     .unwrap()
//!     .expect("one run was requested");
//! println!("best score {:.2}", best.score);
//! ```

pub mod config;
pub mod score;
pub mod search;

pub use config::{OptimizeStats, OptimizerConfig, RunStats, ScoreFunction};
pub use score::{score_schedule, ScoreTracker};
pub use search::{MoveOutcome, OptimizeOpponents, OptimizedSchedule, RunProgress, SearchRun};
