//! # Seating Optimizer
//!
//! Builds multi-round tournament schedules for 10-player games and improves
//! them so that every pair of players meets as evenly as possible.
//!
//! ## Features
//!
//! - **Balanced Construction**: Initial schedules respect round disjointness
//!   and per-player game counts
//! - **Pairing Metrics**: Opponents matrix, pairing and seat histograms
//! - **Local Search**: Randomized swap hill climbing with exact undo
//! - **Incremental Scoring**: Only rows touched by a swap are re-evaluated
//! - **Multi-Restart**: Independent runs, optionally in parallel, best one wins
//! - **Persistence**: Schedules and participants as JSON
//!
//! ## Quick Start
//!
//! ```
//! use seating_optimizer::optimizer::{OptimizeOpponents, OptimizerConfig};
//! use seating_optimizer::participants::Participants;
//! use seating_optimizer::schedule::Configuration;
//!
//! // 1. Describe the tournament: players, tables, rounds, games, games per player
//! let configuration = Configuration::new(12, 1, 6, 6, 5);
//! let participants = Participants::create(12);
//!
//! // 2. Optimize
//! let mut optimizer = OptimizeOpponents::new(OptimizerConfig::default().with_seed(1));
//! let best = optimizer.optimize(&configuration, &participants, 2, 1_000).unwrap();
//!
//! // 3. Use the schedule
//! let best = best.unwrap();
//! assert!(best.schedule.is_valid());
//! ```
//!
//! ## Modules
//!
//! - [`schedule`]: Entity model and initial construction
//! - [`metrics`]: Opponents matrix and derived statistics
//! - [`optimizer`]: Score function and local search
//! - [`participants`]: Player names
//! - [`persistence`]: JSON save/load
//! - [`report`]: Text reports
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OptimizeOpponents                          │
//! │  - Multi-restart          - Accept only strict improvements    │
//! │  - Random swap moves      - Exact revert of rejected swaps     │
//! └─────────────────────────────────────────────────────────────────┘
//!               │                                  │
//!               │ fresh schedule per run           │ score after every swap
//!               ▼                                  ▼
//!      ┌─────────────────┐                ┌─────────────────┐
//!      │ ScheduleFactory │                │ Metrics / Score │
//!      └─────────────────┘                └─────────────────┘
//!               │                                  │
//!               └──────────────┬───────────────────┘
//!                              ▼
//!                  ┌───────────────────────┐
//!                  │ Schedule (games|slots)│
//!                  └───────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod metrics;
pub mod optimizer;
pub mod participants;
pub mod persistence;
pub mod report;
pub mod schedule;

// Re-export commonly used types at crate root for convenience
pub use optimizer::{OptimizeOpponents, OptimizedSchedule, OptimizerConfig, ScoreFunction};
pub use participants::Participants;
pub use schedule::{Configuration, Schedule, ScheduleError, ScheduleFactory};
