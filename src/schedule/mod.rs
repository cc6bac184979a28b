//! Tournament schedule model.
//!
//! A tournament is a sequence of [`Round`]s. Each round holds up to
//! `num_tables` [`Game`]s played at the same time, and each game seats exactly
//! [`GAME_SIZE`] players.
//!
//! # Representations
//!
//! A [`Schedule`] is either in *game form*, where seat order is known, or in
//! *slot form*, where every game is an order-free [`Slot`] that the optimizer
//! can mutate cheaply:
//!
//! ```text
//!   ScheduleFactory ──► Schedule (games) ──generate_slots_from_games──► Schedule (slots)
//!                              ▲                                              │
//!                              └──────────── update_games_from_slots ─────────┘
//! ```
//!
//! Only one representation is current at a time.

pub mod config;
pub mod factory;
pub mod game;
pub mod state;

pub use config::{Configuration, ScheduleError};
pub use factory::ScheduleFactory;
pub use game::{Game, GameId, GameSet, PlayerId, Round, RoundId, Slot, GAME_SIZE};
pub use state::Schedule;
