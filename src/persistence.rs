//! JSON persistence for schedules and participants.
//!
//! A schedule document looks like:
//!
//! ```text
//! {
//!   "configuration": { "numPlayers": 20, "numTables": 2, ... },
//!   "rounds": [ { "id": 0, "gameIds": [0, 1] }, ... ],
//!   "games":  [ { "id": 0, "players": [3, 17, ...] }, ... ]
//! }
//! ```
//!
//! Slots are never stored. A loaded schedule is put into slot form right
//! away so it is ready for optimization.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::participants::Participants;
use crate::schedule::{Configuration, Game, Round, Schedule};

/// Errors raised while saving or loading documents.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON of the expected shape.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but describes an impossible schedule.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Serialized form of a [`Schedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDocument {
    /// Tournament geometry.
    pub configuration: Configuration,
    /// Rounds with their game ids.
    pub rounds: Vec<Round>,
    /// Games with seat-ordered players.
    pub games: Vec<Game>,
}

impl From<&Schedule> for ScheduleDocument {
    fn from(schedule: &Schedule) -> Self {
        let games = if schedule.is_slot_form() {
            let mut materialized = schedule.clone();
            materialized.update_games_from_slots();
            materialized.games
        } else {
            schedule.games.clone()
        };

        Self {
            configuration: schedule.configuration,
            rounds: schedule.rounds.clone(),
            games,
        }
    }
}

impl ScheduleDocument {
    /// Turn the document back into a schedule in game form.
    pub fn into_schedule(self) -> Result<Schedule, PersistenceError> {
        for (idx, game) in self.games.iter().enumerate() {
            if game.id != idx {
                return Err(PersistenceError::InvalidDocument(format!(
                    "game at position {} has id {}",
                    idx, game.id
                )));
            }
        }
        Ok(Schedule::new(self.configuration, self.rounds, self.games))
    }
}

/// Serialize a schedule to pretty JSON.
pub fn schedule_to_json(schedule: &Schedule) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(&ScheduleDocument::from(schedule))?)
}

/// Parse a schedule and put it into slot form.
pub fn schedule_from_json(json: &str) -> Result<Schedule, PersistenceError> {
    let document: ScheduleDocument = serde_json::from_str(json)?;
    let mut schedule = document.into_schedule()?;
    schedule.generate_slots_from_games();
    Ok(schedule)
}

/// Save a schedule to a JSON file.
pub fn save_schedule<P: AsRef<Path>>(schedule: &Schedule, path: P) -> Result<(), PersistenceError> {
    info!(path = %path.as_ref().display(), "saving schedule");
    write_file(path, &schedule_to_json(schedule)?)
}

/// Load a schedule from a JSON file, ready for optimization.
pub fn load_schedule<P: AsRef<Path>>(path: P) -> Result<Schedule, PersistenceError> {
    info!(path = %path.as_ref().display(), "loading schedule");
    schedule_from_json(&fs::read_to_string(path)?)
}

/// Save participants to a JSON file.
pub fn save_participants<P: AsRef<Path>>(
    participants: &Participants,
    path: P,
) -> Result<(), PersistenceError> {
    info!(path = %path.as_ref().display(), "saving participants");
    write_file(path, &serde_json::to_string_pretty(participants)?)
}

/// Load participants from a JSON file.
pub fn load_participants<P: AsRef<Path>>(path: P) -> Result<Participants, PersistenceError> {
    info!(path = %path.as_ref().display(), "loading participants");
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), PersistenceError> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
