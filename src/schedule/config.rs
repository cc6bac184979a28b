//! Tournament geometry.
//!
//! A [`Configuration`] is supplied once and read-only afterwards. It can be
//! built in code or loaded from JSON, where keys use camelCase
//! (`numPlayers`, `numTables`, ...).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::game::GAME_SIZE;

/// Parameters of one tournament.
///
/// # Example
/// ```
/// use seating_optimizer::schedule::Configuration;
///
/// let config = Configuration::new(12, 1, 6, 6, 5);
/// assert!(config.validate().is_ok());
/// assert!(config.is_evenly_divisible());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Number of players in the tournament.
    pub num_players: usize,

    /// Number of tables, i.e. games played in parallel.
    pub num_tables: usize,

    /// Number of rounds.
    pub num_rounds: usize,

    /// Total number of games, at most `num_tables * num_rounds`.
    pub num_games: usize,

    /// Number of games every player should play.
    pub num_attempts: usize,
}

impl Configuration {
    /// Create a configuration from its five parameters.
    pub fn new(
        num_players: usize,
        num_tables: usize,
        num_rounds: usize,
        num_games: usize,
        num_attempts: usize,
    ) -> Self {
        Self {
            num_players,
            num_tables,
            num_rounds,
            num_games,
            num_attempts,
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ScheduleError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ScheduleError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that a structurally valid schedule can exist for this geometry.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.num_players < GAME_SIZE {
            return Err(ScheduleError::NotEnoughPlayers(self.num_players));
        }
        if self.num_tables == 0 {
            return Err(ScheduleError::NoTables);
        }
        if self.num_rounds == 0 {
            return Err(ScheduleError::NoRounds);
        }
        if self.num_games == 0 {
            return Err(ScheduleError::NoGames);
        }
        if self.num_attempts == 0 {
            return Err(ScheduleError::NoAttempts);
        }

        let capacity = self
            .num_tables
            .checked_mul(self.num_rounds)
            .ok_or(ScheduleError::Overflow)?;
        if self.num_games > capacity {
            return Err(ScheduleError::TooManyGames {
                games: self.num_games,
                capacity,
            });
        }

        let needed = self
            .max_games_per_round()
            .checked_mul(GAME_SIZE)
            .ok_or(ScheduleError::Overflow)?;
        if needed > self.num_players {
            return Err(ScheduleError::RoundTooLarge {
                needed,
                players: self.num_players,
            });
        }

        // Per-player counts may stray one game from the target either way.
        let seats = self
            .num_games
            .checked_mul(GAME_SIZE)
            .ok_or(ScheduleError::Overflow)?;
        let most = self
            .num_attempts
            .checked_add(1)
            .and_then(|attempts| self.num_players.checked_mul(attempts))
            .ok_or(ScheduleError::Overflow)?;
        let fewest = self.num_players * (self.num_attempts - 1);
        if seats < fewest || seats > most {
            return Err(ScheduleError::AttemptsMismatch {
                seats,
                players: self.num_players,
                attempts: self.num_attempts,
            });
        }

        Ok(())
    }

    /// Total number of seats over the whole tournament.
    pub fn total_seats(&self) -> usize {
        self.num_games.saturating_mul(GAME_SIZE)
    }

    /// Whether every player can play exactly `num_attempts` games.
    pub fn is_evenly_divisible(&self) -> bool {
        self.num_players.checked_mul(self.num_attempts) == self.num_games.checked_mul(GAME_SIZE)
    }

    /// Games in the fullest round.
    pub fn max_games_per_round(&self) -> usize {
        self.num_tables.min(self.num_games)
    }

    /// Number of games planned for each round.
    ///
    /// Rounds are filled front to back, so only tail rounds hold fewer than
    /// `num_tables` games.
    pub fn games_per_round(&self) -> Vec<usize> {
        let mut remaining = self.num_games;
        (0..self.num_rounds)
            .map(|_| {
                let games = self.num_tables.min(remaining);
                remaining -= games;
                games
            })
            .collect()
    }

    /// How often a player would meet each opponent in a perfectly uniform schedule.
    pub fn ideal_opponent_meetings(&self) -> f64 {
        let opponents_per_game = (GAME_SIZE - 1) as f64;
        opponents_per_game * self.num_attempts as f64 / (self.num_players as f64 - 1.0)
    }
}

/// Errors raised when a configuration cannot yield a valid schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Fewer players than seats at one table.
    #[error("{0} players cannot fill a 10-player game")]
    NotEnoughPlayers(usize),

    /// The tournament has no tables.
    #[error("number of tables must be positive")]
    NoTables,

    /// The tournament has no rounds.
    #[error("number of rounds must be positive")]
    NoRounds,

    /// The tournament has no games.
    #[error("number of games must be positive")]
    NoGames,

    /// Players are not expected to play at all.
    #[error("number of attempts per player must be positive")]
    NoAttempts,

    /// More games than tables times rounds.
    #[error("{games} games do not fit into {capacity} table slots")]
    TooManyGames {
        /// Requested games.
        games: usize,
        /// Tables times rounds.
        capacity: usize,
    },

    /// A round needs more distinct players than the tournament has.
    #[error("a full round needs {needed} distinct players but only {players} exist")]
    RoundTooLarge {
        /// Players one full round seats.
        needed: usize,
        /// Players available.
        players: usize,
    },

    /// No per-player game count near `num_attempts` adds up to the seats.
    #[error("{seats} seats cannot give {players} players about {attempts} games each")]
    AttemptsMismatch {
        /// Seats over all games.
        seats: usize,
        /// Configured player count.
        players: usize,
        /// Configured games per player.
        attempts: usize,
    },

    /// A geometry value is too large to compute with.
    #[error("configuration values overflow")]
    Overflow,

    /// Player references are not exactly `0..num_players`.
    #[error("player ids must be 0..{expected} without gaps or repeats")]
    InvalidPlayerIds {
        /// Configured player count.
        expected: usize,
    },

    /// The participant list does not match the configured player count.
    #[error("configuration expects {expected} players, participant list has {actual}")]
    ParticipantCountMismatch {
        /// Configured player count.
        expected: usize,
        /// Participants supplied.
        actual: usize,
    },

    /// Reading a configuration file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document is not valid JSON for [`Configuration`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_config() {
        let json = r#"{
            "numPlayers": 25,
            "numTables": 2,
            "numRounds": 10,
            "numGames": 20,
            "numAttempts": 8
        }"#;
        let config = Configuration::from_json_str(json).unwrap();

        assert_eq!(config, Configuration::new(25, 2, 10, 20, 8));
        assert_eq!(config.total_seats(), 200);
        assert!(config.is_evenly_divisible());
    }

    #[test]
    fn test_validate_rejects_impossible_geometry() {
        assert!(matches!(
            Configuration::new(9, 1, 1, 1, 1).validate(),
            Err(ScheduleError::NotEnoughPlayers(9))
        ));
        assert!(matches!(
            Configuration::new(20, 2, 2, 5, 2).validate(),
            Err(ScheduleError::TooManyGames { games: 5, capacity: 4 })
        ));
        assert!(matches!(
            Configuration::new(25, 3, 10, 30, 10).validate(),
            Err(ScheduleError::RoundTooLarge { needed: 30, players: 25 })
        ));
        assert!(matches!(
            Configuration::new(20, 0, 2, 2, 1).validate(),
            Err(ScheduleError::NoTables)
        ));
    }

    #[test]
    fn test_validate_rejects_unreachable_attempts() {
        // 20 seats give every player one game, nowhere near five.
        assert!(matches!(
            Configuration::new(20, 1, 2, 2, 5).validate(),
            Err(ScheduleError::AttemptsMismatch { seats: 20, players: 20, attempts: 5 })
        ));
        // Too few attempts for the seats: 200 seats over 20 players is 10 each.
        assert!(matches!(
            Configuration::new(20, 2, 10, 20, 3).validate(),
            Err(ScheduleError::AttemptsMismatch { .. })
        ));
        // One game short of the target is tolerated.
        assert!(Configuration::new(13, 1, 6, 6, 5).validate().is_ok());
        assert!(Configuration::new(11, 1, 1, 1, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_reports_overflow() {
        let huge = Configuration::new(20, usize::MAX, 2, 2, 1);
        assert!(matches!(huge.validate(), Err(ScheduleError::Overflow)));

        let json = format!(
            r#"{{"numPlayers": 20, "numTables": 2, "numRounds": 2, "numGames": 2, "numAttempts": {}}}"#,
            usize::MAX
        );
        assert!(matches!(
            Configuration::from_json_str(&json),
            Err(ScheduleError::Overflow)
        ));
        assert_eq!(Configuration::new(20, 1, 1, usize::MAX, 1).total_seats(), usize::MAX);
    }

    #[test]
    fn test_round_limit_uses_fullest_round() {
        // Three tables but only two games overall: a round never seats 30.
        let config = Configuration::new(20, 3, 1, 2, 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_games_per_round(), 2);
    }

    #[test]
    fn test_games_per_round_fills_front_rounds() {
        let config = Configuration::new(35, 3, 12, 35, 10);
        let plan = config.games_per_round();

        assert_eq!(plan.len(), 12);
        assert!(plan[..11].iter().all(|&g| g == 3));
        assert_eq!(plan[11], 2);
        assert_eq!(plan.iter().sum::<usize>(), 35);
    }

    #[test]
    fn test_ideal_opponent_meetings() {
        let config = Configuration::new(10, 1, 1, 1, 1);
        assert!((config.ideal_opponent_meetings() - 1.0).abs() < 1e-12);

        let config = Configuration::new(12, 1, 6, 6, 5);
        assert!((config.ideal_opponent_meetings() - 45.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let result = Configuration::from_json_str(r#"{"numPlayers": 10}"#);
        assert!(matches!(result, Err(ScheduleError::Parse(_))));
    }
}
