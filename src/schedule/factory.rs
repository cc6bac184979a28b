//! Initial schedule construction.
//!
//! Every player starts with a remaining-attempts counter. Round by round, the
//! players with the most remaining attempts are seated first, so counters
//! drain evenly and the per-player totals land on the target.

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::{Configuration, ScheduleError};
use super::game::{Game, PlayerId, Round, GAME_SIZE};
use super::state::Schedule;
use crate::participants::Participants;

/// Builds structurally valid starting schedules.
pub struct ScheduleFactory;

impl ScheduleFactory {
    /// Create an initial schedule for the given geometry and players.
    ///
    /// Ties between players with equal remaining attempts are broken by `rng`,
    /// and the seated players of a round are shuffled across its tables.
    ///
    /// # Errors
    /// Returns a [`ScheduleError`] when the configuration is invalid or the
    /// participant count does not match it.
    pub fn create_initial_schedule<R: Rng + ?Sized>(
        configuration: &Configuration,
        participants: &Participants,
        rng: &mut R,
    ) -> Result<Schedule, ScheduleError> {
        configuration.validate()?;
        if participants.len() != configuration.num_players {
            return Err(ScheduleError::ParticipantCountMismatch {
                expected: configuration.num_players,
                actual: participants.len(),
            });
        }

        let players = participants.all();
        let mut sorted = players.clone();
        sorted.sort_unstable();
        if sorted.iter().enumerate().any(|(idx, &id)| idx != id) {
            return Err(ScheduleError::InvalidPlayerIds {
                expected: configuration.num_players,
            });
        }
        let mut remaining = Self::attempt_targets(configuration, players.len(), rng);

        let mut rounds = Vec::with_capacity(configuration.num_rounds);
        let mut games = Vec::with_capacity(configuration.num_games);

        for (round_id, games_in_round) in configuration.games_per_round().into_iter().enumerate() {
            let seated = Self::pick_players(&mut remaining, games_in_round * GAME_SIZE, rng);

            let mut seated: Vec<PlayerId> = seated.into_iter().map(|idx| players[idx]).collect();
            seated.shuffle(rng);

            let mut game_ids = Vec::with_capacity(games_in_round);
            for table in seated.chunks(GAME_SIZE) {
                let id = games.len();
                games.push(Game::new(id, table.to_vec()));
                game_ids.push(id);
            }
            rounds.push(Round::new(round_id, game_ids));
        }

        Ok(Schedule::new(*configuration, rounds, games))
    }

    /// Per-player target number of games.
    ///
    /// Exactly `num_attempts` when the seats divide evenly; otherwise the seats
    /// are spread so targets differ by at most one, with the extra games going
    /// to randomly chosen players.
    fn attempt_targets<R: Rng + ?Sized>(
        configuration: &Configuration,
        num_players: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        if configuration.is_evenly_divisible() {
            return vec![configuration.num_attempts; num_players];
        }

        let seats = configuration.total_seats();
        let base = seats / num_players;
        let extra = seats % num_players;

        let mut order: Vec<usize> = (0..num_players).collect();
        order.shuffle(rng);

        let mut targets = vec![base; num_players];
        for &idx in order.iter().take(extra) {
            targets[idx] += 1;
        }
        targets
    }

    /// Pick `count` distinct player indices, most remaining attempts first,
    /// and decrement their counters.
    fn pick_players<R: Rng + ?Sized>(
        remaining: &mut [usize],
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let mut order: Vec<usize> = (0..remaining.len()).collect();
        order.shuffle(rng);
        // Stable sort keeps the shuffled order among equal counters.
        order.sort_by(|&a, &b| remaining[b].cmp(&remaining[a]));
        order.truncate(count);

        for &idx in &order {
            remaining[idx] = remaining[idx].saturating_sub(1);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::Participant;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rustc_hash::FxHashSet;

    fn build(config: Configuration, seed: u64) -> Schedule {
        let participants = Participants::create(config.num_players);
        let mut rng = StdRng::seed_from_u64(seed);
        ScheduleFactory::create_initial_schedule(&config, &participants, &mut rng).unwrap()
    }

    fn assert_valid(config: Configuration) {
        for seed in 0..5 {
            let schedule = build(config, seed);
            assert!(
                schedule.is_valid(),
                "{:?} seed {}: {:?}",
                config,
                seed,
                schedule.validation_errors()
            );
        }
    }

    #[test]
    fn test_factory_simple() {
        assert_valid(Configuration::new(10, 1, 1, 1, 1));
    }

    #[test]
    fn test_factory_simple_bad() {
        let schedule = build(Configuration::new(11, 1, 1, 1, 1), 1);
        assert!(!schedule.is_valid());
    }

    #[test]
    fn test_factory_rounds2_players10_attempts2() {
        assert_valid(Configuration::new(10, 1, 2, 2, 2));
    }

    #[test]
    fn test_factory_rounds2_players20_attempts1() {
        assert_valid(Configuration::new(20, 1, 2, 2, 1));
    }

    #[test]
    fn test_factory_tables1_players12() {
        assert_valid(Configuration::new(12, 1, 6, 6, 5));
    }

    #[test]
    fn test_factory_tables2_players20() {
        assert_valid(Configuration::new(20, 2, 10, 20, 10));
    }

    #[test]
    fn test_factory_tables2_players25() {
        assert_valid(Configuration::new(25, 2, 10, 20, 8));
    }

    #[test]
    fn test_factory_tables3_players30() {
        assert_valid(Configuration::new(30, 3, 10, 30, 10));
    }

    #[test]
    fn test_factory_tables3_players33() {
        assert_valid(Configuration::new(33, 3, 11, 33, 10));
    }

    #[test]
    fn test_factory_tables3_players35() {
        assert_valid(Configuration::new(35, 3, 12, 35, 10));
    }

    #[test]
    fn test_factory_uneven_attempts_within_one() {
        // 13 players, 6 games: 60 seats for a target of 5 each is not exact.
        let config = Configuration::new(13, 1, 6, 6, 5);
        let schedule = build(config, 3);

        let attempts = schedule.player_attempts();
        let min = *attempts.iter().min().unwrap();
        let max = *attempts.iter().max().unwrap();
        assert!(max - min <= 1);
        assert_eq!(attempts.iter().sum::<usize>(), 60);
        assert!(schedule.is_valid(), "{:?}", schedule.validation_errors());
    }

    #[test]
    fn test_factory_rounds_are_disjoint() {
        let schedule = build(Configuration::new(35, 3, 12, 35, 10), 9);

        for round in &schedule.rounds {
            let mut seen = FxHashSet::default();
            for &game_id in &round.game_ids {
                for &player in &schedule.games[game_id].players {
                    assert!(seen.insert(player), "player {} twice in round {}", player, round.id);
                }
            }
        }
        assert_eq!(schedule.rounds[11].game_ids.len(), 2);
    }

    #[test]
    fn test_factory_rejects_too_few_players() {
        let config = Configuration::new(9, 1, 1, 1, 1);
        let participants = Participants::create(9);
        let mut rng = StdRng::seed_from_u64(0);

        let result = ScheduleFactory::create_initial_schedule(&config, &participants, &mut rng);
        assert!(matches!(result, Err(ScheduleError::NotEnoughPlayers(9))));
    }

    #[test]
    fn test_factory_rejects_participant_mismatch() {
        let config = Configuration::new(20, 2, 10, 20, 10);
        let participants = Participants::create(19);
        let mut rng = StdRng::seed_from_u64(0);

        let result = ScheduleFactory::create_initial_schedule(&config, &participants, &mut rng);
        assert!(matches!(
            result,
            Err(ScheduleError::ParticipantCountMismatch { expected: 20, actual: 19 })
        ));
    }

    #[test]
    fn test_factory_rejects_foreign_or_repeated_ids() {
        let config = Configuration::new(20, 2, 10, 20, 10);
        let mut rng = StdRng::seed_from_u64(0);

        let foreign = Participants {
            people: (100..120)
                .map(|id| Participant {
                    id,
                    name: format!("P{}", id),
                })
                .collect(),
        };
        let result = ScheduleFactory::create_initial_schedule(&config, &foreign, &mut rng);
        assert!(matches!(
            result,
            Err(ScheduleError::InvalidPlayerIds { expected: 20 })
        ));

        let repeated = Participants {
            people: (0..20)
                .map(|i| Participant {
                    id: i % 10,
                    name: format!("P{}", i),
                })
                .collect(),
        };
        let result = ScheduleFactory::create_initial_schedule(&config, &repeated, &mut rng);
        assert!(matches!(
            result,
            Err(ScheduleError::InvalidPlayerIds { expected: 20 })
        ));
    }

    #[test]
    fn test_factory_accepts_shuffled_ids() {
        let config = Configuration::new(20, 2, 10, 20, 10);
        let mut rng = StdRng::seed_from_u64(4);
        let mut participants = Participants::create(20);
        participants.people.reverse();

        let schedule =
            ScheduleFactory::create_initial_schedule(&config, &participants, &mut rng).unwrap();
        assert!(schedule.is_valid(), "{:?}", schedule.validation_errors());
    }

    #[test]
    fn test_factory_rejects_unreachable_attempts() {
        let config = Configuration::new(20, 1, 2, 2, 5);
        let participants = Participants::create(20);
        let mut rng = StdRng::seed_from_u64(0);

        let result = ScheduleFactory::create_initial_schedule(&config, &participants, &mut rng);
        assert!(matches!(result, Err(ScheduleError::AttemptsMismatch { .. })));
    }

    #[test]
    fn test_factory_is_reproducible_with_seed() {
        let config = Configuration::new(25, 2, 10, 20, 8);
        let a = build(config, 42);
        let b = build(config, 42);
        assert_eq!(a.games, b.games);
    }
}
