//! Pairing-quality metrics.
//!
//! Everything here is a pure function of a schedule snapshot. The central
//! statistic is the opponents matrix: cell `(i, j)` counts the games in which
//! players `i` and `j` sit together.

use std::collections::BTreeMap;

use crate::schedule::{GameSet, PlayerId, Schedule, GAME_SIZE};

/// Symmetric player-by-player co-occurrence counts with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentsMatrix {
    size: usize,
    cells: Vec<u32>,
}

impl OpponentsMatrix {
    /// An all-zero matrix for `size` players.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Count every pair of every game.
    pub fn from_game_sets(size: usize, sets: &[GameSet]) -> Self {
        let mut matrix = Self::new(size);
        for set in sets {
            let players: Vec<PlayerId> = set.players.iter().copied().collect();
            for (i, &a) in players.iter().enumerate() {
                for &b in &players[i + 1..] {
                    matrix.increment(a, b);
                }
            }
        }
        matrix
    }

    /// Number of players.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Games shared by players `a` and `b`.
    #[inline]
    pub fn get(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.cells[a * self.size + b]
    }

    /// One player's meeting counts with everybody, self included.
    #[inline]
    pub fn row(&self, player: PlayerId) -> &[u32] {
        let start = player * self.size;
        &self.cells[start..start + self.size]
    }

    /// Record one more shared game for `a` and `b`.
    #[inline]
    pub fn increment(&mut self, a: PlayerId, b: PlayerId) {
        if a == b || a >= self.size || b >= self.size {
            return;
        }
        self.cells[a * self.size + b] += 1;
        self.cells[b * self.size + a] += 1;
    }

    /// Remove one shared game for `a` and `b`.
    #[inline]
    pub fn decrement(&mut self, a: PlayerId, b: PlayerId) {
        if a == b || a >= self.size || b >= self.size {
            return;
        }
        let forward = &mut self.cells[a * self.size + b];
        *forward = forward.saturating_sub(1);
        let backward = &mut self.cells[b * self.size + a];
        *backward = backward.saturating_sub(1);
    }

    /// Rows as owned vectors, for callers that want the classic nested layout.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.size).map(|p| self.row(p).to_vec()).collect()
    }
}

/// Sum of `(v - target)^2` over all values except `values[exclude]`.
pub fn calc_square_deviation_exclude(values: &[u32], target: f64, exclude: usize) -> f64 {
    values
        .iter()
        .enumerate()
        .filter(|&(idx, _)| idx != exclude)
        .map(|(_, &v)| {
            let d = v as f64 - target;
            d * d
        })
        .sum()
}

/// Imbalance of one player's row against the uniform target.
pub fn row_penalty(row: &[u32], target: f64, player: PlayerId) -> f64 {
    calc_square_deviation_exclude(row, target, player)
}

/// Opponents of `player` never met, judged from the player's row.
pub fn row_zero_count(row: &[u32], player: PlayerId) -> usize {
    row.iter()
        .enumerate()
        .filter(|&(idx, &v)| idx != player && v == 0)
        .count()
}

/// Metrics over one schedule snapshot.
///
/// The opponents matrix is computed once at construction; every other
/// metric reads from it or from the schedule.
pub struct Metrics<'a> {
    schedule: &'a Schedule,
    matrix: OpponentsMatrix,
}

impl<'a> Metrics<'a> {
    /// Snapshot a schedule in either representation.
    pub fn new(schedule: &'a Schedule) -> Self {
        let matrix = calc_opponents_matrix(schedule);
        Self { schedule, matrix }
    }

    /// The opponents matrix.
    pub fn opponents_matrix(&self) -> &OpponentsMatrix {
        &self.matrix
    }

    /// Row of the opponents matrix for one player.
    pub fn calc_player_opponents(&self, player: PlayerId) -> Vec<u32> {
        self.matrix.row(player).to_vec()
    }

    /// Meeting count -> number of opponents met that often.
    ///
    /// Keys `0..=num_attempts` are always present; the player's own diagonal
    /// entry is not counted.
    pub fn calc_player_pairs_histogram(&self, player: PlayerId) -> BTreeMap<u32, usize> {
        let mut histogram: BTreeMap<u32, usize> =
            (0..=self.schedule.num_attempts() as u32).map(|k| (k, 0)).collect();

        for (opponent, &count) in self.matrix.row(player).iter().enumerate() {
            if opponent != player {
                *histogram.entry(count).or_insert(0) += 1;
            }
        }
        histogram
    }

    /// Histogram over all unordered pairs of the tournament.
    pub fn calc_pairs_histogram(&self) -> BTreeMap<u32, usize> {
        let mut histogram: BTreeMap<u32, usize> =
            (0..=self.schedule.num_attempts() as u32).map(|k| (k, 0)).collect();

        for a in 0..self.matrix.size() {
            for b in 0..a {
                *histogram.entry(self.matrix.get(a, b)).or_insert(0) += 1;
            }
        }
        histogram
    }

    /// How many games seated the player at each seat.
    ///
    /// Reads the seat-ordered games, so it is meaningless while the schedule
    /// is in slot form.
    pub fn calc_player_seats_histogram(&self, player: PlayerId) -> [usize; GAME_SIZE] {
        let mut seats = [0; GAME_SIZE];
        for game in &self.schedule.games {
            if let Some(seat) = game.seat_of(player) {
                if seat < GAME_SIZE {
                    seats[seat] += 1;
                }
            }
        }
        seats
    }

    /// Squared deviation of the player's meeting counts from the uniform target.
    pub fn penalty_player(&self, player: PlayerId) -> f64 {
        let target = self.schedule.configuration.ideal_opponent_meetings();
        row_penalty(self.matrix.row(player), target, player)
    }
}

/// Count co-occurrences over every game of the schedule.
pub fn calc_opponents_matrix(schedule: &Schedule) -> OpponentsMatrix {
    OpponentsMatrix::from_game_sets(schedule.num_players(), &schedule.game_sets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::Participants;
    use crate::schedule::{Configuration, Game, Round, ScheduleFactory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn factory_schedule(config: Configuration, seed: u64) -> Schedule {
        let participants = Participants::create(config.num_players);
        let mut rng = StdRng::seed_from_u64(seed);
        ScheduleFactory::create_initial_schedule(&config, &participants, &mut rng).unwrap()
    }

    #[test]
    fn test_matrix_symmetric_with_zero_diagonal() {
        let schedule = factory_schedule(Configuration::new(25, 2, 10, 20, 8), 5);
        let metrics = Metrics::new(&schedule);
        let matrix = metrics.opponents_matrix();

        for a in 0..matrix.size() {
            assert_eq!(matrix.get(a, a), 0);
            for b in 0..matrix.size() {
                assert_eq!(matrix.get(a, b), matrix.get(b, a));
            }
        }
    }

    #[test]
    fn test_row_sum_is_nine_per_game() {
        let schedule = factory_schedule(Configuration::new(33, 3, 11, 33, 10), 2);
        let metrics = Metrics::new(&schedule);
        let attempts = schedule.player_attempts();

        for (player, &games) in attempts.iter().enumerate() {
            let total: u32 = metrics.calc_player_opponents(player).iter().sum();
            assert_eq!(total as usize, GAME_SIZE * games - games);
        }
    }

    #[test]
    fn test_matrix_same_in_slot_form() {
        let mut schedule = factory_schedule(Configuration::new(20, 2, 10, 20, 10), 8);
        let game_form = calc_opponents_matrix(&schedule);

        schedule.generate_slots_from_games();
        assert_eq!(calc_opponents_matrix(&schedule), game_form);
    }

    #[test]
    fn test_single_game_metrics() {
        let config = Configuration::new(10, 1, 1, 1, 1);
        let game = Game::new(0, vec![4, 1, 2, 3, 0, 5, 6, 7, 8, 9]);
        let schedule = Schedule::new(config, vec![Round::new(0, vec![0])], vec![game]);
        let metrics = Metrics::new(&schedule);

        // Everyone met everyone once, exactly the uniform target.
        assert_eq!(metrics.penalty_player(0), 0.0);

        let pairs = metrics.calc_player_pairs_histogram(0);
        assert_eq!(pairs.get(&0), Some(&0));
        assert_eq!(pairs.get(&1), Some(&9));

        let seats = metrics.calc_player_seats_histogram(4);
        assert_eq!(seats[0], 1);
        assert_eq!(seats.iter().sum::<usize>(), 1);

        let all_pairs = metrics.calc_pairs_histogram();
        assert_eq!(all_pairs.get(&1), Some(&45));
    }

    #[test]
    fn test_pairs_histogram_counts_never_met() {
        let config = Configuration::new(20, 2, 1, 2, 1);
        let games = vec![
            Game::new(0, (0..10).collect()),
            Game::new(1, (10..20).collect()),
        ];
        let schedule = Schedule::new(config, vec![Round::new(0, vec![0, 1])], games);
        let metrics = Metrics::new(&schedule);

        let pairs = metrics.calc_player_pairs_histogram(3);
        assert_eq!(pairs.get(&0), Some(&10));
        assert_eq!(pairs.get(&1), Some(&9));
        assert_eq!(pairs.values().sum::<usize>(), 19);
    }

    #[test]
    fn test_square_deviation_exclude() {
        let values = [1, 3, 100, 2];
        let deviation = calc_square_deviation_exclude(&values, 2.0, 2);
        assert!((deviation - 2.0).abs() < 1e-12);

        assert_eq!(row_zero_count(&[0, 0, 1, 0], 0), 2);
    }

    #[test]
    fn test_matrix_increment_decrement() {
        let mut matrix = OpponentsMatrix::new(4);
        matrix.increment(1, 3);
        matrix.increment(3, 1);
        matrix.increment(2, 2);
        assert_eq!(matrix.get(1, 3), 2);
        assert_eq!(matrix.get(2, 2), 0);

        matrix.decrement(1, 3);
        assert_eq!(matrix.get(3, 1), 1);
        assert_eq!(matrix.to_rows()[1], vec![0, 0, 0, 1]);
    }
}
