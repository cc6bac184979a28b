//! The schedule and its two representations.
//!
//! In game form the seat-ordered [`Game`]s are authoritative. In slot form the
//! order-free [`Slot`]s are, and the games are stale until
//! [`Schedule::update_games_from_slots`] is called.

use rustc_hash::{FxHashMap, FxHashSet};

use super::config::Configuration;
use super::game::{Game, GameId, GameSet, PlayerId, Round, Slot, GAME_SIZE};

/// A full tournament schedule.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Geometry this schedule was built for.
    pub configuration: Configuration,

    /// Rounds in play order.
    pub rounds: Vec<Round>,

    /// Games, indexed by their id.
    pub games: Vec<Game>,

    /// Game id -> slot, present only while optimizing.
    slots: Option<FxHashMap<GameId, Slot>>,
}

impl Schedule {
    /// Create a schedule in game form.
    pub fn new(configuration: Configuration, rounds: Vec<Round>, games: Vec<Game>) -> Self {
        Self {
            configuration,
            rounds,
            games,
            slots: None,
        }
    }

    /// Number of players in the tournament.
    pub fn num_players(&self) -> usize {
        self.configuration.num_players
    }

    /// Number of games each player should play.
    pub fn num_attempts(&self) -> usize {
        self.configuration.num_attempts
    }

    /// Enter slot form: derive one slot per game.
    pub fn generate_slots_from_games(&mut self) {
        let slots = self
            .games
            .iter()
            .map(|game| (game.id, Slot::from(game)))
            .collect();
        self.slots = Some(slots);
    }

    /// Leave slot form: rewrite every game from its slot.
    ///
    /// Seat order becomes ascending player id. Does nothing in game form.
    pub fn update_games_from_slots(&mut self) {
        let Some(slots) = self.slots.take() else {
            return;
        };

        for game in &mut self.games {
            if let Some(slot) = slots.get(&game.id) {
                *game = Game::from(slot);
            }
        }
    }

    /// Whether the slots are the current representation.
    pub fn is_slot_form(&self) -> bool {
        self.slots.is_some()
    }

    /// Slot of a game, in slot form only.
    pub fn slot(&self, id: GameId) -> Option<&Slot> {
        self.slots.as_ref().and_then(|slots| slots.get(&id))
    }

    /// Look up a game by id; games are stored at the index of their id.
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id)
    }

    /// Unordered players of every game, in game order, from whichever
    /// representation is current.
    pub fn game_sets(&self) -> Vec<GameSet> {
        match &self.slots {
            Some(slots) => self
                .games
                .iter()
                .map(|game| match slots.get(&game.id) {
                    Some(slot) => GameSet::from(slot),
                    None => GameSet::new(game.id, std::iter::empty()),
                })
                .collect(),
            None => self.games.iter().map(GameSet::from).collect(),
        }
    }

    /// Number of games each player appears in.
    pub fn player_attempts(&self) -> Vec<usize> {
        let mut attempts = vec![0; self.num_players()];
        for set in self.game_sets() {
            for player in set.players {
                if let Some(count) = attempts.get_mut(player) {
                    *count += 1;
                }
            }
        }
        attempts
    }

    /// Move `player_one` from slot `one` to slot `two` and `player_two` the other way.
    ///
    /// Returns `false` and leaves the schedule untouched unless the schedule is
    /// in slot form, `player_one` sits only in `one` and `player_two` only in `two`.
    pub fn swap_slot_players(
        &mut self,
        one: GameId,
        two: GameId,
        player_one: PlayerId,
        player_two: PlayerId,
    ) -> bool {
        let Some(slots) = self.slots.as_mut() else {
            return false;
        };

        let movable = match (slots.get(&one), slots.get(&two)) {
            (Some(slot_one), Some(slot_two)) => {
                one != two
                    && slot_one.players.contains(&player_one)
                    && !slot_one.players.contains(&player_two)
                    && slot_two.players.contains(&player_two)
                    && !slot_two.players.contains(&player_one)
            }
            _ => false,
        };
        if !movable {
            return false;
        }

        if let Some(slot_one) = slots.get_mut(&one) {
            slot_one.players.remove(&player_one);
            slot_one.players.insert(player_two);
        }
        if let Some(slot_two) = slots.get_mut(&two) {
            slot_two.players.remove(&player_two);
            slot_two.players.insert(player_one);
        }
        true
    }

    /// Whether every structural invariant holds.
    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Every broken invariant, described for humans. Empty for a valid schedule.
    pub fn validation_errors(&self) -> Vec<String> {
        let config = &self.configuration;
        let mut errors = Vec::new();

        if self.rounds.len() != config.num_rounds {
            errors.push(format!(
                "expected {} rounds, found {}",
                config.num_rounds,
                self.rounds.len()
            ));
        }
        if self.games.len() != config.num_games {
            errors.push(format!(
                "expected {} games, found {}",
                config.num_games,
                self.games.len()
            ));
        }

        let sets = self.game_sets();
        let sets_by_id: FxHashMap<GameId, &GameSet> = sets.iter().map(|s| (s.id, s)).collect();

        match &self.slots {
            None => {
                for game in self.games.iter().filter(|game| !game.is_valid()) {
                    errors.push(format!(
                        "game {} does not seat {} distinct players",
                        game.id, GAME_SIZE
                    ));
                }
            }
            Some(slots) => {
                for game in &self.games {
                    match slots.get(&game.id) {
                        Some(slot) if slot.players.len() == GAME_SIZE => {}
                        Some(_) => errors.push(format!(
                            "slot {} does not hold {} players",
                            game.id, GAME_SIZE
                        )),
                        None => errors.push(format!("game {} has no slot", game.id)),
                    }
                }
            }
        }

        for set in &sets {
            if set.players.iter().any(|&p| p >= config.num_players) {
                errors.push(format!("game {} references an unknown player", set.id));
            }
        }

        let mut references: FxHashMap<GameId, usize> = FxHashMap::default();
        for round in &self.rounds {
            let mut busy: FxHashSet<PlayerId> = FxHashSet::default();
            for game_id in &round.game_ids {
                *references.entry(*game_id).or_insert(0) += 1;
                let Some(set) = sets_by_id.get(game_id) else {
                    errors.push(format!("round {} references unknown game {}", round.id, game_id));
                    continue;
                };
                if set.players.iter().any(|p| busy.contains(p)) {
                    errors.push(format!(
                        "round {} seats a player twice (game {})",
                        round.id, game_id
                    ));
                }
                busy.extend(set.players.iter().copied());
            }
        }
        for set in &sets {
            match references.get(&set.id).copied().unwrap_or(0) {
                1 => {}
                n => errors.push(format!("game {} is referenced by {} rounds", set.id, n)),
            }
        }

        let (low, high) = if config.is_evenly_divisible() {
            (config.num_attempts, config.num_attempts)
        } else {
            (
                config.num_attempts.saturating_sub(1).max(1),
                config.num_attempts.saturating_add(1),
            )
        };
        for (player, &attempts) in self.player_attempts().iter().enumerate() {
            if attempts < low || attempts > high {
                errors.push(format!(
                    "player {} plays {} games, expected {}..={}",
                    player, attempts, low, high
                ));
            }
        }

        errors
    }
}
