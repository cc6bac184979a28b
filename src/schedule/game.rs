//! Games, rounds and the two player-set projections used by the optimizer.
//!
//! A [`Game`] keeps its players in seat order. A [`GameSet`] and a [`Slot`]
//! carry the same players without seat order: the former is a read-only
//! projection, the latter is what the local search mutates.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Number of seats at every table.
pub const GAME_SIZE: usize = 10;

/// Player reference, an index in `[0, num_players)`.
pub type PlayerId = usize;

/// Game identifier, an index into [`crate::schedule::Schedule::games`].
pub type GameId = usize;

/// Round identifier, an index into [`crate::schedule::Schedule::rounds`].
pub type RoundId = usize;

/// A single seating of exactly [`GAME_SIZE`] players.
///
/// Seat order is significant: index 0 is seat 1 and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier.
    pub id: GameId,
    /// Players in seat order.
    pub players: Vec<PlayerId>,
}

impl Game {
    /// Create a game from an ordered list of players.
    pub fn new(id: GameId, players: Vec<PlayerId>) -> Self {
        Self { id, players }
    }

    /// A game is valid when it seats exactly [`GAME_SIZE`] distinct players.
    pub fn is_valid(&self) -> bool {
        if self.players.len() != GAME_SIZE {
            return false;
        }

        let mut seen = FxHashSet::default();
        self.players.iter().all(|&player| seen.insert(player))
    }

    /// Whether the given player sits at this game.
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Seat index of a player, if present.
    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|&p| p == player)
    }
}

impl From<&GameSet> for Game {
    /// Seats come out in ascending player order.
    fn from(set: &GameSet) -> Self {
        Game::new(set.id, sorted_players(&set.players))
    }
}

impl From<&Slot> for Game {
    fn from(slot: &Slot) -> Self {
        Game::new(slot.id, sorted_players(&slot.players))
    }
}

/// Unordered players of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSet {
    /// Identifier of the game this set was taken from.
    pub id: GameId,
    /// Players, seat order dropped.
    pub players: FxHashSet<PlayerId>,
}

impl GameSet {
    /// Create a set from any collection of players.
    pub fn new(id: GameId, players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            id,
            players: players.into_iter().collect(),
        }
    }
}

impl From<&Game> for GameSet {
    fn from(game: &Game) -> Self {
        GameSet::new(game.id, game.players.iter().copied())
    }
}

impl From<&Slot> for GameSet {
    fn from(slot: &Slot) -> Self {
        GameSet::new(slot.id, slot.players.iter().copied())
    }
}

/// Mutable, order-free players of one game during optimization.
///
/// There is exactly one slot per game and swaps keep its size constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Identifier of the game this slot stands for.
    pub id: GameId,
    /// Players currently assigned.
    pub players: FxHashSet<PlayerId>,
}

impl Slot {
    /// Create a slot from any collection of players.
    pub fn new(id: GameId, players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            id,
            players: players.into_iter().collect(),
        }
    }

    /// Players in ascending order, for deterministic iteration.
    pub fn sorted_players(&self) -> Vec<PlayerId> {
        sorted_players(&self.players)
    }
}

impl From<&Game> for Slot {
    fn from(game: &Game) -> Self {
        Slot::new(game.id, game.players.iter().copied())
    }
}

/// Games played at the same time, one per table.
///
/// No player may appear in two games of the same round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Round identifier.
    pub id: RoundId,
    /// Games played in this round, in table order.
    #[serde(rename = "gameIds")]
    pub game_ids: Vec<GameId>,
}

impl Round {
    /// Create a round over the given games.
    pub fn new(id: RoundId, game_ids: Vec<GameId>) -> Self {
        Self { id, game_ids }
    }
}

fn sorted_players(players: &FxHashSet<PlayerId>) -> Vec<PlayerId> {
    let mut sorted: Vec<PlayerId> = players.iter().copied().collect();
    sorted.sort_unstable();
    sorted
}
