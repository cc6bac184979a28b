//! Tournament participants and the display-name generator.
//!
//! The scheduling core only needs player references; names live here and
//! are used by persistence and reporting.

use serde::{Deserialize, Serialize};

use crate::schedule::PlayerId;

const NAME_POOL: &[&str] = &[
    "Alder", "Birch", "Cedar", "Dune", "Ember", "Fjord", "Grove", "Heath", "Iris", "Juniper",
    "Kestrel", "Larch", "Maple", "Nettle", "Onyx", "Pike", "Quill", "Raven", "Sage", "Thorn",
    "Umber", "Vale", "Willow", "Yarrow", "Zephyr", "Aster", "Bramble", "Clover", "Drift",
    "Elm", "Flint", "Garnet", "Hazel", "Ivy", "Jasper", "Kite", "Lark", "Moss", "North", "Oak",
];

/// Generate `n` unique display names.
///
/// The first names come straight from a fixed pool; once the pool is used up
/// a numeric suffix keeps them unique (`"Alder 2"`, `"Birch 2"`, ...).
pub fn generate_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let base = NAME_POOL[i % NAME_POOL.len()];
            match i / NAME_POOL.len() {
                0 => base.to_string(),
                lap => format!("{} {}", base, lap + 1),
            }
        })
        .collect()
}

/// One player with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Player reference used throughout the schedule.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
}

/// Everyone taking part in the tournament.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    /// Participants ordered by id.
    pub people: Vec<Participant>,
}

impl Participants {
    /// Build participants from names; ids are assigned in order from 0.
    pub fn new(names: Vec<String>) -> Self {
        let people = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| Participant { id, name })
            .collect();
        Self { people }
    }

    /// Participants with generated names.
    pub fn create(n: usize) -> Self {
        Self::new(generate_names(n))
    }

    /// All player references.
    pub fn all(&self) -> Vec<PlayerId> {
        self.people.iter().map(|p| p.id).collect()
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether nobody takes part.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Display name of a player, if known.
    pub fn name(&self, id: PlayerId) -> Option<&str> {
        self.people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_names_are_unique() {
        let names = generate_names(100);
        assert_eq!(names.len(), 100);

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(names[0], "Alder");
        assert_eq!(names[NAME_POOL.len()], "Alder 2");
    }

    #[test]
    fn test_participants_ids_follow_order() {
        let participants = Participants::create(12);

        assert_eq!(participants.len(), 12);
        assert_eq!(participants.all(), (0..12).collect::<Vec<_>>());
        assert_eq!(participants.name(1), Some("Birch"));
        assert_eq!(participants.name(12), None);
    }
}
