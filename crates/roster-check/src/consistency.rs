//! # Cross-File Consistency
//!
//! Rules that need both rosters and the relationship maps at once:
//!
//! - **Residency**: every occupant exists, and every character lives in
//!   exactly one house.
//! - **Surnames**: residents carry their house's surname, and no surname is
//!   spread over several houses.
//! - **Kinship**: the residents of a house form one family under the
//!   spouse, parent-child and sibling relations.
//! - **Guardianship**: every minor can reach a resident adult relative.
//!
//! Every check runs regardless of what earlier checks found.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use roster_core::{
    CharacterIndex, House, HouseIndex, IssueSink, ADULT_AGE, PLAYER_HOUSE, PLAYER_ID,
};

use crate::kinship::KinshipGraph;
use crate::relationships::Relationships;

/// Run every cross-file rule.
pub fn check_consistency(
    characters: &CharacterIndex,
    houses: &HouseIndex,
    links: &Relationships,
) -> IssueSink {
    let mut sink = IssueSink::new();
    let residency = Residency::from_houses(houses);

    if characters.contains_key(&PLAYER_ID) {
        sink.error(
            "2.4.1",
            "Player id=0 must not be present in characters.json.",
        );
    }

    check_occupancy(characters, &residency, &mut sink);
    check_surname_spread(characters, &residency, &mut sink);
    for house in houses.values() {
        check_household(house, characters, links, &mut sink);
    }
    check_guardianship(characters, houses, links, &residency, &mut sink);
    check_minor_family(characters, &mut sink);

    tracing::debug!(
        residents = residency.houses_of.len(),
        issues = sink.len(),
        "checked cross-file consistency"
    );
    sink
}

// ---------------------------------------------------------------------------
// Residency
// ---------------------------------------------------------------------------

/// Where each occupant id is listed.
struct Residency {
    /// Occupant id to every house listing it, ascending, one entry per listing.
    houses_of: BTreeMap<i64, Vec<i64>>,
}

impl Residency {
    fn from_houses(houses: &HouseIndex) -> Self {
        let mut houses_of: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for house in houses.values() {
            for &occupant in &house.occupants {
                houses_of.entry(occupant).or_default().push(house.number);
            }
        }
        Residency { houses_of }
    }

    /// The lowest-numbered house listing `id`.
    fn home_of(&self, id: i64) -> Option<i64> {
        self.houses_of.get(&id).and_then(|h| h.first()).copied()
    }

    fn distinct_houses(&self, id: i64) -> BTreeSet<i64> {
        self.houses_of
            .get(&id)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn check_occupancy(characters: &CharacterIndex, residency: &Residency, sink: &mut IssueSink) {
    for (&occupant, listed_in) in &residency.houses_of {
        if occupant == PLAYER_ID {
            continue;
        }
        if !characters.contains_key(&occupant) {
            sink.error(
                "2.3.3/2.8",
                format!(
                    "houses.json: occupant id={occupant} appears in house(s) {listed_in:?} but is missing in characters.json."
                ),
            );
        }
        let distinct = residency.distinct_houses(occupant);
        if distinct.len() != 1 {
            sink.error(
                "2.8",
                format!(
                    "NPC id={occupant} appears in multiple houses: {:?} (must be exactly one).",
                    distinct.into_iter().collect::<Vec<_>>()
                ),
            );
        }
    }

    for &id in characters.keys().filter(|&&id| id != PLAYER_ID) {
        if !residency.houses_of.contains_key(&id) {
            sink.error(
                "2.8",
                format!("NPC id={id} does not appear in any house occupants list."),
            );
            continue;
        }
        let distinct = residency.distinct_houses(id);
        if distinct.len() != 1 {
            sink.error(
                "2.8",
                format!(
                    "NPC id={id} appears in multiple houses {:?} (must be 1).",
                    distinct.into_iter().collect::<Vec<_>>()
                ),
            );
        }
    }
}

/// A last name carried by residents of more than one house.
fn check_surname_spread(characters: &CharacterIndex, residency: &Residency, sink: &mut IssueSink) {
    let mut homes_by_name: BTreeMap<&str, BTreeSet<i64>> = BTreeMap::new();
    for (&id, character) in characters {
        if id == PLAYER_ID {
            continue;
        }
        let (Some(home), Some(name)) = (residency.home_of(id), character.last_name.as_deref())
        else {
            continue;
        };
        homes_by_name.entry(name).or_default().insert(home);
    }
    for (name, homes) in homes_by_name.into_iter().filter(|(_, h)| h.len() > 1) {
        sink.error(
            "2.5",
            format!(
                "Surname {name:?} appears across multiple houses {:?} (must be unique per house).",
                homes.into_iter().collect::<Vec<_>>()
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Households
// ---------------------------------------------------------------------------

/// Surname binding and kinship connectivity for one house.
fn check_household(
    house: &House,
    characters: &CharacterIndex,
    links: &Relationships,
    sink: &mut IssueSink,
) {
    let number = house.number;
    if house.is_player_house() {
        if house.occupants != [PLAYER_ID] {
            sink.error(
                "2.4",
                format!(
                    "house {PLAYER_HOUSE} must be [{PLAYER_ID}], got {:?}",
                    house.occupants
                ),
            );
        }
        return;
    }

    for &occupant in &house.occupants {
        if occupant == PLAYER_ID {
            sink.error(
                "2.4",
                format!(
                    "house {number}: player id={PLAYER_ID} must not live in houses other than {PLAYER_HOUSE}."
                ),
            );
            continue;
        }
        // A missing surname was already reported by the house validator.
        let (Some(surname), Some(last_name)) = (
            house.surname.as_deref(),
            characters.get(&occupant).and_then(|c| c.last_name.as_deref()),
        ) else {
            continue;
        };
        if last_name != surname {
            sink.error(
                "2.3.2/2.9",
                format!(
                    "house {number}: occupant id={occupant} lastName={last_name:?} != house surname {surname:?}."
                ),
            );
        }
    }

    let residents: Vec<i64> = house
        .residents()
        .filter(|id| characters.contains_key(id))
        .collect();
    let graph = KinshipGraph::for_household(&residents, links);
    if graph.len() >= 2 && !graph.is_connected() {
        sink.error(
            "2.9",
            format!(
                "house {number}: occupants are not all related under allowed relationships. \
                 Disconnected components: {:?}",
                graph.components()
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Minors
// ---------------------------------------------------------------------------

/// Every minor must reach an adult relative within their own house.
fn check_guardianship(
    characters: &CharacterIndex,
    houses: &HouseIndex,
    links: &Relationships,
    residency: &Residency,
    sink: &mut IssueSink,
) {
    let is_adult = |id: i64| characters.get(&id).is_some_and(|c| c.is_adult());

    for (&id, character) in characters {
        if id == PLAYER_ID {
            continue;
        }
        let Some(age) = character.age.filter(|&age| age < ADULT_AGE) else {
            continue;
        };
        let Some(home) = residency.home_of(id) else {
            continue;
        };
        let Some(house) = houses.get(&home) else {
            continue;
        };

        let household: Vec<i64> = house
            .occupants
            .iter()
            .copied()
            .filter(|id| characters.contains_key(id))
            .collect();
        let graph = KinshipGraph::for_household(&household, links);
        if graph.find_reachable(id, is_adult).is_some() {
            continue;
        }

        let adults: BTreeSet<i64> = household.iter().copied().filter(|&o| is_adult(o)).collect();
        sink.error(
            "2.2.4.1",
            format!(
                "Minor NPC id={id} age={age} in house {home} does not live with a related adult family member. \
                 Adult occupants present: {:?}",
                adults.into_iter().collect::<Vec<_>>()
            ),
        );
    }
}

/// Minors may neither be married nor list children.
fn check_minor_family(characters: &CharacterIndex, sink: &mut IssueSink) {
    for (&id, character) in characters {
        let Some(age) = character.age.filter(|&age| age < ADULT_AGE) else {
            continue;
        };
        if let Some(spouse) = character.family.spouse.id() {
            sink.error(
                "2.2.8.4",
                format!("NPC id={id} age={age} is married (spouse={spouse})."),
            );
        }
        let listed = &character.family.listed_children;
        if !listed.is_empty() {
            let rendered: Vec<String> = listed.iter().map(Value::to_string).collect();
            sink.error(
                "2.2.8.5",
                format!(
                    "NPC id={id} age={age} has children listed: [{}].",
                    rendered.join(", ")
                ),
            );
        }
    }
}
