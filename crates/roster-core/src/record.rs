//! # Record Model
//!
//! Typed projections of house and character records, and the two derived
//! indexes (`houses_by_number`, `chars_by_id`) that the relational checks
//! consume. Indexes are ordered maps so every traversal is deterministic.
//!
//! Projections are lenient: a field that fails its type check becomes
//! `None` (or is dropped from a list) rather than disqualifying the record.
//! The structural validators report the failure; the relational checks
//! simply work with whatever is resolvable.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::scalar::{as_strict_int, non_empty_str};

/// Reserved id of the player character.
pub const PLAYER_ID: i64 = 0;

/// House number reserved for the player.
pub const PLAYER_HOUSE: i64 = 7;

/// Number of houses on the street, numbered `0..HOUSE_COUNT`.
pub const HOUSE_COUNT: i64 = 30;

/// `family.spouse` sentinel meaning "no spouse".
pub const NO_SPOUSE: i64 = -1;

/// Minimum age for marriage, parenthood, and guardianship.
pub const ADULT_AGE: i64 = 18;

// ---------------------------------------------------------------------------
// Houses
// ---------------------------------------------------------------------------

/// Type-checked footprint of a house lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge along the x axis.
    pub x: f64,
    /// Start of the lot along the street (z axis).
    pub z: f64,
    /// Lot width.
    pub xsize: f64,
    /// Lot depth along the street.
    pub zsize: i64,
}

/// A house entry that passed the structural gate.
#[derive(Debug, Clone, PartialEq)]
pub struct House {
    /// `houseNumber`.
    pub number: i64,
    /// Trimmed surname, if present and non-empty.
    pub surname: Option<String>,
    /// Integer occupant ids in file order; non-integer entries are dropped.
    pub occupants: Vec<i64>,
    /// Bounds, if every field passed its type check.
    pub bounds: Option<Bounds>,
}

impl House {
    /// Returns true for the player's house.
    pub fn is_player_house(&self) -> bool {
        self.number == PLAYER_HOUSE
    }

    /// Occupant ids excluding the player sentinel.
    pub fn residents(&self) -> impl Iterator<Item = i64> + '_ {
        self.occupants.iter().copied().filter(|&id| id != PLAYER_ID)
    }
}

/// `houses_by_number`.
pub type HouseIndex = BTreeMap<i64, House>;

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// Character gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// `"M"`.
    Male,
    /// `"F"`.
    Female,
}

impl Gender {
    /// Parse the roster encoding; anything other than `"M"`/`"F"` is unknown.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value?.as_str()? {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }

    /// Roster encoding.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The recorded value of `family.spouse`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SpouseRef {
    /// No `family` object or no `spouse` key.
    #[default]
    Missing,
    /// The `-1` sentinel.
    Unmarried,
    /// A partner id.
    Id(i64),
    /// Present but not an integer.
    Invalid(Value),
}

impl SpouseRef {
    /// Read `spouse` out of a family object.
    pub fn from_family(family: &Map<String, Value>) -> Self {
        match family.get("spouse") {
            None => SpouseRef::Missing,
            Some(raw) => match as_strict_int(raw) {
                Some(NO_SPOUSE) => SpouseRef::Unmarried,
                Some(id) => SpouseRef::Id(id),
                None => SpouseRef::Invalid(raw.clone()),
            },
        }
    }

    /// Partner id, if one is recorded.
    pub fn id(&self) -> Option<i64> {
        match self {
            SpouseRef::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for SpouseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpouseRef::Missing => f.write_str("null"),
            SpouseRef::Unmarried => write!(f, "{NO_SPOUSE}"),
            SpouseRef::Id(id) => write!(f, "{id}"),
            SpouseRef::Invalid(raw) => write!(f, "{raw}"),
        }
    }
}

/// Family links as recorded on one character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Family {
    /// `family.spouse`.
    pub spouse: SpouseRef,
    /// Integer entries of `family.children`; non-integer entries are dropped.
    pub children: Vec<i64>,
    /// Every entry of the raw `family.children` array.
    pub listed_children: Vec<Value>,
}

impl Family {
    /// Project a raw `family` value; anything but an object yields the default.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(family) = value.and_then(Value::as_object) else {
            return Family::default();
        };
        let listed_children = family
            .get("children")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Family {
            spouse: SpouseRef::from_family(family),
            children: listed_children.iter().filter_map(as_strict_int).collect(),
            listed_children,
        }
    }
}

/// The fields of a character record the relational checks depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// `id`.
    pub id: i64,
    /// Trimmed `lastName`, if present and non-empty.
    pub last_name: Option<String>,
    /// `gender`, if `M` or `F`.
    pub gender: Option<Gender>,
    /// `age`, if an integer.
    pub age: Option<i64>,
    /// `family`.
    pub family: Family,
}

impl Character {
    /// Project a raw character object whose `id` has already been read.
    pub fn from_record(id: i64, record: &Map<String, Value>) -> Self {
        Character {
            id,
            last_name: non_empty_str(record.get("lastName")).map(str::to_string),
            gender: Gender::from_value(record.get("gender")),
            age: record.get("age").and_then(as_strict_int),
            family: Family::from_value(record.get("family")),
        }
    }

    /// Known age of at least [`ADULT_AGE`].
    pub fn is_adult(&self) -> bool {
        self.age.is_some_and(|age| age >= ADULT_AGE)
    }
}

/// `chars_by_id`.
pub type CharacterIndex = BTreeMap<i64, Character>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn character_projection_reads_relational_fields() {
        let record = object(json!({
            "id": 12,
            "lastName": " Okafor ",
            "gender": "F",
            "age": 41,
            "family": {"spouse": 13, "children": [14, 15]}
        }));
        let c = Character::from_record(12, &record);
        assert_eq!(c.last_name.as_deref(), Some("Okafor"));
        assert_eq!(c.gender, Some(Gender::Female));
        assert_eq!(c.age, Some(41));
        assert_eq!(c.family.spouse, SpouseRef::Id(13));
        assert_eq!(c.family.children, vec![14, 15]);
        assert!(c.is_adult());
    }

    #[test]
    fn character_projection_is_lenient() {
        let record = object(json!({
            "id": 3,
            "lastName": "",
            "gender": "X",
            "age": true,
            "family": {"spouse": "nobody", "children": [4, false, "5"]}
        }));
        let c = Character::from_record(3, &record);
        assert_eq!(c.last_name, None);
        assert_eq!(c.gender, None);
        assert_eq!(c.age, None);
        assert_eq!(c.family.spouse, SpouseRef::Invalid(json!("nobody")));
        assert_eq!(c.family.children, vec![4]);
        assert_eq!(c.family.listed_children, vec![json!(4), json!(false), json!("5")]);
        assert!(!c.is_adult());
    }

    #[test]
    fn spouse_sentinel_and_missing() {
        let unmarried = Family::from_value(Some(&json!({"spouse": -1, "children": []})));
        assert_eq!(unmarried.spouse, SpouseRef::Unmarried);
        assert_eq!(unmarried.spouse.id(), None);
        assert_eq!(unmarried.spouse.to_string(), "-1");

        let missing = Family::from_value(Some(&json!({"children": []})));
        assert_eq!(missing.spouse, SpouseRef::Missing);
        assert_eq!(missing.spouse.to_string(), "null");

        assert_eq!(Family::from_value(Some(&json!([1, 2]))), Family::default());
    }

    #[test]
    fn boolean_spouse_is_invalid_not_an_id() {
        let family = Family::from_value(Some(&json!({"spouse": true, "children": []})));
        assert_eq!(family.spouse, SpouseRef::Invalid(json!(true)));
        assert_eq!(family.spouse.id(), None);
    }

    #[test]
    fn residents_exclude_player() {
        let house = House {
            number: 7,
            surname: None,
            occupants: vec![0],
            bounds: None,
        };
        assert!(house.is_player_house());
        assert_eq!(house.residents().count(), 0);
    }
}
