//! # House Roster Validation
//!
//! Validates `houses.json`: entry count, numbering, occupant lists, the
//! player-house sentinel, surnames, and per-house bounds geometry. Produces
//! the `houses_by_number` index consumed by the street and cross-file checks.
//!
//! Entries with a duplicate `houseNumber` or an unusable occupants list are
//! reported once and then skipped, so one malformed entry does not fan out
//! into a cascade of derived errors.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use roster_core::scalar::{
    above, approx_equal, as_number, as_strict_int, below, describe, is_identifier, non_empty_str,
};
use roster_core::{Bounds, House, HouseIndex, IssueSink, HOUSE_COUNT, PLAYER_HOUSE, PLAYER_ID};

use crate::street::validate_street_geometry;

/// Maximum number of occupants per house.
pub const MAX_OCCUPANTS: usize = 6;

/// Width of every lot.
pub const LOT_WIDTH: f64 = 30.0;

/// Far edge of the street along x.
pub const STREET_WIDTH: f64 = 70.0;

/// Far edge of the street along z.
pub const STREET_LENGTH: f64 = 200.0;

/// x of every even-numbered lot.
pub const EVEN_SIDE_X: f64 = 0.0;

/// x of every odd-numbered lot.
pub const ODD_SIDE_X: f64 = 40.0;

/// Allowed lot depths.
pub const LOT_DEPTH: std::ops::RangeInclusive<i64> = 10..=16;

const BOUNDS_KEYS: [&str; 4] = ["x", "z", "xsize", "zsize"];

/// Validate the house roster.
///
/// Returns the index of every house that passed the structural gate along
/// with all issues found, including street geometry.
pub fn validate_houses(document: &Value) -> (HouseIndex, IssueSink) {
    let mut sink = IssueSink::new();
    let mut houses = HouseIndex::new();

    let Some(entries) = document.as_array() else {
        sink.error("2.3", "houses.json: expected a top-level JSON array.");
        return (houses, sink);
    };

    if entries.len() != HOUSE_COUNT as usize {
        sink.error(
            "2.3",
            format!(
                "houses.json: expected {HOUSE_COUNT} houses, found {}.",
                entries.len()
            ),
        );
    }

    let mut seen = BTreeSet::new();
    for (idx, entry) in entries.iter().enumerate() {
        let Some(record) = entry.as_object() else {
            sink.error(
                "2.3",
                format!("houses.json: entry index {idx} is not an object."),
            );
            continue;
        };

        let Some(number) = record.get("houseNumber").and_then(as_strict_int) else {
            sink.error(
                "2.3.1",
                format!("houses.json: entry index {idx} missing/invalid houseNumber."),
            );
            continue;
        };
        if !(0..HOUSE_COUNT).contains(&number) {
            sink.error(
                "2.3.1",
                format!(
                    "houses.json: houseNumber {number} out of range 0..{}.",
                    HOUSE_COUNT - 1
                ),
            );
        }
        if !seen.insert(number) {
            sink.error(
                "2.3.1",
                format!("houses.json: duplicate houseNumber {number}."),
            );
            continue;
        }

        let Some(raw_occupants) = record
            .get("occupants")
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
        else {
            sink.error(
                "2.3.3/2.3.4",
                format!("houses.json: house {number} missing/invalid occupants list."),
            );
            continue;
        };
        let occupants = check_occupants(number, raw_occupants, &mut sink);

        let surname = if number == PLAYER_HOUSE {
            check_player_house(record, raw_occupants, &mut sink);
            None
        } else {
            check_surname(number, record, &mut sink)
        };

        let bounds = validate_bounds(number, record, &mut sink);

        houses.insert(
            number,
            House {
                number,
                surname,
                occupants,
                bounds,
            },
        );
    }

    let missing: Vec<i64> = (0..HOUSE_COUNT).filter(|n| !seen.contains(n)).collect();
    if !missing.is_empty() {
        sink.error(
            "2.3.1",
            format!("houses.json: missing houseNumber(s): {missing:?}."),
        );
    }

    check_surname_uniqueness(&houses, &mut sink);

    tracing::debug!(
        entries = entries.len(),
        indexed = houses.len(),
        "validated house roster"
    );

    sink.absorb(validate_street_geometry(&houses));
    (houses, sink)
}

/// Occupant count and element types; returns the integer ids.
fn check_occupants(number: i64, raw: &[Value], sink: &mut IssueSink) -> Vec<i64> {
    if raw.len() > MAX_OCCUPANTS {
        sink.error(
            "2.3.4",
            format!(
                "houses.json: house {number} occupants count {} not in [1, {MAX_OCCUPANTS}].",
                raw.len()
            ),
        );
    }
    let mut ids = Vec::with_capacity(raw.len());
    for occupant in raw {
        match as_strict_int(occupant) {
            Some(id) => ids.push(id),
            None => sink.error(
                "2.3.3",
                format!("houses.json: house {number} has non-integer occupant id: {occupant}."),
            ),
        }
    }
    ids
}

fn check_player_house(record: &Map<String, Value>, raw_occupants: &[Value], sink: &mut IssueSink) {
    if record.contains_key("surname") {
        sink.error(
            "2.3.2.1",
            format!("houses.json: house {PLAYER_HOUSE} must not define 'surname'."),
        );
    }
    let only_player =
        raw_occupants.len() == 1 && as_strict_int(&raw_occupants[0]) == Some(PLAYER_ID);
    if !only_player {
        sink.error(
            "2.4",
            format!(
                "houses.json: house {PLAYER_HOUSE} occupants must be [{PLAYER_ID}], got {}.",
                Value::Array(raw_occupants.to_vec())
            ),
        );
    }
}

fn check_surname(number: i64, record: &Map<String, Value>, sink: &mut IssueSink) -> Option<String> {
    let Some(surname) = non_empty_str(record.get("surname")) else {
        sink.error(
            "2.3.2",
            format!("houses.json: house {number} missing/invalid surname."),
        );
        return None;
    };
    if !is_identifier(surname) {
        sink.warning(
            "2.3.2",
            format!(
                "houses.json: house {number} surname {} contains non A-Za-z characters.",
                describe(record.get("surname"))
            ),
        );
    }
    Some(surname.to_string())
}

/// Per-house bounds checks.
///
/// A missing object, missing keys, or a wrongly typed field stops the
/// remaining bounds checks for that house and yields `None`.
pub fn validate_bounds(
    number: i64,
    record: &Map<String, Value>,
    sink: &mut IssueSink,
) -> Option<Bounds> {
    let Some(raw) = record.get("bounds").and_then(Value::as_object) else {
        sink.error(
            "2.3.5.1",
            format!("houses.json: house {number} missing/invalid bounds object."),
        );
        return None;
    };

    let missing: Vec<&str> = BOUNDS_KEYS
        .iter()
        .copied()
        .filter(|key| !raw.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        sink.error(
            "2.3.5.2",
            format!("houses.json: house {number} bounds missing key(s): {missing:?}."),
        );
        return None;
    }

    let typed = (
        as_number(&raw["x"]),
        as_number(&raw["z"]),
        as_number(&raw["xsize"]),
        as_strict_int(&raw["zsize"]),
    );
    let (Some(x), Some(z), Some(xsize), Some(zsize)) = typed else {
        sink.error(
            "2.3.5.2",
            format!(
                "houses.json: house {number} bounds must have numeric x/z/xsize and integer zsize; \
                 got x={}, z={}, xsize={}, zsize={}.",
                raw["x"], raw["z"], raw["xsize"], raw["zsize"]
            ),
        );
        return None;
    };

    if below(x, 0.0) || above(x, STREET_WIDTH) {
        sink.error(
            "2.3.5.2.1",
            format!(
                "houses.json: house {number} bounds.x={} out of range [0,{STREET_WIDTH}].",
                raw["x"]
            ),
        );
    }
    if below(z, 0.0) || above(z, STREET_LENGTH) {
        sink.error(
            "2.3.5.2.2",
            format!(
                "houses.json: house {number} bounds.z={} out of range [0,{STREET_LENGTH}].",
                raw["z"]
            ),
        );
    }

    if !approx_equal(xsize, LOT_WIDTH) {
        sink.error(
            "2.3.5.2.3",
            format!(
                "houses.json: house {number} bounds.xsize must be {LOT_WIDTH}, got {}.",
                raw["xsize"]
            ),
        );
    }
    if !LOT_DEPTH.contains(&zsize) {
        sink.error(
            "2.3.5.2.3",
            format!(
                "houses.json: house {number} bounds.zsize must be integer in [{},{}], got {zsize}.",
                LOT_DEPTH.start(),
                LOT_DEPTH.end()
            ),
        );
    }

    if above(x + xsize, STREET_WIDTH) {
        sink.error(
            "2.3.5.2.4",
            format!(
                "houses.json: house {number} bounds.x + xsize = {} exceeds {STREET_WIDTH}.",
                x + xsize
            ),
        );
    }
    let far_edge = z + zsize as f64;
    if above(far_edge, STREET_LENGTH) {
        sink.error(
            "2.3.5.2.5",
            format!("houses.json: house {number} bounds.z + zsize = {far_edge} exceeds {STREET_LENGTH}."),
        );
    }

    // The side rules re-check xsize under their own requirement ids.
    let (requirement, side, side_x) = if number.rem_euclid(2) == 0 {
        ("2.3.6.3.1", "even", EVEN_SIDE_X)
    } else {
        ("2.3.6.3.2", "odd", ODD_SIDE_X)
    };
    if !approx_equal(x, side_x) {
        sink.error(
            requirement,
            format!(
                "houses.json: {side} house {number} must have bounds.x={side_x}, got {}.",
                raw["x"]
            ),
        );
    }
    if !approx_equal(xsize, LOT_WIDTH) {
        sink.error(
            requirement,
            format!(
                "houses.json: {side} house {number} must have bounds.xsize={LOT_WIDTH}, got {}.",
                raw["xsize"]
            ),
        );
    }

    Some(Bounds { x, z, xsize, zsize })
}

/// Declared surnames must be unique across houses (the player house excluded).
fn check_surname_uniqueness(houses: &HouseIndex, sink: &mut IssueSink) {
    let mut by_surname: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for house in houses.values().filter(|h| !h.is_player_house()) {
        if let Some(surname) = house.surname.as_deref() {
            by_surname.entry(surname).or_default().push(house.number);
        }
    }
    for (surname, numbers) in by_surname.into_iter().filter(|(_, n)| n.len() > 1) {
        sink.error(
            "2.5",
            format!(
                "houses.json: duplicate house surname {surname:?} on {} houses: {numbers:?}.",
                numbers.len()
            ),
        );
    }
}
