//! # Character Roster Validation
//!
//! Validates `characters.json`: roster size, identity fields, enumerations,
//! list-shaped profile fields, the `socialMedia` and `family` sub-objects,
//! and roster-wide uniqueness of first names and handles. Produces the
//! `chars_by_id` index consumed by the relationship and cross-file checks.
//!
//! A record is indexed as soon as its `id` is read, before any field check,
//! so relational checks still see partially malformed characters.

use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

use serde_json::{Map, Value};

use roster_core::scalar::{
    as_strict_int, describe, is_identifier, is_single_token, is_strict_int, non_empty_str,
    normalize_case,
};
use roster_core::{Character, CharacterIndex, IssueSink, PLAYER_ID};

/// Allowed number of characters in the roster (the player is not listed).
pub const ROSTER_SIZE: RangeInclusive<usize> = 70..=80;

/// Youngest allowed age.
pub const MIN_AGE: i64 = 6;

/// Allowed `accentLanguage` values, in sorted order.
pub const ACCENT_LANGUAGES: [&str; 5] =
    ["African", "Canadian", "Chinese", "MiddleEastern", "SouthAsian"];

const FAMILY_KEYS: [&str; 2] = ["spouse", "children"];

/// Roster-wide uniqueness state: normalized key to the first id that used it.
#[derive(Default)]
struct SeenNames {
    first_names: HashMap<String, i64>,
    handles: HashMap<String, i64>,
}

/// Validate the character roster.
pub fn validate_characters(document: &Value) -> (CharacterIndex, IssueSink) {
    let mut sink = IssueSink::new();
    let mut characters = CharacterIndex::new();

    let Some(entries) = document.as_array() else {
        sink.error("2.2", "characters.json: expected a top-level JSON array.");
        return (characters, sink);
    };

    if !ROSTER_SIZE.contains(&entries.len()) {
        sink.error(
            "2.1/2.4.1",
            format!(
                "characters.json: expected {}..{} NPC entries, found {}.",
                ROSTER_SIZE.start(),
                ROSTER_SIZE.end(),
                entries.len()
            ),
        );
    }

    let mut seen = SeenNames::default();
    for (idx, entry) in entries.iter().enumerate() {
        let Some(record) = entry.as_object() else {
            sink.error(
                "2.2",
                format!("characters.json: entry index {idx} is not an object."),
            );
            continue;
        };

        let Some(id) = record.get("id").and_then(as_strict_int) else {
            sink.error(
                "2.2.1",
                format!("characters.json: entry index {idx} missing/invalid integer id."),
            );
            continue;
        };
        if id == PLAYER_ID {
            sink.error(
                "2.4.1",
                "characters.json: player id=0 must NOT appear in characters.json.",
            );
        }
        if characters.contains_key(&id) {
            sink.error("2.2.1", format!("characters.json: duplicate NPC id={id}."));
            continue;
        }
        characters.insert(id, Character::from_record(id, record));

        check_names(id, record, &mut seen, &mut sink);
        check_profile(id, record, &mut sink);
        check_social_media(id, record, &mut seen, &mut sink);
        check_family(id, record, &mut sink);
    }

    tracing::debug!(
        entries = entries.len(),
        indexed = characters.len(),
        "validated character roster"
    );

    (characters, sink)
}

fn check_names(id: i64, record: &Map<String, Value>, seen: &mut SeenNames, sink: &mut IssueSink) {
    let raw_first = record.get("firstName");
    match non_empty_str(raw_first) {
        None => sink.error("2.2.2", format!("NPC id={id}: missing/invalid firstName.")),
        Some(first) => {
            if !is_identifier(first) {
                sink.error(
                    "2.2.2",
                    format!(
                        "NPC id={id}: firstName {} has non A-Za-z characters.",
                        describe(raw_first)
                    ),
                );
            }
            match seen.first_names.get(&normalize_case(first)) {
                Some(other) => sink.error(
                    "2.6",
                    format!(
                        "NPC id={id}: firstName {} duplicates NPC id={other} (case-insensitive).",
                        describe(raw_first)
                    ),
                ),
                None => {
                    seen.first_names.insert(normalize_case(first), id);
                }
            }
        }
    }

    let raw_last = record.get("lastName");
    match non_empty_str(raw_last) {
        None => sink.error("2.2.2", format!("NPC id={id}: missing/invalid lastName.")),
        Some(last) if !is_identifier(last) => sink.error(
            "2.2.2",
            format!(
                "NPC id={id}: lastName {} has non A-Za-z characters.",
                describe(raw_last)
            ),
        ),
        Some(_) => {}
    }
}

fn check_profile(id: i64, record: &Map<String, Value>, sink: &mut IssueSink) {
    let gender = record.get("gender");
    if !matches!(gender.and_then(Value::as_str), Some("M" | "F")) {
        sink.error(
            "2.2.3",
            format!(
                "NPC id={id}: gender must be 'M' or 'F', got {}.",
                describe(gender)
            ),
        );
    }

    let age = record.get("age");
    match age.and_then(as_strict_int) {
        None => sink.error(
            "2.2.4",
            format!("NPC id={id}: age must be an integer, got {}.", describe(age)),
        ),
        Some(years) if years < MIN_AGE => sink.error(
            "2.2.4.2",
            format!("NPC id={id}: age={years} is not allowed (must be >= {MIN_AGE})."),
        ),
        Some(_) => {}
    }

    let accent = record.get("accentLanguage");
    if !accent
        .and_then(Value::as_str)
        .is_some_and(|a| ACCENT_LANGUAGES.contains(&a))
    {
        sink.error(
            "2.2.5",
            format!(
                "NPC id={id}: accentLanguage must be one of {ACCENT_LANGUAGES:?}, got {}.",
                describe(accent)
            ),
        );
    }

    if non_empty_str(record.get("career")).is_none() {
        sink.error("2.2.6", format!("NPC id={id}: missing/invalid career."));
    }

    let religion = record.get("religion");
    if !non_empty_str(religion).is_some_and(is_single_token) {
        sink.error(
            "2.2.7",
            format!(
                "NPC id={id}: religion must be a single word, got {}.",
                describe(religion)
            ),
        );
    }

    check_word_triplet(id, record, "personalityTraits", "2.2.9", sink);
    check_word_triplet(id, record, "interests", "2.2.10", sink);

    if string_list(record.get("about"), 5).is_none() {
        sink.error(
            "2.2.11",
            format!("NPC id={id}: about must be a list of exactly 5 non-empty strings."),
        );
    }
}

/// Exactly three non-empty strings; repeated entries are only a warning.
fn check_word_triplet(
    id: i64,
    record: &Map<String, Value>,
    field: &str,
    requirement: &'static str,
    sink: &mut IssueSink,
) {
    let Some(words) = string_list(record.get(field), 3) else {
        sink.error(
            requirement,
            format!("NPC id={id}: {field} must be a list of 3 strings."),
        );
        return;
    };
    let distinct: BTreeSet<String> = words.iter().map(|w| normalize_case(w)).collect();
    if distinct.len() != words.len() {
        sink.warning(
            requirement,
            format!("NPC id={id}: {field} contains duplicates: {words:?}"),
        );
    }
}

/// An array of exactly `len` strings, each with non-whitespace content.
fn string_list(value: Option<&Value>, len: usize) -> Option<Vec<&str>> {
    let items = value?.as_array()?;
    if items.len() != len {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_str().filter(|s| !s.trim().is_empty()))
        .collect()
}

fn check_social_media(
    id: i64,
    record: &Map<String, Value>,
    seen: &mut SeenNames,
    sink: &mut IssueSink,
) {
    let Some(social) = record.get("socialMedia").and_then(Value::as_object) else {
        sink.error(
            "2.2.12",
            format!("NPC id={id}: missing/invalid socialMedia object."),
        );
        return;
    };

    let raw_handle = social.get("handle");
    match non_empty_str(raw_handle) {
        None => sink.error(
            "2.2.12.1",
            format!("NPC id={id}: socialMedia.handle missing/invalid."),
        ),
        Some(handle) => {
            if handle.contains('@') {
                sink.error(
                    "2.2.12.1",
                    format!(
                        "NPC id={id}: socialMedia.handle must not include '@': {}.",
                        describe(raw_handle)
                    ),
                );
            }
            match seen.handles.get(&normalize_case(handle)) {
                Some(other) => sink.error(
                    "2.7",
                    format!(
                        "NPC id={id}: socialMedia.handle {} duplicates NPC id={other} (case-insensitive).",
                        describe(raw_handle)
                    ),
                ),
                None => {
                    seen.handles.insert(normalize_case(handle), id);
                }
            }
        }
    }

    if non_empty_str(social.get("bio")).is_none() {
        sink.error(
            "2.2.12.2",
            format!("NPC id={id}: socialMedia.bio missing/invalid."),
        );
    }

    for (key, requirement) in [("followers", "2.2.12.3"), ("following", "2.2.12.4")] {
        let count = social.get(key).and_then(as_strict_int);
        if !count.is_some_and(|n| n >= 0) {
            sink.error(
                requirement,
                format!("NPC id={id}: socialMedia.{key} must be int >=0."),
            );
        }
    }
}

fn check_family(id: i64, record: &Map<String, Value>, sink: &mut IssueSink) {
    let Some(family) = record.get("family").and_then(Value::as_object) else {
        sink.error(
            "2.2.8",
            format!("NPC id={id}: missing/invalid family object."),
        );
        return;
    };

    let extra: BTreeSet<&str> = family
        .keys()
        .map(String::as_str)
        .filter(|key| !FAMILY_KEYS.contains(key))
        .collect();
    if !extra.is_empty() {
        sink.error(
            "2.2.8.1",
            format!(
                "NPC id={id}: family has unsupported keys {:?} (allowed: spouse, children).",
                extra.into_iter().collect::<Vec<_>>()
            ),
        );
    }

    match family.get("spouse").and_then(as_strict_int) {
        None => sink.error(
            "2.2.8",
            format!("NPC id={id}: family.spouse must be an int (or -1)."),
        ),
        Some(spouse) => {
            if spouse == id {
                sink.error("2.2.8", format!("NPC id={id}: family.spouse cannot be self."));
            }
            if spouse == PLAYER_ID {
                sink.error(
                    "2.4.1",
                    format!("NPC id={id}: family.spouse references player id=0."),
                );
            }
        }
    }

    let children = family
        .get("children")
        .and_then(Value::as_array)
        .filter(|list| list.iter().all(is_strict_int));
    match children {
        None => sink.error(
            "2.2.8",
            format!("NPC id={id}: family.children must be a list of integer ids."),
        ),
        Some(list) => {
            let ids: Vec<i64> = list.iter().filter_map(as_strict_int).collect();
            if ids.contains(&PLAYER_ID) {
                sink.error(
                    "2.4.1",
                    format!("NPC id={id}: family.children references player id=0."),
                );
            }
            if ids.contains(&id) {
                sink.error(
                    "2.2.8",
                    format!("NPC id={id}: family.children cannot contain self."),
                );
            }
        }
    }
}
