//! A complete, valid pair of rosters built in code.
//!
//! 29 households plus the player's house 7. The first 12 households hold a
//! married couple and one child; the other 17 hold a married couple. That
//! is 70 characters with ids `1..=70`, assigned house by house in ascending
//! house-number order. Each side of the street is 10 lots of depth 13
//! followed by 5 lots of depth 14.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub const FAMILIES_WITH_CHILD: usize = 12;

pub struct Dataset {
    pub characters: Value,
    pub houses: Value,
}

/// Two ASCII letters unique for `n < 676`.
pub fn letters(n: usize) -> String {
    let hi = (b'A' + (n / 26) as u8) as char;
    let lo = (b'a' + (n % 26) as u8) as char;
    format!("{hi}{lo}")
}

pub fn surname(house: i64) -> String {
    format!("Fam{}", letters(house as usize))
}

pub fn npc(id: i64, last_name: &str, gender: &str, age: i64, spouse: i64, children: &[i64]) -> Value {
    json!({
        "id": id,
        "firstName": format!("Npc{}", letters(id as usize)),
        "lastName": last_name,
        "gender": gender,
        "age": age,
        "accentLanguage": "Canadian",
        "career": "Teacher",
        "religion": "Agnostic",
        "personalityTraits": ["patient", "witty", "loyal"],
        "interests": ["gardening", "chess", "baking"],
        "about": ["One.", "Two.", "Three.", "Four.", "Five."],
        "socialMedia": {
            "handle": format!("user{id}"),
            "bio": "Lives on the street.",
            "followers": 120,
            "following": 80
        },
        "family": {"spouse": spouse, "children": children}
    })
}

fn lot(number: i64, z: i64, zsize: i64) -> Value {
    json!({
        "x": if number % 2 == 0 { 0 } else { 40 },
        "z": z,
        "xsize": 30,
        "zsize": zsize
    })
}

pub fn valid_dataset() -> Dataset {
    let mut characters = Vec::new();
    let mut houses = Vec::new();
    let mut next_id = 1;
    let mut households = 0;
    let mut z_by_side = [0i64, 0i64];

    for number in 0..30i64 {
        let side = (number % 2) as usize;
        let position = (number / 2) as usize;
        let zsize = if position < 10 { 13 } else { 14 };
        let bounds = lot(number, z_by_side[side], zsize);
        z_by_side[side] += zsize;

        if number == 7 {
            houses.push(json!({"houseNumber": 7, "occupants": [0], "bounds": bounds}));
            continue;
        }

        let name = surname(number);
        let (husband, wife) = (next_id, next_id + 1);
        let mut occupants = vec![husband, wife];
        let children: Vec<i64> = if households < FAMILIES_WITH_CHILD {
            vec![next_id + 2]
        } else {
            vec![]
        };
        characters.push(npc(husband, &name, "M", 40, wife, &children));
        characters.push(npc(wife, &name, "F", 38, husband, &children));
        for &child in &children {
            let gender = if child % 2 == 0 { "F" } else { "M" };
            characters.push(npc(child, &name, gender, 10, -1, &[]));
            occupants.push(child);
        }
        next_id += occupants.len() as i64;
        households += 1;

        houses.push(json!({
            "houseNumber": number,
            "surname": name,
            "occupants": occupants,
            "bounds": bounds
        }));
    }

    Dataset {
        characters: Value::Array(characters),
        houses: Value::Array(houses),
    }
}

impl Dataset {
    pub fn character_mut(&mut self, id: i64) -> &mut Value {
        self.characters
            .as_array_mut()
            .unwrap()
            .iter_mut()
            .find(|c| c["id"] == json!(id))
            .unwrap()
    }

    pub fn house_mut(&mut self, number: i64) -> &mut Value {
        self.houses
            .as_array_mut()
            .unwrap()
            .iter_mut()
            .find(|h| h["houseNumber"] == json!(number))
            .unwrap()
    }

    pub fn remove_house(&mut self, number: i64) {
        self.houses
            .as_array_mut()
            .unwrap()
            .retain(|h| h["houseNumber"] != json!(number));
    }

    /// Write both rosters into `dir` as pretty-printed JSON.
    pub fn write_to(&self, dir: &Path) -> (PathBuf, PathBuf) {
        let characters = dir.join("characters.json");
        let houses = dir.join("houses.json");
        std::fs::write(&characters, serde_json::to_string_pretty(&self.characters).unwrap()).unwrap();
        std::fs::write(&houses, serde_json::to_string_pretty(&self.houses).unwrap()).unwrap();
        (characters, houses)
    }
}
