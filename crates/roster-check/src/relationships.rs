//! # Relationship Indexes
//!
//! Derives the three family maps from `chars_by_id` and validates the
//! relationship-level invariants over them: spouse cardinality and
//! symmetry, the marriage gender and age rules, parent age and age gap,
//! child existence, and the two-parent rules.
//!
//! Links are collected first without any validation. Only integer spouse
//! and child values contribute; everything else was already reported by
//! the character validator.

use std::collections::{BTreeMap, BTreeSet};

use roster_core::{CharacterIndex, IssueSink, ADULT_AGE};

/// Maximum number of distinct parents a child may have.
pub const MAX_PARENTS: usize = 2;

/// The derived family maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    /// `id -> spouse id`, only for characters with a recorded partner.
    pub spouse_of: BTreeMap<i64, i64>,
    /// `parent id -> child ids` as listed on the parent.
    pub children_of_parent: BTreeMap<i64, BTreeSet<i64>>,
    /// `child id -> parent ids`, the inverse of `children_of_parent`.
    pub parents_of_child: BTreeMap<i64, BTreeSet<i64>>,
}

impl Relationships {
    /// Collect raw links without validating them.
    pub fn from_characters(characters: &CharacterIndex) -> Self {
        let mut links = Relationships::default();
        for (&id, character) in characters {
            if let Some(spouse) = character.family.spouse.id() {
                links.spouse_of.insert(id, spouse);
            }
            for &child in &character.family.children {
                links.children_of_parent.entry(id).or_default().insert(child);
                links.parents_of_child.entry(child).or_default().insert(id);
            }
        }
        links
    }

    /// Recorded partner of `id`.
    pub fn spouse(&self, id: i64) -> Option<i64> {
        self.spouse_of.get(&id).copied()
    }

    /// Children listed by `id`.
    pub fn children(&self, id: i64) -> impl Iterator<Item = i64> + '_ {
        self.children_of_parent.get(&id).into_iter().flatten().copied()
    }

    /// Parents listing `id` as a child.
    pub fn parents(&self, id: i64) -> Option<&BTreeSet<i64>> {
        self.parents_of_child.get(&id)
    }

    /// True if `a` and `b` share at least one parent.
    pub fn are_siblings(&self, a: i64, b: i64) -> bool {
        match (self.parents(a), self.parents(b)) {
            (Some(pa), Some(pb)) => !pa.is_disjoint(pb),
            _ => false,
        }
    }
}

/// Build the family maps and validate them against the roster.
pub fn build_relationships(characters: &CharacterIndex) -> (Relationships, IssueSink) {
    let links = Relationships::from_characters(characters);
    let mut sink = IssueSink::new();

    check_spouses(characters, &links, &mut sink);
    check_parents(characters, &links, &mut sink);
    check_children(characters, &links, &mut sink);

    tracing::debug!(
        marriages = links.spouse_of.len(),
        parents = links.children_of_parent.len(),
        children = links.parents_of_child.len(),
        issues = sink.len(),
        "built relationship indexes"
    );

    (links, sink)
}

// ---------------------------------------------------------------------------
// Spouses
// ---------------------------------------------------------------------------

fn check_spouses(characters: &CharacterIndex, links: &Relationships, sink: &mut IssueSink) {
    let mut referenced_by: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (&a, &b) in &links.spouse_of {
        referenced_by.entry(b).or_default().push(a);
    }
    for (b, partners) in &referenced_by {
        if partners.len() > 1 {
            sink.error(
                "2.2.8.3",
                format!("NPC id={b}: multiple spouses reference this NPC: {partners:?}."),
            );
        }
    }

    for (&a, &b) in &links.spouse_of {
        let Some(partner) = characters.get(&b) else {
            sink.error(
                "2.2.8",
                format!("NPC id={a}: spouse id={b} does not exist in characters.json."),
            );
            continue;
        };
        let Some(this) = characters.get(&a) else {
            continue;
        };

        if partner.family.spouse.id() != Some(a) {
            sink.error(
                "2.2.8",
                format!(
                    "NPC id={a}: spouse id={b} is not symmetric (NPC id={b} has family.spouse={}).",
                    partner.family.spouse
                ),
            );
        }

        if let (Some(ga), Some(gb)) = (this.gender, partner.gender) {
            if ga == gb {
                sink.error(
                    "2.2.8.2",
                    format!(
                        "Marriage gender violation: NPC id={a} gender={ga} married to NPC id={b} gender={gb}."
                    ),
                );
            }
        }

        for spouse in [this, partner] {
            if let Some(age) = spouse.age.filter(|&age| age < ADULT_AGE) {
                sink.error(
                    "2.2.8.4",
                    format!("NPC id={}: married but age={age} (<{ADULT_AGE}).", spouse.id),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parents
// ---------------------------------------------------------------------------

fn check_parents(characters: &CharacterIndex, links: &Relationships, sink: &mut IssueSink) {
    for (&parent, kids) in &links.children_of_parent {
        let parent_age = characters.get(&parent).and_then(|c| c.age);
        if let Some(age) = parent_age.filter(|&age| age < ADULT_AGE) {
            sink.error(
                "2.2.8.5",
                format!("NPC id={parent}: has children but age={age} (<{ADULT_AGE})."),
            );
        }

        for &child in kids {
            let Some(record) = characters.get(&child) else {
                sink.error(
                    "2.2.8",
                    format!("NPC id={parent}: references non-existent child id={child}."),
                );
                continue;
            };
            if let (Some(p_age), Some(c_age)) = (parent_age, record.age) {
                if p_age.saturating_sub(c_age) < ADULT_AGE {
                    sink.error(
                        "2.2.8.6",
                        format!(
                            "Parent/child age gap violation: parent id={parent} age={p_age}, \
                             child id={child} age={c_age} (must be >= {ADULT_AGE} years older)."
                        ),
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

fn check_children(characters: &CharacterIndex, links: &Relationships, sink: &mut IssueSink) {
    for (&child, parents) in &links.parents_of_child {
        if parents.len() > MAX_PARENTS {
            sink.error(
                "2.2.8.1",
                format!(
                    "Child id={child}: has {} parents listed: {:?} (max {MAX_PARENTS}).",
                    parents.len(),
                    parents.iter().collect::<Vec<_>>()
                ),
            );
        }
        if parents.len() != 2 {
            continue;
        }

        let mut pair = parents.iter().filter_map(|id| characters.get(id));
        let (Some(p1), Some(p2)) = (pair.next(), pair.next()) else {
            continue;
        };

        if let (Some(g1), Some(g2)) = (p1.gender, p2.gender) {
            if g1 == g2 {
                sink.error(
                    "2.2.8.2",
                    format!(
                        "Child id={child}: two parents share same gender: parent {} gender={g1}, parent {} gender={g2}.",
                        p1.id, p2.id
                    ),
                );
            }
        }

        let mutual =
            p1.family.spouse.id() == Some(p2.id) && p2.family.spouse.id() == Some(p1.id);
        if !mutual {
            sink.warning(
                "2.2.8.1",
                format!(
                    "Child id={child}: two parents {} and {} are not mutually spouses \
                     (p1.spouse={}, p2.spouse={}).",
                    p1.id, p2.id, p1.family.spouse, p2.family.spouse
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{Character, Family, Gender, SpouseRef};

    fn person(id: i64, gender: Gender, age: i64, spouse: Option<i64>, children: &[i64]) -> Character {
        Character {
            id,
            last_name: Some("Okafor".into()),
            gender: Some(gender),
            age: Some(age),
            family: Family {
                spouse: spouse.map_or(SpouseRef::Unmarried, SpouseRef::Id),
                children: children.to_vec(),
                listed_children: children.iter().map(|&c| c.into()).collect(),
            },
        }
    }

    fn index(people: Vec<Character>) -> CharacterIndex {
        people.into_iter().map(|c| (c.id, c)).collect()
    }

    fn messages(sink: &IssueSink, requirement: &str) -> Vec<String> {
        sink.issues()
            .iter()
            .filter(|i| i.requirement == requirement)
            .map(|i| i.message.clone())
            .collect()
    }

    #[test]
    fn healthy_family_is_clean() {
        let roster = index(vec![
            person(1, Gender::Male, 45, Some(2), &[3, 4]),
            person(2, Gender::Female, 43, Some(1), &[3, 4]),
            person(3, Gender::Female, 12, None, &[]),
            person(4, Gender::Male, 9, None, &[]),
        ]);
        let (links, sink) = build_relationships(&roster);
        assert!(sink.is_empty(), "{:?}", sink.issues());
        assert_eq!(links.spouse(1), Some(2));
        assert_eq!(links.children(1).collect::<Vec<_>>(), vec![3, 4]);
        assert!(links.are_siblings(3, 4));
        assert!(!links.are_siblings(1, 3));
    }

    #[test]
    fn same_gender_marriage_names_both_sides() {
        let roster = index(vec![
            person(5, Gender::Female, 30, Some(9), &[]),
            person(9, Gender::Female, 31, Some(5), &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        let msgs = messages(&sink, "2.2.8.2");
        assert_eq!(msgs.len(), 2);
        assert!(msgs.contains(
            &"Marriage gender violation: NPC id=5 gender=F married to NPC id=9 gender=F.".to_string()
        ));
    }

    #[test]
    fn asymmetric_and_dangling_spouses() {
        let roster = index(vec![
            person(1, Gender::Male, 40, Some(2), &[]),
            person(2, Gender::Female, 40, None, &[]),
            person(3, Gender::Male, 40, Some(99), &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        let msgs = messages(&sink, "2.2.8");
        assert_eq!(
            msgs,
            vec![
                "NPC id=1: spouse id=2 is not symmetric (NPC id=2 has family.spouse=-1).",
                "NPC id=3: spouse id=99 does not exist in characters.json.",
            ]
        );
    }

    #[test]
    fn multiple_spouses_reference_one_character() {
        let roster = index(vec![
            person(1, Gender::Male, 40, Some(3), &[]),
            person(2, Gender::Male, 40, Some(3), &[]),
            person(3, Gender::Female, 40, Some(1), &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        assert_eq!(
            messages(&sink, "2.2.8.3"),
            vec!["NPC id=3: multiple spouses reference this NPC: [1, 2]."]
        );
    }

    #[test]
    fn underage_marriage_reports_each_direction() {
        let roster = index(vec![
            person(1, Gender::Male, 17, Some(2), &[]),
            person(2, Gender::Female, 20, Some(1), &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        // Link 1->2 and link 2->1 each report the minor.
        assert_eq!(
            messages(&sink, "2.2.8.4"),
            vec![
                "NPC id=1: married but age=17 (<18).",
                "NPC id=1: married but age=17 (<18).",
            ]
        );
    }

    #[test]
    fn parent_age_and_gap() {
        let roster = index(vec![
            person(1, Gender::Male, 30, None, &[2, 50]),
            person(2, Gender::Female, 15, None, &[]),
            person(3, Gender::Female, 16, None, &[4]),
            person(4, Gender::Male, 6, None, &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        assert_eq!(
            messages(&sink, "2.2.8.6"),
            vec![
                "Parent/child age gap violation: parent id=1 age=30, child id=2 age=15 (must be >= 18 years older).",
                "Parent/child age gap violation: parent id=3 age=16, child id=4 age=6 (must be >= 18 years older).",
            ]
        );
        assert_eq!(
            messages(&sink, "2.2.8.5"),
            vec!["NPC id=3: has children but age=16 (<18)."]
        );
        assert_eq!(
            messages(&sink, "2.2.8"),
            vec!["NPC id=1: references non-existent child id=50."]
        );
    }

    #[test]
    fn too_many_parents() {
        let roster = index(vec![
            person(1, Gender::Male, 50, None, &[9]),
            person(2, Gender::Female, 50, None, &[9]),
            person(3, Gender::Male, 50, None, &[9]),
            person(9, Gender::Male, 10, None, &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        assert_eq!(
            messages(&sink, "2.2.8.1"),
            vec!["Child id=9: has 3 parents listed: [1, 2, 3] (max 2)."]
        );
    }

    #[test]
    fn non_mutual_parents_are_a_warning() {
        let roster = index(vec![
            person(1, Gender::Male, 50, None, &[9]),
            person(2, Gender::Male, 50, None, &[9]),
            person(9, Gender::Male, 10, None, &[]),
        ]);
        let (_, sink) = build_relationships(&roster);
        let same_gender = messages(&sink, "2.2.8.2");
        assert_eq!(
            same_gender,
            vec!["Child id=9: two parents share same gender: parent 1 gender=M, parent 2 gender=M."]
        );
        let warning = sink
            .issues()
            .iter()
            .find(|i| i.requirement == "2.2.8.1")
            .unwrap();
        assert!(!warning.is_error());
        assert_eq!(
            warning.message,
            "Child id=9: two parents 1 and 2 are not mutually spouses (p1.spouse=-1, p2.spouse=-1)."
        );
    }

    #[test]
    fn unknown_gender_and_age_skip_rules() {
        let mut a = person(1, Gender::Male, 40, Some(2), &[]);
        a.gender = None;
        let mut b = person(2, Gender::Male, 40, Some(1), &[]);
        b.age = None;
        let (_, sink) = build_relationships(&index(vec![a, b]));
        assert!(sink.is_empty(), "{:?}", sink.issues());
    }
}
