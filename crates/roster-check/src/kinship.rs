//! # Household Kinship Graph
//!
//! An undirected graph over the residents of one house. Two residents are
//! adjacent when one is the other's spouse, one is the other's parent, or
//! they share at least one parent. Graphs hold at most a handful of nodes
//! and are built fresh for each house.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::relationships::Relationships;

/// Adjacency map over one household.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KinshipGraph {
    adjacency: BTreeMap<i64, BTreeSet<i64>>,
}

impl KinshipGraph {
    /// Build the graph over `members`. Duplicate members collapse to one node.
    pub fn for_household(members: &[i64], links: &Relationships) -> Self {
        let mut graph = KinshipGraph {
            adjacency: members.iter().map(|&m| (m, BTreeSet::new())).collect(),
        };
        let nodes: Vec<i64> = graph.adjacency.keys().copied().collect();

        for &a in &nodes {
            if let Some(spouse) = links.spouse(a) {
                graph.connect(a, spouse);
            }
            for child in links.children(a) {
                graph.connect(a, child);
            }
        }
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                if links.are_siblings(a, b) {
                    graph.connect(a, b);
                }
            }
        }

        graph
    }

    /// Add an edge when both ends are household members.
    fn connect(&mut self, a: i64, b: i64) {
        if a == b || !self.adjacency.contains_key(&a) || !self.adjacency.contains_key(&b) {
            return;
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Number of distinct members.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns true if the household has no members.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbours of `id`.
    pub fn neighbours(&self, id: i64) -> impl Iterator<Item = i64> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Breadth-first search from `start`, returning the first member other
    /// than `start` that satisfies `accept`.
    pub fn find_reachable(&self, start: i64, mut accept: impl FnMut(i64) -> bool) -> Option<i64> {
        if !self.adjacency.contains_key(&start) {
            return None;
        }
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            if node != start && accept(node) {
                return Some(node);
            }
            for next in self.neighbours(node) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn component_of(&self, start: i64) -> BTreeSet<i64> {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for next in self.neighbours(node) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Connected components, each sorted, ordered by smallest member.
    pub fn components(&self) -> Vec<Vec<i64>> {
        let mut unvisited: BTreeSet<i64> = self.adjacency.keys().copied().collect();
        let mut components = Vec::new();
        while let Some(&start) = unvisited.iter().next() {
            let component = self.component_of(start);
            unvisited.retain(|id| !component.contains(id));
            components.push(component.into_iter().collect());
        }
        components
    }

    /// A graph with zero or one component.
    pub fn is_connected(&self) -> bool {
        match self.adjacency.keys().next() {
            None => true,
            Some(&start) => self.component_of(start).len() == self.len(),
        }
    }
}
