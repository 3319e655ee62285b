//! # Street Geometry
//!
//! Each side of the street (even house numbers, odd house numbers) must tile
//! the z axis from 0 to 200 in ascending house-number order, with no gaps
//! and no overlaps.
//!
//! The contiguity walk only runs for a side whose every house is indexed.
//! After a mismatch the running position resynchronizes to the observed z,
//! so a single misplaced lot yields one error rather than one per lot.

use roster_core::scalar::approx_equal;
use roster_core::{HouseIndex, IssueSink, HOUSE_COUNT};

use crate::houses::STREET_LENGTH;

/// One side of the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Houses 0, 2, …, 28.
    Even,
    /// Houses 1, 3, …, 29.
    Odd,
}

impl Side {
    /// House numbers on this side, ascending.
    pub fn house_numbers(self) -> impl Iterator<Item = i64> {
        let first = match self {
            Side::Even => 0,
            Side::Odd => 1,
        };
        (first..HOUSE_COUNT).step_by(2)
    }

    fn label(self) -> &'static str {
        match self {
            Side::Even => "Even side",
            Side::Odd => "Odd side",
        }
    }

    fn presence_requirement(self) -> &'static str {
        match self {
            Side::Even => "2.3.6.4.1",
            Side::Odd => "2.3.6.4.2",
        }
    }
}

/// Validate both sides of the street.
pub fn validate_street_geometry(houses: &HouseIndex) -> IssueSink {
    let mut sink = IssueSink::new();

    for side in [Side::Even, Side::Odd] {
        let missing: Vec<i64> = side
            .house_numbers()
            .filter(|n| !houses.contains_key(n))
            .collect();
        if !missing.is_empty() {
            sink.error(
                side.presence_requirement(),
                format!("{} missing houseNumber(s): {missing:?}.", side.label()),
            );
            continue;
        }

        let depths = walk_side(side, houses, &mut sink);
        if let Some(&first) = depths.first() {
            if depths.iter().all(|&d| d == first) {
                sink.warning(
                    "3.4",
                    format!(
                        "{}: all house zsize values are identical ({first}). \
                         Requirement 3.4 suggests some variance.",
                        side.label()
                    ),
                );
            }
        }
    }

    sink
}

/// Running-expected-z walk for one complete side. Returns the lot depths seen.
fn walk_side(side: Side, houses: &HouseIndex, sink: &mut IssueSink) -> Vec<i64> {
    let mut expected_z = 0.0_f64;
    let mut depths = Vec::new();

    for number in side.house_numbers() {
        let Some(bounds) = houses.get(&number).and_then(|h| h.bounds) else {
            continue;
        };
        if !approx_equal(bounds.z, expected_z) {
            sink.error(
                "2.3.6.4.3",
                format!(
                    "{}: house {number} bounds.z={} but expected {expected_z} (gap/overlap).",
                    side.label(),
                    bounds.z
                ),
            );
            expected_z = bounds.z;
        }
        depths.push(bounds.zsize);
        expected_z += bounds.zsize as f64;
    }

    if !approx_equal(expected_z, STREET_LENGTH) {
        sink.error(
            "2.3.6.5",
            format!(
                "{}: z-lengths sum/end at {expected_z}, expected {STREET_LENGTH}.",
                side.label()
            ),
        );
    }

    tracing::trace!(side = side.label(), end = expected_z, "walked street side");
    depths
}
