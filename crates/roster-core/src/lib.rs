#![deny(missing_docs)]

//! # roster-core — Foundational Types for the Roster Validator
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Append-only [`IssueSink`].** Validators never fail; every violation is
//!    recorded as an [`Issue`] carrying a [`Severity`], a requirement
//!    identifier, and a human-readable message.
//!
//! 2. **One integer predicate.** [`scalar::as_strict_int`] is the only way a
//!    raw JSON value becomes an integer. Booleans are rejected explicitly
//!    everywhere an integer field is read.
//!
//! 3. **Typed, lenient projections.** [`House`] and [`Character`] carry only
//!    the fields the relational checks need, extracted leniently so a
//!    partially malformed record still participates in cross-file checks.
//!
//! 4. **[`RosterError`] for fatal input failures.** Structured errors with
//!    `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod issue;
pub mod record;
pub mod scalar;

pub use error::RosterError;
pub use issue::{Issue, IssueSink, Severity};
pub use record::{
    Bounds, Character, CharacterIndex, Family, Gender, House, HouseIndex, SpouseRef, ADULT_AGE,
    HOUSE_COUNT, NO_SPOUSE, PLAYER_HOUSE, PLAYER_ID,
};
