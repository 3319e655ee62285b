//! # roster-check — Roster Validation Engine
//!
//! Validates a character roster and a house roster against a closed set of
//! objective requirements and reports every violation:
//!
//! - **Input** (`input.rs`): strict UTF-8 loading, the disallowed quote
//!   glyph scan, and JSON parsing.
//!
//! - **Houses** (`houses.rs`, `street.rs`): house count and numbering,
//!   occupants, surnames, per-lot bounds, and the contiguity of each side
//!   of the street.
//!
//! - **Characters** (`characters.rs`): identity fields, enumerations,
//!   profile lists, `socialMedia` and `family`.
//!
//! - **Relationships** (`relationships.rs`, `kinship.rs`): spouse and
//!   parent/child indexes, their invariants, and the per-household kinship
//!   graph.
//!
//! - **Consistency** (`consistency.rs`): residency, surname binding,
//!   household connectivity, and guardianship of minors.
//!
//! ## Crate Policy
//!
//! - Depends only on `roster-core` internally.
//! - Validators take every index as an explicit argument and return their
//!   own [`IssueSink`](roster_core::IssueSink). Only loading and parsing
//!   can end a run early (see [`pipeline`]).

pub mod characters;
pub mod consistency;
pub mod houses;
pub mod input;
pub mod kinship;
pub mod pipeline;
pub mod relationships;
pub mod street;

pub use characters::validate_characters;
pub use consistency::check_consistency;
pub use houses::validate_houses;
pub use kinship::KinshipGraph;
pub use pipeline::{validate_documents, validate_files, RunStatus, ValidationOutcome};
pub use relationships::{build_relationships, Relationships};
pub use street::validate_street_geometry;
