//! # roster-cli — Roster Validator Command Line
//!
//! Provides the `roster` binary:
//!
//! ```bash
//! roster
//! roster --characters ./config/characters.json --houses ./config/houses.json
//! roster --format json -vv
//! ```
//!
//! Reports go to stdout; logs go to stderr.

pub mod check;
pub mod report;
