//! Domain layer for the locker registry.
//!
//! Holds the rules that do not depend on HTTP or the database: locker
//! numbering, occupancy, search normalization, and the spreadsheet adapter.

pub mod error;
pub mod lockers;
pub mod spreadsheet;
pub mod types;
