//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` row struct matching the table and the
//! DTOs its repository accepts.

pub mod locker;
pub mod session;
