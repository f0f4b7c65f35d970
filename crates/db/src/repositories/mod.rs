//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&SqlitePool` as the first argument.

pub mod locker_repo;
pub mod session_repo;

pub use locker_repo::LockerRepo;
pub use session_repo::SessionRepo;
