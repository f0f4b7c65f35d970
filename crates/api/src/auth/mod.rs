//! Authentication primitives.
//!
//! - [`session`] -- opaque session tokens, their hashes, and the session cookie.

pub mod session;
