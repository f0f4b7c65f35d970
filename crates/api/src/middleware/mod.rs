//! Request extractors that enforce authentication.
//!
//! - [`auth::AdminUser`] -- Requires an active admin session cookie.

pub mod auth;
