//! Authentication state for the Rackspace Cloud identity service.
//!
//! This module provides:
//! - `Credentials`: validated account name, API key, and identity endpoint
//! - `Session`: bearer token and resolved service endpoint URLs, plus the
//!   error left by the last HTTP exchange
//!
//! Sessions live in memory only; a token is held until the session is reset
//! and there is no expiry detection - "field is empty" is the sole trigger
//! for re-authentication.

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::{LastError, Session};
