//! REST API plumbing for the Rackspace Cloud.
//!
//! This module provides `RackspaceClient`, which performs the identity
//! exchange against `POST {auth_url}/v2.0/tokens`, resolves service
//! endpoint URLs from the returned catalog, and dispatches authenticated
//! requests on behalf of resource modules.
//!
//! Authentication failures are not errors: `authenticate()` returns a bool
//! and records the raw response body and status on the session, where
//! `is_successful()` / `error_msg()` / `error_code()` expose them.

pub mod catalog;
pub mod client;
pub mod error;

pub use client::RackspaceClient;
pub use error::Error;
