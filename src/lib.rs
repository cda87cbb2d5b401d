//! Rackspace Cloud identity client.
//!
//! This crate handles the token lifecycle for the Rackspace Cloud REST API:
//!
//! - `Credentials`: account name, API key, and identity endpoint URL
//! - `Session`: bearer token, resolved service endpoint URLs, last HTTP error
//! - `RackspaceClient`: the identity exchange (`POST /v2.0/tokens`), lazy
//!   token/endpoint accessors, and the authenticated request primitive that
//!   resource modules (object storage, CDN, servers) build on
//!
//! Authentication is lazy: the first access to the token or to an endpoint
//! URL performs the identity exchange, and subsequent accesses reuse the
//! populated session. A failed exchange leaves the session unchanged apart
//! from the recorded error, so an immediate retry performs a full
//! re-authentication.
//!
//! ```no_run
//! # async fn run() -> Result<(), rackcloud::Error> {
//! let mut client = rackcloud::RackspaceClient::new("account", "api-key")?;
//! let token = client.token().await?;
//! let cdn = client.cdn_url().await?; // None if the catalog had no CDN entry
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;

pub use api::catalog::{EndpointKind, CATALOG_RULES};
pub use api::{Error, RackspaceClient};
pub use auth::{Credentials, LastError, Session};
