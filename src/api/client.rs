//! HTTP client for the Rackspace Cloud identity service.
//!
//! `RackspaceClient` owns the credentials, the in-memory session, and the
//! underlying `reqwest` client. It exposes three things to resource modules:
//! a lazy bearer token, lazy endpoint URL resolution, and the generic
//! [`RackspaceClient::send`] primitive that injects the token and applies
//! the provider's request-shaping quirks.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::{Credentials, Session};

use super::catalog::{self, AccessResponse};
use super::Error;

// ============================================================================
// Constants
// ============================================================================

/// Identity API version segment of the token URL
pub const API_VERSION: &str = "v2.0";

/// Response format requested from every endpoint via the `format` query key
pub const API_FORMAT: &str = "json";

/// Default identity endpoint (US accounts). UK accounts authenticate
/// against `https://lon.identity.api.rackspacecloud.com`.
pub const DEFAULT_AUTH_URL: &str = "https://identity.api.rackspacecloud.com";

/// User-Agent sent on every request
pub const USER_AGENT: &str = concat!("rackcloud/", env!("CARGO_PKG_VERSION"));

/// HTTP request timeout in seconds, unless overridden via
/// [`RackspaceClient::with_timeout`]. 30s allows for slow API responses
/// while still failing fast.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Auth token header injected on every authenticated call
pub const HEADER_AUTH_TOKEN: &str = "X-Auth-Token";

/// v1.0 auth request headers, kept for storage collaborators that still
/// speak the legacy flow
pub const HEADER_AUTH_USER: &str = "X-Auth-User";
pub const HEADER_AUTH_KEY: &str = "X-Auth-Key";
pub const HEADER_STORAGE_USER_LEGACY: &str = "X-Storage-User";
pub const HEADER_STORAGE_PASS_LEGACY: &str = "X-Storage-Pass";
pub const HEADER_STORAGE_TOKEN_LEGACY: &str = "X-Storage-Token";

/// Endpoint URL headers returned by the legacy v1.0 auth flow
pub const HEADER_STORAGE_URL: &str = "X-Storage-Url";
pub const HEADER_CDN_URL: &str = "X-CDN-Management-Url";
pub const HEADER_MANAGEMENT_URL: &str = "X-Server-Management-Url";

/// Client for the Rackspace Cloud API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct RackspaceClient {
    client: Client,
    credentials: Credentials,
    session: Session,
    service_net: bool,
}

impl RackspaceClient {
    /// Create a client against the default identity endpoint
    pub fn new(user: impl Into<String>, key: impl Into<String>) -> Result<Self, Error> {
        let credentials = Credentials::new(user, key)?;
        Ok(Self::from_parts(
            credentials,
            Self::default_http_client(Duration::from_secs(REQUEST_TIMEOUT_SECS))?,
        ))
    }

    /// Create a client against an explicit identity endpoint
    pub fn with_auth_url(
        user: impl Into<String>,
        key: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Result<Self, Error> {
        let credentials = Credentials::with_auth_url(user, key, auth_url)?;
        Ok(Self::from_parts(
            credentials,
            Self::default_http_client(Duration::from_secs(REQUEST_TIMEOUT_SECS))?,
        ))
    }

    /// Create a client with an explicit transport timeout
    pub fn with_timeout(
        user: impl Into<String>,
        key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let credentials = Credentials::new(user, key)?;
        Ok(Self::from_parts(
            credentials,
            Self::default_http_client(timeout)?,
        ))
    }

    /// Create a client with a caller-supplied `reqwest::Client`. Timeout
    /// and User-Agent then come from that client's configuration.
    pub fn with_http_client(
        user: impl Into<String>,
        key: impl Into<String>,
        client: Client,
    ) -> Result<Self, Error> {
        let credentials = Credentials::new(user, key)?;
        Ok(Self::from_parts(credentials, client))
    }

    fn from_parts(credentials: Credentials, client: Client) -> Self {
        Self {
            client,
            credentials,
            session: Session::new(),
            service_net: false,
        }
    }

    fn default_http_client(timeout: Duration) -> Result<Client, Error> {
        Ok(Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?)
    }

    // ===== Credentials and session views =====

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replace the account name; blank input is ignored
    pub fn set_user(&mut self, user: &str) {
        self.credentials.set_user(user);
    }

    /// Replace the API key; blank input is ignored
    pub fn set_key(&mut self, key: &str) {
        self.credentials.set_key(key);
    }

    pub fn set_auth_url(&mut self, url: &str) -> Result<(), Error> {
        self.credentials.set_auth_url(url)
    }

    /// Opt in to ServiceNet, Rackspace's internal network. Bandwidth on
    /// ServiceNet is not metered; storage collaborators consult this flag
    /// when picking the storage URL to dial.
    pub fn set_service_net(&mut self, enabled: bool) {
        self.service_net = enabled;
    }

    pub fn service_net(&self) -> bool {
        self.service_net
    }

    /// True if the last HTTP exchange left no error behind
    pub fn is_successful(&self) -> bool {
        self.session.is_successful()
    }

    /// Error message of the last failed exchange. For authentication
    /// failures this is the raw response body.
    pub fn error_msg(&self) -> Option<&str> {
        self.session.error_msg()
    }

    /// HTTP status of the last failed exchange, if one was received
    pub fn error_code(&self) -> Option<u16> {
        self.session.error_code()
    }

    // ===== Request dispatch =====

    /// Dispatch a request with the provider's shaping rules applied:
    ///
    /// - the auth token is injected as `X-Auth-Token` when one is held
    /// - an empty-body PUT without a caller Content-Type gets an empty
    ///   Content-Type header (avoids the transport defaulting to a
    ///   multipart form type on empty-body PUTs)
    /// - the query always carries `format=json` unless the caller set one
    /// - a non-empty body is sent raw, with Content-Type defaulting to
    ///   `application/json` if unset
    ///
    /// 4xx/5xx responses are not errors; the raw response comes back
    /// untouched and the caller inspects the status. Only transport
    /// failures surface as `Err`.
    pub async fn send(
        &mut self,
        url: &str,
        method: Method,
        mut headers: HeaderMap,
        query: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<Response, Error> {
        self.session.clear_error();

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(token)
                .map_err(|e| Error::InvalidHeader(e.to_string()))?;
            headers.insert(HeaderName::from_static("x-auth-token"), value);
        }

        let body_is_empty = body.map_or(true, str::is_empty);
        if method == Method::PUT && body_is_empty && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(""));
        }

        let mut query: Vec<(&str, &str)> = query.to_vec();
        if !query.iter().any(|(k, _)| *k == "format") {
            query.push(("format", API_FORMAT));
        }

        debug!(method = %method, url, "dispatching request");

        let mut request = self.client.request(method, url).query(&query);
        if let Some(body) = body.filter(|b| !b.is_empty()) {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            request = request.body(body.to_owned());
        }

        Ok(request.headers(headers).send().await?)
    }

    // ===== Authentication =====

    fn auth_request_body(user: &str, key: &str) -> serde_json::Value {
        json!({
            "auth": {
                "RAX-KSKEY:apiKeyCredentials": {
                    "username": user,
                    "apiKey": key,
                }
            }
        })
    }

    /// Perform the identity exchange and populate the session.
    ///
    /// Returns `true` on success. Failure is not an error: the raw response
    /// body (or the transport error, with no status code) is recorded on
    /// the session, previously held token/endpoints are left untouched,
    /// and an immediate retry performs a full re-authentication.
    pub async fn authenticate(&mut self) -> bool {
        let url = format!("{}/{}/tokens", self.credentials.auth_url(), API_VERSION);
        let body =
            Self::auth_request_body(self.credentials.user(), self.credentials.key()).to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // send() only injects a token when one is already held, so the
        // exchange itself goes out with just these headers.
        let response = match self
            .send(&url, Method::POST, headers, &[], Some(&body))
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "identity request failed");
                self.session.record_error(err.to_string(), None);
                return false;
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                self.session
                    .record_error(err.to_string(), Some(status.as_u16()));
                return false;
            }
        };

        match serde_json::from_str::<AccessResponse>(&text) {
            Ok(parsed) => {
                catalog::apply(parsed.access, &mut self.session);
                debug!(status = %status, "authenticated");
                true
            }
            Err(_) => {
                // No `access` object (or not JSON at all): keep the raw
                // body for the caller to inspect
                warn!(status = %status, "authentication failed");
                self.session.record_error(text, Some(status.as_u16()));
                false
            }
        }
    }

    /// Authenticate unless a token is already held.
    ///
    /// This is the explicit form of the lazy step the accessors below
    /// take; a failed exchange maps the session's recorded error into
    /// [`Error::AuthenticationFailed`].
    pub async fn ensure_authenticated(&mut self) -> Result<(), Error> {
        if self.session.token().is_some() {
            return Ok(());
        }
        if self.authenticate().await {
            Ok(())
        } else {
            Err(self.auth_failure())
        }
    }

    fn auth_failure(&self) -> Error {
        Error::auth_failed(
            self.session.error_msg().unwrap_or("authentication failed"),
            self.session.error_code(),
        )
    }

    // ===== Lazy accessors =====

    /// Bearer token, authenticating first if none is held
    pub async fn token(&mut self) -> Result<String, Error> {
        self.ensure_authenticated().await?;
        match self.session.token() {
            Some(token) => Ok(token.to_string()),
            // a successful exchange always stores a token
            None => Err(self.auth_failure()),
        }
    }

    /// Storage endpoint URL, authenticating first if it is unset.
    ///
    /// `Ok(None)` means the account authenticated but the catalog carried
    /// no such entry - distinct from `Err(AuthenticationFailed)`.
    pub async fn storage_url(&mut self) -> Result<Option<String>, Error> {
        if self.session.storage_url().is_none() && !self.authenticate().await {
            return Err(self.auth_failure());
        }
        Ok(self.session.storage_url().map(String::from))
    }

    /// CDN endpoint URL, authenticating first if it is unset.
    ///
    /// `Ok(None)` means the account authenticated but the catalog carried
    /// no such entry - distinct from `Err(AuthenticationFailed)`.
    pub async fn cdn_url(&mut self) -> Result<Option<String>, Error> {
        if self.session.cdn_url().is_none() && !self.authenticate().await {
            return Err(self.auth_failure());
        }
        Ok(self.session.cdn_url().map(String::from))
    }

    /// Server management endpoint URL, authenticating first if it is unset.
    ///
    /// `Ok(None)` means the account authenticated but the catalog carried
    /// no such entry - distinct from `Err(AuthenticationFailed)`.
    pub async fn management_url(&mut self) -> Result<Option<String>, Error> {
        if self.session.management_url().is_none() && !self.authenticate().await {
            return Err(self.auth_failure());
        }
        Ok(self.session.management_url().map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_request_body_schema() {
        let body = RackspaceClient::auth_request_body("account", "secret");
        assert_eq!(
            body,
            serde_json::json!({
                "auth": {
                    "RAX-KSKEY:apiKeyCredentials": {
                        "username": "account",
                        "apiKey": "secret",
                    }
                }
            })
        );
    }

    #[test]
    fn test_wire_constants() {
        assert_eq!(API_VERSION, "v2.0");
        assert_eq!(API_FORMAT, "json");
        assert_eq!(HEADER_AUTH_TOKEN, "X-Auth-Token");
        assert_eq!(HEADER_AUTH_USER, "X-Auth-User");
        assert_eq!(HEADER_AUTH_KEY, "X-Auth-Key");
        assert_eq!(HEADER_STORAGE_USER_LEGACY, "X-Storage-User");
        assert_eq!(HEADER_STORAGE_PASS_LEGACY, "X-Storage-Pass");
        assert_eq!(HEADER_STORAGE_TOKEN_LEGACY, "X-Storage-Token");
        assert_eq!(HEADER_STORAGE_URL, "X-Storage-Url");
        assert_eq!(HEADER_CDN_URL, "X-CDN-Management-Url");
        assert_eq!(HEADER_MANAGEMENT_URL, "X-Server-Management-Url");
    }

    #[test]
    fn test_construction_validates_credentials() {
        assert!(RackspaceClient::new("account", "secret").is_ok());
        assert!(matches!(
            RackspaceClient::new("", "secret"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            RackspaceClient::new("account", ""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_service_net_flag() {
        let mut client = RackspaceClient::new("account", "secret").unwrap();
        assert!(!client.service_net());
        client.set_service_net(true);
        assert!(client.service_net());
    }
}
