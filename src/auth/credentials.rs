use crate::api::client::DEFAULT_AUTH_URL;
use crate::api::Error;

/// Account credentials for the identity exchange.
///
/// Validated on construction: the account name and API key must be
/// non-empty. The identity endpoint defaults to the US identity service;
/// UK accounts pass their endpoint via [`Credentials::with_auth_url`].
#[derive(Debug, Clone)]
pub struct Credentials {
    user: String,
    key: String,
    auth_url: String,
}

impl Credentials {
    /// Create credentials against the default identity endpoint
    pub fn new(user: impl Into<String>, key: impl Into<String>) -> Result<Self, Error> {
        Self::with_auth_url(user, key, DEFAULT_AUTH_URL)
    }

    /// Create credentials against an explicit identity endpoint
    pub fn with_auth_url(
        user: impl Into<String>,
        key: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Result<Self, Error> {
        let user = user.into();
        let key = key.into();
        let auth_url = auth_url.into();

        if user.is_empty() {
            return Err(Error::InvalidArgument("the user cannot be empty"));
        }
        if key.is_empty() {
            return Err(Error::InvalidArgument("the key cannot be empty"));
        }
        if auth_url.is_empty() {
            return Err(Error::InvalidArgument("the authentication URL is not valid"));
        }

        Ok(Self {
            user,
            key,
            auth_url,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Replace the account name. Blank input is ignored rather than
    /// clearing the stored value.
    pub fn set_user(&mut self, user: &str) {
        if !user.is_empty() {
            self.user = user.to_string();
        }
    }

    /// Replace the API key. Blank input is ignored rather than clearing
    /// the stored value.
    pub fn set_key(&mut self, key: &str) {
        if !key.is_empty() {
            self.key = key.to_string();
        }
    }

    /// Replace the identity endpoint URL
    pub fn set_auth_url(&mut self, url: &str) -> Result<(), Error> {
        if url.is_empty() {
            return Err(Error::InvalidArgument("the authentication URL is not valid"));
        }
        self.auth_url = url.to_string();
        Ok(())
    }
}
