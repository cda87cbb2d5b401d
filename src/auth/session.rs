/// Error left behind by the last HTTP exchange.
///
/// `status_code` is `None` when the failure happened below the HTTP layer
/// (connection refused, timeout) and no status was ever received. For
/// authentication failures `message` holds the raw response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub message: String,
    pub status_code: Option<u16>,
}

/// In-memory authentication session.
///
/// Starts empty and is populated by one successful identity exchange. The
/// endpoint URLs are only ever written together with the token; any of them
/// may stay unset if the service catalog lacked the corresponding entry.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    storage_url: Option<String>,
    cdn_url: Option<String>,
    management_url: Option<String>,
    last_error: Option<LastError>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn storage_url(&self) -> Option<&str> {
        self.storage_url.as_deref()
    }

    pub fn cdn_url(&self) -> Option<&str> {
        self.cdn_url.as_deref()
    }

    pub fn management_url(&self) -> Option<&str> {
        self.management_url.as_deref()
    }

    /// True if the last HTTP exchange left no error behind
    pub fn is_successful(&self) -> bool {
        self.last_error.is_none()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Error message of the last failed exchange, if any
    pub fn error_msg(&self) -> Option<&str> {
        self.last_error.as_ref().map(|e| e.message.as_str())
    }

    /// HTTP status of the last failed exchange, if one was received
    pub fn error_code(&self) -> Option<u16> {
        self.last_error.as_ref().and_then(|e| e.status_code)
    }

    /// Drop the token and endpoint URLs, forcing the next lazy access to
    /// re-authenticate
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn set_storage_url(&mut self, url: String) {
        self.storage_url = Some(url);
    }

    pub(crate) fn set_cdn_url(&mut self, url: String) {
        self.cdn_url = Some(url);
    }

    pub(crate) fn set_management_url(&mut self, url: String) {
        self.management_url = Some(url);
    }

    pub(crate) fn record_error(&mut self, message: impl Into<String>, status_code: Option<u16>) {
        self.last_error = Some(LastError {
            message: message.into(),
            status_code,
        });
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }
}
