use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Construction-time validation failure: empty user, key, or auth URL
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A lazy accessor needed a token and the identity exchange failed.
    /// The full, untruncated body stays available via the session's
    /// `error_msg()` / `error_code()` pair.
    #[error("authentication failed: {message}")]
    AuthenticationFailed {
        message: String,
        status_code: Option<u16>,
    },

    /// Transport-level failure from the HTTP client
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// A caller-supplied header name or value could not be represented
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Maximum length for response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl Error {
    /// Truncate a response body to avoid dragging excessive data into
    /// error displays
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..end],
                body.len()
            )
        }
    }

    pub(crate) fn auth_failed(message: &str, status_code: Option<u16>) -> Self {
        Error::AuthenticationFailed {
            message: Self::truncate_body(message),
            status_code,
        }
    }
}
