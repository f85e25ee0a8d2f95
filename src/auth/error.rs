//! Auth error types.

/// Errors from authenticated portal calls.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-auth API failure, passed through for the caller to handle.
    #[error("HTTP {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// The refresh endpoint rejected the refresh token or did not answer.
    #[error("token refresh failed ({status}): {message}")]
    RefreshFailed {
        /// HTTP status code (0 if no response arrived).
        status: u16,
        message: String,
    },

    /// No usable credentials remain; a fresh login is the only way back.
    #[error("session expired -- run 'kalolsavam-cli login' to re-authenticate")]
    SessionExpired,
}
