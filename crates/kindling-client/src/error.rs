use reqwest::StatusCode;
use thiserror::Error;

pub use kindling_types::models::MalformedUrl;

/// Everything a remote call can fail with.
///
/// Every operation propagates these to its caller so the UI layer can show
/// feedback instead of re-rendering as if the action succeeded. The one
/// deliberate exception is
/// [`User::login_via_stored_credentials`](crate::users::User::login_via_stored_credentials),
/// which absorbs failures and reports "no session".
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or timeout; the request may never have reached
    /// the server.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx response not covered by a more specific variant.
    #[error("server returned {status}: {message}")]
    Server { status: StatusCode, message: String },

    /// Invalid or expired token, rejected credentials, or acting on
    /// someone else's story. 401 means the token itself is no longer
    /// honored; 403 means the token is fine but the action is not
    /// allowed.
    #[error("authentication rejected ({status}): {message}")]
    Auth { status: StatusCode, message: String },

    /// The server rejected one or more input fields.
    #[error("invalid input: {message}")]
    Validation { message: String },

    /// The story or user does not exist on the server.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// A story URL that is not an absolute URL.
    #[error(transparent)]
    MalformedUrl(#[from] MalformedUrl),
}

impl ApiError {
    /// Classify a non-2xx response. Lives here so every call site maps
    /// status codes the same way.
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Auth { status, message }
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            ApiError::Validation { message }
        } else if status == StatusCode::NOT_FOUND {
            ApiError::NotFound { message }
        } else {
            ApiError::Server { status, message }
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    /// True only when the server rejected the token itself (401), as
    /// opposed to rejecting one action performed with a valid token.
    pub fn is_stale_token(&self) -> bool {
        matches!(self, ApiError::Auth { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            // A 2xx answer whose body does not match the wire contract.
            ApiError::Server {
                status: err.status().unwrap_or(StatusCode::OK),
                message: err.to_string(),
            }
        } else {
            ApiError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Auth { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, String::new()),
            ApiError::Auth { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, String::new()),
            ApiError::Validation { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, String::new()),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            ApiError::Server { .. }
        ));
    }

    #[test]
    fn forbidden_is_auth_but_not_stale() {
        let forbidden = ApiError::from_status(StatusCode::FORBIDDEN, String::new());
        assert!(forbidden.is_auth());
        assert!(!forbidden.is_stale_token());
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()).is_stale_token());
    }
}
