/// Unified error type for the storefront admin core.
///
/// All crates use this error type for propagation across crate boundaries.
/// It is `Clone` so a single failed backend fetch can be handed to every
/// caller that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorefrontError {
    /// The request never produced an HTTP response (connect refused, reset, DNS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend did not answer within the configured timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status.
    #[error("backend error (HTTP {status}): {body}")]
    Backend {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body, as text, for diagnostics.
        body: String,
    },

    /// The requested subject or sub-resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The session token was missing, expired, or lacks the required role.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller passed something the backend can never accept (empty id, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Error from configuration loading or validation.
    #[error("config error: {0}")]
    Config(String),

    /// The dialog host could not present a dialog.
    #[error("dialog error: {0}")]
    Dialog(String),

    /// Generic internal error for unexpected conditions.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorefrontError {
    /// Whether retrying the same request later could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StorefrontError::Transport(_) | StorefrontError::Timeout(_) => true,
            StorefrontError::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        StorefrontError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for StorefrontError {
    fn from(err: serde_yaml::Error) -> Self {
        StorefrontError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StorefrontError::Timeout("slow".into()).is_transient());
        assert!(StorefrontError::Transport("reset".into()).is_transient());
        assert!(StorefrontError::Backend {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(!StorefrontError::Backend {
            status: 422,
            body: "bad".into()
        }
        .is_transient());
        assert!(!StorefrontError::NotFound("u1".into()).is_transient());
    }

    #[test]
    fn test_backend_error_display_includes_status() {
        let err = StorefrontError::Backend {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 500): boom");
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let err: StorefrontError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, StorefrontError::Serialization(_)));
    }
}
