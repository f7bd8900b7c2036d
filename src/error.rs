use std::fmt;

/// Custom error type for report export operations
#[derive(Debug)]
pub enum ExportError {
    /// Query rejected before any request was sent (bad date or URL)
    InvalidInput(String),
    /// The bearer token was rejected or has expired
    Unauthorized { status: u16, message: String },
    /// Network failure or server-side error worth retrying
    Transient(String),
    /// Response did not match the expected page shape
    Malformed(String),
    /// The credential source could not produce a usable token
    AuthRefreshFailed(String),
    /// Retry budget consumed without a successful response
    RetriesExhausted { attempts: u32, last_error: String },
    /// Failed to read or persist credentials
    Credentials(String),
    /// Configuration error
    Config(String),
}

impl ExportError {
    /// Whether the failure may succeed on a new attempt after a token refresh
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExportError::Unauthorized { .. } | ExportError::Transient(_)
        )
    }

    /// Whether the failure terminates the process (invalid input does not)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExportError::InvalidInput(_))
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ExportError::Unauthorized { status, message } => {
                write!(f, "Unauthorized (status {}): {}", status, message)
            }
            ExportError::Transient(msg) => write!(f, "Request failed: {}", msg),
            ExportError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
            ExportError::AuthRefreshFailed(msg) => {
                write!(f, "Failed to refresh the token: {}", msg)
            }
            ExportError::RetriesExhausted {
                attempts,
                last_error,
            } => write!(
                f,
                "Failed after {} attempts, last error: {}",
                attempts, last_error
            ),
            ExportError::Credentials(msg) => write!(f, "{}", msg),
            ExportError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<reqwest::Error> for ExportError {
    fn from(err: reqwest::Error) -> Self {
        ExportError::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Malformed(err.to_string())
    }
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::InvalidInput("start-date '2023-13-40'".to_string());
        assert!(err.to_string().contains("2023-13-40"));
    }

    #[test]
    fn test_unauthorized_display() {
        let err = ExportError::Unauthorized {
            status: 401,
            message: "Invalid Credentials".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Invalid Credentials"));
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = ExportError::RetriesExhausted {
            attempts: 3,
            last_error: "status 503".to_string(),
        };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("status 503"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExportError>();
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ExportError::Transient("timeout".to_string()).is_retryable());
        assert!(ExportError::Unauthorized {
            status: 401,
            message: String::new()
        }
        .is_retryable());
        assert!(!ExportError::Malformed("no selfLink".to_string()).is_retryable());
        assert!(!ExportError::AuthRefreshFailed("x".to_string()).is_retryable());
    }

    #[test]
    fn test_invalid_input_is_not_fatal() {
        assert!(!ExportError::InvalidInput("x".to_string()).is_fatal());
        assert!(ExportError::Malformed("x".to_string()).is_fatal());
        assert!(ExportError::RetriesExhausted {
            attempts: 3,
            last_error: String::new()
        }
        .is_fatal());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ExportError = json_err.into();
        match err {
            ExportError::Malformed(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected ExportError::Malformed"),
        }
    }
}
