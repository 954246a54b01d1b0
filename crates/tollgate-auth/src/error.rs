//! Authentication error types.
//!
//! One enum covers the whole token lifecycle. The variants split along
//! the lines that matter at the HTTP boundary: credential rejections
//! (401, no detail about which field failed), malformed requests (400),
//! a transient revocation-store outage (503, retryable), and genuine
//! server faults (500).

use std::fmt;

/// Errors that can occur during token issuance, validation and revocation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The presented credentials (password or client id/secret pair) are
    /// wrong. Deliberately carries no message: callers must not learn
    /// which field failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The token is marked revoked, or absent from the revocation store.
    #[error("Token revoked")]
    TokenRevoked,

    /// The access token is invalid, malformed, or failed signature checks.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The request lacks something it needs (missing bearer header on
    /// logout, unknown federation provider, malformed body).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The revocation store cannot be reached or timed out.
    ///
    /// Transient: issuance callers may retry; the enforcement gate
    /// converts this into a denial (fail closed).
    #[error("Revocation store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the outage.
        message: String,
    },

    /// A non-transient storage fault.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid (e.g. missing signing secret).
    /// Fatal at startup, never produced per-request.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `StoreUnavailable` error.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::TokenRevoked
                | Self::InvalidToken { .. }
                | Self::InvalidRequest { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns `true` if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::TokenRevoked | Self::InvalidToken { .. } => ErrorCategory::Token,
            Self::InvalidRequest { .. } => ErrorCategory::Validation,
            Self::StoreUnavailable { .. } | Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the OAuth 2.0 error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_client",
            Self::TokenRevoked | Self::InvalidToken { .. } => "invalid_token",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::StoreUnavailable { .. }
            | Self::Storage { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => "server_error",
        }
    }
}

/// Categories of authentication errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identity verification failed.
    Authentication,
    /// Token validation or revocation state.
    Token,
    /// Request validation errors.
    Validation,
    /// Revocation store / infrastructure errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Token => write!(f, "token"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
        assert_eq!(AuthError::TokenRevoked.to_string(), "Token revoked");
        assert_eq!(
            AuthError::store_unavailable("timed out after 500ms").to_string(),
            "Revocation store unavailable: timed out after 500ms"
        );
        assert_eq!(
            AuthError::configuration("signing secret is empty").to_string(),
            "Configuration error: signing secret is empty"
        );
    }

    #[test]
    fn test_invalid_credentials_carries_no_detail() {
        // The rendered message must never mention id vs secret.
        let err = AuthError::InvalidCredentials;
        let rendered = err.to_string();
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("client_id"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::InvalidCredentials.is_client_error());
        assert!(AuthError::TokenRevoked.is_client_error());
        assert!(AuthError::invalid_request("bad body").is_client_error());

        let err = AuthError::store_unavailable("down");
        assert!(err.is_server_error());
        assert!(err.is_retryable());

        assert!(!AuthError::storage("corrupt").is_retryable());
        assert!(AuthError::configuration("no key").is_server_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::InvalidCredentials.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(AuthError::TokenRevoked.category(), ErrorCategory::Token);
        assert_eq!(
            AuthError::store_unavailable("down").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            AuthError::configuration("no key").category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_oauth_error_code() {
        assert_eq!(
            AuthError::InvalidCredentials.oauth_error_code(),
            "invalid_client"
        );
        assert_eq!(AuthError::TokenRevoked.oauth_error_code(), "invalid_token");
        assert_eq!(
            AuthError::invalid_request("x").oauth_error_code(),
            "invalid_request"
        );
        assert_eq!(
            AuthError::store_unavailable("x").oauth_error_code(),
            "server_error"
        );
    }
}
