//! Error types for crm-core
//!
//! One error hierarchy for the fetch layer, session storage and navigation,
//! with a classification helper so callers can route failures to the right
//! recovery path (list fallback, toast notice or logout modal).

use crate::models::EntityKind;
use thiserror::Error;

/// Core error type for crm-console operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    // ===================
    // Transport Errors
    // ===================
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ===================
    // Authentication
    // ===================
    /// Re-thrown by the interceptor after an authentication failure was
    /// classified. The response behind it must not be read as data.
    #[error("Authentication failed{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    AuthenticationFailed { message: Option<String> },

    // ===================
    // Records
    // ===================
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: EntityKind, id: String },

    #[error("Unsupported entity kind: {kind}")]
    UnsupportedKind { kind: String },

    // ===================
    // Session Storage
    // ===================
    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Failed to serialize session: {message}")]
    SessionSerialization { message: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl CoreError {
    pub fn network(message: impl Into<String>) -> Self {
        CoreError::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        CoreError::Decode {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CoreError::Storage {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        CoreError::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for the sentinel raised by the auth interceptor
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, CoreError::AuthenticationFailed { .. })
    }

    /// Transient failures degrade to a list view or leave state untouched
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::Network { .. }
                | CoreError::Http { .. }
                | CoreError::Decode { .. }
                | CoreError::RecordNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_classification() {
        let err = CoreError::AuthenticationFailed { message: None };
        assert!(err.is_auth_failure());
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "Authentication failed");

        let err = CoreError::AuthenticationFailed {
            message: Some("Session expired".to_string()),
        };
        assert_eq!(err.to_string(), "Authentication failed: Session expired");
    }

    #[test]
    fn test_transient_errors() {
        assert!(CoreError::network("connection reset").is_transient());
        assert!(
            CoreError::Http {
                status: 500,
                message: "boom".to_string()
            }
            .is_transient()
        );
        assert!(
            CoreError::RecordNotFound {
                kind: EntityKind::Deal,
                id: "D-1".to_string()
            }
            .is_transient()
        );
        assert!(
            !CoreError::UnsupportedKind {
                kind: "invoice".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_record_not_found_message() {
        let err = CoreError::RecordNotFound {
            kind: EntityKind::Lead,
            id: "CRM-LEAD-1".to_string(),
        };
        assert_eq!(err.to_string(), "lead not found: CRM-LEAD-1");
    }
}
