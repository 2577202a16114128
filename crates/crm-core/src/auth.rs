//! Auth-Error Interceptor
//!
//! Every response from the document API passes through [`AuthInterceptor`].
//! An authentication failure raises one [`ConsoleEvent::AuthenticationFailed`]
//! per suppression window and is re-thrown as
//! [`CoreError::AuthenticationFailed`] so the caller's error path terminates.
//! The interceptor never touches the session or the history itself.

use crate::api::{server_message, ApiResponse};
use crate::error::CoreError;
use crate::event::{ConsoleEvent, EventBus};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Guard against showing the recovery modal more than once.
///
/// Opened when a failure is raised, closed as soon as the modal has been
/// shown (not when it is dismissed). A flag, not a queue: failures arriving
/// while it is open are dropped.
#[derive(Debug, Default)]
pub struct SuppressionWindow {
    open: AtomicBool,
}

impl SuppressionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the window; returns false if it was already open
    pub fn try_open(&self) -> bool {
        !self.open.swap(true, Ordering::AcqRel)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

/// Where in the payload the sentinel was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureShape {
    /// `exception: "frappe.exceptions.AuthenticationError: <message>"`
    Exception,
    /// `exc_type: "AuthenticationError"`
    ExceptionType,
    /// Sentinel somewhere inside the `exc` traceback text
    Traceback,
}

/// A classified authentication failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub shape: AuthFailureShape,
    pub message: Option<String>,
}

/// Response classifier and single-raise gate
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    sentinel: String,
    window: Arc<SuppressionWindow>,
    events: EventBus,
}

impl AuthInterceptor {
    pub fn new(sentinel: impl Into<String>, window: Arc<SuppressionWindow>, events: EventBus) -> Self {
        Self {
            sentinel: sentinel.into(),
            window,
            events,
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Classify a response; `None` means it is not an authentication failure.
    ///
    /// Only JSON bodies are inspected. The remote reports the failure in one of
    /// three places, so all three are checked.
    pub fn classify(&self, response: &ApiResponse) -> Option<AuthFailure> {
        let body = response.json_body()?;
        self.classify_body(&body)
    }

    fn classify_body(&self, body: &Value) -> Option<AuthFailure> {
        let sentinel = self.sentinel.as_str();

        // "<dotted.Type>: <message>", only the type part is compared
        let exception = body
            .get("exception")
            .and_then(Value::as_str)
            .and_then(|e| e.split(':').next())
            .map(str::trim)
            .is_some_and(|t| t == sentinel || t.ends_with(&format!(".{sentinel}")));
        let exc_type = body
            .get("exc_type")
            .and_then(Value::as_str)
            .is_some_and(|t| t == sentinel);
        let traceback = match body.get("exc") {
            Some(Value::String(text)) => text.contains(sentinel),
            Some(other @ Value::Array(_)) => other.to_string().contains(sentinel),
            _ => false,
        };

        let shape = if exception {
            AuthFailureShape::Exception
        } else if exc_type {
            AuthFailureShape::ExceptionType
        } else if traceback {
            AuthFailureShape::Traceback
        } else {
            return None;
        };

        Some(AuthFailure {
            shape,
            message: server_message(body).filter(|m| !m.is_empty()),
        })
    }

    /// Pass a response through, or raise and re-throw on authentication failure
    pub fn intercept(&self, response: ApiResponse) -> Result<ApiResponse, CoreError> {
        match self.classify(&response) {
            Some(failure) => Err(self.raise(failure)),
            None => Ok(response),
        }
    }

    /// Classify a raw transport error (the free-text shape only)
    pub fn intercept_transport_error(&self, error: impl std::fmt::Display) -> CoreError {
        let text = error.to_string();
        if text.contains(self.sentinel.as_str()) {
            return self.raise(AuthFailure {
                shape: AuthFailureShape::Traceback,
                message: None,
            });
        }
        CoreError::network(text)
    }

    fn raise(&self, failure: AuthFailure) -> CoreError {
        if self.window.try_open() {
            warn!(shape = ?failure.shape, "Authentication failure, raising recovery");
            self.events.publish(ConsoleEvent::AuthenticationFailed {
                message: failure.message.clone(),
            });
        } else {
            debug!(shape = ?failure.shape, "Authentication failure suppressed, recovery already pending");
        }
        CoreError::AuthenticationFailed {
            message: failure.message,
        }
    }
}
