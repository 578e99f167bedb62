//! Error types for the SmartLearn client.
//!
//! Every failure the client can produce is a [`ClientError`]. Callers never
//! see a bare `ClientError` from the API client though: user-initiated
//! operations fail with a [`CriticalError`], which carries a message fit for
//! an alert, while background operations fail with a [`BestEffortError`],
//! which can only be logged. Screens accept nothing but `CriticalError` when
//! showing a dialog, so a telemetry failure cannot reach the user by mistake.

use std::fmt;

use tracing::warn;

/// A specialized `Result` type for SmartLearn client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Fallback shown when a local storage failure interrupts a user action.
const STORAGE_FAILURE_MESSAGE: &str = "Could not access local storage. Please try again.";

/// A backend operation exposed by the API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /api/auth/signup`.
    Signup,
    /// `POST /api/auth/login`.
    Login,
    /// `GET /api/courses`.
    ListCourses,
    /// `GET /api/courses/recommend`.
    ListRecommendations,
    /// `POST /api/courses/generate`.
    GenerateCourse,
    /// `PUT /api/courses/{id}/time-spent`.
    UpdateTimeSpent,
    /// `PUT /api/courses/{id}/topics/{topic}/resources/{index}/complete`.
    MarkResourceCompleted,
    /// `DELETE /api/courses/{id}`.
    DeleteCourse,
}

impl Operation {
    /// Generic message shown when the backend gave no message of its own.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Signup => "Signup failed",
            Self::Login => "Login failed",
            Self::ListCourses => "Failed to fetch courses.",
            Self::ListRecommendations => "Failed to fetch recommendations.",
            Self::GenerateCourse => "Failed to generate course.",
            Self::UpdateTimeSpent => "Failed to record time spent.",
            Self::MarkResourceCompleted => "Failed to mark resource as completed.",
            Self::DeleteCourse => "Failed to delete course.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Signup => "signup",
            Self::Login => "login",
            Self::ListCourses => "list_courses",
            Self::ListRecommendations => "list_recommendations",
            Self::GenerateCourse => "generate_course",
            Self::UpdateTimeSpent => "update_time_spent",
            Self::MarkResourceCompleted => "mark_resource_completed",
            Self::DeleteCourse => "delete_course",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in the SmartLearn client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A required environment variable is not set.
    #[error("Missing environment variable {var}\n\nSuggestion: {suggestion}")]
    MissingConfig {
        /// Name of the variable.
        var: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// An environment variable is set but cannot be used.
    #[error("Invalid value for {var}: {message}\n\nSuggestion: {suggestion}")]
    InvalidConfig {
        /// Name of the variable.
        var: String,
        /// Why the value was rejected.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {0}\n\nSuggestion: Check the system TLS configuration")]
    HttpClientInit(#[source] reqwest::Error),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// The request never produced an HTTP response.
    #[error("Network error during {operation}: {source}")]
    Transport {
        /// The operation that was attempted.
        operation: Operation,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{operation} failed with HTTP {status}{}", format_server_message(.message))]
    Status {
        /// The operation that was attempted.
        operation: Operation,
        /// The HTTP status code.
        status: u16,
        /// The `message` field of the response body, if any.
        message: Option<String>,
    },

    /// The backend answered 2xx but the payload signals a failure.
    #[error("{operation} failed: {message}")]
    Logical {
        /// The operation that was attempted.
        operation: Operation,
        /// The `message` field of the response body.
        message: String,
    },

    /// The backend answered 2xx with a status the operation does not accept.
    #[error("{operation} returned unexpected HTTP {status}")]
    UnexpectedStatus {
        /// The operation that was attempted.
        operation: Operation,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("Could not decode {operation} response: {message}")]
    Decode {
        /// The operation that was attempted.
        operation: Operation,
        /// Description of the decode failure.
        message: String,
    },

    // ========================================================================
    // Local Storage Errors
    // ========================================================================
    /// The durable key-value store could not be read or written.
    #[error("Local storage unavailable: {message}\n\nSuggestion: Check that the session file location is writable")]
    StorageUnavailable {
        /// Description of the storage failure.
        message: String,
    },
}

fn format_server_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map_or_else(String::new, |m| format!(": {m}"))
}

impl ClientError {
    /// Creates a new `MissingConfig` error.
    #[must_use]
    pub fn missing_config(var: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::MissingConfig {
            var: var.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `InvalidConfig` error.
    #[must_use]
    pub fn invalid_config(
        var: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            var: var.into(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(operation: Operation, source: reqwest::Error) -> Self {
        Self::Transport { operation, source }
    }

    /// Creates a new `Status` error.
    #[must_use]
    pub fn status(operation: Operation, status: u16, message: Option<String>) -> Self {
        Self::Status {
            operation,
            status,
            message,
        }
    }

    /// Creates a new `Logical` error.
    #[must_use]
    pub fn logical(operation: Operation, message: impl Into<String>) -> Self {
        Self::Logical {
            operation,
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(operation: Operation, message: impl Into<String>) -> Self {
        Self::Decode {
            operation,
            message: message.into(),
        }
    }

    /// Creates a new `StorageUnavailable` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// The backend operation this error belongs to, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Logical { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
            Self::MissingConfig { .. }
            | Self::InvalidConfig { .. }
            | Self::HttpClientInit(_)
            | Self::StorageUnavailable { .. } => None,
        }
    }

    /// The message the backend attached to this failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Logical { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` if the backend rejected the session token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

// ============================================================================
// Propagation Policy
// ============================================================================

/// Failure of a user-initiated operation.
///
/// Shown to the user through a blocking alert.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct CriticalError(#[from] ClientError);

impl CriticalError {
    /// Message suitable for an alert: the server's message if it sent one,
    /// otherwise a generic message for the operation.
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(message) = self.0.server_message() {
            return message.to_string();
        }
        self.0
            .operation()
            .map_or(STORAGE_FAILURE_MESSAGE, Operation::failure_message)
            .to_string()
    }

    /// The underlying error.
    #[must_use]
    pub const fn inner(&self) -> &ClientError {
        &self.0
    }

    /// Returns `true` if the backend rejected the session token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.0.is_unauthorized()
    }
}

/// Failure of a background operation.
///
/// Can only be logged; it never reaches the user and never blocks navigation.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct BestEffortError(#[from] ClientError);

impl BestEffortError {
    /// Logs the failure at `warn` and discards it.
    pub fn log(self) {
        warn!(
            operation = ?self.0.operation(),
            error = %self.0,
            "Best-effort request failed"
        );
    }

    /// The underlying error.
    #[must_use]
    pub const fn inner(&self) -> &ClientError {
        &self.0
    }
}
