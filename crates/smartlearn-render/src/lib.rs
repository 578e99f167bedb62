//! SmartLearn Render
//!
//! Turns screen state into text. Markdown is what the terminal front-end
//! prints; JSON is for exporting a course.
//!
//! # Example
//!
//! ```rust
//! use smartlearn_render::{format_time_spent, FaqMarkdown};
//! use smartlearn_screens::FAQS;
//!
//! assert_eq!(format_time_spent(5400.0), "1.50 hrs");
//!
//! let markdown = FaqMarkdown::new(&FAQS).generate();
//! assert!(markdown.starts_with("# Frequently Asked Questions"));
//! ```

pub mod json;
mod markdown;

pub use markdown::{CourseMarkdown, FaqMarkdown, HomeMarkdown};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to serialize to JSON.
    #[error("failed to serialize course: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

// ============================================================================
// Formatting
// ============================================================================

/// Formats engagement time the way course cards show it.
///
/// - 3600 seconds and up -> hours, e.g. `"1.50 hrs"`
/// - 60 seconds and up -> minutes, e.g. `"2.00 mins"`
/// - below that -> seconds, e.g. `"12.50 s"`
#[must_use]
pub fn format_time_spent(seconds: f64) -> String {
    if seconds >= 3600.0 {
        format!("{:.2} hrs", seconds / 3600.0)
    } else if seconds >= 60.0 {
        format!("{:.2} mins", seconds / 60.0)
    } else {
        format!("{seconds:.2} s")
    }
}
