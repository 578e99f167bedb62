//! JSON export of a course.
//!
//! The export uses the backend's wire format, so an exported course can be
//! read back as a [`Course`].
//!
//! # Example
//!
//! ```rust
//! use smartlearn_client::Course;
//! use smartlearn_render::json::JsonGenerator;
//!
//! let course: Course = serde_json::from_str(
//!     r#"{"_id": "c1", "courseName": "Rust", "difficultyLevel": "Beginner"}"#,
//! )
//! .unwrap();
//!
//! let json = JsonGenerator::new(&course).generate().unwrap();
//! assert!(json.contains("\"courseName\":\"Rust\""));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use smartlearn_client::Course;

use crate::{RenderError, Result};

/// Serializes a course to JSON.
pub struct JsonGenerator<'a> {
    course: &'a Course,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a generator for `course`.
    #[must_use]
    pub const fn new(course: &'a Course) -> Self {
        Self { course }
    }

    /// Compact single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.course).map_err(RenderError::from)
    }

    /// Indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.course).map_err(RenderError::from)
    }

    /// Writes pretty or compact JSON to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails and
    /// [`RenderError::Io`] if the file cannot be written.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
