//! Markdown rendering of the SmartLearn screens.
//!
//! Each generator borrows the state it renders and produces a complete
//! Markdown document with [`generate`](HomeMarkdown::generate). Text that
//! comes from the backend is escaped so course names cannot inject
//! formatting.

use std::fmt::Write;

use smartlearn_client::{Course, CourseSnapshot, Topic};
use smartlearn_screens::{FaqEntry, HomeView, FAQ_HEADING};

use crate::format_time_spent;

// ============================================================================
// Home
// ============================================================================

/// Renders the home screen.
pub struct HomeMarkdown<'a> {
    view: &'a HomeView,
}

impl<'a> HomeMarkdown<'a> {
    /// Creates a generator for `view`.
    #[must_use]
    pub const fn new(view: &'a HomeView) -> Self {
        Self { view }
    }

    /// Generates the home screen document.
    ///
    /// Courses are numbered from 1 so the number can be used to open one.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# Hi {}\n", escape_markdown(&self.view.username));
        let _ = writeln!(output, "Welcome to SmartLearn\n");
        let _ = writeln!(output, "## What would you like to learn?\n");
        let _ = writeln!(
            output,
            "Enter the topic, skill, or course you're interested in, and we'll create a tailored learning path for you!\n"
        );

        self.write_courses(&mut output);
        self.write_recommendations(&mut output);

        if self.view.refreshing {
            let _ = writeln!(output, "*Refreshing...*");
        }
        output
    }

    fn write_courses(&self, output: &mut String) {
        let _ = writeln!(output, "## Your Courses\n");

        if let Some(message) = self.view.empty_message() {
            let _ = writeln!(output, "*{message}*\n");
            return;
        }

        for (index, course) in self.view.courses.iter().enumerate() {
            write_course_card(output, index + 1, course);
        }
        let _ = writeln!(output);
    }

    fn write_recommendations(&self, output: &mut String) {
        if self.view.recommended.is_empty() {
            return;
        }

        let _ = writeln!(output, "## Recommended Courses\n");
        for course in &self.view.recommended {
            let _ = writeln!(
                output,
                "- **{}** (Difficulty: {})",
                escape_markdown(&course.course_name),
                course.difficulty_level
            );
        }
        let _ = writeln!(output);
    }
}

/// Writes one numbered course card.
fn write_course_card(output: &mut String, number: usize, course: &Course) {
    let _ = writeln!(output, "{number}. **{}**", escape_markdown(&course.course_name));
    let _ = writeln!(output, "   - Difficulty: {}", course.difficulty_level);
    let _ = writeln!(
        output,
        "   - Progress: {}%",
        course.progress.completion_percentage
    );
    let _ = writeln!(
        output,
        "   - Time Spent: {}",
        format_time_spent(course.progress.time_spent)
    );
}

// ============================================================================
// Course Detail
// ============================================================================

/// Renders the course detail screen.
pub struct CourseMarkdown<'a> {
    snapshot: &'a CourseSnapshot,
}

impl<'a> CourseMarkdown<'a> {
    /// Creates a generator for `snapshot`.
    #[must_use]
    pub const fn new(snapshot: &'a CourseSnapshot) -> Self {
        Self { snapshot }
    }

    /// Generates the course detail document.
    ///
    /// Resources are listed by label, e.g. `Video-1`, and marked with a
    /// check once the backend reported them completed. The progress shown is
    /// as of the time the snapshot was taken.
    #[must_use]
    pub fn generate(&self) -> String {
        let course = self.snapshot.course();
        let mut output = String::new();

        let _ = writeln!(output, "# {}\n", escape_markdown(&course.course_name));
        let _ = writeln!(output, "Difficulty: **{}**\n", course.difficulty_level);
        let _ = writeln!(
            output,
            "Progress: {}% | Time Spent: {}\n",
            course.progress.completion_percentage,
            format_time_spent(course.progress.time_spent)
        );
        let _ = writeln!(
            output,
            "*As of {} UTC*\n",
            self.snapshot.taken_at().format("%Y-%m-%d %H:%M")
        );

        let _ = writeln!(output, "## Topics\n");
        for (index, topic) in course.topics.iter().enumerate() {
            write_topic(&mut output, index + 1, topic);
        }

        let _ = writeln!(output, "End of the course");
        output
    }
}

fn write_topic(output: &mut String, number: usize, topic: &Topic) {
    let _ = writeln!(output, "### {number}. {}\n", escape_markdown(&topic.topic_name));
    let _ = writeln!(output, "Recommended Time: {} hrs\n", topic.time_recommended);

    if topic.resources.is_empty() {
        return;
    }

    let _ = writeln!(output, "Resources:\n");
    for (index, resource) in topic.resources.iter().enumerate() {
        let check = if resource.completed { " ✓" } else { "" };
        let _ = writeln!(
            output,
            "- [{}]({}){check}",
            escape_markdown(&resource.label(index)),
            resource.resource_link
        );
    }
    let _ = writeln!(output);
}

// ============================================================================
// FAQs
// ============================================================================

/// Renders the FAQs screen.
pub struct FaqMarkdown<'a> {
    entries: &'a [FaqEntry],
}

impl<'a> FaqMarkdown<'a> {
    /// Creates a generator for `entries`.
    #[must_use]
    pub const fn new(entries: &'a [FaqEntry]) -> Self {
        Self { entries }
    }

    /// Generates the FAQs document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "# {FAQ_HEADING}\n");
        for entry in self.entries {
            let _ = writeln!(output, "### {}\n", entry.question);
            let _ = writeln!(output, "{}\n", entry.answer);
        }
        output
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Escapes Markdown control characters in backend-provided text.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '\\' | '<' | '>' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push(' '),
            _ => result.push(ch),
        }
    }

    result
}
