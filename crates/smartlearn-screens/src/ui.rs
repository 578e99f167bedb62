//! Ports through which controllers talk to the user.
//!
//! A [`Notice`] can only be built from static text or a [`CriticalError`],
//! so a failed background request has no way into an alert.

use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use smartlearn_client::CriticalError;

/// A blocking alert with a single acknowledge button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    title: &'static str,
    message: String,
}

impl Notice {
    /// A success message.
    #[must_use]
    pub fn success(message: &'static str) -> Self {
        Self {
            title: "Success",
            message: message.to_string(),
        }
    }

    /// A validation message shown before any request is made.
    #[must_use]
    pub fn invalid(message: &'static str) -> Self {
        Self {
            title: "Error",
            message: message.to_string(),
        }
    }

    /// The alert for a failed user-initiated request.
    #[must_use]
    pub fn error(error: &CriticalError) -> Self {
        Self {
            title: "Error",
            message: error.user_message(),
        }
    }

    /// Alert title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    /// Alert body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&CriticalError> for Notice {
    fn from(error: &CriticalError) -> Self {
        Self::error(error)
    }
}

/// A yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirm {
    /// Dialog title.
    pub title: &'static str,
    /// Dialog body.
    pub message: &'static str,
    /// Whether confirming destroys data.
    pub destructive: bool,
}

impl Confirm {
    /// Confirmation shown before logging out.
    pub const LOGOUT: Self = Self {
        title: "Logout",
        message: "Are you sure?",
        destructive: false,
    };

    /// Confirmation shown before deleting a course.
    pub const DELETE_COURSE: Self = Self {
        title: "Delete Course",
        message: "Are you sure you want to delete this course?",
        destructive: true,
    };
}

/// Blocking dialogs.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Shows an alert and waits until it is acknowledged.
    async fn alert(&self, notice: Notice);

    /// Asks a question and returns `true` if the user confirmed.
    async fn confirm(&self, confirm: Confirm) -> bool;
}

/// Hands a URL to the platform.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    /// Opens `url` outside the app.
    async fn open_url(&self, url: &str) -> io::Result<()>;
}

// ============================================================================
// Headless implementations
// ============================================================================

/// Dialogs that record every alert and answer every question the same way.
///
/// Used when no one is at the keyboard.
#[derive(Debug, Default)]
pub struct RecordingDialogs {
    answer: bool,
    notices: Mutex<Vec<Notice>>,
    confirms: Mutex<Vec<Confirm>>,
}

impl RecordingDialogs {
    /// Dialogs that confirm every question.
    #[must_use]
    pub fn confirming() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    /// Dialogs that decline every question.
    #[must_use]
    pub fn declining() -> Self {
        Self::default()
    }

    /// Alerts shown so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Questions asked so far.
    pub fn confirms(&self) -> Vec<Confirm> {
        self.confirms
            .lock()
            .map(|confirms| confirms.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Dialogs for RecordingDialogs {
    async fn alert(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }

    async fn confirm(&self, confirm: Confirm) -> bool {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms.push(confirm);
        }
        self.answer
    }
}

/// A link opener that records URLs instead of opening them.
#[derive(Debug, Default)]
pub struct RecordingLinks {
    opened: Mutex<Vec<String>>,
}

impl RecordingLinks {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs opened so far.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|opened| opened.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinkOpener for RecordingLinks {
    async fn open_url(&self, url: &str) -> io::Result<()> {
        self.opened
            .lock()
            .map_err(|_| io::Error::other("link recorder poisoned"))?
            .push(url.to_string());
        Ok(())
    }
}
