//! Course detail screen.
//!
//! Shows a [`CourseSnapshot`] and reports engagement to the backend. Time
//! spent and resource completion are fire-and-forget: their failures are
//! logged and the snapshot on screen is never updated from them.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use smartlearn_client::{ApiClient, CourseSnapshot};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::lifecycle::Lifecycle;
use crate::navigator::Transition;
use crate::ui::{Confirm, Dialogs, LinkOpener, Notice};

/// Controller for the course detail screen.
pub struct CourseController {
    api: ApiClient,
    links: Arc<dyn LinkOpener>,
    snapshot: CourseSnapshot,
    focused_since: Option<Instant>,
    tracker: TaskTracker,
    lifecycle: Lifecycle,
}

impl fmt::Debug for CourseController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourseController")
            .field("course_id", &self.snapshot.course().id)
            .field("focused_since", &self.focused_since)
            .field("pending", &self.tracker.len())
            .finish_non_exhaustive()
    }
}

impl CourseController {
    /// Creates a controller for `snapshot`.
    #[must_use]
    pub fn new(api: ApiClient, links: Arc<dyn LinkOpener>, snapshot: CourseSnapshot) -> Self {
        Self {
            api,
            links,
            snapshot,
            focused_since: None,
            tracker: TaskTracker::new(),
            lifecycle: Lifecycle::mounted(),
        }
    }

    /// The course being shown.
    #[must_use]
    pub const fn snapshot(&self) -> &CourseSnapshot {
        &self.snapshot
    }

    // ------------------------------------------------------------------------
    // Engagement timer
    // ------------------------------------------------------------------------

    /// Starts timing a visit.
    pub fn focus_gained(&mut self) {
        self.focus_gained_at(Instant::now());
    }

    /// Starts timing a visit at `at`. Ignored if already focused.
    pub fn focus_gained_at(&mut self, at: Instant) {
        if self.focused_since.is_some() {
            debug!("Focus gained while already focused; keeping original start");
            return;
        }
        self.focused_since = Some(at);
    }

    /// Stops timing and reports the elapsed seconds.
    pub fn focus_lost(&mut self) -> Option<f64> {
        self.focus_lost_at(Instant::now())
    }

    /// Stops timing at `at` and reports the elapsed seconds.
    ///
    /// Returns `None` without contacting the backend if the screen was not
    /// focused.
    pub fn focus_lost_at(&mut self, at: Instant) -> Option<f64> {
        let started = self.focused_since.take()?;
        let seconds = at.saturating_duration_since(started).as_secs_f64();

        let api = self.api.clone();
        let course_id = self.snapshot.course().id.clone();
        info!(course_id = %course_id, seconds, "Recording time spent");
        self.tracker.spawn(async move {
            if let Err(e) = api.update_time_spent(&course_id, seconds).await {
                e.log();
            }
        });
        Some(seconds)
    }

    /// Returns `true` while a visit is being timed.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused_since.is_some()
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Opens a resource's link and marks it completed in the background.
    ///
    /// Returns `false` if there is no such resource or the link could not be
    /// opened, in which case nothing is sent.
    pub async fn open_resource(&self, topic_index: usize, resource_index: usize) -> bool {
        let Some((topic, resource)) = self.snapshot.course().resource(topic_index, resource_index)
        else {
            warn!(topic_index, resource_index, "No such resource");
            return false;
        };

        if let Err(e) = self.links.open_url(&resource.resource_link).await {
            warn!(link = %resource.resource_link, error = %e, "Failed to open resource link");
            return false;
        }

        if topic.id.is_empty() {
            warn!(topic_index, "Topic has no id; not marking resource completed");
            return true;
        }

        let api = self.api.clone();
        let course_id = self.snapshot.course().id.clone();
        let topic_id = topic.id.clone();
        debug!(course_id = %course_id, topic_id = %topic_id, resource_index, "Marking resource completed");
        self.tracker.spawn(async move {
            if let Err(e) = api
                .mark_resource_completed(&course_id, &topic_id, resource_index)
                .await
            {
                e.log();
            }
        });
        true
    }

    /// Asks for confirmation, then deletes the course and goes back.
    ///
    /// A failed delete is shown to the user and the screen stays. Does
    /// nothing once the screen is torn down.
    pub async fn delete(&self, dialogs: &dyn Dialogs) -> Option<Transition> {
        if !self.lifecycle.is_mounted() {
            debug!("Course screen unmounted; ignoring delete");
            return None;
        }
        if !dialogs.confirm(Confirm::DELETE_COURSE).await {
            debug!("Delete cancelled");
            return None;
        }

        let course_id = &self.snapshot.course().id;
        let result = self.api.delete_course(course_id).await;
        if let Err(e) = &result {
            error!(course_id = %course_id, error = %e, "Failed to delete course");
        }
        if !self.lifecycle.is_mounted() {
            return None;
        }

        match result {
            Ok(()) => {
                info!(course_id = %course_id, "Course deleted");
                Some(Transition::Back)
            }
            Err(e) => {
                dialogs.alert(Notice::error(&e)).await;
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Leaves the screen, reporting any visit still being timed.
    pub fn teardown(&mut self) {
        self.focus_lost();
        self.lifecycle.teardown();
    }

    /// Waits for every background request issued so far.
    pub async fn settle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
