//! Home screen: greeting, the user's courses, and recommendations.

use std::sync::Arc;

use smartlearn_client::{ApiClient, Course, CourseSnapshot, CriticalError, DEFAULT_USERNAME};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::lifecycle::Lifecycle;
use crate::navigator::{Route, Transition};
use crate::ui::{Confirm, Dialogs, Notice};

/// Shown in place of the course list when the user has no courses.
pub const NO_COURSES_MESSAGE: &str = "No courses found";

/// Everything the home screen displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeView {
    /// Name used in the greeting.
    pub username: String,
    /// The user's courses.
    pub courses: Vec<Course>,
    /// Recommended courses.
    pub recommended: Vec<Course>,
    /// Whether a refresh is in flight.
    pub refreshing: bool,
}

impl HomeView {
    /// The placeholder to show instead of course cards, if any.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.courses.is_empty().then_some(NO_COURSES_MESSAGE)
    }
}

/// Controller for the home screen.
///
/// Clones share state, so a refresh can run on a spawned task while the
/// screen is driven from elsewhere.
#[derive(Debug, Clone)]
pub struct HomeController {
    api: ApiClient,
    state: Arc<Mutex<HomeView>>,
    lifecycle: Lifecycle,
}

impl HomeController {
    /// Creates a mounted controller with an empty view.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(HomeView::default())),
            lifecycle: Lifecycle::mounted(),
        }
    }

    /// Loads the greeting name and fetches both lists.
    pub async fn activate(&self) -> Option<Transition> {
        let username = self
            .api
            .session()
            .user_or_absent()
            .await
            .map_or_else(|| DEFAULT_USERNAME.to_string(), |user| user.display_name().to_string());

        if !self.lifecycle.is_mounted() {
            return None;
        }
        self.state.lock().await.username = username;
        self.refresh().await
    }

    /// Re-fetches courses and recommendations concurrently.
    ///
    /// Each list is updated independently; a failed fetch leaves the
    /// previous list on screen. Returns a reset to Login if the backend
    /// rejected the session. A refresh requested while one is in flight is
    /// ignored.
    pub async fn refresh(&self) -> Option<Transition> {
        if !self.lifecycle.is_mounted() {
            return None;
        }
        {
            let mut state = self.state.lock().await;
            if state.refreshing {
                debug!("Refresh already in flight; ignoring");
                return None;
            }
            state.refreshing = true;
        }

        let (courses, recommendations) =
            tokio::join!(self.api.list_courses(), self.api.list_recommendations());

        if !self.lifecycle.is_mounted() {
            debug!("Home screen unmounted; dropping refresh results");
            self.state.lock().await.refreshing = false;
            return None;
        }

        let mut unauthorized = false;
        {
            let mut state = self.state.lock().await;
            state.refreshing = false;

            match courses {
                Ok(body) if body.success => {
                    debug!(count = body.courses.len(), "Courses updated");
                    state.courses = body.courses;
                }
                Ok(_) => debug!("Backend reported courses fetch as unsuccessful"),
                Err(e) => unauthorized |= log_fetch_failure(&e),
            }

            match recommendations {
                Ok(body) if body.success && !body.recommendations.is_empty() => {
                    debug!(count = body.recommendations.len(), "Recommendations updated");
                    state.recommended = body.recommendations;
                }
                Ok(_) => debug!("No recommendations returned; keeping previous list"),
                Err(e) => unauthorized |= log_fetch_failure(&e),
            }
        }

        if unauthorized {
            warn!("Session rejected by backend; returning to login");
            if let Err(e) = self.api.session().clear_session().await {
                warn!(error = %e, "Failed to clear rejected session");
            }
            self.lifecycle.teardown();
            return Some(Transition::Reset(Route::Login));
        }
        None
    }

    /// A copy of the current view.
    pub async fn view(&self) -> HomeView {
        self.state.lock().await.clone()
    }

    /// Opens the course at `index` in the course list.
    pub async fn open_course(&self, index: usize) -> Option<Transition> {
        let state = self.state.lock().await;
        let Some(course) = state.courses.get(index) else {
            warn!(index, count = state.courses.len(), "No course at index");
            return None;
        };
        Some(Transition::Push(Route::Course(CourseSnapshot::take(
            course.clone(),
        ))))
    }

    /// Opens the generate-course form.
    #[must_use]
    pub const fn open_form(&self) -> Transition {
        Transition::Push(Route::CourseForm)
    }

    /// Opens the FAQs.
    #[must_use]
    pub const fn open_faqs(&self) -> Transition {
        Transition::Push(Route::Faqs)
    }

    /// Asks for confirmation, then clears the session and returns to Login.
    ///
    /// If the session cannot be cleared the user is told and stays here.
    pub async fn logout(&self, dialogs: &dyn Dialogs) -> Option<Transition> {
        if !dialogs.confirm(Confirm::LOGOUT).await {
            debug!("Logout cancelled");
            return None;
        }

        if let Err(e) = self.api.session().clear_session().await {
            let error = CriticalError::from(e);
            error!(error = %error, "Failed to clear session on logout");
            dialogs.alert(Notice::error(&error)).await;
            return None;
        }

        info!("Logged out");
        self.teardown();
        Some(Transition::Replace(Route::Login))
    }

    /// Unmounts the screen. Results still in flight are dropped.
    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    /// Returns `true` until the screen is torn down.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }
}

/// Logs a failed fetch and returns whether it was an auth rejection.
fn log_fetch_failure(error: &CriticalError) -> bool {
    error!(
        operation = ?error.inner().operation(),
        error = %error,
        "Error fetching courses"
    );
    error.is_unauthorized()
}
