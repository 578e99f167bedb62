//! Application shell.
//!
//! The app becomes ready only once a backend base URL is configured. Until
//! then it shows a loading screen and no API client exists, so no request
//! can be made.

use std::sync::Arc;

use smartlearn_client::{ApiClient, ClientError, Config, CourseSnapshot, SessionStore};
use tracing::{error, info, warn};

use crate::auth::{LoginController, SignupController};
use crate::course::CourseController;
use crate::course_form::CourseFormController;
use crate::home::HomeController;
use crate::navigator::{Navigator, Route, Transition};
use crate::ui::LinkOpener;

/// Text of the loading screen.
pub const LOADING_MESSAGE: &str = "Loading environment variables...";

/// Readiness of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for configuration. Without a base URL this never ends.
    Loading,
    /// Configured; screens can be shown.
    Ready,
}

/// The running application: configuration gate, API client, and navigator.
#[derive(Debug)]
pub struct App {
    phase: Phase,
    api: Option<ApiClient>,
    navigator: Option<Navigator>,
}

impl App {
    /// Boots from a configuration result, persisting the session to the
    /// configured session file.
    pub async fn boot(config: smartlearn_client::Result<Config>) -> Self {
        match config {
            Ok(config) => {
                let session = SessionStore::file(config.session_file());
                Self::boot_with_session(Ok(config), session).await
            }
            Err(e) => Self::stalled(&e),
        }
    }

    /// Boots with an explicit session store.
    ///
    /// The first screen is Home when a token is already stored, otherwise
    /// Login.
    pub async fn boot_with_session(
        config: smartlearn_client::Result<Config>,
        session: SessionStore,
    ) -> Self {
        let config = match config {
            Ok(config) => config,
            Err(e) => return Self::stalled(&e),
        };

        info!(api_base_url = %config.api_base_url, "API base URL loaded");
        let api = match ApiClient::new(config, session) {
            Ok(api) => api,
            Err(e) => return Self::stalled(&e),
        };

        let root = if api.session().token_or_absent().await.is_some() {
            info!("Restoring stored session");
            Route::Home
        } else {
            Route::Login
        };

        Self {
            phase: Phase::Ready,
            api: Some(api),
            navigator: Some(Navigator::new(root)),
        }
    }

    fn stalled(error: &ClientError) -> Self {
        error!(error = %error, "API base URL is not loaded; staying on the loading screen");
        Self {
            phase: Phase::Loading,
            api: None,
            navigator: None,
        }
    }

    /// Current readiness.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` once configured.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// The API client, once ready.
    #[must_use]
    pub const fn api(&self) -> Option<&ApiClient> {
        self.api.as_ref()
    }

    /// The navigator, once ready.
    #[must_use]
    pub const fn navigator(&self) -> Option<&Navigator> {
        self.navigator.as_ref()
    }

    /// The route currently shown, once ready.
    #[must_use]
    pub fn current_route(&self) -> Option<&Route> {
        self.navigator.as_ref().map(Navigator::current)
    }

    /// Applies a transition requested by a controller.
    pub fn apply(&mut self, transition: Transition) {
        match self.navigator.as_mut() {
            Some(navigator) => navigator.apply(transition),
            None => warn!(?transition, "Ignoring navigation while loading"),
        }
    }

    /// Applies a transition if a controller produced one.
    pub fn apply_opt(&mut self, transition: Option<Transition>) {
        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    // ------------------------------------------------------------------------
    // Screens
    // ------------------------------------------------------------------------

    /// Controller for the login screen.
    #[must_use]
    pub fn login(&self) -> Option<LoginController> {
        self.api.clone().map(LoginController::new)
    }

    /// Controller for the signup screen.
    #[must_use]
    pub fn signup(&self) -> Option<SignupController> {
        self.api.clone().map(SignupController::new)
    }

    /// Controller for the home screen.
    #[must_use]
    pub fn home(&self) -> Option<HomeController> {
        self.api.clone().map(HomeController::new)
    }

    /// Controller for the generate-course form.
    #[must_use]
    pub fn course_form(&self) -> Option<CourseFormController> {
        self.api.clone().map(CourseFormController::new)
    }

    /// Controller for a course detail screen.
    #[must_use]
    pub fn course(
        &self,
        links: Arc<dyn LinkOpener>,
        snapshot: CourseSnapshot,
    ) -> Option<CourseController> {
        self.api
            .clone()
            .map(|api| CourseController::new(api, links, snapshot))
    }
}
