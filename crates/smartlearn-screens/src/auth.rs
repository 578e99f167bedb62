//! Login and signup screens.

use smartlearn_client::{ApiClient, CriticalError};
use tracing::{debug, error, info, warn};

use crate::lifecycle::Lifecycle;
use crate::navigator::{Route, Transition};
use crate::ui::{Dialogs, Notice};

/// Alert shown when a credential field is empty.
pub const FILL_ALL_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Alert shown after a successful signup.
pub const REGISTERED_MESSAGE: &str = "User registered successfully";

// ============================================================================
// Login
// ============================================================================

/// Controller for the login screen.
#[derive(Debug, Clone)]
pub struct LoginController {
    api: ApiClient,
    email: String,
    password: String,
    lifecycle: Lifecycle,
}

impl LoginController {
    /// Creates a controller with empty fields.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            email: String::new(),
            password: String::new(),
            lifecycle: Lifecycle::mounted(),
        }
    }

    /// Sets the email field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Sets the password field.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Signs in and persists the session.
    ///
    /// The token is stored before the user profile. On success the
    /// navigation stack restarts at Home.
    /// Nothing is stored if the screen closed while the request was in
    /// flight.
    pub async fn submit(&self, dialogs: &dyn Dialogs) -> Option<Transition> {
        if !self.lifecycle.is_mounted() {
            return None;
        }
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            dialogs.alert(Notice::invalid(FILL_ALL_FIELDS_MESSAGE)).await;
            return None;
        }

        let result = self.api.login(email, &self.password).await;
        if !self.lifecycle.is_mounted() {
            debug!("Login screen closed; dropping login result");
            return None;
        }
        let login = match result {
            Ok(login) => login,
            Err(e) => {
                error!(error = %e, "Login failed");
                dialogs.alert(Notice::error(&e)).await;
                return None;
            }
        };

        let session = self.api.session();
        let stored = match session.set_token(&login.token).await {
            Ok(()) => session.set_user(&login.user).await,
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            let error = CriticalError::from(e);
            error!(error = %error, "Failed to persist session");
            dialogs.alert(Notice::error(&error)).await;
            return None;
        }

        info!(user = login.user.display_name(), "Logged in");
        Some(Transition::Reset(Route::Home))
    }

    /// Goes to the signup screen.
    #[must_use]
    pub const fn open_signup(&self) -> Transition {
        Transition::Navigate(Route::Signup)
    }

    /// Closes the screen.
    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }
}

// ============================================================================
// Signup
// ============================================================================

/// Controller for the signup screen.
///
/// Registering does not sign the user in.
#[derive(Debug, Clone)]
pub struct SignupController {
    api: ApiClient,
    name: String,
    email: String,
    password: String,
    lifecycle: Lifecycle,
}

impl SignupController {
    /// Creates a controller with empty fields.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            lifecycle: Lifecycle::mounted(),
        }
    }

    /// Sets the name field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the email field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Sets the password field.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Registers the user and returns to Login.
    pub async fn submit(&self, dialogs: &dyn Dialogs) -> Option<Transition> {
        if !self.lifecycle.is_mounted() {
            return None;
        }
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() || self.password.is_empty() {
            warn!("Signup form incomplete");
            dialogs.alert(Notice::invalid(FILL_ALL_FIELDS_MESSAGE)).await;
            return None;
        }

        let result = self.api.signup(name, email, &self.password).await;
        if !self.lifecycle.is_mounted() {
            debug!(ok = result.is_ok(), "Signup screen closed; dropping signup result");
            return None;
        }
        if let Err(e) = result {
            error!(error = %e, "Signup failed");
            dialogs.alert(Notice::error(&e)).await;
            return None;
        }

        info!(email, "User registered");
        dialogs.alert(Notice::success(REGISTERED_MESSAGE)).await;
        Some(Transition::Navigate(Route::Login))
    }

    /// Goes back to the login screen.
    #[must_use]
    pub const fn open_login(&self) -> Transition {
        Transition::Navigate(Route::Login)
    }

    /// Closes the screen.
    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }
}
