//! Generate-course form.

use std::sync::Arc;

use smartlearn_client::{
    ApiClient, CourseFormInput, CourseSnapshot, DifficultyLevel, RequiredField,
    SchedulingFrequency,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::lifecycle::Lifecycle;
use crate::navigator::{Route, Transition};
use crate::ui::{Dialogs, Notice};

/// Alert shown when a mandatory field is empty.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

/// Alert shown after a course was generated.
pub const GENERATED_MESSAGE: &str = "Learning path generated successfully!";

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    /// Accepting input.
    #[default]
    Editing,
    /// Waiting for the backend; further submits are ignored.
    Submitting,
}

#[derive(Debug, Default)]
struct FormState {
    input: CourseFormInput,
    phase: FormPhase,
}

/// Controller for the generate-course form.
#[derive(Debug, Clone)]
pub struct CourseFormController {
    api: ApiClient,
    state: Arc<Mutex<FormState>>,
    lifecycle: Lifecycle,
}

impl CourseFormController {
    /// Creates a controller with an empty form.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(FormState::default())),
            lifecycle: Lifecycle::mounted(),
        }
    }

    /// Applies an arbitrary edit to the form.
    pub async fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut CourseFormInput) + Send,
    {
        f(&mut self.state.lock().await.input);
    }

    /// Sets the course, topic or skill name.
    pub async fn set_course_name(&self, value: impl Into<String> + Send) {
        let value = value.into();
        self.edit(|input| input.course_name = value).await;
    }

    /// Selects a difficulty level.
    pub async fn set_difficulty_level(&self, level: DifficultyLevel) {
        self.edit(|input| input.difficulty_level = Some(level)).await;
    }

    /// Selects a scheduling frequency.
    pub async fn set_scheduling_frequency(&self, frequency: SchedulingFrequency) {
        self.edit(|input| input.scheduling_frequency = Some(frequency))
            .await;
    }

    /// Sets the hours per day.
    pub async fn set_time_commitment(&self, value: impl Into<String> + Send) {
        let value = value.into();
        self.edit(|input| input.time_commitment = value).await;
    }

    /// Sets the learning goals.
    pub async fn set_learning_goals(&self, value: impl Into<String> + Send) {
        let value = value.into();
        self.edit(|input| input.learning_goals = value).await;
    }

    /// Sets the preferred resource formats.
    pub async fn set_preferred_resources(&self, value: impl Into<String> + Send) {
        let value = value.into();
        self.edit(|input| input.preferred_resources = value).await;
    }

    /// A copy of the current input.
    pub async fn input(&self) -> CourseFormInput {
        self.state.lock().await.input.clone()
    }

    /// The current phase.
    pub async fn phase(&self) -> FormPhase {
        self.state.lock().await.phase
    }

    /// Mandatory fields still empty.
    pub async fn missing_fields(&self) -> Vec<RequiredField> {
        self.state.lock().await.input.missing_fields()
    }

    /// Returns `true` if the form is complete and not already submitting.
    pub async fn can_submit(&self) -> bool {
        let state = self.state.lock().await;
        state.phase == FormPhase::Editing && state.input.missing_fields().is_empty()
    }

    /// Submits the form.
    ///
    /// Returns a push to the new course on success. Every failure is shown
    /// to the user and the form goes back to editing.
    pub async fn submit(&self, dialogs: &dyn Dialogs) -> Option<Transition> {
        if !self.lifecycle.is_mounted() {
            return None;
        }
        let request = {
            let mut state = self.state.lock().await;
            if state.phase == FormPhase::Submitting {
                debug!("Submit ignored; a request is already in flight");
                return None;
            }
            let validated = state.input.to_request();
            match validated {
                Ok(request) => {
                    state.phase = FormPhase::Submitting;
                    request
                }
                Err(missing) => {
                    drop(state);
                    warn!(?missing, "Course form incomplete");
                    dialogs.alert(Notice::invalid(REQUIRED_FIELDS_MESSAGE)).await;
                    return None;
                }
            }
        };

        let result = self.api.generate_course(&request).await;
        self.state.lock().await.phase = FormPhase::Editing;

        if !self.lifecycle.is_mounted() {
            debug!(ok = result.is_ok(), "Form closed; dropping generate result");
            return None;
        }

        match result {
            Ok(course) => {
                info!(course_id = %course.id, "Learning path generated");
                dialogs.alert(Notice::success(GENERATED_MESSAGE)).await;
                Some(Transition::Push(Route::Course(CourseSnapshot::take(course))))
            }
            Err(e) => {
                error!(error = %e, "Failed to generate course");
                dialogs.alert(Notice::error(&e)).await;
                None
            }
        }
    }

    /// Closes the form. A generate request still in flight is ignored when
    /// it completes.
    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }
}
