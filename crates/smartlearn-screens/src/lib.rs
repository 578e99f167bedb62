//! SmartLearn Screens
//!
//! Screen controllers for the SmartLearn client, the stack navigator they
//! drive, and the app readiness gate. Controllers are headless: they talk to
//! the user through the [`ui::Dialogs`] and [`ui::LinkOpener`] ports and
//! request navigation by returning a [`Transition`].

pub mod app;
pub mod auth;
pub mod course;
pub mod course_form;
pub mod faqs;
pub mod home;
pub mod lifecycle;
pub mod navigator;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::{App, Phase, LOADING_MESSAGE};
pub use auth::{LoginController, SignupController, FILL_ALL_FIELDS_MESSAGE, REGISTERED_MESSAGE};
pub use course::CourseController;
pub use course_form::{
    CourseFormController, FormPhase, GENERATED_MESSAGE, REQUIRED_FIELDS_MESSAGE,
};
pub use faqs::{FaqEntry, FAQS, FAQ_HEADING};
pub use home::{HomeController, HomeView, NO_COURSES_MESSAGE};
pub use lifecycle::Lifecycle;
pub use navigator::{Navigator, Route, RouteName, Transition};
pub use ui::{Confirm, Dialogs, LinkOpener, Notice, RecordingDialogs, RecordingLinks};
