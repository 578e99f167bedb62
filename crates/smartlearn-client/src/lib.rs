//! SmartLearn Client
//!
//! Configuration, durable session storage, and the typed REST client for the
//! SmartLearn course-generation backend.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use api::{ApiClient, BestEffortResult, CriticalResult};
pub use config::{Config, BASE_URL_VAR, SESSION_FILE_VAR};
pub use error::{BestEffortError, ClientError, CriticalError, Operation, Result};
pub use models::{
    Course, CourseFormInput, CourseSnapshot, CoursesResponse, DifficultyLevel,
    GenerateCourseRequest, LoginResponse, Progress, RecommendationsResponse, RequiredField,
    Resource, SchedulingFrequency, Session, Topic, User, DEFAULT_USERNAME,
};
pub use session::{FileStore, KeyValueStore, MemoryStore, SessionStore, TOKEN_KEY, USER_KEY};
