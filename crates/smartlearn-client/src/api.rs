//! REST client for the SmartLearn backend.
//!
//! One [`ApiClient`] is built at startup from the immutable [`Config`] and
//! shared by every screen. Authenticated calls read the token from the
//! [`SessionStore`] at call time and send it as `Authorization: Bearer`.
//! When no token is stored the request is still sent; the backend decides.
//!
//! # Endpoints
//!
//! - `POST /api/auth/signup` - Register a user (201 on success)
//! - `POST /api/auth/login` - Exchange credentials for a token
//! - `GET /api/courses` - List the user's courses
//! - `GET /api/courses/recommend` - List recommended courses
//! - `POST /api/courses/generate` - Generate a course from preferences
//! - `PUT /api/courses/{id}/time-spent` - Record engagement time
//! - `PUT /api/courses/{id}/topics/{topic}/resources/{index}/complete` - Mark a resource done
//! - `DELETE /api/courses/{id}` - Delete a course
//!
//! No request is retried and no timeout is set beyond the transport default.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{BestEffortError, ClientError, CriticalError, Operation, Result};
use crate::models::{
    Course, CoursesResponse, GenerateCourseRequest, LoginRequest, LoginResponse,
    RecommendationsResponse, SignupRequest, TimeSpentRequest,
};
use crate::session::SessionStore;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("smartlearn-client/", env!("CARGO_PKG_VERSION"));

/// Result of a user-initiated request.
pub type CriticalResult<T> = std::result::Result<T, CriticalError>;

/// Result of a background request.
pub type BestEffortResult = std::result::Result<(), BestEffortError>;

/// Typed client for the SmartLearn REST API.
///
/// Cloning is cheap: the connection pool, configuration and session store
/// are shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<Config>,
    session: SessionStore,
}

impl ApiClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::HttpClientInit` if the HTTP client cannot be built.
    pub fn new(config: Config, session: SessionStore) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ClientError::HttpClientInit)?;
        Ok(Self::with_http_client(config, session, http))
    }

    /// Creates a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(config: Config, session: SessionStore, http: Client) -> Self {
        Self {
            http,
            config: Arc::new(config),
            session,
        }
    }

    /// The configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session store the client reads tokens from.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Registers a new user. Succeeds only on HTTP 201.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> CriticalResult<()> {
        let op = Operation::Signup;
        let url = self.config.endpoint("/api/auth/signup");
        info!(email, "Signing up");

        let request = self.http.post(url).json(&SignupRequest {
            name,
            email,
            password,
        });
        let response = send(op, request).await?;

        if response.status() != StatusCode::CREATED {
            return Err(ClientError::UnexpectedStatus {
                operation: op,
                status: response.status().as_u16(),
            }
            .into());
        }
        Ok(())
    }

    /// Exchanges credentials for a token and user profile.
    ///
    /// Does not persist anything; the caller decides what to store.
    pub async fn login(&self, email: &str, password: &str) -> CriticalResult<LoginResponse> {
        let op = Operation::Login;
        let url = self.config.endpoint("/api/auth/login");
        info!(email, "Logging in");

        let request = self.http.post(url).json(&LoginRequest { email, password });
        let response = send(op, request).await?;
        Ok(read_json(op, response).await?)
    }

    // ------------------------------------------------------------------------
    // Courses
    // ------------------------------------------------------------------------

    /// Lists the signed-in user's courses.
    pub async fn list_courses(&self) -> CriticalResult<CoursesResponse> {
        let op = Operation::ListCourses;
        let request = self
            .authorized(self.http.get(self.config.endpoint("/api/courses")))
            .await;
        let response = send(op, request).await?;
        let body: CoursesResponse = read_json(op, response).await?;
        debug!(success = body.success, count = body.courses.len(), "Fetched courses");
        Ok(body)
    }

    /// Lists courses recommended for the signed-in user.
    pub async fn list_recommendations(&self) -> CriticalResult<RecommendationsResponse> {
        let op = Operation::ListRecommendations;
        let request = self
            .authorized(self.http.get(self.config.endpoint("/api/courses/recommend")))
            .await;
        let response = send(op, request).await?;
        let body: RecommendationsResponse = read_json(op, response).await?;
        debug!(
            success = body.success,
            count = body.recommendations.len(),
            "Fetched recommendations"
        );
        Ok(body)
    }

    /// Generates a course from validated preferences.
    ///
    /// A 2xx response whose body carries a `message` field is a logical
    /// failure and is reported exactly like a transport error.
    pub async fn generate_course(&self, input: &GenerateCourseRequest) -> CriticalResult<Course> {
        let op = Operation::GenerateCourse;
        info!(
            course_name = %input.course_name,
            difficulty = %input.difficulty_level,
            frequency = %input.scheduling_frequency,
            "Generating course"
        );

        let request = self
            .authorized(
                self.http
                    .post(self.config.endpoint("/api/courses/generate"))
                    .json(input),
            )
            .await;
        let response = send(op, request).await?;
        let body: Value = read_json(op, response).await?;

        if let Some(message) = failure_message(&body) {
            return Err(ClientError::logical(op, message).into());
        }

        let course: Course =
            serde_json::from_value(body).map_err(|e| ClientError::decode(op, e.to_string()))?;
        info!(course_id = %course.id, topics = course.topics.len(), "Course generated");
        Ok(course)
    }

    /// Deletes a course.
    pub async fn delete_course(&self, course_id: &str) -> CriticalResult<()> {
        let op = Operation::DeleteCourse;
        let url = self.config.resource_url(&["api", "courses", course_id])?;
        info!(course_id, "Deleting course");

        let request = self.authorized(self.http.delete(url)).await;
        send(op, request).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Best-effort
    // ------------------------------------------------------------------------

    /// Records time spent on a course's detail screen.
    pub async fn update_time_spent(&self, course_id: &str, seconds: f64) -> BestEffortResult {
        let op = Operation::UpdateTimeSpent;
        let url = self
            .config
            .resource_url(&["api", "courses", course_id, "time-spent"])?;
        debug!(course_id, seconds, "Recording time spent");

        let request = self
            .authorized(self.http.put(url).json(&TimeSpentRequest {
                time_spent: seconds,
            }))
            .await;
        send(op, request).await?;
        Ok(())
    }

    /// Marks a resource as completed.
    pub async fn mark_resource_completed(
        &self,
        course_id: &str,
        topic_id: &str,
        resource_index: usize,
    ) -> BestEffortResult {
        let op = Operation::MarkResourceCompleted;
        let index = resource_index.to_string();
        let url = self.config.resource_url(&[
            "api",
            "courses",
            course_id,
            "topics",
            topic_id,
            "resources",
            &index,
            "complete",
        ])?;
        debug!(course_id, topic_id, resource_index, "Marking resource completed");

        let request = self.authorized(self.http.put(url)).await;
        send(op, request).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Attaches the stored bearer token, if any.
    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token_or_absent().await {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("No session token stored; sending request without Authorization");
                request
            }
        }
    }
}

/// Sends a request and turns non-2xx responses into `ClientError::Status`.
async fn send(op: Operation, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::transport(op, e))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<Value>(&body).ok())
        .as_ref()
        .and_then(failure_message);
    debug!(operation = %op, status = status.as_u16(), ?message, "Backend returned error status");
    Err(ClientError::status(op, status.as_u16(), message))
}

/// Reads and decodes a JSON body.
async fn read_json<T: DeserializeOwned>(op: Operation, response: Response) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::transport(op, e))?;
    serde_json::from_slice(&body).map_err(|e| ClientError::decode(op, e.to_string()))
}

/// Extracts a non-empty `message` field from a JSON body.
fn failure_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
