//! Data model shared between the API client and the screens.
//!
//! Field names follow the backend's camelCase JSON; document ids arrive as
//! `_id` and are exposed as `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Session
// ============================================================================

/// Profile of the signed-in user as returned by the login endpoint.
///
/// Unknown fields are kept so the stored blob round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend id of the user.
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Any other profile fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Name used in greetings, `"User"` when the profile has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_USERNAME)
    }
}

/// Greeting name used when no usable profile is stored.
pub const DEFAULT_USERNAME: &str = "User";

/// The persisted authentication state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Opaque bearer token.
    pub token: Option<String>,
    /// Profile of the signed-in user.
    pub user: Option<User>,
}

// ============================================================================
// Courses
// ============================================================================

/// Difficulty of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    /// No prior knowledge assumed.
    Beginner,
    /// Some familiarity assumed.
    Intermediate,
    /// Solid background assumed.
    Advanced,
}

impl DifficultyLevel {
    /// All levels in display order.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// The label used on the wire and in the UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Parses a level, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DifficultyLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid difficulty level '{s}': expected one of 'Beginner', 'Intermediate', 'Advanced'"
            ))
        })
    }
}

impl Serialize for DifficultyLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// How often the learner wants to study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulingFrequency {
    /// Every day.
    Daily,
    /// Once a week.
    Weekly,
}

impl SchedulingFrequency {
    /// All frequencies in display order.
    pub const ALL: [Self; 2] = [Self::Daily, Self::Weekly];

    /// The label used on the wire and in the UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
        }
    }

    /// Parses a frequency, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchedulingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingFrequency {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid scheduling frequency '{s}': expected one of 'Daily', 'Weekly'"
            ))
        })
    }
}

impl Serialize for SchedulingFrequency {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Learner progress on a course, computed by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Percentage of resources completed, 0 to 100.
    #[serde(default)]
    pub completion_percentage: f64,

    /// Total engagement time in seconds.
    #[serde(default)]
    pub time_spent: f64,
}

/// A learning resource inside a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Kind of resource, e.g. `Video` or `Article`.
    pub resource_type: String,

    /// Link opened when the resource is tapped.
    pub resource_link: String,

    /// Whether the backend has recorded this resource as completed.
    #[serde(default)]
    pub completed: bool,
}

impl Resource {
    /// Display label for the resource at `index` within its topic, e.g. `Video-2`.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        format!("{}-{}", self.resource_type, index + 1)
    }
}

/// A topic of a generated course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Backend id of the topic.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,

    /// Topic title.
    pub topic_name: String,

    /// Recommended study time in hours.
    #[serde(default)]
    pub time_recommended: f64,

    /// Ordered resources for the topic.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A generated course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Backend id of the course.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Course title.
    pub course_name: String,

    /// Difficulty chosen when the course was generated.
    pub difficulty_level: DifficultyLevel,

    /// Learner progress.
    #[serde(default)]
    pub progress: Progress,

    /// Ordered topics.
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Course {
    /// Looks up a resource by topic and resource position.
    #[must_use]
    pub fn resource(&self, topic_index: usize, resource_index: usize) -> Option<(&Topic, &Resource)> {
        let topic = self.topics.get(topic_index)?;
        let resource = topic.resources.get(resource_index)?;
        Some((topic, resource))
    }
}

/// A course copied at navigation time.
///
/// The snapshot is never refreshed: actions taken on the detail screen
/// (marking resources complete, recording time) reach the backend but leave
/// this copy untouched. A later visit starts from a fresh snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSnapshot {
    course: Course,
    taken_at: DateTime<Utc>,
}

impl CourseSnapshot {
    /// Takes a snapshot of `course` now.
    #[must_use]
    pub fn take(course: Course) -> Self {
        Self {
            course,
            taken_at: Utc::now(),
        }
    }

    /// The captured course.
    #[must_use]
    pub const fn course(&self) -> &Course {
        &self.course
    }

    /// When the snapshot was taken.
    #[must_use]
    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

// ============================================================================
// Course Form
// ============================================================================

/// A field that must be filled before a course can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// Course, topic or skill name.
    CourseName,
    /// Difficulty level selection.
    DifficultyLevel,
    /// Scheduling frequency selection.
    SchedulingFrequency,
    /// Hours per day.
    TimeCommitment,
}

impl RequiredField {
    /// Form label of the field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CourseName => "Course/Topic/Skill Name",
            Self::DifficultyLevel => "Difficulty Level",
            Self::SchedulingFrequency => "Scheduling Frequency",
            Self::TimeCommitment => "Time Commitment Per Day",
        }
    }
}

/// Raw preferences entered on the course form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFormInput {
    /// Course, topic or skill name.
    pub course_name: String,
    /// Selected difficulty level.
    pub difficulty_level: Option<DifficultyLevel>,
    /// Selected scheduling frequency.
    pub scheduling_frequency: Option<SchedulingFrequency>,
    /// Hours per day, as typed.
    pub time_commitment: String,
    /// Optional goals or interests.
    pub learning_goals: String,
    /// Optional preferred resource formats.
    pub preferred_resources: String,
}

impl CourseFormInput {
    /// Lists the mandatory fields that are still empty, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.course_name.trim().is_empty() {
            missing.push(RequiredField::CourseName);
        }
        if self.difficulty_level.is_none() {
            missing.push(RequiredField::DifficultyLevel);
        }
        if self.scheduling_frequency.is_none() {
            missing.push(RequiredField::SchedulingFrequency);
        }
        if self.time_commitment.trim().is_empty() {
            missing.push(RequiredField::TimeCommitment);
        }
        missing
    }

    /// Builds the generate request once every mandatory field is filled.
    ///
    /// Optional fields pass through as typed, including empty strings.
    ///
    /// # Errors
    ///
    /// Returns the missing mandatory fields.
    pub fn to_request(&self) -> std::result::Result<GenerateCourseRequest, Vec<RequiredField>> {
        let missing = self.missing_fields();
        match (self.difficulty_level, self.scheduling_frequency) {
            (Some(difficulty_level), Some(scheduling_frequency)) if missing.is_empty() => {
                Ok(GenerateCourseRequest {
                    course_name: self.course_name.trim().to_string(),
                    difficulty_level,
                    scheduling_frequency,
                    time_commitment: self.time_commitment.trim().to_string(),
                    learning_goals: self.learning_goals.clone(),
                    preferred_resources: self.preferred_resources.clone(),
                })
            }
            _ => Err(missing),
        }
    }
}

/// Validated body of `POST /api/courses/generate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCourseRequest {
    /// Course, topic or skill name.
    pub course_name: String,
    /// Difficulty level.
    pub difficulty_level: DifficultyLevel,
    /// Scheduling frequency.
    pub scheduling_frequency: SchedulingFrequency,
    /// Hours per day.
    pub time_commitment: String,
    /// Goals or interests, possibly empty.
    pub learning_goals: String,
    /// Preferred resource formats, possibly empty.
    pub preferred_resources: String,
}

// ============================================================================
// Wire Types
// ============================================================================

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    /// Display name.
    pub name: &'a str,
    /// Email address.
    pub email: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Email address.
    pub email: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// Profile of the signed-in user.
    #[serde(default)]
    pub user: User,
}

/// Payload of `GET /api/courses`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoursesResponse {
    /// Whether the backend considers the request successful.
    #[serde(default)]
    pub success: bool,
    /// The user's courses.
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Payload of `GET /api/courses/recommend`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationsResponse {
    /// Whether the backend considers the request successful.
    #[serde(default)]
    pub success: bool,
    /// Recommended courses.
    #[serde(default)]
    pub recommendations: Vec<Course>,
}

/// Body of `PUT /api/courses/{id}/time-spent`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpentRequest {
    /// Seconds spent on the detail screen in one visit.
    pub time_spent: f64,
}
