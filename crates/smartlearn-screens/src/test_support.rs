//! Shared fixtures for controller tests.

#![allow(clippy::unwrap_used)]

use serde_json::{json, Value};
use smartlearn_client::{ApiClient, Config, Course, CourseSnapshot, SessionStore, User};
use wiremock::MockServer;

pub const TOKEN: &str = "tok-123";

/// A client for `server` with an empty in-memory session.
pub fn client_for(server: &MockServer) -> ApiClient {
    let config = Config::new(&server.uri()).unwrap();
    ApiClient::new(config, SessionStore::in_memory()).unwrap()
}

/// A client for `server` whose session holds [`TOKEN`] and a user named Ada.
pub async fn signed_in_client(server: &MockServer) -> ApiClient {
    let api = client_for(server);
    api.session().set_token(TOKEN).await.unwrap();
    let user: User = serde_json::from_value(json!({"_id": "u1", "name": "Ada"})).unwrap();
    api.session().set_user(&user).await.unwrap();
    api
}

pub fn course_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "courseName": name,
        "difficultyLevel": "Beginner",
        "progress": { "completionPercentage": 25, "timeSpent": 90 },
        "topics": [{
            "_id": "t1",
            "topicName": "Basics",
            "timeRecommended": 2,
            "resources": [
                { "resourceType": "Video", "resourceLink": "https://example.com/video" },
                { "resourceType": "Article", "resourceLink": "https://example.com/article" }
            ]
        }]
    })
}

pub fn snapshot(id: &str) -> CourseSnapshot {
    let course: Course = serde_json::from_value(course_json(id, "Rust Basics")).unwrap();
    CourseSnapshot::take(course)
}
