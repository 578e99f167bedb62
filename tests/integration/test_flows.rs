//! End-to-end screen flows against a mocked SmartLearn backend.
//!
//! Each test boots the app the way the terminal front-end does and drives
//! the controllers through a user journey, asserting both what the user
//! sees and which requests reach the backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use smartlearn_client::{Config, SessionStore};
use smartlearn_render::HomeMarkdown;
use smartlearn_screens::{
    App, FormPhase, Phase, RecordingDialogs, RecordingLinks, Route, RouteName, Transition,
};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-e2e";

fn course_json(id: &str) -> Value {
    json!({
        "_id": id,
        "courseName": "Intro to Rust",
        "difficultyLevel": "Beginner",
        "progress": { "completionPercentage": 0, "timeSpent": 0 },
        "topics": [{
            "_id": "t1",
            "topicName": "Ownership",
            "timeRecommended": 1.5,
            "resources": [
                { "resourceType": "Video", "resourceLink": "https://example.com/ownership" }
            ]
        }]
    })
}

/// Boots a ready app against `server` with a session holding [`TOKEN`].
async fn signed_in_app(server: &MockServer) -> App {
    let session = SessionStore::in_memory();
    session.set_token(TOKEN).await.expect("Failed to store token");
    let config = Config::new(&server.uri()).expect("Invalid server URI");
    let app = App::boot_with_session(Ok(config), session).await;
    assert_eq!(app.current_route(), Some(&Route::Home));
    app
}

async fn mount_course_list(server: &MockServer, courses: Value) {
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "courses": courses})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/courses/recommend"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "recommendations": []})),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Readiness
// ============================================================================

/// Without a base URL the app never leaves the loading screen and never
/// talks to the network.
#[tokio::test]
async fn test_missing_base_url_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = App::boot(Config::from_lookup(|_| None)).await;

    assert_eq!(app.phase(), Phase::Loading);
    assert!(app.api().is_none());
    assert!(app.login().is_none());
    assert!(app.home().is_none());
    assert!(app.course_form().is_none());
}

// ============================================================================
// Auth
// ============================================================================

/// Logging in persists the session and the next call carries the token.
#[tokio::test]
async fn test_login_then_next_call_is_authorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TOKEN,
            "user": {"_id": "u1", "name": "Grace", "email": "grace@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .and(header("authorization", "Bearer tok-e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "courses": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/courses/recommend"))
        .and(header("authorization", "Bearer tok-e2e"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "recommendations": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::new(&server.uri()).expect("Invalid server URI");
    let mut app = App::boot_with_session(Ok(config), SessionStore::in_memory()).await;
    assert_eq!(app.current_route(), Some(&Route::Login));

    let mut login = app.login().expect("App should be ready");
    login.set_email("grace@example.com");
    login.set_password("hunter2");
    let dialogs = RecordingDialogs::declining();
    let transition = login.submit(&dialogs).await;
    assert_eq!(transition, Some(Transition::Reset(Route::Home)));
    app.apply_opt(transition);
    assert_eq!(app.current_route(), Some(&Route::Home));

    let session = app
        .api()
        .expect("App should be ready")
        .session()
        .session()
        .await
        .expect("Session should be readable");
    assert_eq!(session.token.as_deref(), Some(TOKEN));
    assert_eq!(
        session.user.expect("User should be stored").display_name(),
        "Grace"
    );

    let home = app.home().expect("App should be ready");
    assert_eq!(home.activate().await, None);
    assert_eq!(home.view().await.username, "Grace");
}

// ============================================================================
// Home
// ============================================================================

/// An empty course list shows the placeholder and no cards.
#[tokio::test]
async fn test_empty_course_list_shows_placeholder() {
    let server = MockServer::start().await;
    mount_course_list(&server, json!([])).await;

    let app = signed_in_app(&server).await;
    let home = app.home().expect("App should be ready");
    home.activate().await;

    let markdown = HomeMarkdown::new(&home.view().await).generate();
    assert!(markdown.contains("No courses found"));
    assert!(!markdown.contains("1. **"));
}

/// A rejected token sends the user back to Login with a fresh stack.
#[tokio::test]
async fn test_rejected_token_returns_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&server)
        .await;

    let mut app = signed_in_app(&server).await;
    let home = app.home().expect("App should be ready");
    app.apply_opt(home.activate().await);

    assert_eq!(app.current_route(), Some(&Route::Login));
    assert_eq!(app.navigator().map(smartlearn_screens::Navigator::depth), Some(1));
}

// ============================================================================
// Generate Course
// ============================================================================

/// A 200 response carrying `message` is shown as an error and the form
/// stays put.
#[tokio::test]
async fn test_generate_message_in_success_body_stays_on_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/courses/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Could not generate course"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = signed_in_app(&server).await;
    let home = app.home().expect("App should be ready");
    app.apply(home.open_form());
    assert_eq!(app.current_route(), Some(&Route::CourseForm));

    let form = app.course_form().expect("App should be ready");
    form.edit(|input| {
        input.course_name = "Rust".into();
        input.difficulty_level = smartlearn_client::DifficultyLevel::parse("beginner");
        input.scheduling_frequency = smartlearn_client::SchedulingFrequency::parse("daily");
        input.time_commitment = "1".into();
    })
    .await;

    let dialogs = RecordingDialogs::declining();
    let transition = form.submit(&dialogs).await;
    app.apply_opt(transition);

    assert_eq!(form.phase().await, FormPhase::Editing);
    assert_eq!(app.current_route(), Some(&Route::CourseForm));
    let notices = dialogs.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message(), "Could not generate course");
}

/// A generated course opens on top of the form.
#[tokio::test]
async fn test_generate_success_opens_course() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/courses/generate"))
        .and(body_json(json!({
            "courseName": "Rust",
            "difficultyLevel": "Intermediate",
            "schedulingFrequency": "Weekly",
            "timeCommitment": "3",
            "learningGoals": "systems programming",
            "preferredResources": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(course_json("c42")))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = signed_in_app(&server).await;
    app.apply(Transition::Push(Route::CourseForm));

    let form = app.course_form().expect("App should be ready");
    form.set_course_name("Rust").await;
    form.set_difficulty_level(smartlearn_client::DifficultyLevel::Intermediate)
        .await;
    form.set_scheduling_frequency(smartlearn_client::SchedulingFrequency::Weekly)
        .await;
    form.set_time_commitment("3").await;
    form.set_learning_goals("systems programming").await;

    let dialogs = RecordingDialogs::declining();
    app.apply_opt(form.submit(&dialogs).await);

    let route = app.current_route().expect("App should be ready");
    assert_eq!(route.name(), RouteName::Course);
    assert_eq!(app.navigator().map(smartlearn_screens::Navigator::depth), Some(3));
    assert_eq!(dialogs.notices()[0].title(), "Success");
}

// ============================================================================
// Course Detail
// ============================================================================

/// One focus session of 12.5 seconds records exactly 12.5 seconds.
#[tokio::test]
async fn test_focus_session_records_time_once() {
    let server = MockServer::start().await;
    mount_course_list(&server, json!([course_json("c1")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/courses/c1/time-spent"))
        .and(header("authorization", "Bearer tok-e2e"))
        .and(body_json(json!({"timeSpent": 12.5})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = signed_in_app(&server).await;
    let home = app.home().expect("App should be ready");
    home.activate().await;
    app.apply_opt(home.open_course(0).await);

    let Some(Route::Course(snapshot)) = app.current_route().cloned() else {
        panic!("Expected course route");
    };
    let mut course = app
        .course(Arc::new(RecordingLinks::new()), snapshot)
        .expect("App should be ready");

    let start = Instant::now();
    course.focus_gained_at(start);
    assert_eq!(course.focus_lost_at(start + Duration::from_millis(12_500)), Some(12.5));
    course.teardown();
    course.settle().await;
}

/// Tapping the same resource twice sends two completions and never
/// bothers the user, even when the backend fails.
#[tokio::test]
async fn test_repeated_resource_completion_is_harmless() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/courses/c1/topics/t1/resources/0/complete"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/courses/c1/topics/t1/resources/0/complete"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let app = signed_in_app(&server).await;
    let links = Arc::new(RecordingLinks::new());
    let snapshot = smartlearn_client::CourseSnapshot::take(
        serde_json::from_value(course_json("c1")).expect("Invalid course fixture"),
    );
    let course = app
        .course(links.clone(), snapshot.clone())
        .expect("App should be ready");

    assert!(course.open_resource(0, 0).await);
    course.settle().await;
    assert!(course.open_resource(0, 0).await);
    course.settle().await;

    assert_eq!(links.opened().len(), 2);
    assert_eq!(course.snapshot(), &snapshot);
}

/// A confirmed delete pops back to Home.
#[tokio::test]
async fn test_confirmed_delete_returns_home() {
    let server = MockServer::start().await;
    mount_course_list(&server, json!([course_json("c1")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/courses/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = signed_in_app(&server).await;
    let home = app.home().expect("App should be ready");
    home.activate().await;
    app.apply_opt(home.open_course(0).await);

    let Some(Route::Course(snapshot)) = app.current_route().cloned() else {
        panic!("Expected course route");
    };
    let course = app
        .course(Arc::new(RecordingLinks::new()), snapshot)
        .expect("App should be ready");

    let dialogs = RecordingDialogs::confirming();
    app.apply_opt(course.delete(&dialogs).await);

    assert_eq!(app.current_route(), Some(&Route::Home));
    assert!(dialogs.notices().is_empty());
}
