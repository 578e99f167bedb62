//! Full user journeys against an in-process SmartLearn backend.
//!
//! The backend keeps accounts and courses in memory so a journey can
//! observe its own writes: time recorded on the course screen shows up on
//! Home after a refresh, and a deleted course disappears.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use smartlearn_client::{Config, DifficultyLevel, SchedulingFrequency};
use smartlearn_screens::{App, RecordingDialogs, RecordingLinks, Route, RouteName, Transition};
use tempfile::TempDir;

// ============================================================================
// Backend
// ============================================================================

struct Account {
    id: String,
    name: String,
    password: String,
}

#[derive(Default)]
struct Backend {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    courses: Vec<Value>,
    next_course: u32,
}

type Shared = Arc<Mutex<Backend>>;
type Reply = (StatusCode, Json<Value>);

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn message(status: StatusCode, text: &str) -> Reply {
    reply(status, json!({ "message": text }))
}

/// Returns the signed-in email for a bearer token, if any.
fn authorized(backend: &Backend, headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    backend.tokens.get(token).cloned()
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut backend = state.lock().expect("Backend state poisoned");
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if backend.accounts.contains_key(&email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }

    let id = format!("u{}", backend.accounts.len() + 1);
    backend.accounts.insert(
        email,
        Account {
            id,
            name: body["name"].as_str().unwrap_or_default().to_string(),
            password: body["password"].as_str().unwrap_or_default().to_string(),
        },
    );
    message(StatusCode::CREATED, "User registered")
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut backend = state.lock().expect("Backend state poisoned");
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some(account) = backend
        .accounts
        .get(email)
        .filter(|account| account.password == password)
    else {
        return message(StatusCode::BAD_REQUEST, "Invalid credentials");
    };

    let token = format!("token-{}", account.id);
    let user = json!({ "_id": account.id, "name": account.name, "email": email });
    backend.tokens.insert(token.clone(), email.to_string());
    reply(StatusCode::OK, json!({ "token": token, "user": user }))
}

async fn list_courses(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = state.lock().expect("Backend state poisoned");
    if authorized(&backend, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    reply(StatusCode::OK, json!({ "success": true, "courses": backend.courses }))
}

async fn recommend(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = state.lock().expect("Backend state poisoned");
    if authorized(&backend, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    reply(StatusCode::OK, json!({ "success": true, "recommendations": [] }))
}

async fn generate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut backend = state.lock().expect("Backend state poisoned");
    if authorized(&backend, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let name = body["courseName"].as_str().unwrap_or_default();
    if name.is_empty() {
        return message(StatusCode::OK, "Course name is required");
    }

    backend.next_course += 1;
    let course = json!({
        "_id": format!("c{}", backend.next_course),
        "courseName": name,
        "difficultyLevel": body["difficultyLevel"],
        "progress": { "completionPercentage": 0, "timeSpent": 0 },
        "topics": [{
            "_id": "t1",
            "topicName": format!("Getting started with {name}"),
            "timeRecommended": 2,
            "resources": [
                { "resourceType": "Video", "resourceLink": "https://example.com/intro" },
                { "resourceType": "Article", "resourceLink": "https://example.com/guide" }
            ]
        }]
    });
    backend.courses.push(course.clone());
    reply(StatusCode::OK, course)
}

async fn time_spent(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut backend = state.lock().expect("Backend state poisoned");
    if authorized(&backend, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let seconds = body["timeSpent"].as_f64().unwrap_or_default();
    let Some(course) = backend.courses.iter_mut().find(|c| c["_id"] == id) else {
        return message(StatusCode::NOT_FOUND, "Course not found");
    };
    let total = course["progress"]["timeSpent"].as_f64().unwrap_or_default() + seconds;
    course["progress"]["timeSpent"] = json!(total);
    reply(StatusCode::OK, json!({ "success": true }))
}

async fn complete_resource(
    State(state): State<Shared>,
    Path((id, topic, index)): Path<(String, String, usize)>,
    headers: HeaderMap,
) -> Reply {
    let mut backend = state.lock().expect("Backend state poisoned");
    if authorized(&backend, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let Some(course) = backend.courses.iter_mut().find(|c| c["_id"] == id) else {
        return message(StatusCode::NOT_FOUND, "Course not found");
    };
    let Some(resource) = course["topics"]
        .as_array_mut()
        .and_then(|topics| topics.iter_mut().find(|t| t["_id"] == topic))
        .and_then(|topic| topic["resources"].get_mut(index))
    else {
        return message(StatusCode::NOT_FOUND, "Resource not found");
    };
    resource["completed"] = json!(true);

    let resources: Vec<&Value> = course["topics"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| t["resources"].as_array())
        .flatten()
        .collect();
    let done = resources.iter().filter(|r| r["completed"] == true).count();
    let percentage = done * 100 / resources.len().max(1);
    course["progress"]["completionPercentage"] = json!(percentage);
    reply(StatusCode::OK, json!({ "success": true }))
}

async fn delete_course(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    let mut backend = state.lock().expect("Backend state poisoned");
    if authorized(&backend, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let before = backend.courses.len();
    backend.courses.retain(|c| c["_id"] != id);
    if backend.courses.len() == before {
        return message(StatusCode::NOT_FOUND, "Course not found");
    }
    reply(StatusCode::OK, json!({ "success": true }))
}

/// Finds an available port for the test server.
fn find_available_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("Failed to get addr").port()
}

/// Spawns the backend and returns its base URL.
async fn spawn_backend() -> String {
    let port = find_available_port();
    let app = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/courses", get(list_courses))
        .route("/api/courses/recommend", get(recommend))
        .route("/api/courses/generate", post(generate))
        .route("/api/courses/:id", delete(delete_course))
        .route("/api/courses/:id/time-spent", put(time_spent))
        .route(
            "/api/courses/:id/topics/:topic/resources/:index/complete",
            put(complete_resource),
        )
        .with_state(Shared::default());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
        .await
        .expect("Failed to bind");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    // Give the server time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

/// Configuration pointing at `base_url` with the session kept in `dir`.
fn config_for(base_url: &str, dir: &TempDir) -> Config {
    Config::new(base_url)
        .expect("Invalid backend URL")
        .with_session_file(dir.path().join("session.json"))
}

/// Registers and signs in Grace, leaving the app on Home.
async fn register_and_login(app: &mut App) {
    let dialogs = RecordingDialogs::declining();

    let mut signup = app.signup().expect("App should be ready");
    signup.set_name("Grace");
    signup.set_email("grace@example.com");
    signup.set_password("hunter2");
    app.apply_opt(signup.submit(&dialogs).await);
    assert_eq!(app.current_route(), Some(&Route::Login));

    let mut login = app.login().expect("App should be ready");
    login.set_email("grace@example.com");
    login.set_password("hunter2");
    app.apply_opt(login.submit(&dialogs).await);
    assert_eq!(app.current_route(), Some(&Route::Home));

    let notices = dialogs.notices();
    assert_eq!(notices.len(), 1, "Only the signup success is announced");
    assert_eq!(notices[0].title(), "Success");
}

// ============================================================================
// Journeys
// ============================================================================

/// Sign up, generate a course, study it, and delete it.
#[tokio::test]
async fn test_course_lifecycle() {
    let base_url = spawn_backend().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = App::boot(Ok(config_for(&base_url, &dir))).await;
    assert_eq!(app.current_route(), Some(&Route::Login));

    register_and_login(&mut app).await;

    let home = app.home().expect("App should be ready");
    assert_eq!(home.activate().await, None);
    let view = home.view().await;
    assert_eq!(view.username, "Grace");
    assert_eq!(view.empty_message(), Some("No courses found"));

    // Generate
    app.apply(home.open_form());
    let form = app.course_form().expect("App should be ready");
    form.set_course_name("Rust").await;
    form.set_difficulty_level(DifficultyLevel::Beginner).await;
    form.set_scheduling_frequency(SchedulingFrequency::Daily).await;
    form.set_time_commitment("2").await;

    let dialogs = RecordingDialogs::confirming();
    app.apply_opt(form.submit(&dialogs).await);
    let Some(Route::Course(snapshot)) = app.current_route().cloned() else {
        panic!("Expected course route after generating");
    };
    assert_eq!(snapshot.course().course_name, "Rust");
    assert_eq!(snapshot.course().difficulty_level, DifficultyLevel::Beginner);

    // Study
    let links = Arc::new(RecordingLinks::new());
    let mut course = app
        .course(links.clone(), snapshot.clone())
        .expect("App should be ready");
    assert!(course.open_resource(0, 1).await);
    let start = Instant::now();
    course.focus_gained_at(start);
    course.focus_lost_at(start + Duration::from_secs(30));
    course.teardown();
    course.settle().await;
    assert_eq!(links.opened(), vec!["https://example.com/guide".to_string()]);
    assert_eq!(course.snapshot(), &snapshot, "The open screen keeps its snapshot");

    // Home sees the recorded progress
    app.apply(Transition::Navigate(Route::Home));
    assert_eq!(app.navigator().map(smartlearn_screens::Navigator::depth), Some(1));
    assert_eq!(home.refresh().await, None);
    let view = home.view().await;
    assert_eq!(view.courses.len(), 1);
    assert!((view.courses[0].progress.time_spent - 30.0).abs() < f64::EPSILON);
    assert!((view.courses[0].progress.completion_percentage - 50.0).abs() < f64::EPSILON);
    assert!(view.courses[0].topics[0].resources[1].completed);

    // Delete
    app.apply_opt(home.open_course(0).await);
    let Some(Route::Course(snapshot)) = app.current_route().cloned() else {
        panic!("Expected course route");
    };
    let course = app
        .course(Arc::new(RecordingLinks::new()), snapshot)
        .expect("App should be ready");
    app.apply_opt(course.delete(&dialogs).await);
    assert_eq!(app.current_route(), Some(&Route::Home));

    home.refresh().await;
    assert!(home.view().await.courses.is_empty());
    assert!(dialogs.notices().iter().all(|notice| notice.title() == "Success"));
}

/// A session written by one run is picked up by the next.
#[tokio::test]
async fn test_session_survives_restart() {
    let base_url = spawn_backend().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut first = App::boot(Ok(config_for(&base_url, &dir))).await;
    register_and_login(&mut first).await;
    drop(first);

    let mut second = App::boot(Ok(config_for(&base_url, &dir))).await;
    assert_eq!(second.current_route(), Some(&Route::Home));
    let home = second.home().expect("App should be ready");
    assert_eq!(home.activate().await, None);
    assert_eq!(home.view().await.username, "Grace");

    // Logging out is also remembered
    let dialogs = RecordingDialogs::confirming();
    second.apply_opt(home.logout(&dialogs).await);
    assert_eq!(second.current_route(), Some(&Route::Login));

    let third = App::boot(Ok(config_for(&base_url, &dir))).await;
    assert_eq!(
        third.current_route().map(Route::name),
        Some(RouteName::Login)
    );
}

/// Backend messages are shown to the user verbatim.
#[tokio::test]
async fn test_backend_messages_reach_the_user() {
    let base_url = spawn_backend().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = App::boot(Ok(config_for(&base_url, &dir))).await;
    register_and_login(&mut app).await;

    let dialogs = RecordingDialogs::declining();
    let mut signup = app.signup().expect("App should be ready");
    signup.set_name("Grace");
    signup.set_email("grace@example.com");
    signup.set_password("hunter2");
    assert_eq!(signup.submit(&dialogs).await, None);

    let mut login = app.login().expect("App should be ready");
    login.set_email("grace@example.com");
    login.set_password("wrong");
    assert_eq!(login.submit(&dialogs).await, None);

    let messages: Vec<String> = dialogs
        .notices()
        .iter()
        .map(|notice| notice.message().to_string())
        .collect();
    assert_eq!(messages, vec!["User already exists", "Invalid credentials"]);
    assert_eq!(app.current_route(), Some(&Route::Home));
}
