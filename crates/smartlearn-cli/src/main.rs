//! SmartLearn CLI
//!
//! Terminal front-end for the SmartLearn course generator. Each subcommand
//! drives one screen controller and prints the resulting screen as Markdown.

mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use smartlearn_client::{Config, CourseSnapshot, DifficultyLevel, SchedulingFrequency};
use smartlearn_render::{json::JsonGenerator, CourseMarkdown, FaqMarkdown, HomeMarkdown};
use smartlearn_screens::{App, HomeController, Route, Transition, FAQS, LOADING_MESSAGE};
use tracing_subscriber::EnvFilter;

use crate::terminal::{wait_for_enter, TerminalDialogs, TerminalLinks};

/// SmartLearn - personalized course generator
///
/// Sign in, generate learning paths, and track your progress from the terminal.
#[derive(Parser, Debug)]
#[command(name = "smartlearn")]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Session file (overrides SMARTLEARN_SESSION_FILE)
    #[arg(long, value_name = "FILE")]
    session_file: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Signup {
        /// Display name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },

    /// Sign in and store the session
    Login {
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show your courses and recommendations
    Home,

    /// Show one of your courses by its number on the home screen
    Course {
        /// Course number as listed by `home`
        number: usize,

        #[command(subcommand)]
        action: Option<CourseAction>,
    },

    /// Generate a new learning path
    Generate {
        /// Course, topic or skill name
        #[arg(long)]
        name: String,
        /// Difficulty level (Beginner, Intermediate, Advanced)
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: DifficultyLevel,
        /// Scheduling frequency (Daily, Weekly)
        #[arg(long, value_parser = parse_frequency)]
        frequency: SchedulingFrequency,
        /// Hours per day
        #[arg(long)]
        hours: String,
        /// Learning goals or interests
        #[arg(long, default_value = "")]
        goals: String,
        /// Preferred learning resources
        #[arg(long, default_value = "")]
        resources: String,
    },

    /// Show frequently asked questions
    Faqs,
}

#[derive(Subcommand, Debug)]
enum CourseAction {
    /// Open a resource and mark it completed
    Open {
        /// Topic number
        topic: usize,
        /// Resource number within the topic
        resource: usize,
    },
    /// Time a study session until Enter is pressed
    Study,
    /// Delete the course
    Delete,
    /// Write the course as JSON
    Export {
        /// Output file
        path: PathBuf,
        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },
}

fn parse_difficulty(s: &str) -> Result<DifficultyLevel, String> {
    DifficultyLevel::parse(s)
        .ok_or_else(|| format!("'{s}' is not one of Beginner, Intermediate, Advanced"))
}

fn parse_frequency(s: &str) -> Result<SchedulingFrequency, String> {
    SchedulingFrequency::parse(s).ok_or_else(|| format!("'{s}' is not one of Daily, Weekly"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Boots the app and runs one subcommand.
async fn run(args: Args) -> anyhow::Result<()> {
    let config = match args.api_url.as_deref() {
        Some(url) => Config::new(url),
        None => Config::from_env(),
    }
    .map(|config| match args.session_file {
        Some(path) => config.with_session_file(path),
        None => config,
    });

    let mut app = App::boot(config).await;
    if !app.is_ready() {
        println!("{LOADING_MESSAGE}");
        anyhow::bail!(
            "API_BASE_URL is not loaded\n\nSuggestion: Set API_BASE_URL in your environment or .env file, or pass --api-url"
        );
    }
    tracing::debug!(route = ?app.current_route().map(Route::title), "App ready");

    let dialogs = TerminalDialogs::new(args.yes);

    match args.command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            let mut signup = ready(app.signup())?;
            signup.set_name(name);
            signup.set_email(email);
            signup.set_password(password);
            let transition = signup.submit(&dialogs).await;
            follow(&mut app, transition);
        }

        Command::Login { email, password } => {
            let mut login = ready(app.login())?;
            login.set_email(email);
            login.set_password(password);
            let transition = login.submit(&dialogs).await;
            if follow(&mut app, transition) == Some(Route::Home) {
                show_home(&mut app).await?;
            }
        }

        Command::Logout => {
            let home = ready(app.home())?;
            let transition = home.logout(&dialogs).await;
            if follow(&mut app, transition) == Some(Route::Login) {
                println!("Logged out");
            }
        }

        Command::Home => {
            show_home(&mut app).await?;
        }

        Command::Course { number, action } => {
            let Some(home) = load_home(&mut app).await? else {
                return Ok(());
            };
            let transition = home.open_course(number.saturating_sub(1)).await;
            home.teardown();
            let Some(Route::Course(snapshot)) = follow(&mut app, transition) else {
                anyhow::bail!(
                    "No course number {number}\n\nSuggestion: Run `smartlearn home` to list your courses"
                );
            };
            run_course(&mut app, &dialogs, snapshot, action).await?;
        }

        Command::Generate {
            name,
            difficulty,
            frequency,
            hours,
            goals,
            resources,
        } => {
            let form = ready(app.course_form())?;
            form.set_course_name(name).await;
            form.set_difficulty_level(difficulty).await;
            form.set_scheduling_frequency(frequency).await;
            form.set_time_commitment(hours).await;
            form.set_learning_goals(goals).await;
            form.set_preferred_resources(resources).await;

            let transition = form.submit(&dialogs).await;
            if let Some(Route::Course(snapshot)) = follow(&mut app, transition) {
                println!("{}", CourseMarkdown::new(&snapshot).generate());
            }
        }

        Command::Faqs => {
            println!("{}", FaqMarkdown::new(&FAQS).generate());
        }
    }

    Ok(())
}

/// Runs an action on the course detail screen.
async fn run_course(
    app: &mut App,
    dialogs: &TerminalDialogs,
    snapshot: CourseSnapshot,
    action: Option<CourseAction>,
) -> anyhow::Result<()> {
    let mut course = ready(app.course(Arc::new(TerminalLinks), snapshot))?;

    match action {
        None => {
            println!("{}", CourseMarkdown::new(course.snapshot()).generate());
        }
        Some(CourseAction::Open { topic, resource }) => {
            let opened = course
                .open_resource(topic.saturating_sub(1), resource.saturating_sub(1))
                .await;
            if !opened {
                anyhow::bail!("No resource {resource} in topic {topic}");
            }
        }
        Some(CourseAction::Study) => {
            println!("Studying {}. Press Enter when done.", course.snapshot().course().course_name);
            course.focus_gained();
            wait_for_enter().await;
            if let Some(seconds) = course.focus_lost() {
                println!("Recorded {}", smartlearn_render::format_time_spent(seconds));
            }
        }
        Some(CourseAction::Delete) => {
            let transition = course.delete(dialogs).await;
            if follow(app, transition).is_some() {
                println!("Course deleted");
            }
        }
        Some(CourseAction::Export { path, compact }) => {
            JsonGenerator::new(course.snapshot().course()).write_to_file(&path, !compact)?;
            println!("Course written to {}", path.display());
        }
    }

    course.teardown();
    course.settle().await;
    Ok(())
}

/// Activates the home screen. Returns `None` if the session was rejected.
async fn load_home(app: &mut App) -> anyhow::Result<Option<HomeController>> {
    let home = ready(app.home())?;
    let transition = home.activate().await;
    if transition.is_some() {
        follow(app, transition);
        eprintln!("Your session has expired. Run `smartlearn login` to sign in again.");
        return Ok(None);
    }
    Ok(Some(home))
}

/// Activates and prints the home screen.
async fn show_home(app: &mut App) -> anyhow::Result<()> {
    if let Some(home) = load_home(app).await? {
        println!("{}", HomeMarkdown::new(&home.view().await).generate());
        home.teardown();
    }
    Ok(())
}

/// Applies a transition and returns the route now shown, if it changed.
fn follow(app: &mut App, transition: Option<Transition>) -> Option<Route> {
    let transition = transition?;
    app.apply(transition);
    let route = app.current_route()?.clone();
    tracing::debug!(route = route.title(), "Navigated");
    Some(route)
}

/// Unwraps a controller that only exists once the app is ready.
fn ready<T>(controller: Option<T>) -> anyhow::Result<T> {
    controller.ok_or_else(|| anyhow::anyhow!("{LOADING_MESSAGE}"))
}
