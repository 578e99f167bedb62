//! Stack navigator for the SmartLearn screens.
//!
//! The navigator only records where the user is. It owns no business state;
//! the one piece of data that travels with a route is the course snapshot
//! handed to the detail screen.

use std::fmt;

use smartlearn_client::CourseSnapshot;

// ============================================================================
// Routes
// ============================================================================

/// Name of a screen in the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    /// Sign-in form.
    Login,
    /// Registration form.
    Signup,
    /// Course list and recommendations.
    Home,
    /// Generate-course form.
    CourseForm,
    /// Course detail.
    Course,
    /// Frequently asked questions.
    Faqs,
}

impl RouteName {
    /// Header title shown for the screen.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Signup",
            Self::Home => "Home",
            Self::CourseForm => "CourseForm",
            Self::Course => "Course Details",
            Self::Faqs => "FAQs",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A screen together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Sign-in form.
    Login,
    /// Registration form.
    Signup,
    /// Course list and recommendations.
    Home,
    /// Generate-course form.
    CourseForm,
    /// Course detail for a snapshot taken when navigating.
    Course(CourseSnapshot),
    /// Frequently asked questions.
    Faqs,
}

impl Route {
    /// The route's name in the route table.
    #[must_use]
    pub const fn name(&self) -> RouteName {
        match self {
            Self::Login => RouteName::Login,
            Self::Signup => RouteName::Signup,
            Self::Home => RouteName::Home,
            Self::CourseForm => RouteName::CourseForm,
            Self::Course(_) => RouteName::Course,
            Self::Faqs => RouteName::Faqs,
        }
    }

    /// Header title shown for the route.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.name().title()
    }
}

/// A navigation request produced by a screen controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Go to the route, popping back to it if it is already on the stack.
    Navigate(Route),
    /// Push the route on top of the stack.
    Push(Route),
    /// Swap the top of the stack for the route.
    Replace(Route),
    /// Discard the stack and start over at the route.
    Reset(Route),
    /// Pop the top of the stack.
    Back,
}

// ============================================================================
// Navigator
// ============================================================================

/// A stack of routes that is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    root: Route,
    stack: Vec<Route>,
}

impl Navigator {
    /// Creates a navigator showing `root`.
    #[must_use]
    pub const fn new(root: Route) -> Self {
        Self {
            root,
            stack: Vec::new(),
        }
    }

    /// The route currently shown.
    #[must_use]
    pub fn current(&self) -> &Route {
        self.stack.last().unwrap_or(&self.root)
    }

    /// Number of routes on the stack, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() + 1
    }

    /// Routes from the root to the top.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        std::iter::once(&self.root).chain(self.stack.iter())
    }

    /// Goes to `route`. If a route with the same name is already on the
    /// stack, everything above it is popped and its parameters are replaced;
    /// otherwise `route` is pushed.
    pub fn navigate(&mut self, route: Route) {
        let name = route.name();
        if let Some(index) = self.stack.iter().rposition(|r| r.name() == name) {
            self.stack.truncate(index + 1);
            self.stack[index] = route;
        } else if self.root.name() == name {
            self.stack.clear();
            self.root = route;
        } else {
            self.stack.push(route);
        }
    }

    /// Pushes `route` on top of the stack.
    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Replaces the route currently shown.
    pub fn replace(&mut self, route: Route) {
        match self.stack.last_mut() {
            Some(top) => *top = route,
            None => self.root = route,
        }
    }

    /// Discards the stack and shows `route` as the new root.
    pub fn reset(&mut self, route: Route) {
        self.stack.clear();
        self.root = route;
    }

    /// Pops the top route. Returns `false` when already at the root.
    pub fn back(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Applies a transition requested by a controller.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Navigate(route) => self.navigate(route),
            Transition::Push(route) => self.push(route),
            Transition::Replace(route) => self.replace(route),
            Transition::Reset(route) => self.reset(route),
            Transition::Back => {
                self.back();
            }
        }
    }
}
