//! Mount state shared between a controller and its in-flight requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether a screen is still mounted.
///
/// Clones share the flag. Once torn down it never comes back.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    mounted: Arc<AtomicBool>,
}

impl Lifecycle {
    /// A freshly mounted screen.
    #[must_use]
    pub fn mounted() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns `true` until [`Lifecycle::teardown`] is called.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Marks the screen as unmounted.
    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::mounted()
    }
}
