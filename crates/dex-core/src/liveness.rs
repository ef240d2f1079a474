use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "still active" flag.
///
/// In-flight fetches are never cancelled. Components check the flag before
/// applying a response and drop the response once the owner has retired it.
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    /// Creates a live flag.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether responses should still be applied.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks the owner as gone; later responses are discarded.
    pub fn retire(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
