use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static SHARED_SEQUENCE: Lazy<ScreenshotSequence> = Lazy::new(ScreenshotSequence::new);

/// Monotonic counter used to disambiguate screenshot file names.
///
/// Clones share the same underlying counter, so one sequence can be handed
/// to several photographers (or tasks) without ever repeating a number.
#[derive(Debug, Clone)]
pub struct ScreenshotSequence {
    next: Arc<AtomicU64>,
}

impl ScreenshotSequence {
    /// A fresh sequence whose first number is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Process-wide sequence used when no sequence is injected
    pub fn shared() -> Self {
        SHARED_SEQUENCE.clone()
    }

    /// Hands out the current number and advances the counter
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The number the next call to [`next`](Self::next) will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl Default for ScreenshotSequence {
    fn default() -> Self {
        Self::new()
    }
}
