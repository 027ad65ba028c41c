use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Debounced search box state.
///
/// The raw value tracks every keystroke so the input stays responsive; the
/// committed value only advances after a quiet period with no further edits.
/// Each edit schedules a commit deadline and cancels the previous one by
/// replacing it, so a burst of keystrokes commits exactly once.
///
/// Time is passed in explicitly, which keeps the debounce deterministic under
/// test; callers drive it from a ticker or from an async sleep on
/// [`SearchInput::deadline`].
#[derive(Debug, Clone)]
pub struct SearchInput {
    raw: String,
    committed: String,
    quiet: Duration,
    deadline: Option<Instant>,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet: Duration) -> Self {
        Self {
            raw: String::new(),
            committed: String::new(),
            quiet,
            deadline: None,
        }
    }

    /// Record a keystroke at `now` and (re)schedule the commit.
    pub fn set_raw<T: Into<String>>(&mut self, text: T, now: Instant) {
        self.raw = text.into();
        self.deadline = Some(now + self.quiet);
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The last committed term; empty means no filter.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// The committed term in the shape list queries expect.
    pub fn committed_term(&self) -> Option<&str> {
        if self.committed.is_empty() {
            None
        } else {
            Some(self.committed.as_str())
        }
    }

    /// Pending commit deadline, if an edit is waiting out its quiet period.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Commit the raw value if its quiet period has elapsed by `now`.
    /// Returns the newly committed term only when it differs from the
    /// previous one; an unchanged value is absorbed silently.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        if self.raw == self.committed {
            return None;
        }
        self.committed = self.raw.clone();
        Some(self.committed.clone())
    }
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}
