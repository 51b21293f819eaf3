use std::time::Duration;

/// Configuration for the session repository.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period after the last edit before the session is persisted.
    /// Clamped to [`SessionConfig::MAX_DEBOUNCE`].
    pub debounce: Duration,
    /// Immediate retries after a failed durable write.
    pub persist_retries: u32,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl SessionConfig {
    /// Upper bound on the window in which edits exist only in memory.
    pub const MAX_DEBOUNCE: Duration = Duration::from_millis(300);

    /// Returns the config with `debounce` set, clamped to the maximum.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce.min(Self::MAX_DEBOUNCE);
        self
    }

    /// The debounce window actually applied.
    pub fn effective_debounce(&self) -> Duration {
        self.debounce.min(Self::MAX_DEBOUNCE)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            persist_retries: 1,
            event_capacity: 64,
        }
    }
}
