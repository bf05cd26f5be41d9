//! Time source for event timestamps.

use chrono::{DateTime, Utc};

/// Supplies `occurred_at` for recorded events.
///
/// Tests substitute a fixed clock so recorded streams are reproducible.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used by the server binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
