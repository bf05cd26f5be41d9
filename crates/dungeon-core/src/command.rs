//! Commands sent to a playthrough.

use uuid::Uuid;

/// A request to change a playthrough.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name used in logs, e.g. `session.choose`.
    fn command_type(&self) -> &'static str;

    /// Correlation id stamped on every event the command records.
    fn correlation_id(&self) -> Uuid;

    /// The targeted session, or `None` for commands that create one.
    fn session_id(&self) -> Option<Uuid> {
        None
    }
}
