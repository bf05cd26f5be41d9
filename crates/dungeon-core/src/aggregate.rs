//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// A playthrough-like root that changes state only by applying events it
/// records itself.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate records and applies.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Events recorded since the last drain, oldest first.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Forgets recorded events once the caller has rendered them.
    fn clear_uncommitted_events(&mut self);

    /// Returns the recorded events and clears them.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>
    where
        Self::Event: Clone,
    {
        let events = self.uncommitted_events().to_vec();
        self.clear_uncommitted_events();
        events
    }
}
