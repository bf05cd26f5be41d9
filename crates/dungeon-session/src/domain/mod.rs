//! Domain model for a playthrough.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod stats;
pub mod visited;
