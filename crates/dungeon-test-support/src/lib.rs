//! Shared test mocks and fixtures for the dungeon crawler.

mod clock;
mod fixtures;

pub use clock::FixedClock;
pub use fixtures::{HAZARD_SCENES, builtin_presentation, builtin_registry, hazard_registry};
