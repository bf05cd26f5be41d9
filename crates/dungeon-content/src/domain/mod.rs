//! Domain model for scene content.

pub mod presentation;
pub mod registry;
pub mod scene;
