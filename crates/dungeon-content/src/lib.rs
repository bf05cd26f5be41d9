//! Dungeon crawler scene content.
//!
//! Responsible for the immutable scene registry that drives the transition
//! engine, the separate presentation table consumed by renderers, and the
//! YAML loaders for both.

pub mod application;
pub mod domain;
pub mod error;
