//! Dungeon Core: shared domain abstractions.
//!
//! This crate defines the identifiers, traits and error types that the
//! content and session crates depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod ids;
