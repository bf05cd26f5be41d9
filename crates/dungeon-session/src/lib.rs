//! Dungeon crawler sessions and progress.
//!
//! Responsible for player stats, visited-transition tracking, scene
//! transitions and the in-memory store of running playthroughs.

pub mod application;
pub mod domain;
