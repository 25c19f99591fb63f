//! Habit Engine - Habit formation and adaptive behavior change
//!
//! This crate tracks repetitions of user-defined habits, keeps streaks and
//! success rates, promotes habits to harder variants once they are
//! established, and detects lapses so a coaching service can plan a recovery.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
