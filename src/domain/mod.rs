//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `habit` - Habit aggregate, metrics, rewards, progression and setbacks

pub mod foundation;
pub mod habit;
