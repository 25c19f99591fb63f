//! Storage adapters for habits and recovery plans.
//!
//! - `InMemoryHabitStore` - tests and development, with failure injection
//! - `FileHabitStore` - YAML records plus JSON-lines histories on disk
//! - `InMemoryRecoveryPlanRepository` - received recovery plans

mod file_habit_store;
mod in_memory_habit_store;
mod in_memory_recovery_plans;

pub use file_habit_store::FileHabitStore;
pub use in_memory_habit_store::InMemoryHabitStore;
pub use in_memory_recovery_plans::InMemoryRecoveryPlanRepository;
