//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `HabitStore` - Habit records and their completion histories
//! - `RecoveryPlanRepository` - Recovery plans received for an owner
//!
//! ## Collaborator Ports (one-way, at-most-once)
//!
//! - `RecoveryPlanner` - Recovery plan requests per setback
//! - `CoachingAdvisor` - Next-level proposals and pattern analysis
//! - `ProgressLedger` - XP awards
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events

mod coaching_advisor;
mod collaborator;
mod event_publisher;
mod habit_store;
mod progress_ledger;
mod recovery_plan_repository;
mod recovery_planner;

pub use coaching_advisor::CoachingAdvisor;
pub use collaborator::CollaboratorError;
pub use event_publisher::EventPublisher;
pub use habit_store::{HabitStore, HabitStoreError};
pub use progress_ledger::ProgressLedger;
pub use recovery_plan_repository::RecoveryPlanRepository;
pub use recovery_planner::RecoveryPlanner;
