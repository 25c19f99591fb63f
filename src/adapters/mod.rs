//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event publishers (in-memory capture, tracing)
//! - `storage` - Habit stores (in-memory, files) and recovery plan storage
//! - `coaching` - Coaching service client and its in-memory stand-in

pub mod coaching;
pub mod events;
pub mod storage;

pub use coaching::{CoachingClientConfig, CoachingRequest, CoachingServiceClient, InMemoryCoachingService};
pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use storage::{FileHabitStore, InMemoryHabitStore, InMemoryRecoveryPlanRepository};
