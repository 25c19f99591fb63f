//! Coaching service adapters.
//!
//! - `CoachingServiceClient` - reqwest client for the remote coaching service
//! - `InMemoryCoachingService` - request recorder for tests and offline runs

mod http_client;
mod in_memory;

pub use http_client::{CoachingClientConfig, CoachingServiceClient};
pub use in_memory::{CoachingRequest, InMemoryCoachingService};
