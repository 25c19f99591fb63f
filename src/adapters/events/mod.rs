//! Event publishing adapters.
//!
//! - `InMemoryEventBus` - captures envelopes for tests
//! - `TracingEventPublisher` - writes envelopes to structured logs

mod in_memory;
mod tracing_publisher;

pub use in_memory::InMemoryEventBus;
pub use tracing_publisher::TracingEventPublisher;
