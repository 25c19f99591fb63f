//! Application layer - Habit session, command handlers and outbound dispatch.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers mutate a `HabitSession` first and report later I/O problems as
//! `EngineNotice`s instead of failing.

mod dispatch;
pub mod handlers;
mod notices;
mod session;

pub use dispatch::OutboundDispatcher;
pub use notices::EngineNotice;
pub use session::{HabitSession, PendingWrite};

pub use handlers::{
    AcceptProgressionCommand, AcceptProgressionHandler, AcceptProgressionResult,
    ChangeHabitStatusCommand, ChangeHabitStatusHandler, ChangeHabitStatusResult,
    CreateHabitCommand, CreateHabitHandler, CreateHabitResult, HabitHandlers,
    ReceiveRecoveryPlanCommand, ReceiveRecoveryPlanHandler, ReceiveRecoveryPlanResult,
    RecordCompletionCommand, RecordCompletionHandler, RecordCompletionResult,
    ScanSetbacksCommand, ScanSetbacksHandler, ScanSetbacksResult,
    UpdateHabitCommand, UpdateHabitHandler, UpdateHabitResult,
};
