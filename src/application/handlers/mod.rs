//! Application handlers.
//!
//! Command handlers that orchestrate habit domain operations.

pub mod habit;
mod habit_handlers;

pub use habit_handlers::HabitHandlers;

pub use habit::{
    AcceptProgressionCommand, AcceptProgressionHandler, AcceptProgressionResult,
    ChangeHabitStatusCommand, ChangeHabitStatusHandler, ChangeHabitStatusResult,
    CreateHabitCommand, CreateHabitHandler, CreateHabitResult,
    ReceiveRecoveryPlanCommand, ReceiveRecoveryPlanHandler, ReceiveRecoveryPlanResult,
    RecordCompletionCommand, RecordCompletionHandler, RecordCompletionResult,
    ScanSetbacksCommand, ScanSetbacksHandler, ScanSetbacksResult,
    UpdateHabitCommand, UpdateHabitHandler, UpdateHabitResult,
};
