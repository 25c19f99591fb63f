//! Handler set built from engine configuration.

use std::sync::Arc;

use crate::application::OutboundDispatcher;
use crate::config::{EngineConfig, ValidationError};
use crate::ports::{EventPublisher, ProgressLedger, RecoveryPlanRepository};

use super::habit::{
    AcceptProgressionHandler, ChangeHabitStatusHandler, CreateHabitHandler,
    ReceiveRecoveryPlanHandler, RecordCompletionHandler, ScanSetbacksHandler, UpdateHabitHandler,
};

/// All habit command handlers, sharing one set of collaborators.
#[derive(Clone)]
pub struct HabitHandlers {
    pub create: Arc<CreateHabitHandler>,
    pub update: Arc<UpdateHabitHandler>,
    pub change_status: Arc<ChangeHabitStatusHandler>,
    pub record_completion: Arc<RecordCompletionHandler>,
    pub accept_progression: Arc<AcceptProgressionHandler>,
    pub scan_setbacks: Arc<ScanSetbacksHandler>,
    pub receive_recovery_plan: Arc<ReceiveRecoveryPlanHandler>,
}

impl HabitHandlers {
    /// Wires the handlers with the configured progression defaults and
    /// analysis interval.
    ///
    /// # Errors
    ///
    /// - `InvalidStreakThreshold` / `InvalidSuccessRateThreshold` if the
    ///   default progression rule is invalid
    pub fn from_config(
        engine: &EngineConfig,
        ledger: Arc<dyn ProgressLedger>,
        dispatcher: OutboundDispatcher,
        plans: Arc<dyn RecoveryPlanRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, ValidationError> {
        let default_rule = engine.default_progression_rule()?;

        Ok(Self {
            create: Arc::new(CreateHabitHandler::new(publisher.clone(), default_rule)),
            update: Arc::new(UpdateHabitHandler::new(publisher.clone())),
            change_status: Arc::new(ChangeHabitStatusHandler::new(publisher.clone())),
            record_completion: Arc::new(RecordCompletionHandler::new(
                ledger,
                dispatcher.clone(),
                publisher.clone(),
                engine.analysis_interval,
            )),
            accept_progression: Arc::new(AcceptProgressionHandler::new(publisher.clone())),
            scan_setbacks: Arc::new(ScanSetbacksHandler::new(dispatcher, publisher.clone())),
            receive_recovery_plan: Arc::new(ReceiveRecoveryPlanHandler::new(plans, publisher)),
        })
    }
}
