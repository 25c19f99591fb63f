//! Habit Engine worker - periodic setback scans
//!
//! Loads every owner found in the file store, runs one setback detection
//! pass per owner and hands each finding to the recovery planner.
//!
//! Environment variables (see `habit_engine::config`):
//!   HABIT_ENGINE__STORE__DATA_DIR - habit store root (default: ./data/habits)
//!   HABIT_ENGINE__ENGINE__SCAN_INTERVAL_SECS - seconds between passes (default: 3600)
//!   HABIT_ENGINE__COACHING__BASE_URL - coaching service; offline when unset
//!   HABIT_ENGINE__TELEMETRY__LOG_FORMAT - `pretty` or `json`

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use habit_engine::adapters::{
    CoachingServiceClient, FileHabitStore, InMemoryCoachingService,
    InMemoryRecoveryPlanRepository, TracingEventPublisher,
};
use habit_engine::application::{
    HabitHandlers, HabitSession, OutboundDispatcher, ScanSetbacksCommand, ScanSetbacksHandler,
};
use habit_engine::config::{AppConfig, LogFormat, TelemetryConfig};
use habit_engine::domain::foundation::{CommandMetadata, UserId};
use habit_engine::domain::habit::HabitError;
use habit_engine::ports::{
    CoachingAdvisor, EventPublisher, HabitStore, ProgressLedger, RecoveryPlanner,
};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.telemetry);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let publisher: Arc<dyn EventPublisher> = Arc::new(TracingEventPublisher::new());
    let (ledger, dispatcher) = match build_collaborators(&config, publisher.clone()) {
        Ok(collaborators) => collaborators,
        Err(e) => {
            error!(error = %e, "Failed to create coaching client");
            std::process::exit(1);
        }
    };

    let handlers = match HabitHandlers::from_config(
        &config.engine,
        ledger,
        dispatcher,
        Arc::new(InMemoryRecoveryPlanRepository::new()),
        publisher,
    ) {
        Ok(handlers) => handlers,
        Err(e) => {
            error!(error = %e, "Invalid engine configuration");
            std::process::exit(1);
        }
    };

    let store = Arc::new(FileHabitStore::new(&config.store.data_dir));

    info!(
        data_dir = %config.store.data_dir.display(),
        interval_secs = config.engine.scan_interval_secs,
        analysis_interval = config.engine.analysis_interval,
        remote_coaching = config.coaching.is_remote(),
        "Starting habit engine worker"
    );

    let mut ticker = tokio::time::interval(config.engine.scan_interval());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            _ = ticker.tick() => {
                scan_all(&store, &handlers.scan_setbacks).await;
            }
        }
    }

    info!("Worker shutting down");
}

fn init_tracing(telemetry: &TelemetryConfig) {
    let registry = tracing_subscriber::registry().with(telemetry.env_filter());
    match telemetry.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

type Collaborators = (Arc<dyn ProgressLedger>, OutboundDispatcher);

fn build_collaborators(
    config: &AppConfig,
    publisher: Arc<dyn EventPublisher>,
) -> Result<Collaborators, Box<dyn std::error::Error>> {
    let collaborators = match config.coaching.client_config() {
        Some(client_config) => {
            let client = Arc::new(CoachingServiceClient::new(client_config)?);
            let planner: Arc<dyn RecoveryPlanner> = client.clone();
            let advisor: Arc<dyn CoachingAdvisor> = client.clone();
            let ledger: Arc<dyn ProgressLedger> = client;
            (ledger, OutboundDispatcher::new(planner, advisor, publisher))
        }
        None => {
            warn!("No coaching service configured, collaborator requests stay in-process");
            let service = InMemoryCoachingService::new();
            let ledger: Arc<dyn ProgressLedger> = Arc::new(service.clone());
            let dispatcher =
                OutboundDispatcher::new(Arc::new(service.clone()), Arc::new(service), publisher);
            (ledger, dispatcher)
        }
    };

    Ok(collaborators)
}

/// One detection pass over every owner in the store.
async fn scan_all(store: &Arc<FileHabitStore>, handler: &ScanSetbacksHandler) {
    let owners = match store.list_owners().await {
        Ok(owners) => owners,
        Err(e) => {
            error!(error = %e, "Failed to list habit owners");
            return;
        }
    };

    let mut total = 0;
    for owner in owners {
        match scan_owner(store, handler, owner.clone()).await {
            Ok(found) => total += found,
            Err(e) => warn!(owner_id = %owner, error = %e, "Setback scan failed for owner"),
        }
    }

    info!(setbacks = total, "Setback scan pass complete");
}

async fn scan_owner(
    store: &Arc<FileHabitStore>,
    handler: &ScanSetbacksHandler,
    owner: UserId,
) -> Result<usize, HabitError> {
    let habit_store: Arc<dyn HabitStore> = store.clone();
    let session = HabitSession::load(owner.clone(), habit_store).await?;
    let metadata = CommandMetadata::new(owner.clone()).with_source("scheduler");

    let result = handler
        .handle(&session, ScanSetbacksCommand::default(), metadata)
        .await?;
    for notice in &result.notices {
        warn!(owner_id = %owner, notice = %notice, "Setback scan notice");
    }

    let found = result.setbacks.len();
    for joined in join_all(result.dispatched).await {
        if let Err(e) = joined {
            error!(owner_id = %owner, error = %e, "Recovery request task panicked");
        }
    }
    debug!(owner_id = %owner, setbacks = found, "Owner scanned");

    Ok(found)
}
