// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskroute load|available|wait|queue-info` command implementations.
//!
//! Every report is computed from the store at the moment it runs and printed
//! as pretty JSON on stdout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use deskroute_config::model::DeskrouteConfig;
use deskroute_core::types::{CapabilityFilter, LoadInfo, QueueInfo, WaitEstimate};
use deskroute_core::{DeskrouteError, LogPort, StorageAdapter, TracingLogPort};
use deskroute_router::{AvailableManager, ManagerSelector, QueueEstimator, format_wait_text};
use deskroute_storage::SqliteStorage;

/// Wait estimate for one manager's queue.
#[derive(Debug, Serialize)]
pub struct WaitReport {
    pub manager_key: String,
    #[serde(flatten)]
    pub wait: WaitEstimate,
    pub wait_text: Option<String>,
}

/// Open and migrate the configured store.
pub async fn open_storage(config: &DeskrouteConfig) -> Result<Arc<SqliteStorage>, DeskrouteError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

fn selector(
    storage: &Arc<SqliteStorage>,
    config: &DeskrouteConfig,
    log: Arc<dyn LogPort>,
) -> ManagerSelector {
    ManagerSelector::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        config.routing.clone(),
        log,
    )
}

fn estimator(storage: &Arc<SqliteStorage>, config: &DeskrouteConfig) -> QueueEstimator {
    QueueEstimator::new(storage.clone(), storage.clone(), config.routing.clone())
}

pub async fn load_report(
    storage: &Arc<SqliteStorage>,
    config: &DeskrouteConfig,
    log: Arc<dyn LogPort>,
    at: DateTime<Utc>,
) -> Result<Vec<LoadInfo>, DeskrouteError> {
    selector(storage, config, log).get_all_managers_load(at).await
}

pub async fn available_report(
    storage: &Arc<SqliteStorage>,
    config: &DeskrouteConfig,
    log: Arc<dyn LogPort>,
    filter: &CapabilityFilter,
    at: DateTime<Utc>,
) -> Result<Vec<AvailableManager>, DeskrouteError> {
    selector(storage, config, log)
        .available_managers_report(at, filter)
        .await
}

/// Wait in `manager_key`'s queue. Unknown managers are `NotFound`.
pub async fn wait_report(
    storage: &Arc<SqliteStorage>,
    config: &DeskrouteConfig,
    manager_key: &str,
    cons_id: Option<&str>,
    avg: Option<f64>,
) -> Result<WaitReport, DeskrouteError> {
    use deskroute_core::ManagerDirectory;

    if storage.get_manager(manager_key).await?.is_none() {
        return Err(DeskrouteError::manager_not_found(manager_key));
    }
    let avg = avg.unwrap_or(config.routing.default_avg_minutes);
    let wait = estimator(storage, config)
        .calculate_wait_time(manager_key, avg, cons_id)
        .await?;
    Ok(WaitReport {
        manager_key: manager_key.to_string(),
        wait_text: wait.estimated_wait_minutes.map(format_wait_text),
        wait,
    })
}

pub async fn queue_info_report(
    storage: &Arc<SqliteStorage>,
    config: &DeskrouteConfig,
    cons_id: &str,
    at: DateTime<Utc>,
) -> Result<QueueInfo, DeskrouteError> {
    estimator(storage, config)
        .queue_info_as_of(cons_id, at)
        .await
}

pub async fn run_load(config: &DeskrouteConfig) -> Result<(), DeskrouteError> {
    let storage = open_storage(config).await?;
    let loads = load_report(&storage, config, Arc::new(TracingLogPort::new()), Utc::now()).await?;
    print_json(&loads)?;
    storage.close().await
}

pub async fn run_available(
    config: &DeskrouteConfig,
    filter: &CapabilityFilter,
) -> Result<(), DeskrouteError> {
    let storage = open_storage(config).await?;
    let rows = available_report(
        &storage,
        config,
        Arc::new(TracingLogPort::new()),
        filter,
        Utc::now(),
    )
    .await?;
    print_json(&rows)?;
    storage.close().await
}

pub async fn run_wait(
    config: &DeskrouteConfig,
    manager_key: &str,
    cons_id: Option<&str>,
    avg: Option<f64>,
) -> Result<(), DeskrouteError> {
    let storage = open_storage(config).await?;
    let report = wait_report(&storage, config, manager_key, cons_id, avg).await?;
    print_json(&report)?;
    storage.close().await
}

pub async fn run_queue_info(config: &DeskrouteConfig, cons_id: &str) -> Result<(), DeskrouteError> {
    let storage = open_storage(config).await?;
    let info = queue_info_report(&storage, config, cons_id, Utc::now()).await?;
    print_json(&info)?;
    storage.close().await
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), DeskrouteError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| DeskrouteError::Internal(format!("failed to render JSON: {e}")))?;
    println!("{rendered}");
    Ok(())
}
