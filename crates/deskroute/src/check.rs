// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskroute check` command implementation.
//!
//! Runs quick diagnostic checks against the configured store and reports
//! each one as pass, warn or fail.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use deskroute_config::model::DeskrouteConfig;
use deskroute_core::types::HealthStatus;
use deskroute_core::{DeskrouteError, ManagerDirectory, PluginAdapter, StorageAdapter};
use deskroute_storage::SqliteStorage;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `deskroute check` command.
///
/// Fails when any check fails; warnings alone do not.
pub async fn run_check(config: &DeskrouteConfig, plain: bool) -> Result<(), DeskrouteError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = run_checks(config).await;

    println!();
    println!("  deskroute check");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in &results {
        match result.status {
            CheckStatus::Fail => fail_count += 1,
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Pass => {}
        }
        println!("{}", render_line(result, use_color));
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    if fail_count > 0 {
        return Err(DeskrouteError::Internal(format!(
            "{fail_count} check(s) failed"
        )));
    }
    Ok(())
}

/// Configuration, then database file, then storage health and the manager
/// directory over one opened store.
pub async fn run_checks(config: &DeskrouteConfig) -> Vec<CheckResult> {
    let mut results = vec![check_config(), check_database_file(&config.storage.database_path)];

    let start = Instant::now();
    let storage = SqliteStorage::new(config.storage.clone());
    if let Err(e) = storage.initialize().await {
        results.push(CheckResult::new(
            "Storage",
            CheckStatus::Fail,
            format!("open failed: {e}"),
            start,
        ));
        return results;
    }
    results.push(check_storage_health(&storage).await);
    results.push(check_managers(&storage).await);
    if let Err(e) = storage.close().await {
        tracing::warn!(error = %e, "storage close failed after checks");
    }
    results
}

/// The config was already loaded and validated before any command runs.
fn check_config() -> CheckResult {
    CheckResult::new("Configuration", CheckStatus::Pass, "valid", Instant::now())
}

fn check_database_file(db_path: &str) -> CheckResult {
    let start = Instant::now();
    if std::path::Path::new(db_path).exists() {
        CheckResult::new("Database file", CheckStatus::Pass, db_path, start)
    } else {
        CheckResult::new(
            "Database file",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        )
    }
}

async fn check_storage_health(storage: &SqliteStorage) -> CheckResult {
    let start = Instant::now();
    match storage.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("Storage", CheckStatus::Pass, "connected", start)
        }
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("Storage", CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("Storage", CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new("Storage", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_managers(storage: &SqliteStorage) -> CheckResult {
    let start = Instant::now();
    match storage.list_managers().await {
        Ok(managers) if managers.is_empty() => CheckResult::new(
            "Managers",
            CheckStatus::Warn,
            "no managers configured; nothing can be assigned",
            start,
        ),
        Ok(managers) => CheckResult::new(
            "Managers",
            CheckStatus::Pass,
            format!("{} configured", managers.len()),
            start,
        ),
        Err(e) => CheckResult::new("Managers", CheckStatus::Fail, e.to_string(), start),
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal().to_string()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow().to_string()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}
