// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deskroute - manager assignment and consultation queue engine.
//!
//! This is the binary entry point: load reports, wait estimates, event
//! replay and health checks over the configured store.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod contact;
mod replay;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use deskroute_config::ConfigError;
use deskroute_config::model::DeskrouteConfig;
use deskroute_core::CapabilityFilter;
use deskroute_text::ContactNames;

/// Deskroute - manager assignment and consultation queue engine.
#[derive(Parser, Debug)]
#[command(name = "deskroute", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the current load of every manager as JSON.
    Load,
    /// Print capability-matched managers with load and wait, busiest first.
    Available {
        #[arg(long)]
        software: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "type")]
        consultation_type: Option<String>,
    },
    /// Estimate the wait in one manager's queue.
    Wait {
        /// Manager key.
        manager: String,
        /// Rank this consultation instead of a new request.
        #[arg(long)]
        cons_id: Option<String>,
        /// Average handling minutes (default: routing.default_avg_minutes).
        #[arg(long)]
        avg: Option<f64>,
    },
    /// Print queue information for one consultation.
    QueueInfo {
        cons_id: String,
    },
    /// Replay one JSON lifecycle event. Notices are logged, not delivered.
    Event {
        /// Event file, or `-` for stdin.
        source: String,
    },
    /// Resolve the display name shown for a client contact.
    DisplayName {
        #[arg(long)]
        person: Option<String>,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        fallback: Option<String>,
        #[arg(long)]
        subscriber_code: Option<String>,
        #[arg(long)]
        tax_id: Option<String>,
    },
    /// Check configuration and storage health.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            deskroute_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);
    deskroute_engine::recording::register_metrics();

    let result = match cli.command {
        Some(Commands::Load) => report::run_load(&config).await,
        Some(Commands::Available {
            software,
            category,
            consultation_type,
        }) => {
            let filter = CapabilityFilter {
                software,
                category,
                consultation_type,
            };
            report::run_available(&config, &filter).await
        }
        Some(Commands::Wait {
            manager,
            cons_id,
            avg,
        }) => report::run_wait(&config, &manager, cons_id.as_deref(), avg).await,
        Some(Commands::QueueInfo { cons_id }) => report::run_queue_info(&config, &cons_id).await,
        Some(Commands::Event { source }) => replay::run_event(&config, &source).await,
        Some(Commands::DisplayName {
            person,
            organization,
            fallback,
            subscriber_code,
            tax_id,
        }) => {
            let names = ContactNames {
                person_name: person.as_deref(),
                organization_name: organization.as_deref(),
                fallback_name: fallback.as_deref(),
                subscriber_code: subscriber_code.as_deref(),
                tax_id: tax_id.as_deref(),
            };
            contact::run_display_name(&config, &names)
        }
        Some(Commands::Check { plain }) => check::run_check(&config, plain).await,
        None => {
            println!("deskroute: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("deskroute: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<DeskrouteConfig, Vec<ConfigError>> {
    match path {
        Some(path) => deskroute_config::load_and_validate_path(path),
        None => deskroute_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deskroute={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "deskroute", "wait", "m1", "--cons-id", "42", "--avg", "30",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Wait {
                manager,
                cons_id,
                avg,
            }) => {
                assert_eq!(manager, "m1");
                assert_eq!(cons_id.as_deref(), Some("42"));
                assert_eq!(avg, Some(30.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["deskroute", "available", "--type", "accounting"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Available { consultation_type: Some(ref t), .. }) if t == "accounting"
        ));
    }

    #[test]
    fn display_name_flags_parse() {
        let cli = Cli::try_parse_from([
            "deskroute",
            "display-name",
            "--person",
            "Ivan Petrov",
            "--tax-id",
            "123",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::DisplayName {
                person,
                organization,
                tax_id,
                ..
            }) => {
                assert_eq!(person.as_deref(), Some("Ivan Petrov"));
                assert_eq!(organization, None);
                assert_eq!(tax_id.as_deref(), Some("123"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn explicit_config_path_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskroute.toml");
        std::fs::write(&path, "[language]\ndefault_code = \"uz\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.language.default_code, "uz");
    }

    #[test]
    fn unknown_key_in_explicit_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskroute.toml");
        std::fs::write(&path, "[routing]\nenforce_hours = true\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
