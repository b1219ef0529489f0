// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy, highest priority first: `./deskroute.toml`,
//! `~/.config/deskroute/deskroute.toml`, `/etc/deskroute/deskroute.toml`,
//! with environment variable overrides via `DESKROUTE_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DeskrouteConfig;

/// Sections that env var names are split on. Order matters only for
/// prefixes that share a stem, and none currently do.
const ENV_SECTIONS: &[&str] = &[
    "service", "storage", "routing", "queue", "labels", "naming", "language", "notices",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/deskroute/deskroute.toml` (system-wide)
/// 3. `~/.config/deskroute/deskroute.toml` (user XDG config)
/// 4. `./deskroute.toml` (local directory)
/// 5. `DESKROUTE_*` environment variables
pub fn load_config() -> Result<DeskrouteConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DeskrouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskrouteConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DeskrouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskrouteConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DeskrouteConfig::default()))
        .merge(Toml::file("/etc/deskroute/deskroute.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("deskroute/deskroute.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("deskroute.toml"))
        .merge(env_provider())
}

/// Map an env var name (lowercased, prefix stripped) to a dotted key.
///
/// Only the first underscore after a known section is turned into a dot, so
/// `routing_enforce_working_hours` becomes `routing.enforce_working_hours`
/// rather than `routing.enforce.working.hours`.
pub fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")`, because field names
/// themselves contain underscores.
fn env_provider() -> Env {
    Env::prefixed("DESKROUTE_").map(|key| env_key_to_path(key.as_str()).into())
}
