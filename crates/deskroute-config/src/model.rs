// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Deskroute engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Deskroute configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeskrouteConfig {
    /// Service identity and log level.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Manager selection and wait estimation.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Queue display rules.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Closed lookup tables for transport labels.
    #[serde(default)]
    pub labels: LabelsConfig,

    /// Display-name resolution.
    #[serde(default)]
    pub naming: NamingConfig,

    /// Language fallback.
    #[serde(default)]
    pub language: LanguageConfig,

    /// Automated notice settings.
    #[serde(default)]
    pub notices: NoticesConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Instance name, used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "deskroute".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("deskroute").join("deskroute.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("deskroute.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Manager selection and wait estimation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Restrict automatic assignment to managers inside their working window.
    #[serde(default = "default_enforce_working_hours")]
    pub enforce_working_hours: bool,

    /// Offset from UTC, in hours, of the managers' local working hours.
    #[serde(default)]
    pub utc_offset_hours: i32,

    /// Trailing window for average resolution time.
    #[serde(default = "default_avg_resolution_window_days")]
    pub avg_resolution_window_days: u32,

    /// Average handling time assumed when the caller supplies none.
    #[serde(default = "default_avg_minutes")]
    pub default_avg_minutes: f64,

    /// Skip managers with no free slot during automatic assignment.
    #[serde(default = "default_exclude_full_managers")]
    pub exclude_full_managers: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enforce_working_hours: default_enforce_working_hours(),
            utc_offset_hours: 0,
            avg_resolution_window_days: default_avg_resolution_window_days(),
            default_avg_minutes: default_avg_minutes(),
            exclude_full_managers: default_exclude_full_managers(),
        }
    }
}

fn default_enforce_working_hours() -> bool {
    true
}

fn default_avg_resolution_window_days() -> u32 {
    30
}

fn default_avg_minutes() -> f64 {
    60.0
}

fn default_exclude_full_managers() -> bool {
    true
}

/// Queue display configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Consultation types that are never shown a queue position.
    /// Compared case-insensitively.
    #[serde(default = "default_support_only_types")]
    pub support_only_types: Vec<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            support_only_types: default_support_only_types(),
        }
    }
}

fn default_support_only_types() -> Vec<String> {
    vec![
        "Техническая поддержка".to_string(),
        "technical_support".to_string(),
    ]
}

/// Closed lookup tables mapping raw values to transport label tokens.
///
/// Keys are matched case-insensitively after trimming. Every token must
/// consist of ASCII letters, digits, `_` or `-`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LabelsConfig {
    #[serde(default = "default_language_labels")]
    pub languages: BTreeMap<String, String>,

    #[serde(default = "default_source_labels")]
    pub sources: BTreeMap<String, String>,

    #[serde(default = "default_type_labels")]
    pub consultation_types: BTreeMap<String, String>,

    #[serde(default = "default_capability_labels")]
    pub capabilities: BTreeMap<String, String>,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            languages: default_language_labels(),
            sources: default_source_labels(),
            consultation_types: default_type_labels(),
            capabilities: default_capability_labels(),
        }
    }
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_language_labels() -> BTreeMap<String, String> {
    table(&[("ru", "lang_ru"), ("uz", "lang_uz"), ("en", "lang_en")])
}

fn default_source_labels() -> BTreeMap<String, String> {
    table(&[
        ("telegram", "telegram"),
        ("site", "site"),
        ("web", "site"),
        ("widget", "site"),
    ])
}

fn default_type_labels() -> BTreeMap<String, String> {
    table(&[
        ("Техническая поддержка", "tech_support"),
        ("technical_support", "tech_support"),
        ("Консультация по ведению учёта", "accounting"),
        ("accounting", "accounting"),
    ])
}

fn default_capability_labels() -> BTreeMap<String, String> {
    table(&[("бух", "accounting"), ("рт", "retail"), ("ук", "management")])
}

/// Display-name resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    /// Brand token prepended to every display name.
    #[serde(default = "default_brand_prefix")]
    pub brand_prefix: String,

    /// Base name used when no name is known.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Legal-form markers matched as whole words, case-insensitively.
    #[serde(default = "default_legal_forms")]
    pub legal_forms: Vec<String>,

    /// Keywords that mark an organization when found anywhere in a name.
    #[serde(default = "default_legal_keywords")]
    pub legal_keywords: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            brand_prefix: default_brand_prefix(),
            placeholder: default_placeholder(),
            legal_forms: default_legal_forms(),
            legal_keywords: default_legal_keywords(),
        }
    }
}

fn default_brand_prefix() -> String {
    "Desk".to_string()
}

fn default_placeholder() -> String {
    "Client".to_string()
}

fn default_legal_forms() -> Vec<String> {
    [
        "ООО", "ИП", "ЗАО", "АО", "ТОО", "ОАО", "ПАО", "НАО", "LLC", "LLP", "INC", "LTD", "CORP",
        "GMBH", "PLC",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_legal_keywords() -> Vec<String> {
    [
        "КОМПАНИЯ",
        "КОРПОРАЦИЯ",
        "ХОЛДИНГ",
        "ГРУП",
        "GROUP",
        "COMPANY",
        "HOLDING",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Language fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    /// Language used when neither the client nor the topic specify one.
    #[serde(default = "default_language_code")]
    pub default_code: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_code: default_language_code(),
        }
    }
}

fn default_language_code() -> String {
    "ru".to_string()
}

/// Automated notice configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NoticesConfig {
    /// Attach a rating prompt to the closure notice.
    #[serde(default = "default_rating_request")]
    pub rating_request: bool,
}

impl Default for NoticesConfig {
    fn default() -> Self {
        Self {
            rating_request: default_rating_request(),
        }
    }
}

fn default_rating_request() -> bool {
    true
}
