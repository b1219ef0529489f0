// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: non-empty paths, sane offsets and windows, and label tokens
//! restricted to `[A-Za-z0-9_-]`.

use std::collections::BTreeMap;

use crate::diagnostic::ConfigError;
use crate::model::DeskrouteConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Whether `token` is a non-empty run of ASCII letters, digits, `_` or `-`.
pub fn is_valid_label_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns every problem found rather than stopping at the first.
pub fn validate_config(config: &DeskrouteConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` must be one of {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let offset = config.routing.utc_offset_hours;
    if !(-12..=14).contains(&offset) {
        errors.push(ConfigError::Validation {
            message: format!("routing.utc_offset_hours must be within -12..=14, got {offset}"),
        });
    }

    if config.routing.avg_resolution_window_days == 0 {
        errors.push(ConfigError::Validation {
            message: "routing.avg_resolution_window_days must be at least 1".to_string(),
        });
    }

    let avg = config.routing.default_avg_minutes;
    if !avg.is_finite() || avg < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.default_avg_minutes must be a non-negative number, got {avg}"
            ),
        });
    }

    check_labels("labels.languages", &config.labels.languages, &mut errors);
    check_labels("labels.sources", &config.labels.sources, &mut errors);
    check_labels(
        "labels.consultation_types",
        &config.labels.consultation_types,
        &mut errors,
    );
    check_labels("labels.capabilities", &config.labels.capabilities, &mut errors);

    if config.naming.placeholder.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "naming.placeholder must not be empty".to_string(),
        });
    }

    for (list, entries) in [
        ("naming.legal_forms", &config.naming.legal_forms),
        ("naming.legal_keywords", &config.naming.legal_keywords),
    ] {
        if entries.iter().any(|e| e.trim().is_empty()) {
            errors.push(ConfigError::Validation {
                message: format!("{list} must not contain empty entries"),
            });
        }
    }

    let lang = config.language.default_code.trim();
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "language.default_code must be a non-empty alphabetic code, got `{}`",
                config.language.default_code
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_labels(table: &str, entries: &BTreeMap<String, String>, errors: &mut Vec<ConfigError>) {
    for (input, token) in entries {
        if !is_valid_label_token(token) {
            errors.push(ConfigError::InvalidLabel {
                table: table.to_string(),
                input: input.clone(),
                token: token.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&DeskrouteConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = DeskrouteConfig::default();
        config.storage.database_path = "  ".into();
        config.routing.utc_offset_hours = 20;
        config.routing.avg_resolution_window_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_non_ascii_label_token() {
        let mut config = DeskrouteConfig::default();
        config
            .labels
            .sources
            .insert("телеграм".into(), "телеграм".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            &errors[0],
            ConfigError::InvalidLabel { table, .. } if table == "labels.sources"
        ));
    }

    #[test]
    fn label_token_charset() {
        assert!(is_valid_label_token("lang_ru"));
        assert!(is_valid_label_token("tech-support"));
        assert!(!is_valid_label_token(""));
        assert!(!is_valid_label_token("two words"));
        assert!(!is_valid_label_token("lang:ru"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = DeskrouteConfig::default();
        config.service.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }
}
