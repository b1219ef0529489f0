// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport label mapping through closed lookup tables.

use std::collections::BTreeMap;

use deskroute_config::model::LabelsConfig;
use deskroute_config::validation::is_valid_label_token;

/// Map each present input to its label token.
///
/// Lookups are trimmed and case-insensitive. Inputs without a table entry
/// contribute nothing, and a token outside `[A-Za-z0-9_-]` is dropped even if
/// the table holds it. Order follows the arguments; duplicates are removed.
pub fn build_transport_labels(
    language: Option<&str>,
    source: Option<&str>,
    consultation_type: Option<&str>,
    capability: Option<&str>,
    tables: &LabelsConfig,
) -> Vec<String> {
    let lookups = [
        (language, &tables.languages),
        (source, &tables.sources),
        (consultation_type, &tables.consultation_types),
        (capability, &tables.capabilities),
    ];

    let mut labels: Vec<String> = Vec::with_capacity(lookups.len());
    for (input, table) in lookups {
        let Some(token) = input.and_then(|raw| lookup(table, raw)) else {
            continue;
        };
        if is_valid_label_token(token) && !labels.iter().any(|l| l == token) {
            labels.push(token.to_string());
        }
    }
    labels
}

fn lookup<'t>(table: &'t BTreeMap<String, String>, raw: &str) -> Option<&'t str> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(key, _)| key.trim().to_lowercase() == needle)
        .map(|(_, token)| token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regex::Regex;

    #[test]
    fn maps_every_known_input() {
        let labels = build_transport_labels(
            Some("UZ"),
            Some(" telegram "),
            Some("Техническая поддержка"),
            Some("бух"),
            &LabelsConfig::default(),
        );
        assert_eq!(labels, vec!["lang_uz", "telegram", "tech_support", "accounting"]);
    }

    #[test]
    fn unknown_inputs_contribute_nothing() {
        let labels = build_transport_labels(
            Some("fr"),
            None,
            Some("Неизвестный тип"),
            Some(""),
            &LabelsConfig::default(),
        );
        assert!(labels.is_empty());
    }

    #[test]
    fn duplicate_tokens_collapse() {
        // "accounting" type and "бух" capability map to the same token.
        let labels = build_transport_labels(
            None,
            Some("widget"),
            Some("accounting"),
            Some("бух"),
            &LabelsConfig::default(),
        );
        assert_eq!(labels, vec!["site", "accounting"]);
    }

    #[test]
    fn invalid_table_token_is_dropped() {
        let mut tables = LabelsConfig::default();
        tables
            .sources
            .insert("email".to_string(), "e mail!".to_string());
        assert!(build_transport_labels(None, Some("email"), None, None, &tables).is_empty());
    }

    proptest! {
        #[test]
        fn labels_always_ascii_tokens(
            lang in proptest::option::of("\\PC{0,12}"),
            source in proptest::option::of("\\PC{0,12}"),
            kind in proptest::option::of("\\PC{0,24}"),
            cap in proptest::option::of("\\PC{0,8}"),
        ) {
            let re = Regex::new("^[A-Za-z0-9_-]+$").unwrap();
            let labels = build_transport_labels(
                lang.as_deref(),
                source.as_deref(),
                kind.as_deref(),
                cap.as_deref(),
                &LabelsConfig::default(),
            );
            for label in labels {
                prop_assert!(re.is_match(&label), "bad label {label:?}");
            }
        }
    }
}
