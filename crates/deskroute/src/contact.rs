// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskroute display-name` command implementation.
//!
//! Resolves the contact name the chat platform shows for a client, using the
//! `[naming]` markers and brand prefix from the loaded configuration.

use serde::Serialize;

use deskroute_config::model::DeskrouteConfig;
use deskroute_core::DeskrouteError;
use deskroute_text::{ContactNames, is_person_name, resolve_display_name};

use crate::report::print_json;

#[derive(Debug, Serialize)]
pub struct DisplayNameReport {
    pub display_name: String,
    /// Whether the person name was accepted as an individual's name.
    pub person_detected: bool,
}

pub fn display_name_report(
    config: &DeskrouteConfig,
    names: &ContactNames<'_>,
) -> DisplayNameReport {
    DisplayNameReport {
        display_name: resolve_display_name(names, &config.naming),
        person_detected: names
            .person_name
            .is_some_and(|name| is_person_name(name, &config.naming)),
    }
}

pub fn run_display_name(
    config: &DeskrouteConfig,
    names: &ContactNames<'_>,
) -> Result<(), DeskrouteError> {
    print_json(&display_name_report(config, names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_wins_over_organization() {
        let names = ContactNames {
            person_name: Some("Ivan Petrov"),
            organization_name: Some("Acme LLC"),
            subscriber_code: Some("S-17"),
            tax_id: Some("123456789"),
            ..Default::default()
        };
        let report = display_name_report(&DeskrouteConfig::default(), &names);
        assert!(report.person_detected);
        assert_eq!(report.display_name, "Desk Ivan Petrov S-17 (123456789)");
    }

    #[test]
    fn company_in_person_field_falls_back_to_placeholder() {
        let names = ContactNames {
            person_name: Some("ООО Ромашка"),
            ..Default::default()
        };
        let report = display_name_report(&DeskrouteConfig::default(), &names);
        assert!(!report.person_detected);
        assert_eq!(report.display_name, "Desk Client");
    }
}
