// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact display names for the chat platform.
//!
//! The base name is chosen person-first: a contact name wins over the
//! organization name, but only when it reads as an individual's name. The
//! result carries the brand prefix, the subscriber code and the tax id:
//!
//! ```text
//! Desk Ivan Petrov SUB-001 (123456789)
//! ```

use deskroute_config::model::NamingConfig;

/// Raw name parts known for a client. Every part is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactNames<'a> {
    pub person_name: Option<&'a str>,
    pub organization_name: Option<&'a str>,
    pub fallback_name: Option<&'a str>,
    pub subscriber_code: Option<&'a str>,
    pub tax_id: Option<&'a str>,
}

/// Whether `name` looks like an individual rather than a legal entity.
///
/// False when the name is blank, when any whole word is a legal form
/// (`ООО Ромашка`, `Acme LLC`, `Acme, Inc.`), when it starts with the brand
/// prefix, or when a legal keyword occurs anywhere in it. Comparison is
/// case-insensitive.
pub fn is_person_name(name: &str, config: &NamingConfig) -> bool {
    let upper = name.trim().to_uppercase();
    if upper.is_empty() {
        return false;
    }

    let mut words = upper
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty());
    if words.any(|w| config.legal_forms.iter().any(|f| f.to_uppercase() == w)) {
        return false;
    }

    let brand = config.brand_prefix.trim().to_uppercase();
    if !brand.is_empty() && starts_with_word(&upper, &brand) {
        return false;
    }

    !config
        .legal_keywords
        .iter()
        .map(|k| k.trim().to_uppercase())
        .any(|k| !k.is_empty() && upper.contains(&k))
}

/// Build the display name for a client.
///
/// Priority for the base name: a person-like `person_name`, then
/// `organization_name`, then `fallback_name`, then the configured
/// placeholder. Blank parts count as absent.
pub fn resolve_display_name(names: &ContactNames<'_>, config: &NamingConfig) -> String {
    let person = non_blank(names.person_name).filter(|n| is_person_name(n, config));
    let base = person
        .or_else(|| non_blank(names.organization_name))
        .or_else(|| non_blank(names.fallback_name))
        .unwrap_or(config.placeholder.trim());

    let mut parts: Vec<String> = Vec::with_capacity(4);
    let brand = config.brand_prefix.trim();
    if !brand.is_empty() && !base.to_lowercase().starts_with(&brand.to_lowercase()) {
        parts.push(brand.to_string());
    }
    parts.push(base.to_string());
    if let Some(code) = non_blank(names.subscriber_code) {
        parts.push(code.to_string());
    }
    if let Some(tax_id) = non_blank(names.tax_id) {
        parts.push(format!("({tax_id})"));
    }

    parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn starts_with_word(haystack: &str, word: &str) -> bool {
    haystack
        .strip_prefix(word)
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NamingConfig {
        NamingConfig::default()
    }

    #[test]
    fn person_names_detected() {
        let cfg = config();
        for name in [
            "Иван Петров",
            "Анна Сидорова",
            "Мария Иванова Петровна",
            "Алексей",
            "Ivan Petrov",
        ] {
            assert!(is_person_name(name, &cfg), "{name} should read as a person");
        }
    }

    #[test]
    fn organizations_detected() {
        let cfg = config();
        for name in [
            "ООО Ромашка",
            "ИП Петров",
            "ЗАО Вектор",
            "АО Газпром",
            "ТОО Альфа",
            "Acme LLC",
            "Acme, Inc.",
            "Vector Group",
            "Строительная компания Север",
            "Desk Ромашка",
        ] {
            assert!(!is_person_name(name, &cfg), "{name} should read as an organization");
        }
    }

    #[test]
    fn legal_form_must_be_a_whole_word() {
        // "АО" is a legal form, but it is also a substring of ordinary names.
        assert!(is_person_name("Паола Маовна", &config()));
        assert!(is_person_name("Deskin Ivanov", &config()));
    }

    #[test]
    fn blank_is_not_a_person() {
        assert!(!is_person_name("", &config()));
        assert!(!is_person_name("   ", &config()));
    }

    #[test]
    fn person_preferred_over_organization() {
        let names = ContactNames {
            person_name: Some("Ivan Petrov"),
            organization_name: Some("Acme LLC"),
            ..Default::default()
        };
        let result = resolve_display_name(&names, &config());
        assert_eq!(result, "Desk Ivan Petrov");
        assert!(!result.contains("Acme LLC"));
    }

    #[test]
    fn organization_used_when_contact_is_a_company() {
        let names = ContactNames {
            person_name: Some("ООО Ромашка"),
            organization_name: Some("Ромашка Холдинг"),
            ..Default::default()
        };
        assert_eq!(resolve_display_name(&names, &config()), "Desk Ромашка Холдинг");
    }

    #[test]
    fn falls_back_to_fallback_then_placeholder() {
        let names = ContactNames {
            person_name: Some("  "),
            fallback_name: Some("alexey_smirnov"),
            ..Default::default()
        };
        assert_eq!(resolve_display_name(&names, &config()), "Desk alexey_smirnov");
        assert_eq!(
            resolve_display_name(&ContactNames::default(), &config()),
            "Desk Client"
        );
    }

    #[test]
    fn all_parts_in_order() {
        let names = ContactNames {
            person_name: Some("Иван Петров"),
            subscriber_code: Some("ABC123"),
            tax_id: Some("1234567890"),
            ..Default::default()
        };
        assert_eq!(
            resolve_display_name(&names, &config()),
            "Desk Иван Петров ABC123 (1234567890)"
        );
    }

    #[test]
    fn brand_prefix_not_doubled() {
        let names = ContactNames {
            organization_name: Some("desk ООО Ромашка"),
            ..Default::default()
        };
        let result = resolve_display_name(&names, &config());
        assert_eq!(result, "desk ООО Ромашка");
        assert!(!result.to_lowercase().contains("desk desk"));
    }

    #[test]
    fn result_is_trimmed_without_double_spaces() {
        let names = ContactNames {
            person_name: Some("  Иван   Петров  "),
            subscriber_code: Some(" CLB001 "),
            ..Default::default()
        };
        let result = resolve_display_name(&names, &config());
        assert_eq!(result, "Desk Иван Петров CLB001");
        assert!(!result.contains("  "));
    }
}
