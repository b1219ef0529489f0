// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Pick the language for an outgoing payload.
///
/// An explicit non-blank code wins, then the language recorded on the linked
/// topic (`None` when no topic is linked), then `default_code`. The result is
/// trimmed and lower-cased.
pub fn resolve_language(
    explicit_code: Option<&str>,
    linked_topic_language: Option<&str>,
    default_code: &str,
) -> String {
    [explicit_code, linked_topic_language]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|code| !code.is_empty())
        .unwrap_or(default_code.trim())
        .to_lowercase()
}
