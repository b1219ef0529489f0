// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text comment normalization.

/// Collapse every line break and whitespace run to a single space and trim.
///
/// `\r\n`, `\r` and `\n` all count as whitespace, so a comment typed across
/// several lines becomes one line. `None` and blank input yield `""`.
/// Applying the function twice gives the same result as applying it once.
pub fn normalize_comment(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
