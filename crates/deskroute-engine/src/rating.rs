// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rating-request tokens carried in button callbacks.
//!
//! A token reads `rating:<cons_id>:<value>` with `value` in `1..=5`.

use deskroute_core::types::NoticeButton;

const PREFIX: &str = "rating";
const STAR: &str = "⭐";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A decoded rating callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingToken {
    pub cons_id: String,
    pub value: u8,
}

pub fn rating_token(cons_id: &str, value: u8) -> String {
    format!("{PREFIX}:{cons_id}:{value}")
}

/// `None` on a wrong prefix, a wrong part count, an empty consultation id,
/// or a value that is not an integer in range.
pub fn parse_rating_token(token: &str) -> Option<RatingToken> {
    let parts: Vec<&str> = token.trim().split(':').collect();
    let [prefix, cons_id, value] = parts.as_slice() else {
        return None;
    };
    if *prefix != PREFIX || cons_id.is_empty() {
        return None;
    }
    let value: u8 = value.parse().ok()?;
    (MIN_RATING..=MAX_RATING)
        .contains(&value)
        .then(|| RatingToken {
            cons_id: cons_id.to_string(),
            value,
        })
}

/// One row of five star buttons, one to five stars.
pub fn rating_buttons(cons_id: &str) -> Vec<Vec<NoticeButton>> {
    let row = (MIN_RATING..=MAX_RATING)
        .map(|value| NoticeButton {
            text: STAR.repeat(usize::from(value)),
            callback_data: rating_token(cons_id, value),
        })
        .collect();
    vec![row]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_token() {
        assert_eq!(
            parse_rating_token("rating:42:5"),
            Some(RatingToken {
                cons_id: "42".into(),
                value: 5
            })
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "",
            "rating",
            "rating:42",
            "rate:42:3",
            "rating:42:3:extra",
            "rating::3",
            "rating:42:three",
            "rating:42:0",
            "rating:42:6",
            "rating:42:-1",
            "rating:42:2.5",
        ] {
            assert_eq!(parse_rating_token(token), None, "{token:?} should not parse");
        }
    }

    #[test]
    fn buttons_are_one_row_of_five() {
        let rows = rating_buttons("c7");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), 5);
        assert_eq!(row[0].text, "⭐");
        assert_eq!(row[4].text, "⭐⭐⭐⭐⭐");
        for (i, button) in row.iter().enumerate() {
            let parsed = parse_rating_token(&button.callback_data).unwrap();
            assert_eq!(parsed.cons_id, "c7");
            assert_eq!(usize::from(parsed.value), i + 1);
        }
    }
}
