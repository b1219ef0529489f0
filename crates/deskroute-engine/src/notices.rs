// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notice texts and the queue display rules.
//!
//! Two independent predicates decide whether a queue position may appear
//! in a notice: [`has_classified_topic`] and [`is_support_only`]. A queue
//! position also needs an assigned manager. [`queue_display_allowed`]
//! combines the three; callers must check it before asking the estimator.

use deskroute_config::model::QueueConfig;
use deskroute_core::types::{Consultation, WaitEstimate};

/// Languages with built-in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLanguage {
    Ru,
    Uz,
}

impl NoticeLanguage {
    /// Template language for `code`, falling back to `default_code`, then
    /// to Russian.
    pub fn from_code(code: &str, default_code: &str) -> Self {
        Self::parse(code)
            .or_else(|| Self::parse(default_code))
            .unwrap_or(Self::Ru)
    }

    fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ru" => Some(Self::Ru),
            "uz" => Some(Self::Uz),
            _ => None,
        }
    }
}

/// The consultation has a classified topic.
pub fn has_classified_topic(consultation: &Consultation) -> bool {
    consultation
        .selected_question
        .as_deref()
        .is_some_and(|q| !q.trim().is_empty())
}

/// The consultation type never shows a queue position. Case-insensitive.
pub fn is_support_only(consultation_type: Option<&str>, support_only_types: &[String]) -> bool {
    let Some(kind) = consultation_type.map(str::trim).filter(|k| !k.is_empty()) else {
        return false;
    };
    let kind = kind.to_lowercase();
    support_only_types
        .iter()
        .any(|t| t.trim().to_lowercase() == kind)
}

pub fn queue_display_allowed(consultation: &Consultation, queue: &QueueConfig) -> bool {
    consultation.assigned_manager.is_some()
        && has_classified_topic(consultation)
        && !is_support_only(
            consultation.consultation_type.as_deref(),
            &queue.support_only_types,
        )
}

/// Confirmation sent when a consultation is registered.
///
/// `queue` is the estimate for the consultation, or `None` when queue
/// display is not allowed; no queue phrase is written without it. The wait
/// is written in whole hours and only when at least one hour.
pub fn accepted_text(lang: NoticeLanguage, number: &str, queue: Option<&WaitEstimate>) -> String {
    let mut parts = vec![match lang {
        NoticeLanguage::Ru => {
            format!("Ваша заявка на консультацию принята. Номер заявки: {number}.")
        }
        NoticeLanguage::Uz => format!(
            "Sizning konsultatsiya uchun arizangiz qabul qilindi. Ariza raqami: {number}."
        ),
    }];

    if let Some(position) = queue.and_then(|q| q.queue_position) {
        parts.push(position_phrase(lang, position));
        let hours = queue.and_then(|q| q.estimated_wait_hours).unwrap_or(0);
        if hours > 0 {
            parts.push(match lang {
                NoticeLanguage::Ru => format!("Ориентировочное время ожидания: {hours} ч."),
                NoticeLanguage::Uz => format!("Taxminiy kutish vaqti: {hours} soat."),
            });
        }
    }
    parts.join(" ")
}

pub fn reassignment_text(lang: NoticeLanguage, manager_name: &str) -> String {
    match lang {
        NoticeLanguage::Ru => format!("Вашей заявкой теперь занимается менеджер {manager_name}."),
        NoticeLanguage::Uz => format!("Arizangiz bilan endi {manager_name} shug'ullanadi."),
    }
}

/// Queue position, plus the wait in minutes when one is known.
pub fn queue_update_text(lang: NoticeLanguage, position: u32, wait_minutes: Option<u64>) -> String {
    let mut text = position_phrase(lang, position);
    if let Some(minutes) = wait_minutes.filter(|m| *m > 0) {
        text.push(' ');
        text.push_str(&match lang {
            NoticeLanguage::Ru => format!("Ориентировочное время ожидания: {minutes} мин."),
            NoticeLanguage::Uz => format!("Taxminiy kutish vaqti: {minutes} daqiqa."),
        });
    }
    text
}

pub fn cancellation_text(lang: NoticeLanguage) -> String {
    match lang {
        NoticeLanguage::Ru => concat!(
            "Ваша заявка на консультацию отменена. ",
            "Если у вас остались вопросы, пожалуйста, обратитесь снова."
        ),
        NoticeLanguage::Uz => concat!(
            "Sizning konsultatsiya arizangiz bekor qilindi. ",
            "Agar savollaringiz bo'lsa, iltimos, qayta murojaat qiling."
        ),
    }
    .to_string()
}

/// Closure text, followed by the rating prompt when `with_rating` is set.
pub fn closure_text(lang: NoticeLanguage, number: &str, with_rating: bool) -> String {
    let closed = match lang {
        NoticeLanguage::Ru => format!(
            "Консультация #{number} завершена. Просим оценить качество нашего обслуживания."
        ),
        NoticeLanguage::Uz => format!(
            "Konsultatsiya #{number} yakunlandi. Xizmatimiz sifatini baholashingizni so'raymiz."
        ),
    };
    if !with_rating {
        return closed;
    }
    let prompt = match lang {
        NoticeLanguage::Ru => "Пожалуйста, оцените качество обслуживания от 1 до 5:",
        NoticeLanguage::Uz => "Iltimos, xizmat sifatini 1 dan 5 gacha baholang:",
    };
    format!("{closed} {prompt}")
}

fn position_phrase(lang: NoticeLanguage, position: u32) -> String {
    match lang {
        NoticeLanguage::Ru => format!("Ваше место в очереди: {position}."),
        NoticeLanguage::Uz => format!("Navbatdagi o'rningiz: {position}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use deskroute_core::types::ConsultationStatus;

    fn consultation() -> Consultation {
        let created = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        Consultation {
            cons_id: "c1".into(),
            status: ConsultationStatus::Open,
            assigned_manager: Some("m1".into()),
            selected_question: Some("q-accounting".into()),
            topic_language: None,
            language: None,
            consultation_type: Some("Консультация по ведению учёта".into()),
            source: None,
            software: None,
            category: None,
            created_at: created,
            updated_at: created,
            started_at: None,
            ended_at: None,
        }
    }

    fn estimate(position: u32, hours: u64) -> WaitEstimate {
        WaitEstimate {
            queue_position: Some(position),
            estimated_wait_minutes: Some(hours * 60),
            estimated_wait_hours: Some(hours),
        }
    }

    #[test]
    fn language_falls_back_to_default() {
        assert_eq!(NoticeLanguage::from_code("UZ", "ru"), NoticeLanguage::Uz);
        assert_eq!(NoticeLanguage::from_code("en", "uz"), NoticeLanguage::Uz);
        assert_eq!(NoticeLanguage::from_code("en", "fr"), NoticeLanguage::Ru);
    }

    #[test]
    fn predicates_are_independent() {
        let mut c = consultation();
        assert!(queue_display_allowed(&c, &QueueConfig::default()));

        c.selected_question = None;
        assert!(!has_classified_topic(&c));
        let support = QueueConfig::default().support_only_types;
        assert!(!is_support_only(c.consultation_type.as_deref(), &support));
        assert!(!queue_display_allowed(&c, &QueueConfig::default()));

        let mut c = consultation();
        c.consultation_type = Some("ТЕХНИЧЕСКАЯ ПОДДЕРЖКА".into());
        assert!(has_classified_topic(&c));
        assert!(is_support_only(c.consultation_type.as_deref(), &support));
        assert!(!queue_display_allowed(&c, &QueueConfig::default()));

        let mut c = consultation();
        c.assigned_manager = None;
        assert!(!queue_display_allowed(&c, &QueueConfig::default()));
    }

    #[test]
    fn blank_topic_is_unclassified() {
        let mut c = consultation();
        c.selected_question = Some("  ".into());
        assert!(!has_classified_topic(&c));
    }

    #[test]
    fn accepted_without_queue_has_no_position_phrase() {
        for lang in [NoticeLanguage::Ru, NoticeLanguage::Uz] {
            let text = accepted_text(lang, "42", None);
            assert!(text.contains("42"));
            assert!(!text.contains("очереди"));
            assert!(!text.contains("Navbat"));
        }
    }

    #[test]
    fn accepted_with_queue_and_hours() {
        let text = accepted_text(NoticeLanguage::Uz, "42", Some(&estimate(3, 2)));
        assert_eq!(
            text,
            "Sizning konsultatsiya uchun arizangiz qabul qilindi. Ariza raqami: 42. \
             Navbatdagi o'rningiz: 3. Taxminiy kutish vaqti: 2 soat."
        );

        let short = accepted_text(NoticeLanguage::Ru, "42", Some(&estimate(1, 0)));
        assert!(short.contains("Ваше место в очереди: 1."));
        assert!(!short.contains("ожидания"));
    }

    #[test]
    fn queue_update_wait_only_when_known() {
        assert_eq!(
            queue_update_text(NoticeLanguage::Ru, 2, None),
            "Ваше место в очереди: 2."
        );
        assert_eq!(
            queue_update_text(NoticeLanguage::Ru, 2, Some(45)),
            "Ваше место в очереди: 2. Ориентировочное время ожидания: 45 мин."
        );
    }

    #[test]
    fn closure_appends_rating_prompt() {
        let plain = closure_text(NoticeLanguage::Uz, "7", false);
        assert_eq!(
            plain,
            "Konsultatsiya #7 yakunlandi. Xizmatimiz sifatini baholashingizni so'raymiz."
        );
        let with_prompt = closure_text(NoticeLanguage::Uz, "7", true);
        assert!(with_prompt.starts_with(&plain));
        assert!(with_prompt.ends_with("1 dan 5 gacha baholang:"));
    }
}
