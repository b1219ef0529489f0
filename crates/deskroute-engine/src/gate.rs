// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! At-most-once gate for automated notices.
//!
//! Every notice passes through [`NotificationGate::dispatch`], which:
//! 1. refuses kinds not allowed for a terminal consultation,
//! 2. records `(cons_id, ledger_key)` in the ledger and stops if it was
//!    already present,
//! 3. hands the notice to the transport, flagged as not counting toward
//!    first-response timers.
//!
//! The ledger entry is written before sending. A send that fails is logged
//! and not retried, so a notice is delivered at most once.

use std::sync::Arc;

use tracing::debug;

use deskroute_core::types::{Consultation, NoticeButton, NoticeKind, OutboundNotice};
use deskroute_core::{
    DeskrouteError, LogLevel, LogPort, LogRecord, NoticeTransport, NotificationLedger,
};

use crate::recording;

/// Ledger key for a reassignment to `manager_key`.
pub fn reassignment_key(manager_key: &str) -> String {
    format!("{}:{manager_key}", NoticeKind::Reassignment.as_str())
}

/// Ledger key for a queue position with `manager_key`.
pub fn queue_update_key(manager_key: &str, position: u32) -> String {
    format!("{}:{manager_key}:{position}", NoticeKind::QueueUpdate.as_str())
}

/// A notice ready for the gate.
#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub kind: NoticeKind,
    /// Deduplication key. The bare kind for one-off notices.
    pub ledger_key: String,
    pub text: String,
    pub labels: Vec<String>,
    pub buttons: Vec<Vec<NoticeButton>>,
}

impl NoticeDraft {
    /// A draft keyed by its bare kind.
    pub fn new(kind: NoticeKind, text: String) -> Self {
        Self {
            kind,
            ledger_key: kind.as_str().to_string(),
            text,
            labels: Vec::new(),
            buttons: Vec::new(),
        }
    }

    pub fn keyed(mut self, ledger_key: String) -> Self {
        self.ledger_key = ledger_key;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<NoticeButton>>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Deduplicates and sends automated notices.
pub struct NotificationGate {
    ledger: Arc<dyn NotificationLedger>,
    transport: Arc<dyn NoticeTransport>,
    log: Arc<dyn LogPort>,
}

impl NotificationGate {
    pub fn new(
        ledger: Arc<dyn NotificationLedger>,
        transport: Arc<dyn NoticeTransport>,
        log: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            ledger,
            transport,
            log,
        }
    }

    /// `true` the first time a `(cons_id, notice_key)` pair is seen, `false`
    /// after. The check and the record are one atomic ledger insert.
    pub async fn should_send(
        &self,
        cons_id: &str,
        notice_key: &str,
    ) -> Result<bool, DeskrouteError> {
        self.ledger.insert_if_absent(cons_id, notice_key).await
    }

    /// Gate and send `draft` for `consultation`. Returns whether it was sent.
    ///
    /// Ledger failures propagate; a transport failure does not.
    pub async fn dispatch(
        &self,
        consultation: &Consultation,
        draft: NoticeDraft,
    ) -> Result<bool, DeskrouteError> {
        let kind = draft.kind;
        if consultation.status.is_terminal() && !kind.allowed_when_terminal() {
            self.suppressed(consultation, &draft, "terminal");
            return Ok(false);
        }
        if !self
            .should_send(&consultation.cons_id, &draft.ledger_key)
            .await?
        {
            self.suppressed(consultation, &draft, "duplicate");
            return Ok(false);
        }

        let notice = OutboundNotice {
            cons_id: consultation.cons_id.clone(),
            kind,
            channel: consultation.source.clone(),
            text: draft.text,
            labels: draft.labels,
            buttons: draft.buttons,
            counts_toward_response_metrics: false,
        };

        match self.transport.send_notice(&notice).await {
            Ok(()) => {
                recording::record_notice_sent(kind.as_str());
                self.log.record(
                    LogRecord::integration(LogLevel::Info, "notice sent")
                        .field("cons_id", &notice.cons_id)
                        .field("kind", kind)
                        .field("transport", self.transport.name()),
                );
                Ok(true)
            }
            Err(e) => {
                recording::record_notice_suppressed(kind.as_str(), "transport_error");
                self.log.record(
                    LogRecord::integration(LogLevel::Error, "notice delivery failed")
                        .field("cons_id", &notice.cons_id)
                        .field("kind", kind)
                        .field("error", e),
                );
                Ok(false)
            }
        }
    }

    fn suppressed(&self, consultation: &Consultation, draft: &NoticeDraft, reason: &'static str) {
        recording::record_notice_suppressed(draft.kind.as_str(), reason);
        debug!(
            cons_id = %consultation.cons_id,
            key = %draft.ledger_key,
            reason,
            "notice suppressed"
        );
        self.log.record(
            LogRecord::business(LogLevel::Debug, "notice suppressed")
                .field("cons_id", &consultation.cons_id)
                .field("kind", draft.kind)
                .field("reason", reason),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use deskroute_config::model::StorageConfig;
    use deskroute_core::types::ConsultationStatus;
    use deskroute_core::{LogSink, StorageAdapter};
    use deskroute_storage::SqliteStorage;
    use deskroute_test_utils::{MemoryLogPort, MockTransport};

    async fn storage() -> (Arc<SqliteStorage>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("gate.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (Arc::new(storage), dir)
    }

    fn consultation(status: ConsultationStatus) -> Consultation {
        let created = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        Consultation {
            cons_id: "c1".into(),
            status,
            assigned_manager: Some("m1".into()),
            selected_question: Some("q1".into()),
            topic_language: None,
            language: Some("ru".into()),
            consultation_type: None,
            source: Some("telegram".into()),
            software: None,
            category: None,
            created_at: created,
            updated_at: created,
            started_at: None,
            ended_at: None,
        }
    }

    fn gate(
        storage: &Arc<SqliteStorage>,
    ) -> (NotificationGate, Arc<MockTransport>, Arc<MemoryLogPort>) {
        let transport = Arc::new(MockTransport::new());
        let logs = Arc::new(MemoryLogPort::new());
        let gate = NotificationGate::new(storage.clone(), transport.clone(), logs.clone());
        (gate, transport, logs)
    }

    #[tokio::test]
    async fn should_send_true_then_false() {
        let (storage, _dir) = storage().await;
        let (gate, _, _) = gate(&storage);
        assert!(gate.should_send("c1", "queue_update").await.unwrap());
        assert!(!gate.should_send("c1", "queue_update").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_should_send_has_one_winner() {
        let (storage, _dir) = storage().await;
        let (gate, _, _) = gate(&storage);
        let gate = Arc::new(gate);

        let calls = (0..50).map(|_| {
            let gate = gate.clone();
            async move { gate.should_send("c1", "queue_update").await.unwrap() }
        });
        let results = futures::future::join_all(calls).await;
        assert_eq!(results.iter().filter(|won| **won).count(), 1);
    }

    #[tokio::test]
    async fn sent_notice_never_counts_toward_response_metrics() {
        let (storage, _dir) = storage().await;
        let (gate, transport, logs) = gate(&storage);
        let c = consultation(ConsultationStatus::Open);

        let draft = NoticeDraft::new(NoticeKind::Reassignment, "text".into())
            .keyed(reassignment_key("m1"))
            .with_labels(vec!["lang_ru".into()]);
        assert!(gate.dispatch(&c, draft.clone()).await.unwrap());
        assert!(!gate.dispatch(&c, draft).await.unwrap());

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].counts_toward_response_metrics);
        assert_eq!(sent[0].channel.as_deref(), Some("telegram"));
        assert_eq!(sent[0].labels, vec!["lang_ru"]);
        assert_eq!(logs.for_sink(LogSink::Integration).len(), 1);
    }

    #[tokio::test]
    async fn terminal_consultation_refuses_queue_and_reassignment() {
        let (storage, _dir) = storage().await;
        let (gate, transport, _) = gate(&storage);

        for status in ConsultationStatus::TERMINAL {
            let c = consultation(status);
            for kind in [NoticeKind::Accepted, NoticeKind::Reassignment, NoticeKind::QueueUpdate] {
                let draft = NoticeDraft::new(kind, "text".into());
                assert!(!gate.dispatch(&c, draft).await.unwrap());
            }
        }
        assert!(transport.sent().is_empty());
        // Refused notices never reach the ledger.
        assert!(storage.ledger_entries("c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn terminal_consultation_admits_closure() {
        let (storage, _dir) = storage().await;
        let (gate, transport, _) = gate(&storage);
        let c = consultation(ConsultationStatus::Closed);
        assert!(gate
            .dispatch(&c, NoticeDraft::new(NoticeKind::Closure, "bye".into()))
            .await
            .unwrap());
        assert_eq!(transport.sent()[0].kind, NoticeKind::Closure);
    }

    #[tokio::test]
    async fn transport_failure_is_logged_not_retried() {
        let (storage, _dir) = storage().await;
        let (gate, transport, logs) = gate(&storage);
        let c = consultation(ConsultationStatus::Open);
        transport.set_failing(true);

        let draft = NoticeDraft::new(NoticeKind::Accepted, "hi".into());
        assert!(!gate.dispatch(&c, draft.clone()).await.unwrap());
        let errors: Vec<_> = logs
            .for_sink(LogSink::Integration)
            .into_iter()
            .filter(|r| r.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);

        transport.set_failing(false);
        assert!(!gate.dispatch(&c, draft).await.unwrap());
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn keys_are_parametrised() {
        assert_eq!(reassignment_key("m2"), "reassignment:m2");
        assert_eq!(queue_update_key("m2", 3), "queue_update:m2:3");
    }
}
