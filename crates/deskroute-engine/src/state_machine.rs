// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultation lifecycle handling.
//!
//! ```text
//! created -> open <-> pending -> resolved | closed | cancelled
//! ```
//!
//! Terminal statuses are final: once a consultation is resolved, closed or
//! cancelled its assignee never changes and only closure or cancellation
//! notices are sent for it. Writes fail loudly so the caller can retry the
//! whole event; reads that only feed a notice degrade to "no notice".
//!
//! The status/assignee write commits before its notices reach the ledger.
//! If a ledger insert then fails, the retried event finds nothing left to
//! change and that notice is never sent. Notices are at most once, so this
//! loss is accepted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use deskroute_config::DeskrouteConfig;
use deskroute_core::types::{
    Consultation, ConsultationStatus, ConsultationUpdate, Manager, MessageDirection, NoticeKind,
    Rating, WaitEstimate,
};
use deskroute_core::{
    ConsultationStore, DeskrouteError, EventKind, EventOutcome, LifecycleEvent, LogLevel, LogPort,
    LogRecord, ManagerDirectory, NoticeTransport, NotificationLedger, ResolutionStats, SideEffect,
};
use deskroute_router::{ManagerSelector, QueueEstimator};
use deskroute_text::{build_transport_labels, normalize_comment, resolve_language};

use crate::gate::{NoticeDraft, NotificationGate, queue_update_key, reassignment_key};
use crate::notices::{self, NoticeLanguage};
use crate::rating::{parse_rating_token, rating_buttons};
use crate::recording;

/// The collaborators the engine reads from and writes to.
#[derive(Clone)]
pub struct EnginePorts {
    pub directory: Arc<dyn ManagerDirectory>,
    pub consultations: Arc<dyn ConsultationStore>,
    pub ledger: Arc<dyn NotificationLedger>,
    pub stats: Arc<dyn ResolutionStats>,
    pub transport: Arc<dyn NoticeTransport>,
    pub log: Arc<dyn LogPort>,
}

impl EnginePorts {
    /// All store ports served by one backend.
    pub fn from_store<S>(
        store: Arc<S>,
        transport: Arc<dyn NoticeTransport>,
        log: Arc<dyn LogPort>,
    ) -> Self
    where
        S: ManagerDirectory + ConsultationStore + NotificationLedger + ResolutionStats + 'static,
    {
        Self {
            directory: store.clone(),
            consultations: store.clone(),
            ledger: store.clone(),
            stats: store,
            transport,
            log,
        }
    }
}

/// Decides and applies the side effects of inbound lifecycle events.
pub struct ConsultationStateMachine {
    directory: Arc<dyn ManagerDirectory>,
    consultations: Arc<dyn ConsultationStore>,
    selector: Arc<ManagerSelector>,
    estimator: Arc<QueueEstimator>,
    gate: NotificationGate,
    config: DeskrouteConfig,
    log: Arc<dyn LogPort>,
}

impl ConsultationStateMachine {
    pub fn new(ports: EnginePorts, config: DeskrouteConfig) -> Self {
        let selector = ManagerSelector::new(
            ports.directory.clone(),
            ports.consultations.clone(),
            ports.stats.clone(),
            config.routing.clone(),
            ports.log.clone(),
        );
        let estimator = QueueEstimator::new(
            ports.consultations.clone(),
            ports.stats.clone(),
            config.routing.clone(),
        );
        Self {
            directory: ports.directory,
            consultations: ports.consultations,
            selector: Arc::new(selector),
            estimator: Arc::new(estimator),
            gate: NotificationGate::new(ports.ledger, ports.transport, ports.log.clone()),
            config,
            log: ports.log,
        }
    }

    pub fn selector(&self) -> &Arc<ManagerSelector> {
        &self.selector
    }

    pub fn estimator(&self) -> &Arc<QueueEstimator> {
        &self.estimator
    }

    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    /// Handle one inbound event and report what it caused.
    ///
    /// Unknown kinds, unknown statuses and unknown consultations come back
    /// as an `ignored` outcome. A failed write is returned as an error and
    /// the event can be retried as a whole.
    pub async fn handle_lifecycle_event(
        &self,
        event: &LifecycleEvent,
    ) -> Result<EventOutcome, DeskrouteError> {
        recording::record_event(event.kind.name());
        let at = event.received_at;

        let outcome = match &event.kind {
            EventKind::Unknown => EventOutcome::ignored("unknown_kind"),
            EventKind::RatingSubmitted { token, comment } => {
                self.on_rating(token, comment.as_deref(), at).await?
            }
            EventKind::Created => match self.current(&event.cons_id).await? {
                Some(consultation) => self.on_created(consultation, at).await?,
                None => EventOutcome::ignored("unknown_consultation"),
            },
            EventKind::AssignmentChanged { new_assignee } => {
                match self.current(&event.cons_id).await? {
                    Some(consultation) => {
                        self.on_transition(consultation, None, new_assignee.as_deref(), at)
                            .await?
                    }
                    None => EventOutcome::ignored("unknown_consultation"),
                }
            }
            EventKind::StatusChanged {
                new_status,
                new_assignee,
            } => match new_status.trim().parse::<ConsultationStatus>() {
                Err(_) => EventOutcome::ignored("unknown_status"),
                Ok(status) => match self.current(&event.cons_id).await? {
                    Some(consultation) => {
                        self.on_transition(consultation, Some(status), new_assignee.as_deref(), at)
                            .await?
                    }
                    None => EventOutcome::ignored("unknown_consultation"),
                },
            },
            EventKind::MessageReceived { direction, .. } => {
                match self.current(&event.cons_id).await? {
                    Some(consultation) => self.on_message(&consultation, *direction, at).await?,
                    None => EventOutcome::ignored("unknown_consultation"),
                }
            }
        };

        self.log.record(
            LogRecord::business(LogLevel::Info, "lifecycle event handled")
                .field("cons_id", &event.cons_id)
                .field("kind", event.kind.name())
                .field("effects", outcome.labels().join(",")),
        );
        Ok(outcome)
    }

    async fn current(&self, cons_id: &str) -> Result<Option<Consultation>, DeskrouteError> {
        let consultation = self.consultations.get_consultation(cons_id).await?;
        if consultation.is_none() {
            self.log.record(
                LogRecord::business(LogLevel::Warn, "event for unknown consultation")
                    .field("cons_id", cons_id),
            );
        }
        Ok(consultation)
    }

    /// New consultation: auto-assign when unassigned, then confirm receipt.
    async fn on_created(
        &self,
        mut consultation: Consultation,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome, DeskrouteError> {
        if consultation.status.is_terminal() {
            return Ok(EventOutcome::ignored("already_terminal"));
        }
        let mut outcome = EventOutcome::default();

        if consultation.assigned_manager.is_none() {
            match self.selector.select_for(&consultation, at).await? {
                Some((manager, load)) => {
                    let update = ConsultationUpdate {
                        cons_id: consultation.cons_id.clone(),
                        status: consultation.status,
                        assigned_manager: Some(manager.key.clone()),
                        updated_at: at,
                        only_if_unassigned: true,
                    };
                    if self.consultations.update_consultation(&update).await? {
                        self.log.record(
                            LogRecord::business(LogLevel::Info, "consultation auto-assigned")
                                .field("cons_id", &consultation.cons_id)
                                .field("manager_key", &manager.key)
                                .field("load_percent", load.load_percent),
                        );
                        consultation.assigned_manager = Some(manager.key.clone());
                        outcome.push(SideEffect::Assigned {
                            manager_key: manager.key,
                        });
                    } else {
                        // Closed or assigned by the platform since our read.
                        match self.current(&consultation.cons_id).await? {
                            Some(fresh) if !fresh.status.is_terminal() => {
                                debug!(
                                    cons_id = %fresh.cons_id,
                                    "auto-assignment lost to a concurrent assignment"
                                );
                                consultation = fresh;
                            }
                            _ => return Ok(EventOutcome::ignored("already_terminal")),
                        }
                    }
                }
                None => {
                    self.log.record(
                        LogRecord::business(LogLevel::Warn, "no eligible manager")
                            .field("cons_id", &consultation.cons_id),
                    );
                }
            }
        }

        let queue = if notices::queue_display_allowed(&consultation, &self.config.queue) {
            self.queue_estimate(&consultation, at).await
        } else {
            None
        };
        let (lang, code) = self.language(&consultation);
        let draft = NoticeDraft::new(
            NoticeKind::Accepted,
            notices::accepted_text(lang, &consultation.cons_id, queue.as_ref()),
        )
        .with_labels(self.labels(&consultation, &code));
        self.dispatch(&consultation, draft, &mut outcome).await?;
        Ok(outcome)
    }

    /// Status and/or assignee change from the platform.
    async fn on_transition(
        &self,
        mut consultation: Consultation,
        new_status: Option<ConsultationStatus>,
        new_assignee: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome, DeskrouteError> {
        if consultation.status.is_terminal() {
            return Ok(EventOutcome::ignored("already_terminal"));
        }
        let status = new_status.unwrap_or(consultation.status);
        if status.is_terminal() {
            return self
                .on_finished(consultation, status, new_assignee.is_some(), at)
                .await;
        }
        if !consultation.status.can_transition_to(status) {
            return Ok(EventOutcome::ignored("invalid_transition"));
        }

        let assignee = match new_assignee {
            Some(external_id) => self.resolve_assignee(&consultation, external_id).await?,
            None => None,
        };
        let reassigned = assignee
            .filter(|m| consultation.assigned_manager.as_deref() != Some(m.key.as_str()));
        let status_changed = status != consultation.status;
        if !status_changed && reassigned.is_none() {
            return Ok(EventOutcome::default());
        }

        let update = ConsultationUpdate {
            cons_id: consultation.cons_id.clone(),
            status,
            assigned_manager: reassigned.as_ref().map(|m| m.key.clone()),
            updated_at: at,
            only_if_unassigned: false,
        };
        if !self.consultations.update_consultation(&update).await? {
            // Closed concurrently between our read and the guarded write.
            return Ok(EventOutcome::ignored("already_terminal"));
        }

        let mut outcome = EventOutcome::default();
        if status_changed {
            self.log.record(
                LogRecord::business(LogLevel::Info, "consultation status changed")
                    .field("cons_id", &consultation.cons_id)
                    .field("from", consultation.status)
                    .field("to", status),
            );
            outcome.push(SideEffect::StatusChanged {
                status: status.as_str().to_string(),
            });
            consultation.status = status;
        }

        if let Some(manager) = reassigned {
            self.log.record(
                LogRecord::business(LogLevel::Info, "consultation reassigned")
                    .field("cons_id", &consultation.cons_id)
                    .field(
                        "from",
                        consultation.assigned_manager.as_deref().unwrap_or("-"),
                    )
                    .field("to", &manager.key),
            );
            consultation.assigned_manager = Some(manager.key.clone());
            outcome.push(SideEffect::Assigned {
                manager_key: manager.key.clone(),
            });
            self.notify_reassignment(&consultation, &manager, &mut outcome)
                .await?;
            self.notify_queue_position(&consultation, at, &mut outcome)
                .await?;
        }
        Ok(outcome)
    }

    /// Terminal transition: persist, then send closure or cancellation only.
    async fn on_finished(
        &self,
        mut consultation: Consultation,
        status: ConsultationStatus,
        assignee_in_event: bool,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome, DeskrouteError> {
        let update = ConsultationUpdate {
            cons_id: consultation.cons_id.clone(),
            status,
            assigned_manager: None,
            updated_at: at,
            only_if_unassigned: false,
        };
        if !self.consultations.update_consultation(&update).await? {
            return Ok(EventOutcome::ignored("already_terminal"));
        }
        if assignee_in_event {
            debug!(cons_id = %consultation.cons_id, "assignee change dropped on terminal status");
        }
        self.log.record(
            LogRecord::business(LogLevel::Info, "consultation finished")
                .field("cons_id", &consultation.cons_id)
                .field("status", status),
        );
        consultation.status = status;

        let mut outcome = EventOutcome::default();
        outcome.push(SideEffect::StatusChanged {
            status: status.as_str().to_string(),
        });

        let (lang, code) = self.language(&consultation);
        let draft = if status == ConsultationStatus::Cancelled {
            NoticeDraft::new(NoticeKind::Cancellation, notices::cancellation_text(lang))
        } else {
            let with_rating = self.config.notices.rating_request;
            let draft = NoticeDraft::new(
                NoticeKind::Closure,
                notices::closure_text(lang, &consultation.cons_id, with_rating),
            );
            if with_rating {
                draft.with_buttons(rating_buttons(&consultation.cons_id))
            } else {
                draft
            }
        };
        let draft = draft.with_labels(self.labels(&consultation, &code));
        self.dispatch(&consultation, draft, &mut outcome).await?;
        Ok(outcome)
    }

    /// Only client-authored messages count as client activity.
    async fn on_message(
        &self,
        consultation: &Consultation,
        direction: MessageDirection,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome, DeskrouteError> {
        match direction {
            MessageDirection::Outgoing => Ok(EventOutcome::default()),
            MessageDirection::Incoming => {
                self.consultations
                    .touch_consultation(&consultation.cons_id, at)
                    .await?;
                let mut outcome = EventOutcome::default();
                outcome.push(SideEffect::Touched);
                Ok(outcome)
            }
        }
    }

    /// Record a rating once; repeats are accepted without a second row.
    async fn on_rating(
        &self,
        token: &str,
        comment: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome, DeskrouteError> {
        let Some(parsed) = parse_rating_token(token) else {
            return Ok(EventOutcome::ignored("invalid_rating_token"));
        };
        let Some(consultation) = self.current(&parsed.cons_id).await? else {
            return Ok(EventOutcome::ignored("unknown_consultation"));
        };
        if !consultation.status.is_completed() {
            return Ok(EventOutcome::ignored("not_completed"));
        }

        let rating = Rating {
            cons_id: consultation.cons_id.clone(),
            manager_key: consultation.assigned_manager.clone(),
            value: parsed.value,
            comment: normalize_comment(comment),
            question: consultation.selected_question.clone(),
            created_at: at,
        };
        let mut outcome = EventOutcome::default();
        if self.consultations.record_rating(&rating).await? {
            self.log.record(
                LogRecord::business(LogLevel::Info, "rating recorded")
                    .field("cons_id", &rating.cons_id)
                    .field("manager_key", rating.manager_key.as_deref().unwrap_or("-"))
                    .field("value", rating.value),
            );
            outcome.push(SideEffect::RatingRecorded);
        } else {
            debug!(cons_id = %rating.cons_id, "duplicate rating ignored");
        }
        Ok(outcome)
    }

    async fn resolve_assignee(
        &self,
        consultation: &Consultation,
        external_id: &str,
    ) -> Result<Option<Manager>, DeskrouteError> {
        let manager = self
            .directory
            .find_manager_by_external_id(external_id)
            .await?;
        if manager.is_none() {
            self.log.record(
                LogRecord::business(LogLevel::Warn, "assignee is not a known manager")
                    .field("cons_id", &consultation.cons_id)
                    .field("external_user_id", external_id),
            );
        }
        Ok(manager)
    }

    async fn notify_reassignment(
        &self,
        consultation: &Consultation,
        manager: &Manager,
        outcome: &mut EventOutcome,
    ) -> Result<(), DeskrouteError> {
        let (lang, code) = self.language(consultation);
        let draft = NoticeDraft::new(
            NoticeKind::Reassignment,
            notices::reassignment_text(lang, &manager.name),
        )
        .keyed(reassignment_key(&manager.key))
        .with_labels(self.labels(consultation, &code));
        self.dispatch(consultation, draft, outcome).await
    }

    /// Queue notice for the current assignee, when display is allowed and a
    /// position can be computed.
    async fn notify_queue_position(
        &self,
        consultation: &Consultation,
        at: DateTime<Utc>,
        outcome: &mut EventOutcome,
    ) -> Result<(), DeskrouteError> {
        if !notices::queue_display_allowed(consultation, &self.config.queue) {
            debug!(cons_id = %consultation.cons_id, "queue display not allowed");
            return Ok(());
        }
        let Some(manager_key) = consultation.assigned_manager.as_deref() else {
            return Ok(());
        };
        let Some(wait) = self.queue_estimate(consultation, at).await else {
            return Ok(());
        };
        let Some(position) = wait.queue_position else {
            return Ok(());
        };

        let (lang, code) = self.language(consultation);
        let draft = NoticeDraft::new(
            NoticeKind::QueueUpdate,
            notices::queue_update_text(lang, position, wait.estimated_wait_minutes),
        )
        .keyed(queue_update_key(manager_key, position))
        .with_labels(self.labels(consultation, &code));
        self.dispatch(consultation, draft, outcome).await
    }

    /// Estimate for display only; a failed read means no queue phrase.
    async fn queue_estimate(
        &self,
        consultation: &Consultation,
        at: DateTime<Utc>,
    ) -> Option<WaitEstimate> {
        match self
            .estimator
            .queue_info_as_of(&consultation.cons_id, at)
            .await
        {
            Ok(info) => Some(info.wait),
            Err(e) => {
                self.log.record(
                    LogRecord::system(LogLevel::Warn, "queue estimate unavailable")
                        .field("cons_id", &consultation.cons_id)
                        .field("error", e),
                );
                None
            }
        }
    }

    async fn dispatch(
        &self,
        consultation: &Consultation,
        draft: NoticeDraft,
        outcome: &mut EventOutcome,
    ) -> Result<(), DeskrouteError> {
        let kind = draft.kind;
        if self.gate.dispatch(consultation, draft).await? {
            outcome.push(SideEffect::NoticeSent { kind });
        }
        Ok(())
    }

    fn language(&self, consultation: &Consultation) -> (NoticeLanguage, String) {
        let default_code = &self.config.language.default_code;
        let code = resolve_language(
            consultation.language.as_deref(),
            consultation.topic_language.as_deref(),
            default_code,
        );
        (NoticeLanguage::from_code(&code, default_code), code)
    }

    fn labels(&self, consultation: &Consultation, language_code: &str) -> Vec<String> {
        build_transport_labels(
            Some(language_code),
            consultation.source.as_deref(),
            consultation.consultation_type.as_deref(),
            consultation.category.as_deref(),
            &self.config.labels,
        )
    }
}
