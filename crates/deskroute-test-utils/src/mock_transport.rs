// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notice transport for deterministic testing.
//!
//! `MockTransport` implements `NoticeTransport` and captures every notice it
//! is handed for assertion in tests. It can be switched into a failing mode
//! to exercise delivery-failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use deskroute_core::traits::adapter::PluginAdapter;
use deskroute_core::types::{AdapterType, HealthStatus, NoticeKind, OutboundNotice};
use deskroute_core::{DeskrouteError, NoticeTransport};

/// A mock outbound transport for testing.
///
/// - **sent**: notices passed to `send_notice()` while not failing
/// - **attempts**: every call to `send_notice()`, failed or not
pub struct MockTransport {
    sent: Mutex<Vec<OutboundNotice>>,
    attempts: Mutex<Vec<OutboundNotice>>,
    failing: AtomicBool,
}

impl MockTransport {
    /// Create a new mock transport with nothing captured.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Notices delivered successfully.
    pub fn sent(&self) -> Vec<OutboundNotice> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Delivered notices of one kind.
    pub fn sent_of(&self, kind: NoticeKind) -> Vec<OutboundNotice> {
        self.sent()
            .into_iter()
            .filter(|n| n.kind == kind)
            .collect()
    }

    /// Every send attempt, including failed ones.
    pub fn attempts(&self) -> Vec<OutboundNotice> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_sent(&self) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, DeskrouteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("send failures enabled".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DeskrouteError> {
        Ok(())
    }
}

#[async_trait]
impl NoticeTransport for MockTransport {
    async fn send_notice(&self, notice: &OutboundNotice) -> Result<(), DeskrouteError> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeskrouteError::Transport {
                message: format!("mock delivery refused for {}", notice.cons_id),
                source: None,
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
        Ok(())
    }
}
