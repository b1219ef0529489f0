// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notice transport.

use async_trait::async_trait;

use crate::error::DeskrouteError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundNotice;

/// Delivers automated notices to clients through the chat platform.
///
/// When `counts_toward_response_metrics` is false the transport must use a
/// delivery mode the platform excludes from first-response timers (for
/// example a private note), never a regular agent reply.
#[async_trait]
pub trait NoticeTransport: PluginAdapter {
    async fn send_notice(&self, notice: &OutboundNotice) -> Result<(), DeskrouteError>;
}
