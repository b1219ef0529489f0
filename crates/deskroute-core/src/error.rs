// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Deskroute consultation engine.

use thiserror::Error;

/// The primary error type used across all Deskroute ports and core operations.
#[derive(Debug, Error)]
pub enum DeskrouteError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Store failures (connection, query, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The outbound notice channel rejected or failed to deliver a notice.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required lookup found nothing.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// An inbound event could not be decoded.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Adapter health check failed.
    #[error("health check failed for {name}: {source}")]
    HealthCheckFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DeskrouteError {
    /// Shorthand for a missing consultation.
    pub fn consultation_not_found(cons_id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "consultation",
            key: cons_id.into(),
        }
    }

    /// Shorthand for a missing manager.
    pub fn manager_not_found(manager_key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "manager",
            key: manager_key.into(),
        }
    }

    /// Whether this error is a NotFound of any entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
