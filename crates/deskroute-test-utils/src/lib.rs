// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Deskroute integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a chat platform.
//!
//! # Components
//!
//! - [`MockTransport`] - Notice transport that captures what it is handed
//! - [`MemoryLogPort`] - Log port that keeps every record
//! - [`FlakyStore`] - Store wrapper with switchable read failures
//! - [`TestHarness`] - Engine over a temp database with the mocks above

pub mod fixtures;
pub mod flaky_store;
pub mod harness;
pub mod memory_log;
pub mod mock_transport;

pub use flaky_store::FlakyStore;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_log::MemoryLogPort;
pub use mock_transport::MockTransport;
