// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manager selection and queue estimation for the Deskroute engine.
//!
//! This crate provides:
//! - [`CapabilityMatcher`]: whether a manager may serve a request
//! - [`AvailabilityFilter`]: working-hour windows in a fixed local offset
//! - [`LoadCalculator`]: open count against capacity
//! - [`ManagerSelector`]: least-loaded selection and load reporting
//! - [`QueueEstimator`]: queue position and wait estimates
//!
//! Every figure is recomputed from the store on each call; nothing is cached.

pub mod availability;
pub mod capability;
pub mod estimator;
pub mod load;
pub mod selector;

#[cfg(test)]
pub(crate) mod fixtures;

pub use availability::AvailabilityFilter;
pub use capability::CapabilityMatcher;
pub use estimator::{QueueEstimator, format_wait_text};
pub use load::LoadCalculator;
pub use selector::{AvailableManager, ManagerSelector, least_loaded};
