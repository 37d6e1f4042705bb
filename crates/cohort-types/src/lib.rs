//! # cohort-types
//!
//! Shared types, errors, and configuration for the **Cohort** matching engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`Timestamp`], [`Instrument`]
//! - **Command model**: [`Command`], [`CommandKind`], [`Side`]
//! - **Event model**: [`BookEvent`], [`OrderAdded`], [`OrderCancelled`], [`OrderExecuted`]
//! - **Configuration**: [`EngineConfig`], [`WakePolicy`]
//! - **Errors**: [`CohortError`] with `CX_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use cohort_types::{Command, CommandKind, BookEvent, ...};

pub use command::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `cohort_types::constants::FOO`
// (not re-exported to avoid name collisions).
