//! Decision and scoring engine for degenerative cervical myelopathy (DCM).
//!
//! The [`workflows::myelopathy`] module holds the pure evaluators; the
//! [`workflows::intake`] module turns CSV exports into patient records for
//! batch summaries.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
