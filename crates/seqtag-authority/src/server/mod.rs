//! Sequence authority service internals.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env configuration and validation.
//! - [`state`] - the counter and submission ledger behind one lock.
//! - [`routes`] - HTTP handlers for the three protocol endpoints.
//! - [`telemetry`] - log subscriber initialization.

pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;
