//! Sentra Core - Foundation types for the Sentra agent runtime.
//!
//! This crate provides:
//! - Common types used throughout the runtime (`Timestamp`, `WorkspaceId`)
//! - Trace-context accessors used to correlate governed actions
//! - Directory scaffolding for the Sentra home and per-workspace state

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod dirs;
pub mod trace;
pub mod types;

pub use dirs::{SentraHome, resolve_workspace_dir};
pub use trace::{NoTrace, StaticTrace, TraceContext, TraceId};
pub use types::{Timestamp, WorkspaceId};
