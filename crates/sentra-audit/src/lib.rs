//! Sentra Audit - redacting, append-only record of governed actions.
//!
//! Callers record an [`AuditEntry`] after executing a governed action (the
//! engine itself never writes here — the trail reflects what actually ran
//! and how it ended). Entries are:
//!
//! - **Redacted**: operator-supplied patterns are scrubbed from recorded
//!   inputs and outputs before anything touches disk
//! - **Append-only**: one JSON line per entry; prior lines are never
//!   mutated or removed
//! - **Queryable**: filtered reads with AND semantics over workspace, tool,
//!   status, and time range
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sentra_audit::{AuditEntry, AuditLogger, AuditSection};
//! use sentra_core::{NoTrace, WorkspaceId};
//!
//! let policy = AuditSection {
//!     redact_patterns: vec!["sk-[A-Za-z0-9]+".to_string()],
//!     ..AuditSection::default()
//! };
//! let logger = AuditLogger::new("/tmp/ws/audit.log", &policy, Arc::new(NoTrace));
//!
//! let entry = AuditEntry::new(WorkspaceId::new("ws-1"), "fetch", "execute")
//!     .with_input(r#"{"url":"https://x.com","token":"sk-abc123"}"#)
//!     .success();
//! logger.log(entry).unwrap();
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entry;
mod error;
mod log;
mod redact;

pub use entry::{AuditEntry, AuditFilter};
pub use error::{AuditError, AuditResult};
pub use log::{AUDIT_LOG_FILE, AuditLogger};
pub use redact::{REDACTION_MARKER, Redactor};

// Re-export the audit policy section from config for convenience.
pub use sentra_config::AuditSection;
