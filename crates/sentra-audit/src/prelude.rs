//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sentra_audit::prelude::*;` to import all essential types.

// Errors
pub use crate::{AuditError, AuditResult};

// Entry types
pub use crate::{AuditEntry, AuditFilter};

// Logger
pub use crate::{AUDIT_LOG_FILE, AuditLogger, AuditSection};

// Redaction
pub use crate::{REDACTION_MARKER, Redactor};
