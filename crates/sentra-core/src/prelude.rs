//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sentra_core::prelude::*;` to import all essential types.

// Common types
pub use crate::types::{Timestamp, WorkspaceId};

// Trace context
pub use crate::trace::{NoTrace, StaticTrace, TraceContext, TraceId};

// Directories
pub use crate::dirs::{SentraHome, resolve_workspace_dir};
