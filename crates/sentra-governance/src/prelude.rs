//! Prelude module - commonly used types for convenient import.
//!
//! Use `use sentra_governance::prelude::*;` to import all essential types.

// Errors
pub use crate::{GovernanceError, GovernanceResult};

// Approval types
pub use crate::{Approval, ApprovalId, ApprovalStatus};

// Engine
pub use crate::AuthorizationEngine;

// Policy
pub use crate::PolicyManager;

// Payload conventions
pub use crate::SandboxPermissions;

// Storage
pub use crate::{ApprovalMap, FsStateStore, MemoryStateStore, StateStore};
