//! Sentra Governance - per-workspace authorization for agent tool calls.
//!
//! This crate decides whether a requested tool invocation may proceed. It
//! combines four layers, checked in order:
//!
//! - **Sandbox escalation**: an explicit `sandbox_permissions` flag on the
//!   request can force the approval workflow or reject the request outright.
//! - **Quotas**: every tool has a per-workspace invocation ceiling.
//! - **Domain allowlist**: URL-carrying requests are gated on hostnames a
//!   human has previously approved.
//! - **Static lists**: operator-configured auto-allow and require-approval
//!   tool lists, with a fail-open default for unlisted tools.
//!
//! When a decision cannot be made immediately the engine records a pending
//! [`Approval`] and returns [`GovernanceError::ApprovalRequired`]. That error
//! is a workflow signal, not a failure: callers surface the approval to a
//! human and later call [`AuthorizationEngine::resolve`] with the verdict.
//!
//! # Example
//!
//! ```
//! use sentra_config::GovernanceSection;
//! use sentra_governance::{AuthorizationEngine, GovernanceError};
//!
//! let config = GovernanceSection {
//!     require_approval: vec!["rm".to_string()],
//!     ..GovernanceSection::default()
//! };
//! let engine = AuthorizationEngine::in_memory(&config);
//!
//! // Unlisted tools are allowed (and debited against their quota).
//! engine.check("ls", None).unwrap();
//!
//! // Listed tools go through the approval workflow.
//! let err = engine.check("rm", None).unwrap_err();
//! let GovernanceError::ApprovalRequired { approval_id } = err else {
//!     panic!("expected approval workflow");
//! };
//! engine.resolve(&approval_id, true).unwrap();
//! assert!(engine.is_granted(&approval_id));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod approval;
pub mod domains;
pub mod engine;
/// Error types and results for governance decisions.
pub mod error;
pub mod payload;
pub mod policy;
pub mod quota;
pub mod store;

pub use approval::{Approval, ApprovalId, ApprovalStatus};
pub use domains::DomainAllowlist;
pub use engine::AuthorizationEngine;
pub use error::{GovernanceError, GovernanceResult};
pub use payload::SandboxPermissions;
pub use policy::PolicyManager;
pub use quota::{DEFAULT_DAILY_TOOL_LIMIT, UsageTracker};
pub use store::{ApprovalMap, FsStateStore, MemoryStateStore, StateStore};
