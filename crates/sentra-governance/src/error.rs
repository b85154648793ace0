use std::path::PathBuf;

use crate::approval::{ApprovalId, ApprovalStatus};

/// Errors that can occur during governance decisions.
///
/// [`GovernanceError::ApprovalRequired`] is special: it is a control-flow
/// signal rather than a failure. It always carries the identifier of a
/// freshly persisted pending approval, and callers must branch on it to
/// drive their approval UI instead of reporting the action as failed.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// The request needs a human decision before it can proceed.
    #[error("approval required: {approval_id}")]
    ApprovalRequired {
        /// Identifier of the pending approval awaiting a verdict.
        approval_id: ApprovalId,
    },

    /// The request carried an unsupported `sandbox_permissions` value.
    #[error("unsupported sandbox permission value: {value:?}")]
    InvalidSandboxPermission {
        /// The rejected value.
        value: String,
    },

    /// The tool is rejected by the static workspace policy.
    #[error("permission denied for tool '{tool}': {reason}")]
    PermissionDenied {
        /// The tool that was rejected.
        tool: String,
        /// Why the policy rejected it.
        reason: String,
    },

    /// The tool's usage counter is at its ceiling.
    #[error("quota exceeded for tool '{tool}' (limit {limit})")]
    QuotaExceeded {
        /// The tool that ran out of quota.
        tool: String,
        /// The configured ceiling.
        limit: u32,
    },

    /// A resolution referenced an approval that does not exist.
    #[error("approval not found: {approval_id}")]
    NotFound {
        /// The unknown identifier.
        approval_id: ApprovalId,
    },

    /// A resolution referenced an approval that is no longer pending.
    #[error("approval {approval_id} already resolved as {status}")]
    AlreadyResolved {
        /// The identifier of the resolved approval.
        approval_id: ApprovalId,
        /// The terminal status it already holds.
        status: ApprovalStatus,
    },

    /// A state snapshot could not be written.
    #[error("failed to persist {path}: {source}")]
    Persist {
        /// The snapshot file being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A state snapshot could not be read.
    #[error("failed to load {path}: {source}")]
    Load {
        /// The snapshot file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// State could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GovernanceError {
    /// Check whether this error is the approval-workflow signal.
    #[must_use]
    pub fn is_approval_required(&self) -> bool {
        matches!(self, Self::ApprovalRequired { .. })
    }

    /// The pending approval carried by an [`ApprovalRequired`] error.
    ///
    /// [`ApprovalRequired`]: Self::ApprovalRequired
    #[must_use]
    pub fn approval_id(&self) -> Option<ApprovalId> {
        match self {
            Self::ApprovalRequired { approval_id } => Some(*approval_id),
            _ => None,
        }
    }
}

/// Result type for governance operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;
