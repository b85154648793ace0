//! Approval records and their lifecycle.
//!
//! An [`Approval`] is the persisted representation of a human decision
//! gating a tool invocation. It is created `Pending` by the engine,
//! transitions exactly once to `Granted` or `Denied`, and is never mutated
//! again after that.

use sentra_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an approval.
///
/// Backed by a UUIDv7 so identifiers are time-orderable: sorting ids sorts
/// approvals by creation instant (at millisecond granularity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApprovalId(pub Uuid);

impl ApprovalId {
    /// Create a new time-ordered approval ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ApprovalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApprovalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "appr:{}", self.0)
    }
}

/// Lifecycle state of an approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Waiting for a human verdict.
    Pending,
    /// Approved by a human. Terminal.
    Granted,
    /// Rejected by a human. Terminal.
    Denied,
}

impl ApprovalStatus {
    /// Check whether this status is terminal (no further transitions).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A persisted record of a pending or resolved human decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    /// Unique, time-orderable identifier.
    pub id: ApprovalId,
    /// Canonical name of the tool awaiting the decision.
    pub tool_name: String,
    /// The raw request payload, stored as text for later inspection.
    pub input: String,
    /// Current lifecycle state.
    pub status: ApprovalStatus,
    /// When the engine recorded the request.
    pub created_at: Timestamp,
}

impl Approval {
    /// Create a new pending approval for a tool invocation.
    #[must_use]
    pub fn new(tool_name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: ApprovalId::new(),
            tool_name: tool_name.into(),
            input: input.into(),
            status: ApprovalStatus::Pending,
            created_at: Timestamp::now(),
        }
    }

    /// Check whether this approval still awaits a verdict.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }
}

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.id, self.status, self.tool_name)
    }
}
