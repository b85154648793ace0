//! Static workspace policy — the operator-declared boundary for tools.
//!
//! The [`PolicyManager`] is a stateless evaluator over the immutable
//! [`PolicySection`] loaded at workspace open. It is the cheap reject path:
//! callers run it before (or alongside) the stateful engine, so an
//! explicitly forbidden tool never reaches the approval workflow.
//!
//! # Policy Check Order
//!
//! 1. Is the tool in the denied list? -> `PermissionDenied`
//! 2. Is an allowlist configured and the tool absent from it? -> `PermissionDenied`
//! 3. Otherwise -> allowed

use std::collections::{HashMap, HashSet};

use sentra_config::{ApprovalRule, PolicySection, ResourceLimits};

use crate::error::{GovernanceError, GovernanceResult};

/// Canonical form of a tool name: whitespace-trimmed, lower-cased.
///
/// All list membership in the governance subsystem matches on this form, so
/// list order and spelling case never affect outcomes.
#[must_use]
pub(crate) fn canonical_tool_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Stateless evaluator of the operator-declared workspace policy.
///
/// Tool lists and rule keys are canonicalized into sets at construction, so
/// every lookup is O(1).
#[derive(Debug, Clone)]
pub struct PolicyManager {
    allowed: HashSet<String>,
    denied: HashSet<String>,
    rules: HashMap<String, ApprovalRule>,
    limits: Option<ResourceLimits>,
}

impl PolicyManager {
    /// Build a policy manager from workspace configuration.
    #[must_use]
    pub fn new(policy: &PolicySection) -> Self {
        let canonicalize =
            |names: &[String]| names.iter().map(|n| canonical_tool_name(n)).collect();

        Self {
            allowed: canonicalize(&policy.allowed_tools),
            denied: canonicalize(&policy.denied_tools),
            rules: policy
                .approval_rules
                .iter()
                .map(|(pattern, rule)| (canonical_tool_name(pattern), rule.clone()))
                .collect(),
            limits: policy.resource_limits.clone(),
        }
    }

    /// Check a tool against the static policy.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::PermissionDenied`] when the tool matches a
    /// denied entry, or when an allowlist is configured and the tool is not
    /// on it.
    pub fn check(&self, tool_name: &str) -> GovernanceResult<()> {
        let canonical = canonical_tool_name(tool_name);

        if self.denied.contains(&canonical) {
            return Err(GovernanceError::PermissionDenied {
                tool: tool_name.to_owned(),
                reason: "tool is denied by workspace policy".to_owned(),
            });
        }

        if !self.allowed.is_empty() && !self.allowed.contains(&canonical) {
            return Err(GovernanceError::PermissionDenied {
                tool: tool_name.to_owned(),
                reason: "tool is not in the workspace allowlist".to_owned(),
            });
        }

        Ok(())
    }

    /// Look up the approval rule configured for a tool, if any.
    ///
    /// Matching is a case-insensitive exact match against the configured
    /// rule keys.
    #[must_use]
    pub fn approval_rule(&self, tool_name: &str) -> Option<&ApprovalRule> {
        self.rules.get(&canonical_tool_name(tool_name))
    }

    /// The configured resource ceilings, if any.
    #[must_use]
    pub fn resource_limits(&self) -> Option<&ResourceLimits> {
        self.limits.as_ref()
    }
}
