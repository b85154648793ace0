//! Configuration types for the Sentra governance subsystem.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal sentra crates. Every struct implements [`Default`] with sensible
//! production defaults so that a bare `[section]` header in TOML produces a
//! working configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration consumed by the governance subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Authorization engine behaviour (allow lists, quotas).
    pub governance: GovernanceSection,
    /// Audit trail policy (enablement, redaction).
    pub audit: AuditSection,
    /// Static per-workspace tool policy.
    pub policy: PolicySection,
}

// ---------------------------------------------------------------------------
// GovernanceSection
// ---------------------------------------------------------------------------

/// Authorization engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceSection {
    /// Tool names allowed without an approval workflow.
    ///
    /// Matching is case-insensitive and whitespace-trimmed.
    pub auto_allow: Vec<String>,
    /// Tool names that always require a human approval before running.
    pub require_approval: Vec<String>,
    /// Per-tool invocation ceiling. `0` means "use the engine's built-in
    /// default".
    pub daily_tool_limit: u32,
}

// ---------------------------------------------------------------------------
// AuditSection
// ---------------------------------------------------------------------------

/// Audit trail configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Whether governed actions are recorded at all.
    pub enabled: bool,
    /// Redaction patterns applied to recorded inputs and outputs.
    ///
    /// Each pattern is tried as a regular expression first; a pattern that
    /// does not compile is treated as a literal substring.
    pub redact_patterns: Vec<String>,
    /// Override for the audit log location. `None` keeps the log inside the
    /// workspace state directory.
    pub path: Option<String>,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_patterns: Vec::new(),
            path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PolicySection
// ---------------------------------------------------------------------------

/// Static per-workspace tool policy.
///
/// Declared by the operator and immutable for the process lifetime. An empty
/// `allowed_tools` list means "no explicit allowlist" — only `denied_tools`
/// applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Tool names the workspace is scoped to. When non-empty, anything not
    /// listed is rejected.
    pub allowed_tools: Vec<String>,
    /// Tool names that are never allowed in this workspace.
    pub denied_tools: Vec<String>,
    /// Per-tool approval rules, keyed by tool name pattern.
    pub approval_rules: HashMap<String, ApprovalRule>,
    /// Optional resource ceilings for governed actions.
    pub resource_limits: Option<ResourceLimits>,
}

/// How approvals for a matching tool should be handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalRule {
    /// The tool name pattern this rule applies to.
    pub tool_pattern: String,
    /// Grant matching requests without asking a human.
    pub auto_approve: bool,
    /// Require the agent to state a reason with the request.
    pub require_reason: bool,
    /// How long (in seconds) to wait for a human decision.
    pub timeout_secs: u64,
}

impl Default for ApprovalRule {
    fn default() -> Self {
        Self {
            tool_pattern: String::new(),
            auto_approve: false,
            require_reason: false,
            timeout_secs: 300,
        }
    }
}

/// Resource ceilings for governed actions.
///
/// Advisory: the engine reports these to callers, enforcement happens in the
/// sandbox that runs the action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Maximum resident memory in bytes.
    pub max_memory_bytes: Option<u64>,
    /// Maximum CPU share in percent.
    pub max_cpu_percent: Option<u8>,
    /// Maximum wall-clock duration in seconds.
    pub max_duration_secs: Option<u64>,
    /// Maximum number of spawned processes.
    pub max_processes: Option<u32>,
}
