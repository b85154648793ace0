//! Audit entry and query filter types.

use sentra_core::{Timestamp, WorkspaceId};
use serde::{Deserialize, Serialize};

fn u64_is_zero(n: &u64) -> bool {
    *n == 0
}

/// One recorded governed action.
///
/// Created by the caller that executed (or failed to execute) the action.
/// A missing timestamp or trace ID is filled in by the logger at write
/// time; everything else is recorded as supplied, after redaction of
/// `input` and `output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action ran. Filled with the current time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    /// Correlation ID of the request. Filled from the ambient trace
    /// context when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trace_id: String,
    /// The workspace the action ran in.
    pub workspace_id: WorkspaceId,
    /// Canonical name of the tool.
    pub tool_name: String,
    /// What was done (e.g. `"execute"`, `"approve"`, `"deny"`).
    pub action: String,
    /// How it ended (e.g. `"success"`, `"failure"`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// The tool input, redacted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub input: String,
    /// The tool output, redacted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    /// Wall-clock duration of the action in milliseconds.
    #[serde(default, skip_serializing_if = "u64_is_zero")]
    pub duration_ms: u64,
    /// Error message when the action failed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl AuditEntry {
    /// Create an entry for an action in a workspace.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        tool_name: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: None,
            trace_id: String::new(),
            workspace_id,
            tool_name: tool_name.into(),
            action: action.into(),
            status: String::new(),
            input: String::new(),
            output: String::new(),
            duration_ms: 0,
            error: String::new(),
        }
    }

    /// Set an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set an explicit trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Record the tool input.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Record the tool output.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Record how long the action took.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set an explicit status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Mark the action as succeeded.
    #[must_use]
    pub fn success(self) -> Self {
        self.with_status("success")
    }

    /// Mark the action as failed with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self.with_status("failure")
    }
}

/// Predicate over audit entries.
///
/// Every field is optional; an absent field imposes no constraint. All
/// provided fields must match (AND semantics). Time bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Exact workspace match.
    pub workspace_id: Option<WorkspaceId>,
    /// Exact tool name match.
    pub tool_name: Option<String>,
    /// Entries at or after this instant.
    pub start_time: Option<Timestamp>,
    /// Entries at or before this instant.
    pub end_time: Option<Timestamp>,
    /// Exact status match.
    pub status: Option<String>,
}

impl AuditFilter {
    /// Check whether an entry satisfies every provided constraint.
    #[must_use]
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ws) = &self.workspace_id
            && entry.workspace_id != *ws
        {
            return false;
        }
        if let Some(tool) = &self.tool_name
            && entry.tool_name != *tool
        {
            return false;
        }
        if let Some(status) = &self.status
            && entry.status != *status
        {
            return false;
        }
        if let Some(start) = self.start_time
            && !entry.timestamp.is_some_and(|ts| ts >= start)
        {
            return false;
        }
        if let Some(end) = self.end_time
            && !entry.timestamp.is_some_and(|ts| ts <= end)
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn entry() -> AuditEntry {
        AuditEntry::new(WorkspaceId::new("ws-1"), "fetch", "execute")
            .with_timestamp(ts("2026-05-01T12:00:00Z"))
            .success()
    }

    #[test]
    fn test_empty_fields_are_omitted_from_json() {
        let entry = AuditEntry::new(WorkspaceId::new("ws-1"), "ls", "execute");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("trace_id"));
        assert!(!json.contains("duration_ms"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_entry_roundtrip() {
        let entry = entry()
            .with_trace_id("trace-9")
            .with_input("{}")
            .with_duration_ms(42);
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trace_id, "trace-9");
        assert_eq!(back.duration_ms, 42);
        assert_eq!(back.status, "success");
    }

    #[test]
    fn test_failure_records_error_and_status() {
        let entry = AuditEntry::new(WorkspaceId::new("ws"), "rm", "execute")
            .failure("permission denied");
        assert_eq!(entry.status, "failure");
        assert_eq!(entry.error, "permission denied");
    }

    // -----------------------------------------------------------------------
    // Filter semantics
    // -----------------------------------------------------------------------

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(AuditFilter::default().matches(&entry()));
    }

    #[test]
    fn test_filter_fields_are_anded() {
        let filter = AuditFilter {
            workspace_id: Some(WorkspaceId::new("ws-1")),
            tool_name: Some("fetch".to_owned()),
            status: Some("success".to_owned()),
            ..AuditFilter::default()
        };
        assert!(filter.matches(&entry()));

        let filter = AuditFilter {
            workspace_id: Some(WorkspaceId::new("ws-1")),
            tool_name: Some("other".to_owned()),
            ..AuditFilter::default()
        };
        assert!(!filter.matches(&entry()));
    }

    #[test]
    fn test_time_bounds_are_inclusive() {
        let filter = AuditFilter {
            start_time: Some(ts("2026-05-01T12:00:00Z")),
            end_time: Some(ts("2026-05-01T12:00:00Z")),
            ..AuditFilter::default()
        };
        assert!(filter.matches(&entry()));

        let filter = AuditFilter {
            start_time: Some(ts("2026-05-01T12:00:01Z")),
            ..AuditFilter::default()
        };
        assert!(!filter.matches(&entry()));

        let filter = AuditFilter {
            end_time: Some(ts("2026-05-01T11:59:59Z")),
            ..AuditFilter::default()
        };
        assert!(!filter.matches(&entry()));
    }

    #[test]
    fn test_time_bound_excludes_undated_entries() {
        let undated = AuditEntry::new(WorkspaceId::new("ws-1"), "ls", "execute");
        let filter = AuditFilter {
            start_time: Some(ts("2026-01-01T00:00:00Z")),
            ..AuditFilter::default()
        };
        assert!(!filter.matches(&undated));
    }
}
