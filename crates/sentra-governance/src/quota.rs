//! Per-tool usage quotas.

use std::collections::HashMap;

use crate::error::{GovernanceError, GovernanceResult};
use crate::policy::canonical_tool_name;

/// Ceiling applied when the configuration leaves the limit unset.
pub const DEFAULT_DAILY_TOOL_LIMIT: u32 = 100;

/// Tracks how many times each tool has been allowed to run.
///
/// Counters live only in memory and are keyed by canonical tool name; a
/// process restart resets them. There is deliberately no calendar logic —
/// the "daily" ceiling is a process-lifetime ceiling.
///
/// Not self-locking: the engine mutates the tracker inside its own critical
/// section, so one lock covers approvals, domains, and quota together.
#[derive(Debug)]
pub struct UsageTracker {
    limit: u32,
    counts: HashMap<String, u32>,
}

impl UsageTracker {
    /// Create a tracker with the given per-tool ceiling.
    ///
    /// A zero limit falls back to [`DEFAULT_DAILY_TOOL_LIMIT`].
    #[must_use]
    pub fn new(limit: u32) -> Self {
        let limit = if limit == 0 {
            DEFAULT_DAILY_TOOL_LIMIT
        } else {
            limit
        };
        Self {
            limit,
            counts: HashMap::new(),
        }
    }

    /// The per-tool ceiling in effect.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// How many units a tool has consumed so far.
    #[must_use]
    pub fn used(&self, tool_name: &str) -> u32 {
        self.counts
            .get(&canonical_tool_name(tool_name))
            .copied()
            .unwrap_or(0)
    }

    /// Check whether the tool still has quota available.
    ///
    /// Read-only: never mutates a counter.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::QuotaExceeded`] when the counter is at or
    /// above the ceiling.
    pub fn check(&self, tool_name: &str) -> GovernanceResult<()> {
        if self.used(tool_name) >= self.limit {
            return Err(GovernanceError::QuotaExceeded {
                tool: tool_name.to_owned(),
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Debit one unit of quota from the tool.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::QuotaExceeded`] when the counter is
    /// already at the ceiling; the counter is left unchanged in that case.
    pub fn consume(&mut self, tool_name: &str) -> GovernanceResult<()> {
        self.check(tool_name)?;
        let counter = self
            .counts
            .entry(canonical_tool_name(tool_name))
            .or_insert(0);
        *counter = counter.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_falls_back_to_default() {
        let tracker = UsageTracker::new(0);
        assert_eq!(tracker.limit(), DEFAULT_DAILY_TOOL_LIMIT);
    }

    #[test]
    fn test_consume_until_exhausted() {
        let mut tracker = UsageTracker::new(2);
        tracker.consume("ls").unwrap();
        tracker.consume("ls").unwrap();

        let err = tracker.consume("ls").unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::QuotaExceeded { limit: 2, .. }
        ));
        // The failed debit left the counter at the ceiling.
        assert_eq!(tracker.used("ls"), 2);
    }

    #[test]
    fn test_check_does_not_mutate() {
        let tracker = UsageTracker::new(3);
        tracker.check("grep").unwrap();
        assert_eq!(tracker.used("grep"), 0);
    }

    #[test]
    fn test_counters_are_per_tool() {
        let mut tracker = UsageTracker::new(1);
        tracker.consume("ls").unwrap();
        tracker.consume("cat").unwrap();
        assert!(tracker.consume("ls").is_err());
        assert_eq!(tracker.used("cat"), 1);
    }

    #[test]
    fn test_counters_key_on_canonical_name() {
        let mut tracker = UsageTracker::new(2);
        tracker.consume("LS").unwrap();
        tracker.consume("  ls ").unwrap();
        assert!(tracker.consume("ls").is_err());
    }
}
