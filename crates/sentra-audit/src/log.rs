//! Audit log - append and query governed-action records.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use sentra_config::AuditSection;
use sentra_core::{Timestamp, TraceContext};
use tracing::{debug, warn};

use crate::entry::{AuditEntry, AuditFilter};
use crate::error::{AuditError, AuditResult};
use crate::redact::Redactor;

/// Default file name of the audit trail inside a workspace state directory.
pub const AUDIT_LOG_FILE: &str = "audit.log";

/// Append-only, redacting audit log for one workspace.
///
/// Writers hold the lock exclusively for the whole open+append+close;
/// readers share it among themselves. The log file is newline-delimited
/// JSON, one entry per line, and is never rewritten.
pub struct AuditLogger {
    enabled: bool,
    path: PathBuf,
    redactor: Redactor,
    trace: Arc<dyn TraceContext>,
    file_lock: RwLock<()>,
}

impl AuditLogger {
    /// Create a logger writing to the given log file.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        policy: &AuditSection,
        trace: Arc<dyn TraceContext>,
    ) -> Self {
        Self {
            enabled: policy.enabled,
            path: path.into(),
            redactor: Redactor::new(&policy.redact_patterns),
            trace,
            file_lock: RwLock::new(()),
        }
    }

    /// Create a logger for a workspace state directory.
    ///
    /// The log lands at `<dir>/audit.log` unless the policy overrides the
    /// location.
    #[must_use]
    pub fn for_workspace(dir: &Path, policy: &AuditSection, trace: Arc<dyn TraceContext>) -> Self {
        let path = policy
            .path
            .as_ref()
            .map_or_else(|| dir.join(AUDIT_LOG_FILE), PathBuf::from);
        Self::new(path, policy, trace)
    }

    /// The log file this logger appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this logger records anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one governed action.
    ///
    /// No-op when audit is disabled. A missing timestamp is filled with the
    /// current time and a missing trace ID from the ambient trace context.
    /// `input` and `output` are redacted before the entry is serialized as
    /// a single JSON line and appended; parent directories are created as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be serialized or the log file
    /// cannot be created or appended to.
    pub fn log(&self, entry: AuditEntry) -> AuditResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let mut entry = entry;
        if entry.timestamp.is_none() {
            entry.timestamp = Some(Timestamp::now());
        }
        if entry.trace_id.is_empty()
            && let Some(trace_id) = self.trace.current_trace_id()
        {
            entry.trace_id = trace_id.0;
        }
        entry.input = self.redactor.apply(&entry.input);
        entry.output = self.redactor.apply(&entry.output);

        let line = serde_json::to_string(&entry)?;

        let io_err = |source: std::io::Error| AuditError::Io {
            path: self.path.clone(),
            source,
        };

        let _guard = self
            .file_lock
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{line}").map_err(io_err)?;

        debug!(tool = %entry.tool_name, action = %entry.action, "Appended audit entry");
        Ok(())
    }

    /// Read back entries matching a filter.
    ///
    /// A missing log file yields an empty result. Lines that fail to parse
    /// (e.g. a partial write from a crash) are skipped with a warning, not
    /// treated as fatal. `None` returns every parseable entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file exists but cannot be read.
    pub fn query(&self, filter: Option<&AuditFilter>) -> AuditResult<Vec<AuditEntry>> {
        let _guard = self
            .file_lock
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AuditError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            },
        };

        let mut entries = Vec::new();
        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| AuditError::Io {
                path: self.path.clone(),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => {
                    if filter.is_none_or(|f| f.matches(&entry)) {
                        entries.push(entry);
                    }
                },
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = line_number.saturating_add(1),
                        error = %e,
                        "Skipping unparseable audit line"
                    );
                },
            }
        }

        Ok(entries)
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("enabled", &self.enabled)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_core::{NoTrace, StaticTrace, WorkspaceId};

    fn logger_at(dir: &Path, policy: &AuditSection) -> AuditLogger {
        AuditLogger::new(dir.join("audit.log"), policy, Arc::new(NoTrace))
    }

    fn entry(workspace: &str, tool: &str) -> AuditEntry {
        AuditEntry::new(WorkspaceId::new(workspace), tool, "execute").success()
    }

    // -----------------------------------------------------------------------
    // Append behaviour
    // -----------------------------------------------------------------------

    #[test]
    fn test_log_appends_one_line_per_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = logger_at(tmp.path(), &AuditSection::default());

        logger.log(entry("ws", "ls")).unwrap();
        logger.log(entry("ws", "cat")).unwrap();

        let raw = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn test_log_fills_timestamp_and_trace_id() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(
            tmp.path().join("audit.log"),
            &AuditSection::default(),
            Arc::new(StaticTrace::new("trace-42")),
        );

        logger.log(entry("ws", "ls")).unwrap();

        let entries = logger.query(None).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].timestamp.is_some());
        assert_eq!(entries[0].trace_id, "trace-42");
    }

    #[test]
    fn test_explicit_trace_id_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(
            tmp.path().join("audit.log"),
            &AuditSection::default(),
            Arc::new(StaticTrace::new("ambient")),
        );

        logger
            .log(entry("ws", "ls").with_trace_id("explicit"))
            .unwrap();
        assert_eq!(logger.query(None).unwrap()[0].trace_id, "explicit");
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let policy = AuditSection {
            enabled: false,
            ..AuditSection::default()
        };
        let logger = logger_at(tmp.path(), &policy);

        logger.log(entry("ws", "ls")).unwrap();
        assert!(!logger.path().exists());
        assert!(!logger.is_enabled());
    }

    #[test]
    fn test_for_workspace_default_and_override() {
        let tmp = tempfile::tempdir().unwrap();

        let logger = AuditLogger::for_workspace(tmp.path(), &AuditSection::default(), Arc::new(NoTrace));
        assert_eq!(logger.path(), tmp.path().join(AUDIT_LOG_FILE));

        let policy = AuditSection {
            path: Some("/var/log/sentra/audit.log".to_owned()),
            ..AuditSection::default()
        };
        let logger = AuditLogger::for_workspace(tmp.path(), &policy, Arc::new(NoTrace));
        assert_eq!(logger.path(), Path::new("/var/log/sentra/audit.log"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(
            tmp.path().join("nested/ws/audit.log"),
            &AuditSection::default(),
            Arc::new(NoTrace),
        );
        logger.log(entry("ws", "ls")).unwrap();
        assert!(logger.path().is_file());
    }

    // -----------------------------------------------------------------------
    // Redaction
    // -----------------------------------------------------------------------

    #[test]
    fn test_redaction_applies_to_input_and_output() {
        let tmp = tempfile::tempdir().unwrap();
        let policy = AuditSection {
            redact_patterns: vec!["sk-[a-z0-9]+".to_owned()],
            ..AuditSection::default()
        };
        let logger = logger_at(tmp.path(), &policy);

        logger
            .log(
                entry("ws", "fetch")
                    .with_input(r#"{"token":"sk-abc9"}"#)
                    .with_output("used sk-abc9 to authenticate"),
            )
            .unwrap();

        // Nothing on disk contains the secret, queried entries neither.
        let raw = std::fs::read_to_string(logger.path()).unwrap();
        assert!(!raw.contains("sk-abc9"));

        let entries = logger.query(None).unwrap();
        assert_eq!(entries[0].input, r#"{"token":"[REDACTED]"}"#);
        assert_eq!(entries[0].output, "used [REDACTED] to authenticate");
    }

    #[test]
    fn test_invalid_pattern_redacts_as_literal() {
        let tmp = tempfile::tempdir().unwrap();
        let policy = AuditSection {
            redact_patterns: vec!["((secret".to_owned()],
            ..AuditSection::default()
        };
        let logger = logger_at(tmp.path(), &policy);

        logger
            .log(entry("ws", "ls").with_input("contains ((secret here"))
            .unwrap();
        assert_eq!(
            logger.query(None).unwrap()[0].input,
            "contains [REDACTED] here"
        );
    }

    // -----------------------------------------------------------------------
    // Query behaviour
    // -----------------------------------------------------------------------

    #[test]
    fn test_query_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = logger_at(tmp.path(), &AuditSection::default());
        assert!(logger.query(None).unwrap().is_empty());
    }

    #[test]
    fn test_query_filters_with_and_semantics() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = logger_at(tmp.path(), &AuditSection::default());

        logger.log(entry("ws-1", "ls")).unwrap();
        logger.log(entry("ws-1", "rm").failure("denied")).unwrap();
        logger.log(entry("ws-2", "ls")).unwrap();

        let filter = AuditFilter {
            workspace_id: Some(WorkspaceId::new("ws-1")),
            ..AuditFilter::default()
        };
        assert_eq!(logger.query(Some(&filter)).unwrap().len(), 2);

        let filter = AuditFilter {
            workspace_id: Some(WorkspaceId::new("ws-1")),
            status: Some("failure".to_owned()),
            ..AuditFilter::default()
        };
        let failures = logger.query(Some(&filter)).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tool_name, "rm");

        let filter = AuditFilter {
            tool_name: Some("ls".to_owned()),
            ..AuditFilter::default()
        };
        assert_eq!(logger.query(Some(&filter)).unwrap().len(), 2);
    }

    #[test]
    fn test_query_skips_corrupt_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = logger_at(tmp.path(), &AuditSection::default());

        logger.log(entry("ws", "ls")).unwrap();

        // Simulate a partial write from a crash.
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(logger.path())
            .unwrap();
        writeln!(file, "{{\"workspace_id\": \"trunc").unwrap();
        drop(file);

        logger.log(entry("ws", "cat")).unwrap();

        let entries = logger.query(None).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
