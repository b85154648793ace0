//! Snapshot persistence for engine state.
//!
//! Approvals and the domain allowlist are persisted as whole-file JSON
//! snapshots, rewritten on every mutation. Writes go to a temporary file in
//! the target directory and are renamed into place, so a crash mid-write
//! never leaves a partial snapshot behind. This bounds scalability to a
//! modest number of approvals per workspace, which matches the single-user,
//! single-workspace usage pattern.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::approval::{Approval, ApprovalId};
use crate::domains::DomainAllowlist;
use crate::error::{GovernanceError, GovernanceResult};

/// Snapshot file holding the approval map.
pub const APPROVALS_FILE: &str = "approvals.json";

/// Snapshot file holding the domain allowlist.
pub const DOMAINS_FILE: &str = "domains.json";

/// The full approval state of one workspace, keyed by approval ID.
pub type ApprovalMap = HashMap<ApprovalId, Approval>;

/// Persistence backend for engine state.
///
/// Implementations must be thread-safe. The engine calls `save_*` inside
/// its critical section, so a call returning `Ok` means the mutation is
/// durably committed.
pub trait StateStore: Send + Sync {
    /// Load the approval snapshot. Absent state loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or parsed.
    fn load_approvals(&self) -> GovernanceResult<ApprovalMap>;

    /// Replace the approval snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_approvals(&self, approvals: &ApprovalMap) -> GovernanceResult<()>;

    /// Load the domain allowlist snapshot. Absent state loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or parsed.
    fn load_domains(&self) -> GovernanceResult<DomainAllowlist>;

    /// Replace the domain allowlist snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_domains(&self, domains: &DomainAllowlist) -> GovernanceResult<()>;
}

// ---------------------------------------------------------------------------
// Filesystem store
// ---------------------------------------------------------------------------

/// Filesystem-backed store writing JSON snapshots into a workspace state
/// directory.
#[derive(Debug, Clone)]
pub struct FsStateStore {
    dir: PathBuf,
}

impl FsStateStore {
    /// Create a store rooted at the given workspace state directory.
    ///
    /// The directory is created lazily on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the approvals snapshot.
    #[must_use]
    pub fn approvals_path(&self) -> PathBuf {
        self.dir.join(APPROVALS_FILE)
    }

    /// Path of the domain allowlist snapshot.
    #[must_use]
    pub fn domains_path(&self) -> PathBuf {
        self.dir.join(DOMAINS_FILE)
    }

    fn load_json<T>(path: &Path) -> GovernanceResult<T>
    where
        T: DeserializeOwned + Default,
    {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(GovernanceError::Load {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Write a snapshot atomically: temp file in the same directory (same
    /// filesystem), fsync, then rename over the destination.
    fn save_json<T: Serialize>(path: &Path, value: &T) -> GovernanceResult<()> {
        let json = serde_json::to_string_pretty(value)?;

        let persist_err = |source: std::io::Error| GovernanceError::Persist {
            path: path.to_path_buf(),
            source,
        };

        let parent = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent).map_err(persist_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(persist_err)?;
        tmp.write_all(json.as_bytes()).map_err(persist_err)?;
        tmp.as_file().sync_all().map_err(persist_err)?;
        tmp.persist(path).map_err(|e| persist_err(e.error))?;

        debug!(path = %path.display(), "Wrote state snapshot");
        Ok(())
    }
}

impl StateStore for FsStateStore {
    fn load_approvals(&self) -> GovernanceResult<ApprovalMap> {
        Self::load_json(&self.approvals_path())
    }

    fn save_approvals(&self, approvals: &ApprovalMap) -> GovernanceResult<()> {
        Self::save_json(&self.approvals_path(), approvals)
    }

    fn load_domains(&self) -> GovernanceResult<DomainAllowlist> {
        Self::load_json(&self.domains_path())
    }

    fn save_domains(&self, domains: &DomainAllowlist) -> GovernanceResult<()> {
        Self::save_json(&self.domains_path(), domains)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory store for tests and ephemeral engines.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    approvals: Mutex<ApprovalMap>,
    domains: Mutex<DomainAllowlist>,
}

impl MemoryStateStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load_approvals(&self) -> GovernanceResult<ApprovalMap> {
        Ok(self
            .approvals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save_approvals(&self, approvals: &ApprovalMap) -> GovernanceResult<()> {
        *self
            .approvals
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = approvals.clone();
        Ok(())
    }

    fn load_domains(&self) -> GovernanceResult<DomainAllowlist> {
        Ok(self
            .domains
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save_domains(&self, domains: &DomainAllowlist) -> GovernanceResult<()> {
        *self.domains.lock().unwrap_or_else(PoisonError::into_inner) = domains.clone();
        Ok(())
    }
}
