//! Directory scaffolding for the Sentra home and per-workspace state.
//!
//! All governance state lives under a single home directory, keyed by
//! workspace so that two workspaces never share files:
//!
//! ```text
//! ~/.sentra/                      (SentraHome)
//! ├── workspaces/
//! │   └── <workspace-id>/           (per-workspace governance state)
//! │       ├── approvals.json          (approval snapshot)
//! │       ├── domains.json            (domain allowlist snapshot)
//! │       └── audit.log               (append-only audit trail)
//! └── config.toml                   (runtime config)
//! ```

use std::io;
use std::path::{Path, PathBuf};

use crate::types::WorkspaceId;

/// Global Sentra home directory (`~/.sentra/` or `$SENTRA_HOME`).
#[derive(Debug, Clone)]
pub struct SentraHome {
    root: PathBuf,
}

impl SentraHome {
    /// Resolve the home directory.
    ///
    /// Checks `$SENTRA_HOME` first, then falls back to `$HOME/.sentra/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `$SENTRA_HOME` is set but not absolute, or if
    /// neither `$SENTRA_HOME` nor `$HOME` is set.
    pub fn resolve() -> io::Result<Self> {
        let root = if let Ok(custom) = std::env::var("SENTRA_HOME") {
            let p = PathBuf::from(&custom);
            if !p.is_absolute() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "SENTRA_HOME must be an absolute path",
                ));
            }
            p
        } else {
            let home = std::env::var("HOME").map_err(|_| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "neither SENTRA_HOME nor HOME environment variable is set",
                )
            })?;
            PathBuf::from(home).join(".sentra")
        };

        Ok(Self { root })
    }

    /// Create a home rooted at an explicit path, bypassing environment lookup.
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The home root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the runtime config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Directory holding all per-workspace state.
    #[must_use]
    pub fn workspaces_dir(&self) -> PathBuf {
        self.root.join("workspaces")
    }

    /// State directory for a single workspace.
    #[must_use]
    pub fn workspace_dir(&self, workspace_id: &WorkspaceId) -> PathBuf {
        self.workspaces_dir().join(workspace_id.as_str())
    }

    /// Create the state directory for a workspace if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_workspace_dir(&self, workspace_id: &WorkspaceId) -> io::Result<PathBuf> {
        let dir = self.workspace_dir(workspace_id);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Resolve the governance state directory for a workspace.
///
/// When `root_override` is given the workspace directory is resolved under
/// it instead of the environment-derived home. The directory is created if
/// missing, so callers can open engines and audit logs against it directly.
///
/// # Errors
///
/// Returns an error if the home cannot be resolved or the directory cannot
/// be created.
pub fn resolve_workspace_dir(
    workspace_id: &WorkspaceId,
    root_override: Option<&Path>,
) -> io::Result<PathBuf> {
    let home = match root_override {
        Some(root) => SentraHome::at(root),
        None => SentraHome::resolve()?,
    };
    home.ensure_workspace_dir(workspace_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_dir_layout() {
        let home = SentraHome::at("/srv/sentra");
        let ws = WorkspaceId::new("ws-1");
        assert_eq!(
            home.workspace_dir(&ws),
            PathBuf::from("/srv/sentra/workspaces/ws-1")
        );
        assert_eq!(home.config_file(), PathBuf::from("/srv/sentra/config.toml"));
    }

    #[test]
    fn test_ensure_workspace_dir_creates() {
        let tmp = tempfile::tempdir().unwrap();
        let home = SentraHome::at(tmp.path());
        let ws = WorkspaceId::new("ws-create");

        let dir = home.ensure_workspace_dir(&ws).unwrap();
        assert!(dir.is_dir());

        // Idempotent.
        let again = home.ensure_workspace_dir(&ws).unwrap();
        assert_eq!(dir, again);
    }

    #[test]
    fn test_resolve_with_root_override() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = WorkspaceId::new("ws-override");

        let dir = resolve_workspace_dir(&ws, Some(tmp.path())).unwrap();
        assert!(dir.starts_with(tmp.path()));
        assert!(dir.ends_with("workspaces/ws-override"));
        assert!(dir.is_dir());
    }
}
