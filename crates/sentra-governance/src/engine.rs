//! The authorization engine — stateful decision core for one workspace.
//!
//! # Decision Order
//!
//! [`AuthorizationEngine::check`] applies these rules, first match wins:
//!
//! 1. `sandbox_permissions = "require_escalated"` -> pending approval,
//!    unconditionally (bypasses quota and domain checks); any other
//!    non-empty, non-`"use_default"` value -> rejected outright
//! 2. Tool at its usage ceiling -> `QuotaExceeded`
//! 3. Input carries a parseable URL: hostname on the allowlist -> allowed;
//!    otherwise -> pending approval
//! 4. Tool on the auto-allow list -> allowed
//! 5. Tool on the require-approval list -> pending approval
//! 6. Otherwise -> allowed (fail-open for unlisted tools)
//!
//! Quota is debited on every allow path and never on a pending or rejected
//! path. Every mutation persists the affected snapshot before the call
//! returns, inside the engine's single critical section, so a decision that
//! has been returned is also durable.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sentra_config::GovernanceSection;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::approval::{Approval, ApprovalId, ApprovalStatus};
use crate::domains::DomainAllowlist;
use crate::error::{GovernanceError, GovernanceResult};
use crate::payload::{self, SandboxPermissions};
use crate::policy::canonical_tool_name;
use crate::quota::UsageTracker;
use crate::store::{ApprovalMap, FsStateStore, MemoryStateStore, StateStore};

/// All mutable engine state, guarded by one lock.
struct EngineState {
    approvals: ApprovalMap,
    domains: DomainAllowlist,
    usage: UsageTracker,
}

/// Per-workspace authorization engine.
///
/// Holds the approval map, the learned domain allowlist, and the usage
/// counters for exactly one workspace. Engines for different workspaces
/// share nothing. All decisions for a workspace are serialized through one
/// coarse lock; each decision is cheap (set lookups plus, on mutation, one
/// snapshot rewrite).
pub struct AuthorizationEngine {
    auto_allow: HashSet<String>,
    require_approval: HashSet<String>,
    store: Box<dyn StateStore>,
    state: Mutex<EngineState>,
}

impl AuthorizationEngine {
    /// Create an engine over an explicit storage backend, loading any state
    /// the backend already holds.
    ///
    /// # Errors
    ///
    /// Returns an error if existing snapshots cannot be read or parsed.
    pub fn new(config: &GovernanceSection, store: Box<dyn StateStore>) -> GovernanceResult<Self> {
        let approvals = store.load_approvals()?;
        let domains = store.load_domains()?;
        debug!(
            approvals = approvals.len(),
            domains = domains.len(),
            "Loaded governance state"
        );
        Ok(Self::assemble(config, store, approvals, domains))
    }

    /// Create an engine persisting into a workspace state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if existing snapshots cannot be read or parsed.
    pub fn open(config: &GovernanceSection, dir: impl Into<PathBuf>) -> GovernanceResult<Self> {
        Self::new(config, Box::new(FsStateStore::new(dir)))
    }

    /// Create an engine with no persistence (for tests and ephemeral use).
    #[must_use]
    pub fn in_memory(config: &GovernanceSection) -> Self {
        Self::assemble(
            config,
            Box::new(MemoryStateStore::new()),
            ApprovalMap::new(),
            DomainAllowlist::new(),
        )
    }

    fn assemble(
        config: &GovernanceSection,
        store: Box<dyn StateStore>,
        approvals: ApprovalMap,
        domains: DomainAllowlist,
    ) -> Self {
        let canonicalize =
            |names: &[String]| names.iter().map(|n| canonical_tool_name(n)).collect();

        Self {
            auto_allow: canonicalize(&config.auto_allow),
            require_approval: canonicalize(&config.require_approval),
            store,
            state: Mutex::new(EngineState {
                approvals,
                domains,
                usage: UsageTracker::new(config.daily_tool_limit),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| {
            warn!("engine state lock poisoned, recovering");
            e.into_inner()
        })
    }

    /// Decide whether a tool invocation may proceed.
    ///
    /// `Ok(())` means the call is allowed and one unit of quota has been
    /// debited. The decision is advisory: enforcing it against the sandboxed
    /// action is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// - [`GovernanceError::ApprovalRequired`] — a pending approval was
    ///   created and persisted; surface it to a human and call
    ///   [`resolve`](Self::resolve) with the verdict. This is the workflow
    ///   signal, not a failure.
    /// - [`GovernanceError::InvalidSandboxPermission`] — unsupported
    ///   `sandbox_permissions` value; nothing was recorded.
    /// - [`GovernanceError::QuotaExceeded`] — the tool is at its ceiling;
    ///   nothing was recorded.
    /// - [`GovernanceError::Persist`] / [`GovernanceError::Serialization`] —
    ///   the approval snapshot could not be written; state is unchanged.
    pub fn check(&self, tool_name: &str, input: Option<&Value>) -> GovernanceResult<()> {
        let mut state = self.lock_state();

        // 1. The explicit escalation flag wins over every other rule.
        match SandboxPermissions::from_input(input)? {
            SandboxPermissions::RequireEscalated => {
                let approval_id = self.create_approval(&mut state, tool_name, input)?;
                return Err(GovernanceError::ApprovalRequired { approval_id });
            },
            SandboxPermissions::UseDefault => {},
        }

        // 2. Quota gates every allow path below.
        state.usage.check(tool_name)?;

        // 3. URL-carrying inputs are gated on the learned domain allowlist.
        if let Some(hostname) = payload::url_hostname(input) {
            if state.domains.contains(&hostname) {
                state.usage.consume(tool_name)?;
                return Ok(());
            }
            let approval_id = self.create_approval(&mut state, tool_name, input)?;
            return Err(GovernanceError::ApprovalRequired { approval_id });
        }

        // 4./5. Operator-declared tool lists.
        let canonical = canonical_tool_name(tool_name);
        if self.auto_allow.contains(&canonical) {
            state.usage.consume(tool_name)?;
            return Ok(());
        }
        if self.require_approval.contains(&canonical) {
            let approval_id = self.create_approval(&mut state, tool_name, input)?;
            return Err(GovernanceError::ApprovalRequired { approval_id });
        }

        // 6. Unlisted tools are allowed.
        state.usage.consume(tool_name)?;
        Ok(())
    }

    /// Record a pending approval and persist the approval snapshot.
    ///
    /// On a persistence failure the in-memory record is rolled back so the
    /// engine never diverges from its snapshot.
    fn create_approval(
        &self,
        state: &mut EngineState,
        tool_name: &str,
        input: Option<&Value>,
    ) -> GovernanceResult<ApprovalId> {
        let raw_input = input.map(ToString::to_string).unwrap_or_default();
        let approval = Approval::new(tool_name, raw_input);
        let approval_id = approval.id;

        state.approvals.insert(approval_id, approval);
        if let Err(e) = self.store.save_approvals(&state.approvals) {
            state.approvals.remove(&approval_id);
            return Err(e);
        }

        info!(approval_id = %approval_id, tool = tool_name, "Created pending approval");
        Ok(approval_id)
    }

    /// Resolve a pending approval with a human verdict.
    ///
    /// Granting an approval whose original input carried a URL also adds
    /// that URL's hostname to the domain allowlist, so subsequent calls for
    /// the same host are allowed without a new approval.
    ///
    /// # Errors
    ///
    /// - [`GovernanceError::NotFound`] — no approval with this id.
    /// - [`GovernanceError::AlreadyResolved`] — the approval is terminal;
    ///   verdicts are applied exactly once.
    /// - [`GovernanceError::Persist`] / [`GovernanceError::Serialization`] —
    ///   a snapshot could not be written.
    pub fn resolve(&self, id: &ApprovalId, approve: bool) -> GovernanceResult<()> {
        let mut state = self.lock_state();
        let EngineState {
            approvals, domains, ..
        } = &mut *state;

        let approval = approvals
            .get_mut(id)
            .ok_or(GovernanceError::NotFound { approval_id: *id })?;
        if approval.status != ApprovalStatus::Pending {
            return Err(GovernanceError::AlreadyResolved {
                approval_id: *id,
                status: approval.status,
            });
        }

        if approve {
            approval.status = ApprovalStatus::Granted;
            if let Some(hostname) = payload::url_hostname_from_raw(&approval.input) {
                domains.insert(&hostname);
                self.store.save_domains(domains)?;
                debug!(hostname = %hostname, "Learned allowed domain");
            }
        } else {
            approval.status = ApprovalStatus::Denied;
        }

        self.store.save_approvals(approvals)?;
        info!(approval_id = %id, granted = approve, "Resolved approval");
        Ok(())
    }

    /// Check whether an approval has been granted.
    ///
    /// Pure read: `false` for unknown, pending, and denied identifiers.
    #[must_use]
    pub fn is_granted(&self, id: &ApprovalId) -> bool {
        self.lock_state()
            .approvals
            .get(id)
            .is_some_and(|a| a.status == ApprovalStatus::Granted)
    }

    /// Explicitly debit one unit of quota from a tool.
    ///
    /// For callers retrying an action outside the [`check`](Self::check)
    /// flow — typically after a pending approval was granted.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::QuotaExceeded`] when the tool is already
    /// at its ceiling.
    pub fn consume_quota(&self, tool_name: &str) -> GovernanceResult<()> {
        self.lock_state().usage.consume(tool_name)
    }

    /// List approvals whose status is in the given set.
    ///
    /// An empty set means "all". Results are ordered by creation time, most
    /// recent first.
    #[must_use]
    pub fn list_approvals(&self, statuses: &[ApprovalStatus]) -> Vec<Approval> {
        let state = self.lock_state();
        let mut approvals: Vec<Approval> = state
            .approvals
            .values()
            .filter(|a| statuses.is_empty() || statuses.contains(&a.status))
            .cloned()
            .collect();
        approvals.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        approvals
    }

    /// Number of approvals still awaiting a verdict.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock_state()
            .approvals
            .values()
            .filter(|a| a.is_pending())
            .count()
    }

    /// The hostnames currently on the domain allowlist, sorted.
    #[must_use]
    pub fn allowed_domains(&self) -> Vec<String> {
        self.lock_state()
            .domains
            .hostnames()
            .map(str::to_owned)
            .collect()
    }

    /// How many units of quota a tool has consumed.
    #[must_use]
    pub fn quota_used(&self, tool_name: &str) -> u32 {
        self.lock_state().usage.used(tool_name)
    }
}

impl std::fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEngine")
            .field("auto_allow", &self.auto_allow.len())
            .field("require_approval", &self.require_approval.len())
            .finish_non_exhaustive()
    }
}
