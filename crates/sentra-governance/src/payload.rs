//! Conventions for reading governed fields out of opaque tool inputs.
//!
//! Tool inputs are arbitrary JSON owned by the tool itself. The engine only
//! interprets two well-known fields: `sandbox_permissions` (an explicit
//! escalation flag) and `url` (gated on the domain allowlist).

use serde_json::Value;
use url::Url;

use crate::error::{GovernanceError, GovernanceResult};

/// Field carrying the explicit sandbox escalation flag.
pub const SANDBOX_PERMISSIONS_FIELD: &str = "sandbox_permissions";

/// Field carrying the network target of a URL-fetching tool.
pub const URL_FIELD: &str = "url";

/// Recognized values of the `sandbox_permissions` request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxPermissions {
    /// No escalation requested; the normal decision ladder applies. This is
    /// also what an absent or empty field means.
    UseDefault,
    /// The request explicitly asks for escalated permissions and must go
    /// through the approval workflow regardless of any other rule.
    RequireEscalated,
}

impl SandboxPermissions {
    /// Read the sandbox-permission flag out of a tool input.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidSandboxPermission`] when the field
    /// is present but carries anything other than the supported values.
    pub fn from_input(input: Option<&Value>) -> GovernanceResult<Self> {
        let Some(field) = input.and_then(|v| v.get(SANDBOX_PERMISSIONS_FIELD)) else {
            return Ok(Self::UseDefault);
        };

        match field.as_str() {
            Some("" | "use_default") => Ok(Self::UseDefault),
            Some("require_escalated") => Ok(Self::RequireEscalated),
            Some(other) => Err(GovernanceError::InvalidSandboxPermission {
                value: other.to_owned(),
            }),
            None => Err(GovernanceError::InvalidSandboxPermission {
                value: field.to_string(),
            }),
        }
    }
}

/// Extract the lower-cased hostname of a tool input's `url` field.
///
/// Returns `None` when the input has no `url` field, the value is not a
/// string, or the URL has no parseable hostname — those requests are not
/// subject to the domain allowlist.
#[must_use]
pub fn url_hostname(input: Option<&Value>) -> Option<String> {
    let raw = input?.get(URL_FIELD)?.as_str()?;
    let parsed = Url::parse(raw).ok()?;
    parsed.host_str().map(str::to_ascii_lowercase)
}

/// Extract the lower-cased hostname from a raw input payload stored as text.
///
/// Used when resolving an approval: the original request payload is kept on
/// the approval record as a string.
#[must_use]
pub(crate) fn url_hostname_from_raw(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    url_hostname(Some(&value))
}
