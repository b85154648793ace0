#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Configuration for the Sentra governance subsystem.
//!
//! A single [`Config`] type covers everything the governance components
//! consume: the engine's allow/approval lists and quota, the audit policy,
//! and the static per-workspace tool policy.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sentra_config::Config;
//!
//! let config = Config::load_or_default(std::path::Path::new(
//!     "/home/user/.sentra/config.toml",
//! )).unwrap();
//! println!("daily tool limit: {}", config.governance.daily_tool_limit);
//! ```
//!
//! # Design
//!
//! This crate has no dependencies on other internal sentra crates. It only
//! depends on `serde`, `toml`, `thiserror`, and `tracing`. Conversion from
//! config types to domain types happens at the integration boundary.

/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;

// Re-export primary types at the crate root.
pub use error::{ConfigError, ConfigResult};
pub use types::{
    ApprovalRule, AuditSection, Config, GovernanceSection, PolicySection, ResourceLimits,
};

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Load configuration from a TOML file, or defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file exists but cannot be read or
    /// parsed. A missing file is not an error.
    pub fn load_or_default(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file_or_default(path)
    }
}
