//! Trace-context accessors.
//!
//! Governed actions are stamped with a correlation identifier so that an
//! audit entry can be tied back to the request that caused it. The runtime
//! owns trace propagation; these types are the narrow interface the
//! governance components consume.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Correlation identifier for a single request through the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(pub String);

impl TraceId {
    /// Create a trace ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accessor for the ambient trace context.
///
/// Implementations are provided by the hosting runtime (which knows how a
/// request's trace ID is propagated). Components that stamp records with a
/// trace ID hold an `Arc<dyn TraceContext>` injected at construction.
pub trait TraceContext: Send + Sync {
    /// The trace ID of the request currently being served, if any.
    fn current_trace_id(&self) -> Option<TraceId>;
}

/// A trace context that never yields an ID.
///
/// Useful for tests and for embedding contexts with no tracing story.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceContext for NoTrace {
    fn current_trace_id(&self) -> Option<TraceId> {
        None
    }
}

/// A trace context pinned to a fixed ID.
#[derive(Debug, Clone)]
pub struct StaticTrace(TraceId);

impl StaticTrace {
    /// Create a trace context that always yields the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(TraceId::new(id))
    }
}

impl TraceContext for StaticTrace {
    fn current_trace_id(&self) -> Option<TraceId> {
        Some(self.0.clone())
    }
}
