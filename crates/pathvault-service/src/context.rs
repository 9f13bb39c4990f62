//! Request context carrying the resolved tenant namespace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current request.
///
/// Built by the caller (transport layer or CLI) once the tenant has been
/// resolved, and passed into every service method so that each query and
/// mutation is scoped the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Tenant namespace. `None` for single-tenant deployments.
    pub namespace: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context scoped to the given namespace.
    pub fn new(namespace: Option<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.trim().is_empty()),
            request_time: Utc::now(),
        }
    }

    /// Creates an unscoped context.
    pub fn unscoped() -> Self {
        Self::new(None)
    }

    /// Creates a context from a request namespace, falling back to a default.
    pub fn resolve(requested: Option<String>, default: Option<&str>) -> Self {
        Self::new(requested.or_else(|| default.map(str::to_string)))
    }

    /// The namespace as a borrowed filter value.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::unscoped()
    }
}
