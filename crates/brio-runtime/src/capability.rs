//! Capability contract and registry.
//!
//! Capabilities are the external collaborators that actually do the work
//! (financial calculations, document workflows, messaging).  The core only
//! knows their metadata and the async [`Capability::invoke`] entry point;
//! outcomes come back as data and are applied to the request lifecycle.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use brio_intent::{EntityKind, EntityValue};

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Context handed to a capability alongside the extracted entities.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The request being executed.
    pub request_id: Uuid,
    /// Project association, if one was extracted.
    pub project: Option<String>,
    /// The raw submitted text.
    pub content: String,
}

/// Outcome reported by a capability invocation.
///
/// Missing mandatory entities are the capability's problem: it validates its
/// own parameters and reports failure through this type rather than
/// panicking or throwing.
#[derive(Debug, Clone)]
pub struct CapabilityOutcome {
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Result summary for the UI.
    pub result: Option<serde_json::Value>,
    /// Artifact references produced by the capability.
    pub artifacts: Vec<String>,
    /// Error payload when `success` is false.
    pub error: Option<String>,
}

impl CapabilityOutcome {
    /// A successful outcome with a result summary.
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            artifacts: Vec::new(),
            error: None,
        }
    }

    /// A failed outcome with an error payload.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            artifacts: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Attach artifact references.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }
}

/// An invocable capability.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Unique capability name; matched against classified intent names.
    fn name(&self) -> &str;

    /// Whether this capability always requires confirmation, even in the
    /// most permissive autonomy mode.
    fn dangerous(&self) -> bool {
        false
    }

    /// Entity kinds this capability consumes.
    fn expected_entities(&self) -> &[EntityKind] {
        &[]
    }

    /// Execute the capability.  Called at most once per authorized request.
    async fn invoke(
        &self,
        entities: &HashMap<EntityKind, EntityValue>,
        ctx: &RequestContext,
    ) -> CapabilityOutcome;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Concurrent capability registry keyed by name.
///
/// Cheaply cloneable (`Arc`-backed) and `Send + Sync`.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    inner: Arc<DashMap<String, Arc<dyn Capability>>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability.  An existing capability with the same name is
    /// replaced.
    pub fn register(&self, capability: Arc<dyn Capability>) {
        let name = capability.name().to_owned();
        tracing::info!(
            capability = %name,
            dangerous = capability.dangerous(),
            "capability registered"
        );
        self.inner.insert(name, capability);
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.inner.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a capability with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Names of all registered capabilities.
    pub fn names(&self) -> Vec<String> {
        self.inner.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of registered capabilities.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Capability for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(
            &self,
            _entities: &HashMap<EntityKind, EntityValue>,
            ctx: &RequestContext,
        ) -> CapabilityOutcome {
            CapabilityOutcome::ok(serde_json::json!({ "echo": ctx.content }))
        }
    }

    #[test]
    fn register_and_lookup() {
        let registry = CapabilityRegistry::new();
        registry.register(Arc::new(Echo));
        assert!(registry.contains("echo"));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_replaces_same_name() {
        let registry = CapabilityRegistry::new();
        registry.register(Arc::new(Echo));
        registry.register(Arc::new(Echo));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn invoke_reports_outcome() {
        let registry = CapabilityRegistry::new();
        registry.register(Arc::new(Echo));

        let cap = registry.get("echo").unwrap();
        let ctx = RequestContext {
            request_id: Uuid::now_v7(),
            project: None,
            content: "hello".into(),
        };
        let outcome = cap.invoke(&HashMap::new(), &ctx).await;
        assert!(outcome.success);
        assert_eq!(outcome.result.unwrap()["echo"], "hello");
    }

    #[test]
    fn default_metadata() {
        let echo = Echo;
        assert!(!echo.dangerous());
        assert!(echo.expected_entities().is_empty());
    }
}
