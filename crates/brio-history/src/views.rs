//! Saved views — named filter snapshots persisted through a key-value
//! contract.
//!
//! The core makes no assumption about the backing medium: hosts hand in any
//! [`KeyValue`] implementation (browser storage bridge, SQLite table, plain
//! file) and saved views are written through as a single JSON document.
//! [`MemoryKeyValue`] is provided for tests and ephemeral hosting.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::filter::Filter;

/// Storage key under which all saved views live.
const STORAGE_KEY: &str = "brio.saved_views";

// ---------------------------------------------------------------------------
// Storage contract
// ---------------------------------------------------------------------------

/// Opaque durable key-value surface consumed for saved-view persistence.
#[async_trait]
pub trait KeyValue: Send + Sync {
    /// Read a value, `None` when absent.
    async fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str);
}

/// In-memory [`KeyValue`] implementation.
#[derive(Default)]
pub struct MemoryKeyValue {
    inner: DashMap<String, String>,
}

impl MemoryKeyValue {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValue for MemoryKeyValue {
    async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|v| v.clone())
    }

    async fn set(&self, key: &str, value: &str) {
        self.inner.insert(key.to_owned(), value.to_owned());
    }
}

// ---------------------------------------------------------------------------
// Saved views
// ---------------------------------------------------------------------------

/// A named, reusable snapshot of a filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    /// Stable identifier.
    pub id: Uuid,
    /// User-chosen name.
    pub name: String,
    /// The filter exactly as it was active at save time.
    pub filter: Filter,
    /// Whether the view is pinned in the UI.
    pub pinned: bool,
}

/// Saved-view collection with write-through persistence.
pub struct SavedViews {
    store: Arc<dyn KeyValue>,
    views: RwLock<Vec<SavedView>>,
}

impl SavedViews {
    /// Load the collection from storage.
    ///
    /// An absent key yields an empty collection; a corrupt document is
    /// warn-logged and discarded rather than failing startup.
    pub async fn load(store: Arc<dyn KeyValue>) -> Self {
        let views = match store.get(STORAGE_KEY).await {
            Some(raw) => match serde_json::from_str::<Vec<SavedView>>(&raw) {
                Ok(views) => views,
                Err(e) => {
                    warn!(error = %e, "stored saved views unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!(count = views.len(), "saved views loaded");
        Self {
            store,
            views: RwLock::new(views),
        }
    }

    /// Save the given filter under a new named view and persist.
    pub async fn save(&self, name: impl Into<String>, filter: Filter, pinned: bool) -> Result<SavedView> {
        let view = SavedView {
            id: Uuid::now_v7(),
            name: name.into(),
            filter,
            pinned,
        };

        self.views
            .write()
            .expect("saved views lock poisoned")
            .push(view.clone());
        self.persist().await?;

        debug!(view_id = %view.id, name = %view.name, "view saved");
        Ok(view)
    }

    /// Look up a view by id.
    pub fn get(&self, id: Uuid) -> Option<SavedView> {
        self.views
            .read()
            .expect("saved views lock poisoned")
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    /// All views in save order.
    pub fn list(&self) -> Vec<SavedView> {
        self.views
            .read()
            .expect("saved views lock poisoned")
            .clone()
    }

    /// Delete a view by id and persist.  Returns `false` for unknown ids.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = {
            let mut views = self.views.write().expect("saved views lock poisoned");
            let before = views.len();
            views.retain(|v| v.id != id);
            views.len() != before
        };

        if removed {
            self.persist().await?;
            debug!(view_id = %id, "view deleted");
        } else {
            warn!(view_id = %id, "delete for unknown view ignored");
        }
        Ok(removed)
    }

    async fn persist(&self) -> Result<()> {
        let serialized = {
            let views = self.views.read().expect("saved views lock poisoned");
            serde_json::to_string(&*views)?
        };
        self.store.set(STORAGE_KEY, &serialized).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
