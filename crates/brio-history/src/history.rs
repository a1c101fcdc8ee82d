//! Append-only request history.
//!
//! History is a creation-ordered sequence of [`Request`]s.  Appends go to
//! the end, updates happen in place by id and never reorder, and nothing is
//! ever deleted — filters hide, they do not remove.
//!
//! Reads are snapshots taken under the lock, so a renderer sees either the
//! pre- or post-mutation state of an entry, never a partial update.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};
use uuid::Uuid;

use brio_runtime::Request;

/// Shared, creation-ordered request history.
///
/// Cheaply cloneable (`Arc`-backed) and `Send + Sync`.
#[derive(Clone, Default)]
pub struct History {
    inner: Arc<RwLock<Vec<Request>>>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request to the end of the sequence.
    pub fn append(&self, request: Request) {
        debug!(request_id = %request.id, "request appended to history");
        self.inner
            .write()
            .expect("history lock poisoned")
            .push(request);
    }

    /// Mutate the request with the given id in place.
    ///
    /// Returns `true` if the request was found.  An unknown id is a
    /// warn-logged no-op: the UI may already have discarded the entry a
    /// late completion signal refers to.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> bool
    where
        F: FnOnce(&mut Request),
    {
        let mut entries = self.inner.write().expect("history lock poisoned");
        match entries.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                mutate(request);
                true
            }
            None => {
                warn!(request_id = %id, "update for unknown request ignored");
                false
            }
        }
    }

    /// A snapshot of the request with the given id.
    pub fn get(&self, id: Uuid) -> Option<Request> {
        self.inner
            .read()
            .expect("history lock poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// A snapshot of the whole history in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Request> {
        self.inner.read().expect("history lock poisoned").clone()
    }

    /// Number of tracked requests.
    pub fn len(&self) -> usize {
        self.inner.read().expect("history lock poisoned").len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use brio_runtime::{RequestRole, RequestStatus};

    fn request(content: &str) -> Request {
        Request::new(RequestRole::User, content)
    }

    #[test]
    fn append_preserves_insertion_order() {
        let history = History::new();
        history.append(request("first"));
        history.append(request("second"));
        history.append(request("third"));

        let contents: Vec<_> = history.snapshot().into_iter().map(|r| r.content).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn update_mutates_in_place_without_reordering() {
        let history = History::new();
        let a = request("a");
        let b = request("b");
        let id_b = b.id;
        history.append(a);
        history.append(b);

        let found = history.update(id_b, |r| {
            r.transition(RequestStatus::Running).unwrap();
        });
        assert!(found);

        let snapshot = history.snapshot();
        assert_eq!(snapshot[1].id, id_b);
        assert_eq!(snapshot[1].status, RequestStatus::Running);
        assert_eq!(snapshot[0].status, RequestStatus::Draft);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let history = History::new();
        history.append(request("only"));
        assert!(!history.update(Uuid::now_v7(), |r| {
            r.content = "should not happen".into();
        }));
        assert_eq!(history.snapshot()[0].content, "only");
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let history = History::new();
        history.append(request("kept"));

        let mut snapshot = history.snapshot();
        snapshot.clear();

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn get_returns_entry_by_id() {
        let history = History::new();
        let r = request("findme");
        let id = r.id;
        history.append(r);

        assert_eq!(history.get(id).unwrap().content, "findme");
        assert!(history.get(Uuid::now_v7()).is_none());
    }
}
