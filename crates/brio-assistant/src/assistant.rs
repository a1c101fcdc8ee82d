//! The assistant facade.
//!
//! [`Assistant`] wires the classifier, the autonomy gate, the request
//! lifecycle, and the history layer into the surface the embedding UI talks
//! to.  It is an explicitly constructed component — create one at
//! application start and pass it by reference (it is `Arc`-backed and
//! cheaply cloneable); there is no global singleton.
//!
//! Capability execution is asynchronous: an authorized request is moved to
//! `running` and the capability is invoked on a spawned task; its outcome
//! re-enters through [`Assistant::apply_outcome`], which is also the entry
//! point for collaborators that drive completion from outside.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use brio_history::{Filter, History, KeyValue, SavedView, SavedViews, filter_and_search};
use brio_intent::{ClassificationResult, Classifier, EntityKind, EntityValue};
use brio_runtime::{
    AutonomyMode, CapabilityOutcome, CapabilityRegistry, FollowUpAction, Request, RequestContext,
    RequestRole, RequestStatus, UiEvent, UiEventBus, decide,
};

use crate::error::Result;

/// The assistant core shared across the embedding application.
#[derive(Clone)]
pub struct Assistant {
    inner: Arc<AssistantInner>,
}

struct AssistantInner {
    classifier: Classifier,
    capabilities: CapabilityRegistry,
    history: History,
    views: SavedViews,
    mode: RwLock<AutonomyMode>,
    active_filter: RwLock<Filter>,
    events: UiEventBus,
}

impl Assistant {
    /// Assemble the assistant.
    ///
    /// `store` backs saved-view persistence; views are loaded eagerly.  The
    /// initial autonomy mode is [`AutonomyMode::AskToAct`].
    pub async fn new(
        classifier: Classifier,
        capabilities: CapabilityRegistry,
        store: Arc<dyn KeyValue>,
    ) -> Self {
        let views = SavedViews::load(store).await;
        Self {
            inner: Arc::new(AssistantInner {
                classifier,
                capabilities,
                history: History::new(),
                views,
                mode: RwLock::new(AutonomyMode::AskToAct),
                active_filter: RwLock::new(Filter::default()),
                events: UiEventBus::default(),
            }),
        }
    }

    // -- Mode ----------------------------------------------------------------

    /// The current autonomy mode.
    pub fn mode(&self) -> AutonomyMode {
        *self.inner.mode.read().expect("mode lock poisoned")
    }

    /// Change the autonomy mode.  Affects future gating decisions only.
    pub fn set_mode(&self, mode: AutonomyMode) {
        info!(?mode, "autonomy mode changed");
        *self.inner.mode.write().expect("mode lock poisoned") = mode;
    }

    // -- Classification and submission ----------------------------------------

    /// Classify text without creating a request.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.inner.classifier.classify(text)
    }

    /// Append a runtime intent pattern to the classifier.
    pub fn add_pattern(&self, pattern: brio_intent::IntentPattern) {
        self.inner.classifier.add_pattern(pattern);
    }

    /// Submit user text: classify it, gate it, and track it in history.
    ///
    /// The returned snapshot reflects the request's first gated state —
    /// `draft` when blocked (or no capability is registered for the
    /// intent), `awaiting_confirm`, or `running` with the capability
    /// already dispatched.
    pub async fn submit(&self, text: &str) -> Result<Request> {
        let classification = self.inner.classifier.classify(text);
        let capability = self.inner.capabilities.get(&classification.intent);

        let project = classification
            .entities
            .get(&EntityKind::ProjectName)
            .and_then(EntityValue::as_text)
            .map(str::to_owned);

        let mut request = Request::new(RequestRole::User, text)
            .with_skill(capability.as_ref().map(|c| c.name().to_owned()))
            .with_project(project);

        let dangerous = capability.as_ref().is_some_and(|c| c.dangerous());
        let decision = decide(self.mode(), dangerous);

        debug!(
            request_id = %request.id,
            intent = %classification.intent,
            confidence = classification.confidence,
            ?decision,
            "request gated"
        );

        if decision.blocked {
            // Informational only: stays draft, with a hint the UI can offer.
            request.actions.push(FollowUpAction {
                label: "Esegui in modalità Act".into(),
                command: Some("set-mode act".into()),
            });
        } else if capability.is_none() {
            // Nothing to execute: without a collaborator the request must
            // not enter awaiting_confirm, where a confirm would move it to
            // running with no one to ever signal an outcome.
            debug!(
                request_id = %request.id,
                intent = %classification.intent,
                "no capability registered, request stays draft"
            );
        } else if decision.requires_confirmation {
            request.transition(RequestStatus::AwaitingConfirm)?;
        } else {
            request.transition(RequestStatus::Running)?;
        }

        self.inner.history.append(request.clone());

        if request.status != RequestStatus::Draft {
            self.emit_status(request.id, request.status);
        }
        if request.status == RequestStatus::Running {
            self.spawn_invoke(&request);
        }

        Ok(request)
    }

    /// Confirm an awaiting request, moving it to `running` and dispatching
    /// its capability.  Unknown ids and requests in any other state are
    /// warn-logged no-ops.
    pub fn confirm(&self, id: Uuid) {
        let mut started = None;
        self.inner.history.update(id, |request| {
            if request.status == RequestStatus::AwaitingConfirm
                && request.transition(RequestStatus::Running).is_ok()
            {
                started = Some(request.clone());
            }
        });

        let Some(request) = started else {
            warn!(request_id = %id, "confirm ignored: not awaiting confirmation");
            return;
        };

        self.emit_status(id, RequestStatus::Running);
        self.spawn_invoke(&request);
    }

    /// Cancel a request.
    ///
    /// Draft and awaiting requests are skipped immediately.  For a running
    /// request cancellation is only a best-effort signal to the capability
    /// collaborator: no local transition happens until the collaborator
    /// reports the actual outcome.  Unknown ids are no-ops.
    pub fn cancel(&self, id: Uuid) {
        let mut skipped = false;
        let mut running = false;
        let found = self.inner.history.update(id, |request| match request.status {
            RequestStatus::Draft | RequestStatus::AwaitingConfirm => {
                skipped = request.transition(RequestStatus::Skipped).is_ok();
            }
            RequestStatus::Running => running = true,
            _ => {}
        });

        if skipped {
            self.emit_status(id, RequestStatus::Skipped);
        } else if running {
            warn!(request_id = %id, "cancel of running request deferred to capability");
        } else if found {
            warn!(request_id = %id, "cancel ignored for terminal request");
        }
    }

    /// Apply a capability completion/failure signal.
    ///
    /// `running -> done` on success with the result summary and artifacts
    /// attached, `running -> error` on failure with the error payload.
    /// Signals for unknown ids, or for requests no longer running, are
    /// silent no-ops — the UI may already have discarded the entry.
    pub fn apply_outcome(&self, id: Uuid, outcome: CapabilityOutcome) {
        let mut new_status = None;
        self.inner.history.update(id, |request| {
            if request.status != RequestStatus::Running {
                debug!(request_id = %id, status = ?request.status, "outcome ignored");
                return;
            }

            let applied = if outcome.success {
                request.complete(outcome.result, outcome.artifacts)
            } else {
                request.fail(outcome.error.unwrap_or_else(|| "capability failed".to_owned()))
            };

            if applied.is_ok() {
                new_status = Some(request.status);
            }
        });

        if let Some(status) = new_status {
            self.emit_status(id, status);
        }
    }

    // -- History, filtering, views --------------------------------------------

    /// The shared request history.
    pub fn history(&self) -> History {
        self.inner.history.clone()
    }

    /// Overlay the set fields of `partial` onto the active filter.
    pub fn apply_filter(&self, partial: Filter) {
        self.inner
            .active_filter
            .write()
            .expect("filter lock poisoned")
            .apply(partial);
    }

    /// Reset the active filter.
    pub fn clear_filter(&self) {
        *self
            .inner
            .active_filter
            .write()
            .expect("filter lock poisoned") = Filter::default();
    }

    /// A copy of the active filter.
    pub fn active_filter(&self) -> Filter {
        self.inner
            .active_filter
            .read()
            .expect("filter lock poisoned")
            .clone()
    }

    /// Search history: the active filter first, then the query narrows the
    /// result.  Order is insertion order.
    pub fn search(&self, query: &str) -> Vec<Request> {
        let snapshot = self.inner.history.snapshot();
        filter_and_search(&snapshot, &self.active_filter(), query)
    }

    /// Save the active filter as a named view.
    pub async fn save_view(&self, name: impl Into<String>, pinned: bool) -> Result<SavedView> {
        Ok(self
            .inner
            .views
            .save(name, self.active_filter(), pinned)
            .await?)
    }

    /// Replace the active filter with a stored view's snapshot.
    ///
    /// Returns `false` (warn-logged) for unknown ids.
    pub fn load_view(&self, id: Uuid) -> bool {
        match self.inner.views.get(id) {
            Some(view) => {
                *self
                    .inner
                    .active_filter
                    .write()
                    .expect("filter lock poisoned") = view.filter;
                true
            }
            None => {
                warn!(view_id = %id, "load of unknown view ignored");
                false
            }
        }
    }

    /// Delete a saved view.
    pub async fn delete_view(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.views.delete(id).await?)
    }

    /// All saved views in save order.
    pub fn views(&self) -> Vec<SavedView> {
        self.inner.views.list()
    }

    // -- UI events ------------------------------------------------------------

    /// Subscribe to the abstract UI event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<UiEvent>> {
        self.inner.events.subscribe()
    }

    /// Ask the host UI to open the assistant panel.
    pub fn request_open(&self) {
        self.inner.events.publish(UiEvent::RequestOpen);
    }

    /// Ask the host UI to close the assistant panel.
    pub fn request_close(&self) {
        self.inner.events.publish(UiEvent::RequestClose);
    }

    /// Ask the host UI to focus the history search input.
    pub fn request_focus_search(&self) {
        self.inner.events.publish(UiEvent::RequestFocusSearch);
    }

    // -- Internals ------------------------------------------------------------

    fn emit_status(&self, request_id: Uuid, status: RequestStatus) {
        self.inner.events.publish(UiEvent::RequestStatusChanged { request_id, status });
    }

    /// Dispatch the request's capability on a spawned task; the outcome is
    /// applied back through [`Assistant::apply_outcome`].
    ///
    /// Entities are extracted against the routed capability's declared
    /// kinds at dispatch time, so patterns registered after submission
    /// cannot change what an already-routed capability receives.
    fn spawn_invoke(&self, request: &Request) {
        let Some(name) = request.skill.clone() else {
            warn!(request_id = %request.id, "running request has no routed capability");
            self.apply_outcome(
                request.id,
                CapabilityOutcome::err("no capability routed for this request"),
            );
            return;
        };
        let Some(capability) = self.inner.capabilities.get(&name) else {
            warn!(request_id = %request.id, capability = %name, "capability vanished before dispatch");
            self.apply_outcome(
                request.id,
                CapabilityOutcome::err(format!("capability `{name}` is not registered")),
            );
            return;
        };

        let entities = self
            .inner
            .classifier
            .extract(capability.expected_entities(), &request.content);
        let ctx = RequestContext {
            request_id: request.id,
            project: request.project.clone(),
            content: request.content.clone(),
        };
        let assistant = self.clone();

        tokio::spawn(async move {
            let outcome = capability.invoke(&entities, &ctx).await;
            assistant.apply_outcome(ctx.request_id, outcome);
        });
    }
}
