//! Filtering and search over the request history.
//!
//! A [`Filter`] is an AND-composition of optional predicates.  Search is a
//! second stage that narrows the already-filtered result set by a
//! case-insensitive substring query; it never operates independently of the
//! active filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brio_runtime::{Request, RequestStatus};

/// AND-composed filter over history entries.  `None` fields do not
/// constrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Project id equality.
    pub project: Option<String>,
    /// Skill id equality.
    pub skill: Option<String>,
    /// Status equality.
    pub status: Option<RequestStatus>,
    /// Inclusive lower creation-timestamp bound.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper creation-timestamp bound.
    pub to: Option<DateTime<Utc>>,
    /// `Some(true)` keeps entries with at least one follow-up action,
    /// `Some(false)` keeps entries with none.
    pub has_actions: Option<bool>,
}

impl Filter {
    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the set fields of `partial` onto this filter.
    pub fn apply(&mut self, partial: Filter) {
        if partial.project.is_some() {
            self.project = partial.project;
        }
        if partial.skill.is_some() {
            self.skill = partial.skill;
        }
        if partial.status.is_some() {
            self.status = partial.status;
        }
        if partial.from.is_some() {
            self.from = partial.from;
        }
        if partial.to.is_some() {
            self.to = partial.to;
        }
        if partial.has_actions.is_some() {
            self.has_actions = partial.has_actions;
        }
    }

    /// Whether a request passes every set predicate.
    pub fn matches(&self, request: &Request) -> bool {
        if let Some(project) = &self.project
            && request.project.as_deref() != Some(project.as_str())
        {
            return false;
        }
        if let Some(skill) = &self.skill
            && request.skill.as_deref() != Some(skill.as_str())
        {
            return false;
        }
        if let Some(status) = self.status
            && request.status != status
        {
            return false;
        }
        if let Some(from) = self.from
            && request.created_at < from
        {
            return false;
        }
        if let Some(to) = self.to
            && request.created_at > to
        {
            return false;
        }
        if let Some(has_actions) = self.has_actions
            && !request.actions.is_empty() != has_actions
        {
            return false;
        }
        true
    }
}

/// Filter a history snapshot, then narrow it by a search query.
///
/// The query matches case-insensitively against content, project name, and
/// skill id.  An empty query keeps the whole filtered set.  Order is the
/// snapshot's insertion order throughout.
pub fn filter_and_search(snapshot: &[Request], filter: &Filter, query: &str) -> Vec<Request> {
    let needle = query.to_lowercase();

    snapshot
        .iter()
        .filter(|r| filter.matches(r))
        .filter(|r| {
            needle.is_empty()
                || r.content.to_lowercase().contains(&needle)
                || r.project
                    .as_deref()
                    .is_some_and(|p| p.to_lowercase().contains(&needle))
                || r.skill
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use brio_runtime::{FollowUpAction, RequestRole};

    fn request(content: &str, skill: Option<&str>, project: Option<&str>) -> Request {
        Request::new(RequestRole::User, content)
            .with_skill(skill.map(str::to_owned))
            .with_project(project.map(str::to_owned))
    }

    fn sample() -> Vec<Request> {
        let mut done = request("business plan Borgo Verde", Some("compute-plan"), Some("Borgo Verde"));
        done.transition(RequestStatus::Running).unwrap();
        done.complete(None, vec![]).unwrap();

        let mut with_actions = request("analizza immobile", Some("analyze-entity"), None);
        with_actions.actions.push(FollowUpAction {
            label: "Apri report".into(),
            command: None,
        });

        vec![
            request("ciao", None, None),
            done,
            with_actions,
            request("elenca progetti", Some("list-entities"), Some("Corte Alta")),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        let out = filter_and_search(&sample(), &filter, "");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn status_filter_keeps_done_subset_in_order() {
        let filter = Filter {
            status: Some(RequestStatus::Done),
            ..Default::default()
        };
        let out = filter_and_search(&sample(), &filter, "");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].content, "business plan Borgo Verde");
    }

    #[test]
    fn predicates_compose_with_and_semantics() {
        let filter = Filter {
            skill: Some("compute-plan".into()),
            status: Some(RequestStatus::Draft),
            ..Default::default()
        };
        // The compute-plan entry is Done, so both predicates together match
        // nothing.
        assert!(filter_and_search(&sample(), &filter, "").is_empty());
    }

    #[test]
    fn has_actions_flag_both_directions() {
        let entries = sample();

        let with = Filter {
            has_actions: Some(true),
            ..Default::default()
        };
        let out = filter_and_search(&entries, &with, "");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].content, "analizza immobile");

        let without = Filter {
            has_actions: Some(false),
            ..Default::default()
        };
        assert_eq!(filter_and_search(&entries, &without, "").len(), 3);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let entries = sample();
        let created = entries[0].created_at;
        let filter = Filter {
            from: Some(created),
            to: Some(created),
            ..Default::default()
        };
        let out = filter_and_search(&entries[..1], &filter, "");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn search_narrows_filtered_results() {
        let filter = Filter {
            status: Some(RequestStatus::Draft),
            ..Default::default()
        };
        // "progetti" appears in a draft entry's content.
        let out = filter_and_search(&sample(), &filter, "PROGETTI");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].content, "elenca progetti");

        // "borgo" appears only in a Done entry, which the filter excludes.
        assert!(filter_and_search(&sample(), &filter, "borgo").is_empty());
    }

    #[test]
    fn search_matches_project_and_skill() {
        let filter = Filter::default();
        let by_project = filter_and_search(&sample(), &filter, "corte alta");
        assert_eq!(by_project.len(), 1);

        let by_skill = filter_and_search(&sample(), &filter, "analyze-entity");
        assert_eq!(by_skill.len(), 1);
    }

    #[test]
    fn apply_overlays_only_set_fields() {
        let mut active = Filter {
            skill: Some("compute-plan".into()),
            ..Default::default()
        };
        active.apply(Filter {
            status: Some(RequestStatus::Done),
            ..Default::default()
        });
        assert_eq!(active.skill.as_deref(), Some("compute-plan"));
        assert_eq!(active.status, Some(RequestStatus::Done));
    }
}
