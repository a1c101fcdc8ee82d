//! Request history, filtering, search, and saved views for the Brio
//! assistant.
//!
//! This crate provides:
//!
//! - **History**: the append-only, creation-ordered request store via
//!   [`history::History`].
//! - **Filtering and search**: AND-composed predicates and query narrowing
//!   via [`filter::Filter`] and [`filter::filter_and_search`].
//! - **Saved views**: named filter snapshots persisted through the
//!   [`views::KeyValue`] storage contract via [`views::SavedViews`].

pub mod error;
pub mod filter;
pub mod history;
pub mod views;

pub use error::{HistoryError, Result};
pub use filter::{Filter, filter_and_search};
pub use history::History;
pub use views::{KeyValue, MemoryKeyValue, SavedView, SavedViews};
