#![warn(clippy::all, missing_docs)]

//! Core engine for the Gamedex catalog site.
//!
//! This crate hosts the data models, configuration handling, catalog
//! loading/synchronisation, the query and pagination engines, and the
//! community persistence layers used by the web frontend and any future
//! frontends. All rendering and event wiring lives outside this crate.

pub mod catalog;
pub mod community;
pub mod config;
pub mod models;
pub mod notify;
pub mod prefs;
pub mod query;
pub mod storage;

pub use catalog::{CatalogStore, CatalogSync, SyncEvent};
pub use community::{Community, CommunityError, RequestBoard};
pub use config::AppConfig;
pub use models::{Category, Comment, GameRecord, GameSubmission, RatingAggregate, RequestEntry};
pub use notify::{AttachedFile, SubmissionNotifier};
pub use prefs::{Prefs, ThemeMode};
pub use query::{
    filter_and_sort, paginate, BrowseSession, CatalogStats, FilterSpec, Page, SortKey,
};
pub use storage::JsonStore;
