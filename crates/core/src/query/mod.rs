//! Filtering, sorting and pagination over the in-memory catalog.

pub mod engine;
pub mod pages;

pub use engine::{
    catalog_stats, filter_and_sort, relevance_weight, top_by_downloads, top_by_rating,
    trending_score, CatalogStats, FilterSpec, SortKey,
};
pub use pages::{paginate, BrowseSession, Page, DEFAULT_PAGE_SIZE};
