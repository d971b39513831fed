//! The in-memory catalog store and its network synchroniser.

pub mod store;
pub mod sync;

pub use store::CatalogStore;
pub use sync::{CatalogSync, SyncEvent};
