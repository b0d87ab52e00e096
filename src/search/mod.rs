//! Fuzzy app search: bitap matcher, index abstraction, refresh-guarded cache.

pub mod bitap;
mod cache;
mod index;

pub use bitap::BitapConfig;
pub use cache::{AppCatalog, SearchCache, SearchHit};
pub use index::{BitapIndexBuilder, IndexBuilder, IndexMatch, SearchIndex};
