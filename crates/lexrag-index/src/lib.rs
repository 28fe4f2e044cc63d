//! lexrag-index: flat vector index with durable persistence
//!
//! Stores (embedding vector, chunk text, metadata) entries, answers
//! nearest-neighbor queries by exact scan, and round-trips through a
//! versioned on-disk form. Built once, then read-only: an index is never
//! mutated after `build` or `load`, so shared references are safe across
//! threads.

pub mod error;
pub mod index;
pub mod metric;

pub use error::{IndexError, Result};
pub use index::{IndexEntry, SearchHit, VectorIndex};
pub use metric::DistanceMetric;
