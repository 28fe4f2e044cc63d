//! Flat vector index with build, search, and durable persistence

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::metric::DistanceMetric;

/// File name of the serialized index inside its location directory
const INDEX_FILE: &str = "index.json";

/// On-disk format version; bumped on incompatible layout changes
const FORMAT_VERSION: u32 = 1;

/// One indexed unit: embedding vector, chunk text, and provenance metadata
///
/// The metadata map is opaque to the index; callers put whatever they need
/// to reconstruct provenance (source file, page number, chunk position).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Chunk text content
    pub text: String,
    /// Provenance metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A search match: the entry plus its score against the query
///
/// Higher score means closer, regardless of the metric.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched entry
    pub entry: IndexEntry,
    /// Metric score against the query vector
    pub score: f32,
}

/// Immutable nearest-neighbor index over embedding vectors
///
/// Constructed once via [`VectorIndex::build`] or [`VectorIndex::load`] and
/// never mutated afterwards. Search is an exact scan over all entries,
/// which is the right trade-off for a corpus of a few thousand chunks.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    format_version: u32,
    /// Identifier of the embedding model the vectors came from
    model: String,
    /// Vector arity shared by every entry
    dimensions: usize,
    metric: DistanceMetric,
    created_at: DateTime<Utc>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an in-memory index from entries
    ///
    /// Fails with [`IndexError::EmptyIndex`] on zero entries and
    /// [`IndexError::DimensionMismatch`] if entries disagree on arity.
    pub fn build(
        model: impl Into<String>,
        metric: DistanceMetric,
        entries: Vec<IndexEntry>,
    ) -> Result<Self> {
        let first = entries.first().ok_or(IndexError::EmptyIndex)?;
        let dimensions = first.vector.len();

        for entry in &entries {
            if entry.vector.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: dimensions,
                    found: entry.vector.len(),
                });
            }
        }

        Ok(Self {
            format_version: FORMAT_VERSION,
            model: model.into(),
            dimensions,
            metric,
            created_at: Utc::now(),
            entries,
        })
    }

    /// Return the `top_k` entries nearest to the query vector
    ///
    /// Results are ordered nearest-first; ties keep insertion order. If the
    /// index holds fewer than `top_k` entries, all of them are returned.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                found: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                entry: entry.clone(),
                score: self.metric.score(query, &entry.vector),
            })
            .collect();

        // Stable sort: equal scores stay in insertion order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);

        Ok(hits)
    }

    /// Write the index to a directory location
    ///
    /// The file is written to a temporary name and renamed into place, so a
    /// crash mid-write leaves either the previous index or none.
    pub fn persist(&self, location: &Path) -> Result<()> {
        fs::create_dir_all(location)?;

        let path = location.join(INDEX_FILE);
        let tmp = location.join(format!("{INDEX_FILE}.tmp"));

        let serialized = serde_json::to_string(self)
            .map_err(|e| IndexError::corrupt(location, format!("serialization failed: {e}")))?;
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &path)?;

        tracing::info!(
            location = %location.display(),
            entries = self.entries.len(),
            model = %self.model,
            "persisted vector index"
        );
        Ok(())
    }

    /// Load a persisted index from a directory location
    ///
    /// Fails with [`IndexError::NotFound`] when the location does not
    /// exist, and [`IndexError::Corrupt`] when it exists but does not hold
    /// a readable, version-compatible index.
    pub fn load(location: &Path) -> Result<Self> {
        if !location.exists() {
            return Err(IndexError::NotFound(location.to_path_buf()));
        }

        let path = location.join(INDEX_FILE);
        if !path.is_file() {
            return Err(IndexError::corrupt(location, "index file is missing"));
        }

        let raw = fs::read_to_string(&path)?;
        let index: Self = serde_json::from_str(&raw)
            .map_err(|e| IndexError::corrupt(location, e.to_string()))?;

        if index.format_version != FORMAT_VERSION {
            return Err(IndexError::corrupt(
                location,
                format!(
                    "unsupported format version {} (expected {})",
                    index.format_version, FORMAT_VERSION
                ),
            ));
        }
        if index.entries.is_empty() {
            return Err(IndexError::corrupt(location, "index holds no entries"));
        }
        if index.entries.iter().any(|e| e.vector.len() != index.dimensions) {
            return Err(IndexError::corrupt(
                location,
                "entry vector arity disagrees with recorded dimensions",
            ));
        }

        tracing::info!(
            location = %location.display(),
            entries = index.entries.len(),
            model = %index.model,
            "loaded vector index"
        );
        Ok(index)
    }

    /// Whether a persisted index location exists
    ///
    /// Presence of the directory is the "already ingested" signal; a
    /// present-but-invalid location surfaces as [`IndexError::Corrupt`]
    /// from [`VectorIndex::load`] rather than being silently rebuilt.
    pub fn exists(location: &Path) -> bool {
        location.is_dir()
    }

    /// Validate the recorded embedding model against the caller's
    ///
    /// Querying an index with vectors from a different model yields
    /// nonsense neighbors, so the mismatch fails loudly here.
    pub fn ensure_model(&self, expected: &str) -> Result<()> {
        if self.model != expected {
            return Err(IndexError::ModelMismatch {
                expected: expected.to_string(),
                found: self.model.clone(),
            });
        }
        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries (never true for a built index)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding model identifier recorded at build time
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Vector arity
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Distance metric the index was built with
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Entry at insertion position `i`
    pub fn entry(&self, i: usize) -> Option<&IndexEntry> {
        self.entries.get(i)
    }
}
