//! Document and chunk types with provenance for citations

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use lexrag_index::SearchHit;

/// Raw text loaded from one page of one source file
///
/// The loader emits one `Document` per PDF page; plain-text files produce
/// a single `Document` with no page number. Immutable once created and
/// consumed exactly once by the chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Extracted text content
    pub text: String,
    /// Originating file path
    pub source: PathBuf,
    /// Page number (1-indexed) for paginated formats
    pub page: Option<u32>,
    /// Content hash for change detection
    pub content_hash: String,
}

impl Document {
    /// Create a new document
    pub fn new(text: String, source: impl Into<PathBuf>, page: Option<u32>) -> Self {
        let content_hash = hash_content(&text);
        Self {
            id: Uuid::new_v4(),
            text,
            source: source.into(),
            page,
            content_hash,
        }
    }
}

/// SHA-256 hex digest of text content
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A bounded slice of a document's text
///
/// `char_start`/`char_end` are offsets in Unicode scalar values into the
/// owning document's text, so `doc.text.chars()` positions `char_start..
/// char_end` reproduce `text` exactly. Consecutive chunks from one
/// document overlap; the spans make the overlap explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub text: String,
    /// Originating file path (inherited from the document)
    pub source: PathBuf,
    /// Page number (inherited from the document)
    pub page: Option<u32>,
    /// Position within the document's chunk sequence
    pub chunk_index: u32,
    /// Start offset in the document text, in chars
    pub char_start: usize,
    /// End offset in the document text, in chars
    pub char_end: usize,
}

impl Chunk {
    /// Create a new chunk belonging to `doc`
    pub fn new(
        doc: &Document,
        text: String,
        chunk_index: u32,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: doc.id,
            text,
            source: doc.source.clone(),
            page: doc.page,
            chunk_index,
            char_start,
            char_end,
        }
    }

    /// Provenance metadata stored alongside the chunk's vector in the index
    pub fn to_entry_metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut meta = HashMap::new();
        meta.insert("chunk_id".to_string(), serde_json::json!(self.id.to_string()));
        meta.insert(
            "document_id".to_string(),
            serde_json::json!(self.document_id.to_string()),
        );
        meta.insert(
            "source".to_string(),
            serde_json::json!(self.source.to_string_lossy()),
        );
        meta.insert("chunk_index".to_string(), serde_json::json!(self.chunk_index));
        meta.insert("char_start".to_string(), serde_json::json!(self.char_start));
        meta.insert("char_end".to_string(), serde_json::json!(self.char_end));
        if let Some(page) = self.page {
            meta.insert("page".to_string(), serde_json::json!(page));
        }
        meta
    }
}

/// A retrieved passage with its similarity score
///
/// Reconstructed from an index entry's metadata at query time; transient
/// and recomputed per query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Passage text
    pub text: String,
    /// Originating file path
    pub source: PathBuf,
    /// Page number, when known
    pub page: Option<u32>,
    /// Position within the source document's chunk sequence
    pub chunk_index: u32,
    /// Similarity score (higher is closer)
    pub score: f32,
}

impl ScoredChunk {
    /// Rebuild passage provenance from a search hit's metadata
    pub fn from_hit(hit: SearchHit) -> Self {
        let meta = &hit.entry.metadata;

        let source = meta
            .get("source")
            .and_then(|v| v.as_str())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("unknown"));

        let page = meta.get("page").and_then(|v| v.as_u64()).map(|p| p as u32);

        let chunk_index = meta
            .get("chunk_index")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        Self {
            text: hit.entry.text,
            source,
            page,
            chunk_index,
            score: hit.score,
        }
    }

    /// Base name of the originating file, for citations
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.to_string_lossy().into_owned())
    }
}
