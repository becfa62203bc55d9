// Vector index over recipe documents
// Full rebuild is the only way to change what the index holds

pub mod memory;

use crate::corpus::Document;
use crate::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::InMemoryIndex;

/// A stored (document, vector) pair
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub document: Document,
    pub vector: EmbeddingVector,
}

/// A retrieved document with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Ranked retrieval output, best match first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub hits: Vec<ScoredDocument>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredDocument> {
        self.hits.iter()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.document.title()).collect()
    }
}

/// Capability interface for nearest-neighbor storage.
///
/// Implementations must keep entries in document order and break score ties by
/// that order, so identical corpora produce identical rankings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Discard all state and index `documents` from scratch
    async fn rebuild(
        &mut self,
        documents: Vec<Document>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<()>;

    /// Top `k` entries by cosine similarity to `vector`
    fn query(&self, vector: &[f32], k: usize) -> Result<RetrievalResult>;

    /// Number of indexed documents (0 before the first rebuild)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_ready(&self) -> bool;

    /// Count of successful rebuilds
    fn generation(&self) -> u64;

    /// Embedding model the current contents were built with
    fn model_id(&self) -> Option<&str>;
}
