use crate::corpus::Document;
use crate::embedding::{cosine_similarity, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::index::{IndexEntry, RetrievalResult, ScoredDocument, VectorIndex};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Brute-force cosine index held entirely in memory.
///
/// Exact search over every entry; recipe corpora are small enough that an ANN
/// structure would only add approximation error.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    state: Option<IndexState>,
    generation: u64,
}

#[derive(Debug)]
struct IndexState {
    entries: Vec<IndexEntry>,
    dimensions: Option<usize>,
    model_id: String,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        self.state
            .as_ref()
            .map(|state| state.entries.as_slice())
            .unwrap_or(&[])
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn rebuild(
        &mut self,
        documents: Vec<Document>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<()> {
        // Drop the previous generation first so a failed rebuild leaves
        // nothing stale behind.
        if self.state.take().is_some() {
            debug!("Discarded index generation {}", self.generation);
        }

        let vectors = if documents.is_empty() {
            warn!("Rebuilding index from an empty corpus");
            Vec::new()
        } else {
            let texts: Vec<&str> = documents.iter().map(|doc| doc.content.as_str()).collect();
            embedder.embed_batch(&texts).await?
        };

        if vectors.len() != documents.len() {
            return Err(Error::EmbeddingUnavailable(format!(
                "Embedder returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let dimensions = vectors.first().map(Vec::len);
        if let Some(expected) = dimensions {
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        let entries: Vec<IndexEntry> = documents
            .into_iter()
            .zip(vectors)
            .map(|(document, vector)| IndexEntry { document, vector })
            .collect();

        self.generation += 1;
        info!(
            "Index generation {} built: {} documents, model {}",
            self.generation,
            entries.len(),
            embedder.model_id()
        );

        self.state = Some(IndexState {
            entries,
            dimensions,
            model_id: embedder.model_id().to_string(),
        });

        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<RetrievalResult> {
        let state = self.state.as_ref().ok_or_else(|| {
            Error::IndexNotReady("query issued before the index was built".to_string())
        })?;

        if let Some(expected) = state.dimensions {
            if vector.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        let mut hits: Vec<ScoredDocument> = state
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(vector, &entry.vector),
            })
            .collect();

        // sort_by is stable: equal scores keep corpus order
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);

        Ok(RetrievalResult { hits })
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn model_id(&self) -> Option<&str> {
        self.state.as_ref().map(|state| state.model_id.as_str())
    }
}
