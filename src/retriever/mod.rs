use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::index::{RetrievalResult, VectorIndex};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 3;

/// Fixed top-k retrieval over a built index.
///
/// There is no relevance threshold: a question that matches nothing still
/// gets the `k` nearest recipes. Only an empty index yields an empty result.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    /// Retrieve with the configured `k`
    pub async fn retrieve(&self, question: &str) -> Result<RetrievalResult> {
        self.retrieve_k(question, self.top_k).await
    }

    /// Retrieve up to `k` documents; fewer when the index is smaller
    pub async fn retrieve_k(&self, question: &str, k: usize) -> Result<RetrievalResult> {
        if let Some(built_with) = self.index.model_id() {
            if built_with != self.embedder.model_id() {
                return Err(Error::IndexNotReady(format!(
                    "index was built with {built_with}, queries use {}",
                    self.embedder.model_id()
                )));
            }
        }

        let vector = self.embedder.embed(question).await?;
        let result = self.index.query(&vector, k)?;

        debug!(
            "Retrieved {} of {} documents: {:?}",
            result.len(),
            self.index.len(),
            result.titles()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus;
    use crate::embedding::HashingEmbedder;
    use crate::index::InMemoryIndex;
    use serde_json::json;

    async fn build(embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Retriever {
        let docs = corpus::load(&json!([
            {"id": 1, "title": "Parmigiana di melanzane", "procedure": "Friggere le melanzane, stendere pomodoro e parmigiano, infornare."},
            {"id": 2, "title": "Bruschetta", "procedure": "Tostare il pane e condire con olio e sale."},
            {"id": 3, "title": "Pasta al pomodoro", "procedure": "Cuocere la pasta, saltare con pomodoro e basilico."}
        ]))
        .unwrap();

        let mut index = InMemoryIndex::new();
        index.rebuild(docs, embedder.as_ref()).await.unwrap();
        Retriever::new(embedder, Arc::new(index), top_k)
    }

    #[tokio::test]
    async fn test_returns_min_of_k_and_corpus_size() {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(384).unwrap());
        let retriever = build(embedder, DEFAULT_TOP_K).await;

        assert_eq!(retriever.retrieve("pomodoro").await.unwrap().len(), 3);
        assert_eq!(retriever.retrieve_k("pomodoro", 1).await.unwrap().len(), 1);
        assert_eq!(retriever.retrieve_k("pomodoro", 10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unrelated_question_still_returns_neighbors() {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(384).unwrap());
        let retriever = build(embedder, 2).await;

        let result = retriever.retrieve("cioccolato fondente zucchero").await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_model_mismatch_is_rejected() {
        let builder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(384).unwrap());
        let retriever = build(builder, 3).await;

        let other: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(128).unwrap());
        let mismatched = Retriever::new(other, retriever.index.clone(), 3);

        assert!(matches!(
            mismatched.retrieve("pomodoro").await,
            Err(Error::IndexNotReady(_))
        ));
    }
}
