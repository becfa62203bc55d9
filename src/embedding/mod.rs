//! Text embedding providers.
//!
//! Every provider is deterministic for a fixed model identity: the same text
//! embedded twice with the same `model_id` yields the same vector. The index
//! records the identity it was built with so a query can never be compared
//! against vectors from a different model.

pub mod hashing;
pub mod ollama;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;

/// Fixed-length vector representation of a piece of text
pub type EmbeddingVector = Vec<f32>;

/// Capability interface for anything that can turn text into vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identity of the underlying model; part of the determinism contract
    fn model_id(&self) -> &str;

    /// Length of every vector this provider produces
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;

    /// Embed many texts, returning vectors in input order.
    ///
    /// The default runs the single-text calls concurrently; `try_join_all`
    /// keeps the output aligned with the input regardless of completion order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        futures::future::try_join_all(texts.iter().map(|text| self.embed(text))).await
    }
}

/// Initialize the provider named by the configuration.
///
/// Remote backends are probed here, so an unreachable service fails startup
/// with `Error::EmbeddingUnavailable` instead of failing the first query.
pub async fn connect(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.dimensions)?),
        EmbeddingBackend::Ollama => Arc::new(
            OllamaEmbedder::connect(
                &config.base_url,
                &config.model,
                config.batch_size,
                Duration::from_secs(config.timeout_seconds),
            )
            .await?,
        ),
    };

    info!(
        "Embedding provider ready: {} ({} dimensions)",
        provider.model_id(),
        provider.dimensions()
    );
    Ok(provider)
}

/// Cosine similarity; zero-length vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_connect_hashing_backend() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Hashing,
            model: "unused".to_string(),
            dimensions: 64,
            batch_size: 8,
            base_url: "http://localhost:11434".to_string(),
            timeout_seconds: 5,
        };

        let provider = connect(&config).await.unwrap();
        assert_eq!(provider.dimensions(), 64);
        assert_eq!(provider.embed("pomodoro").await.unwrap().len(), 64);
    }
}
