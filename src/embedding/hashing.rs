use crate::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::error::{Error, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Tokens shorter than this are treated as function words and skipped
const MIN_TOKEN_CHARS: usize = 3;

/// Offline embedder based on signed feature hashing.
///
/// Each lowercase alphanumeric token is hashed with SHA-256; the digest picks a
/// bucket and a sign. The resulting bag-of-words vector is L2-normalized, so
/// cosine similarity reduces to weighted token overlap. Needs no network and is
/// bit-for-bit reproducible across runs and platforms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    model_id: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::Config(
                "Hashing embedder needs at least one dimension".to_string(),
            ));
        }

        Ok(Self {
            dimensions,
            model_id: format!("hashing-sha256-{dimensions}"),
        })
    }

    pub fn vectorize(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
}
