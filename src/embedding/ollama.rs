use crate::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Embedding client for an Ollama-compatible `/api/embed` endpoint
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    model_id: String,
    batch_size: usize,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Build the client and probe the backend once.
    ///
    /// The probe both proves the service is reachable and learns the vector
    /// dimension of the configured model.
    pub async fn connect(
        base_url: &str,
        model: &str,
        batch_size: usize,
        timeout: Duration,
    ) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(Error::Config("Embedding model name is required".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::EmbeddingUnavailable(format!("Failed to create HTTP client: {e}")))?;

        let mut embedder = Self {
            client,
            endpoint: format!("{}/api/embed", base_url.trim_end_matches('/')),
            model: model.to_string(),
            model_id: format!("ollama:{model}"),
            batch_size: batch_size.max(1),
            dimensions: 0,
        };

        let probe = embedder.request(&["ping"]).await?;
        let dimensions = probe.first().map(Vec::len).unwrap_or(0);
        if dimensions == 0 {
            return Err(Error::EmbeddingUnavailable(format!(
                "Model {model} returned an empty embedding"
            )));
        }
        embedder.dimensions = dimensions;

        Ok(embedder)
    }

    async fn request(&self, inputs: &[&str]) -> Result<Vec<EmbeddingVector>> {
        debug!("Embedding {} inputs with {}", inputs.len(), self.model);

        let body = EmbedRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(format!("Embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            error!("Embedding backend error: {} - {}", status, error_body);
            return Err(Error::EmbeddingUnavailable(format!(
                "Embedding backend returned {status}"
            )));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            Error::EmbeddingUnavailable(format!("Failed to parse embedding response: {e}"))
        })?;

        if parsed.embeddings.len() != inputs.len() {
            return Err(Error::EmbeddingUnavailable(format!(
                "Backend returned {} embeddings for {} inputs",
                parsed.embeddings.len(),
                inputs.len()
            )));
        }

        Ok(parsed.embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        self.request(&[text])
            .await?
            .pop()
            .ok_or_else(|| Error::EmbeddingUnavailable("Backend returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            vectors.extend(self.request(chunk).await?);
        }
        Ok(vectors)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<EmbeddingVector>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_connect_probes_dimensions() {
        let mut server = mockito::Server::new_async().await;
        let probe = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::PartialJson(json!({"model": "nomic-embed-text"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"nomic-embed-text","embeddings":[[0.1,0.2,0.3]]}"#)
            .create_async()
            .await;

        let embedder = OllamaEmbedder::connect(
            &server.url(),
            "nomic-embed-text",
            16,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        probe.assert_async().await;
        assert_eq!(embedder.dimensions(), 3);
        assert_eq!(embedder.model_id(), "ollama:nomic-embed-text");
    }

    #[tokio::test]
    async fn test_connect_fails_when_backend_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/embed")
            .with_status(500)
            .with_body("model not loaded")
            .create_async()
            .await;

        let result =
            OllamaEmbedder::connect(&server.url(), "nomic-embed-text", 16, Duration::from_secs(5))
                .await;
        assert!(matches!(result, Err(Error::EmbeddingUnavailable(_))));
    }

    #[tokio::test]
    async fn test_connect_fails_when_unreachable() {
        // Port 9 (discard) is not an Ollama server
        let result =
            OllamaEmbedder::connect("http://127.0.0.1:9", "nomic-embed-text", 16, Duration::from_secs(2))
                .await;
        assert!(matches!(result, Err(Error::EmbeddingUnavailable(_))));
    }

    #[tokio::test]
    async fn test_batch_is_chunked_in_order() {
        let mut server = mockito::Server::new_async().await;
        let _probe = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(json!({"model": "nomic-embed-text", "input": ["ping"]})))
            .with_status(200)
            .with_body(r#"{"embeddings":[[0.0,1.0]]}"#)
            .create_async()
            .await;
        let first = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(json!({"model": "nomic-embed-text", "input": ["uno", "due"]})))
            .with_status(200)
            .with_body(r#"{"embeddings":[[1.0,0.0],[2.0,0.0]]}"#)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(json!({"model": "nomic-embed-text", "input": ["tre"]})))
            .with_status(200)
            .with_body(r#"{"embeddings":[[3.0,0.0]]}"#)
            .create_async()
            .await;

        let embedder =
            OllamaEmbedder::connect(&server.url(), "nomic-embed-text", 2, Duration::from_secs(5))
                .await
                .unwrap();
        let vectors = embedder.embed_batch(&["uno", "due", "tre"]).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(
            vectors,
            vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]]
        );
    }
}
