use crate::error::{Error, Result};
use crate::generation::{Answer, GenerationClient, SamplingConfig};
use crate::prompt::Prompt;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Client for an Ollama-compatible `/api/generate` endpoint
#[derive(Clone)]
pub struct OllamaGenerator {
    client: Client,
    endpoint: String,
    model: String,
    sampling: SamplingConfig,
    request_timeout: Duration,
    max_retries: u32,
    initial_backoff: Duration,
}

struct AttemptError {
    error: Error,
    retryable: bool,
}

impl OllamaGenerator {
    pub fn new(
        base_url: &str,
        model: &str,
        sampling: SamplingConfig,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(Error::Config("Generation model name is required".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.to_string(),
            sampling,
            request_timeout: timeout,
            max_retries,
            initial_backoff: Duration::from_secs(1),
        })
    }

    /// Override the delay before the first retry (doubles on each attempt)
    pub fn with_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Longest a single `generate` call can take: every attempt timing out,
    /// plus the sleeps between them
    pub fn time_budget(&self) -> Duration {
        let mut budget = self.request_timeout;
        let mut backoff = self.initial_backoff;
        for _ in 0..self.max_retries {
            budget = budget
                .saturating_add(backoff)
                .saturating_add(self.request_timeout);
            backoff = backoff.saturating_mul(2);
        }
        budget
    }

    async fn generate_once(&self, prompt: &str) -> std::result::Result<String, AttemptError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.sampling.temperature,
                seed: self.sampling.seed,
                num_predict: self.sampling.max_tokens,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AttemptError {
                retryable: e.is_timeout() || e.is_connect() || e.is_request(),
                error: Error::GenerationUnavailable(format!("Generation request failed: {e}")),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            error!("Generation backend error: {} - {}", status, error_body);
            return Err(AttemptError {
                retryable: status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
                error: Error::GenerationUnavailable(format!("Generation backend returned {status}")),
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| AttemptError {
            retryable: false,
            error: Error::GenerationUnavailable(format!(
                "Failed to parse generation response: {e}"
            )),
        })?;

        if parsed.response.trim().is_empty() {
            return Err(AttemptError {
                retryable: false,
                error: Error::GenerationUnavailable("Model returned an empty answer".to_string()),
            });
        }

        Ok(parsed.response)
    }
}

#[async_trait]
impl GenerationClient for OllamaGenerator {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Answer> {
        debug!(
            "Generating with {} ({} prompt chars, temperature {})",
            self.model,
            prompt.as_str().len(),
            self.sampling.temperature
        );

        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match self.generate_once(prompt.as_str()).await {
                Ok(text) => return Ok(Answer::new(text)),
                Err(attempt) if attempt.retryable && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        "Generation failed (attempt {}/{}): {}. Retrying in {:?}",
                        retries, self.max_retries, attempt.error, backoff
                    );
                    sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(attempt) => return Err(attempt.error),
            }
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
