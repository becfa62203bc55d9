// Generative model clients

pub mod ollama;

use crate::error::Result;
use crate::prompt::Prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use ollama::OllamaGenerator;

/// Raw model output. Passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    text: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Sampling knobs sent with every request. Kept low-temperature so repeated
/// questions over the same context give similar answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub seed: Option<i64>,
    pub max_tokens: Option<u32>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            seed: None,
            max_tokens: None,
        }
    }
}

/// Capability interface for the generation step.
///
/// Failures to reach the backend, timeouts and unusable responses are all
/// reported as `Error::GenerationUnavailable`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate(&self, prompt: &Prompt) -> Result<Answer>;
}
