use crate::error::{Error, Result};
use crate::generation::SamplingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub corpus: CorpusConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Offline feature-hashing embedder
    #[default]
    Hashing,
    Ollama,
}

impl FromStr for EmbeddingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hashing" => Ok(Self::Hashing),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!(
                "Unknown EMBEDDING_BACKEND '{other}' (expected hashing or ollama)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model: String,
    /// Vector length for the hashing backend; remote models report their own
    pub dimensions: usize,
    pub batch_size: usize,
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub seed: Option<i64>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl GenerationConfig {
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            seed: self.seed,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub template_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

fn env_or<T: FromStr>(key: &str, default: &str) -> Result<T> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {key} value")))
}

fn env_opt<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("Invalid {key} value"))),
        _ => Ok(None),
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let ollama_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());

        let backend = std::env::var("EMBEDDING_BACKEND")
            .unwrap_or_else(|_| "hashing".to_string())
            .parse()?;

        Ok(Settings {
            corpus: CorpusConfig {
                path: std::env::var("CORPUS_PATH")
                    .unwrap_or_else(|_| "./ricette_dataset.json".to_string())
                    .into(),
            },
            embedding: EmbeddingConfig {
                backend,
                model: std::env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "nomic-embed-text".to_string()),
                dimensions: env_or("EMBEDDING_DIMENSIONS", "384")?,
                batch_size: env_or("EMBEDDING_BATCH_SIZE", "32")?,
                base_url: ollama_url.clone(),
                timeout_seconds: env_or("EMBEDDING_TIMEOUT", "60")?,
            },
            generation: GenerationConfig {
                base_url: ollama_url,
                model: std::env::var("GENERATION_MODEL").unwrap_or_else(|_| "llama3".to_string()),
                temperature: env_or("GENERATION_TEMPERATURE", "0.1")?,
                seed: env_opt("GENERATION_SEED")?,
                max_tokens: env_opt("GENERATION_MAX_TOKENS")?,
                timeout_seconds: env_or("GENERATION_TIMEOUT", "120")?,
                max_retries: env_or("GENERATION_MAX_RETRIES", "0")?,
            },
            retrieval: RetrievalConfig {
                top_k: env_or("RETRIEVAL_TOP_K", "3")?,
                template_path: env_opt::<String>("PROMPT_TEMPLATE_PATH")?.map(PathBuf::from),
            },
            server: ServerConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_or("PORT", "3000")?,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", "65536")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.retrieval.top_k == 0 {
            return Err(Error::Config("RETRIEVAL_TOP_K must be at least 1".to_string()));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(Error::Config(format!(
                "Temperature {} is outside [0, 2]",
                self.generation.temperature
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(Error::Config("Embedding dimensions must be non-zero".to_string()));
        }

        if self.embedding.batch_size == 0 {
            return Err(Error::Config("Embedding batch size must be non-zero".to_string()));
        }

        Url::parse(&self.generation.base_url)?;
        Url::parse(&self.embedding.base_url)?;

        Ok(())
    }
}
