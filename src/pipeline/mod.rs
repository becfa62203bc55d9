//! Query pipeline: question in, grounded recipe out.
//!
//! Build time runs corpus loading, embedder initialization and a full index
//! rebuild, in that order, and fails as a whole if any step fails. Serving time
//! runs retrieval, context formatting, prompt building and generation strictly
//! in sequence for each question. Nothing is cached between questions.

use crate::config::Settings;
use crate::corpus::{self, Document};
use crate::embedding::{self, EmbeddingProvider};
use crate::error::{Error, Result};
use crate::generation::{Answer, GenerationClient, OllamaGenerator};
use crate::index::{InMemoryIndex, RetrievalResult, VectorIndex};
use crate::prompt::{Prompt, PromptContext, PromptSettings};
use crate::retriever::Retriever;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Swappable collaborators for [`Pipeline::build`]
pub struct Components {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub index: Box<dyn VectorIndex>,
    pub generator: Arc<dyn GenerationClient>,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub top_k: usize,
    pub prompt: PromptSettings,
    /// Upper bound on a single generation call, on top of the client's own timeout
    pub generation_timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_k: crate::retriever::DEFAULT_TOP_K,
            prompt: PromptSettings::default(),
            generation_timeout: None,
        }
    }
}

/// Everything that precedes generation for one question
#[derive(Debug, Clone, Serialize)]
pub struct PreparedPrompt {
    pub retrieval: RetrievalResult,
    pub context: PromptContext,
    pub prompt: Prompt,
}

/// Snapshot of the built pipeline for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub documents: usize,
    pub index_generation: u64,
    pub embedding_model: String,
    pub generation_model: String,
    pub top_k: usize,
}

/// A fully built pipeline.
///
/// Only obtainable once the index is built, so no caller can observe a
/// half-built index. Cloning is cheap and clones share the read-only index;
/// concurrent `answer` calls are independent of one another.
#[derive(Clone)]
pub struct Pipeline {
    retriever: Retriever,
    generator: Arc<dyn GenerationClient>,
    prompt: Arc<PromptSettings>,
    generation_timeout: Option<Duration>,
}

impl Pipeline {
    /// Load the corpus, connect the configured backends and build the index
    pub async fn initialize(settings: &Settings) -> Result<Self> {
        info!("Loading corpus from {}", settings.corpus.path.display());
        let documents = corpus::load_file(&settings.corpus.path)?;

        let embedder = embedding::connect(&settings.embedding).await?;

        let generator = OllamaGenerator::new(
            &settings.generation.base_url,
            &settings.generation.model,
            settings.generation.sampling(),
            Duration::from_secs(settings.generation.timeout_seconds),
            settings.generation.max_retries,
        )?;

        // The pipeline bound must not cut the generator's own retries short
        let generation_timeout = generator.time_budget();

        let prompt = PromptSettings::load(settings.retrieval.template_path.as_deref())?;

        Self::build(
            documents,
            Components {
                embedder,
                index: Box::new(InMemoryIndex::new()),
                generator: Arc::new(generator),
            },
            PipelineOptions {
                top_k: settings.retrieval.top_k,
                prompt,
                generation_timeout: Some(generation_timeout),
            },
        )
        .await
    }

    /// Rebuild `components.index` from `documents` and assemble the pipeline
    pub async fn build(
        documents: Vec<Document>,
        components: Components,
        options: PipelineOptions,
    ) -> Result<Self> {
        if options.top_k == 0 {
            return Err(Error::Config("top_k must be at least 1".to_string()));
        }
        if documents.len() < options.top_k {
            warn!(
                "Corpus has {} documents, fewer than top_k = {}; every query will see the whole corpus",
                documents.len(),
                options.top_k
            );
        }

        let Components {
            embedder,
            mut index,
            generator,
        } = components;

        index.rebuild(documents, embedder.as_ref()).await?;

        let retriever = Retriever::new(embedder, Arc::from(index), options.top_k);

        info!(
            "Pipeline ready: {} documents, top_k {}, generator {}",
            retriever.index().len(),
            options.top_k,
            generator.model_id()
        );

        Ok(Self {
            retriever,
            generator,
            prompt: Arc::new(options.prompt),
            generation_timeout: options.generation_timeout,
        })
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn status(&self) -> PipelineStatus {
        let index = self.retriever.index();
        PipelineStatus {
            documents: index.len(),
            index_generation: index.generation(),
            embedding_model: self.retriever.embedder().model_id().to_string(),
            generation_model: self.generator.model_id().to_string(),
            top_k: self.retriever.top_k(),
        }
    }

    /// Retrieval, context formatting and prompt building, without generation
    pub async fn prepare(&self, question: &str) -> Result<PreparedPrompt> {
        let retrieval = self.retriever.retrieve(question).await?;
        let context = self.prompt.formatter.format(&retrieval);
        let prompt = self.prompt.template.build(&context, question);

        debug!(
            "Prompt built from {} recipes ({} chars)",
            context.entries(),
            prompt.as_str().len()
        );

        Ok(PreparedPrompt {
            retrieval,
            context,
            prompt,
        })
    }

    /// Answer one question.
    ///
    /// A generation failure fails only this call; the pipeline stays usable.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let prepared = self.prepare(question).await?;
        self.generate(&prepared.prompt).await
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Answer> {
        match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(prompt))
                .await
                .map_err(|_| {
                    Error::GenerationUnavailable(format!(
                        "Generation timed out after {limit:?}"
                    ))
                })?,
            None => self.generator.generate(prompt).await,
        }
    }
}
