use axum::{extract::State, Json};
use tracing::debug;

use crate::{api::models::*, pipeline::Pipeline, pipeline::PipelineStatus, Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

fn require_question(request: &QuestionRequest) -> Result<&str> {
    if request.question.trim().is_empty() {
        return Err(Error::Validation("question must not be empty".to_string()));
    }
    Ok(&request.question)
}

/// POST /api/answer - Generate a recipe grounded in the corpus
pub async fn answer(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>> {
    let question = require_question(&request)?;
    debug!("Answer request: {:?}", question);

    let answer = state.pipeline.answer(question).await?;

    Ok(Json(AnswerResponse {
        question: request.question.clone(),
        answer: answer.into_string(),
    }))
}

/// POST /api/retrieve - Show which recipes and prompt a question would use
pub async fn retrieve(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<RetrieveResponse>> {
    let question = require_question(&request)?;
    debug!("Retrieve request: {:?}", question);

    let prepared = state.pipeline.prepare(question).await?;

    Ok(Json(RetrieveResponse {
        question: request.question.clone(),
        recipes: RetrievedRecipe::from_result(&prepared.retrieval),
        prompt: prepared.prompt.into_string(),
    }))
}

/// GET /api/health - Index and model status
pub async fn health_check(State(state): State<AppState>) -> Json<PipelineStatus> {
    Json(state.pipeline.status())
}
