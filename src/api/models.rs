use crate::index::RetrievalResult;
use serde::{Deserialize, Serialize};

/// Body of POST /api/answer and POST /api/retrieve
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
}

/// Recipe card for retrieval results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedRecipe {
    pub rank: usize,
    pub id: i64,
    pub title: String,
    pub category: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveResponse {
    pub question: String,
    pub recipes: Vec<RetrievedRecipe>,
    pub prompt: String,
}

impl RetrievedRecipe {
    pub fn from_result(result: &RetrievalResult) -> Vec<Self> {
        result
            .iter()
            .enumerate()
            .map(|(i, hit)| Self {
                rank: i + 1,
                id: hit.document.metadata.id,
                title: hit.document.metadata.title.clone(),
                category: hit.document.metadata.category.clone(),
                score: hit.score,
            })
            .collect()
    }
}
