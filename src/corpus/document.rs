use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Titolo sconosciuto";
pub const DEFAULT_CATEGORY: &str = "Categoria sconosciuta";
pub const DEFAULT_DESCRIPTION: &str = "Descrizione mancante";
pub const DEFAULT_ID: i64 = 0;

/// Raw corpus entry, as it appears in the dataset file.
///
/// Accepts both the canonical field names and the Italian names used by the
/// Italian recipe dataset (`titolo`, `categoria`, `descrizione`, `procedimento`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "titolo")]
    pub title: Option<String>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default, alias = "descrizione")]
    pub description: Option<String>,
    #[serde(alias = "procedimento")]
    pub procedure: String,
}

/// Metadata attached to every indexed document. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: String,
    /// Where the entry was loaded from (file path or "inline")
    pub source: String,
    /// Zero-based position of the entry in the corpus
    pub seq_num: usize,
}

/// Indexable unit derived from exactly one [`RecipeRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Procedure text, used for embedding and shown in the prompt context
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Build a document from a record, substituting placeholders for absent fields
    pub fn from_record(record: RecipeRecord, source: &str, seq_num: usize) -> Self {
        let metadata = DocumentMetadata {
            id: record.id.unwrap_or(DEFAULT_ID),
            title: record.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            category: record
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            description: record
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            source: source.to_string(),
            seq_num,
        };

        Self {
            content: record.procedure,
            metadata,
        }
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}
