use crate::corpus::document::{Document, RecipeRecord};
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Source label used for corpora that did not come from a file
pub const INLINE_SOURCE: &str = "inline";

/// Normalize a parsed corpus into documents, one per entry, in corpus order
pub fn load(source: &Value) -> Result<Vec<Document>> {
    load_with_source(source, INLINE_SOURCE)
}

/// Parse a JSON corpus held in memory
pub fn load_str(content: &str) -> Result<Vec<Document>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| Error::CorpusFormat(format!("Corpus is not valid JSON: {e}")))?;
    load(&value)
}

/// Read and parse a JSON corpus file
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::CorpusFormat(format!(
            "Failed to read corpus from {}: {}",
            path.display(),
            e
        ))
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        Error::CorpusFormat(format!(
            "Failed to parse corpus from {}: {}",
            path.display(),
            e
        ))
    })?;

    let documents = load_with_source(&value, &path.display().to_string())?;
    info!(
        "Loaded {} recipes from {}",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

fn load_with_source(source: &Value, label: &str) -> Result<Vec<Document>> {
    let entries = source.as_array().ok_or_else(|| {
        Error::CorpusFormat(format!(
            "Expected a list of recipes, found {}",
            value_kind(source)
        ))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(seq_num, entry)| {
            if !entry.is_object() {
                return Err(Error::CorpusFormat(format!(
                    "Entry {seq_num} is {}, expected an object",
                    value_kind(entry)
                )));
            }

            let record: RecipeRecord = serde_json::from_value(entry.clone())
                .map_err(|e| Error::CorpusFormat(format!("Entry {seq_num}: {e}")))?;

            debug!(
                "Normalized recipe {} ({:?})",
                seq_num,
                record.title.as_deref().unwrap_or("untitled")
            );
            Ok(Document::from_record(record, label, seq_num))
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::document::{DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
    use serde_json::json;

    #[test]
    fn test_one_document_per_entry_with_fallbacks() {
        let corpus = json!([
            {"id": 1, "title": "Parmigiana", "category": "Secondi", "description": "Classica", "procedure": "Friggere le melanzane."},
            {"procedure": "Tostare il pane."},
            {"id": 3, "titolo": "Caprese", "procedimento": "Affettare pomodoro e mozzarella."}
        ]);

        let docs = load(&corpus).unwrap();
        assert_eq!(docs.len(), 3);

        assert_eq!(docs[0].metadata.title, "Parmigiana");
        assert_eq!(docs[0].metadata.category, "Secondi");

        assert_eq!(docs[1].metadata.id, 0);
        assert_eq!(docs[1].metadata.title, DEFAULT_TITLE);
        assert_eq!(docs[1].metadata.category, DEFAULT_CATEGORY);
        assert_eq!(docs[1].metadata.description, DEFAULT_DESCRIPTION);

        assert_eq!(docs[2].metadata.id, 3);
        assert_eq!(docs[2].metadata.title, "Caprese");
        assert_eq!(docs[2].content, "Affettare pomodoro e mozzarella.");

        let seq: Vec<usize> = docs.iter().map(|d| d.metadata.seq_num).collect();
        assert_eq!(seq, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_corpus_is_not_an_error() {
        let docs = load(&json!([])).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_non_list_source_is_rejected() {
        let result = load(&json!({"recipes": []}));
        assert!(matches!(result, Err(Error::CorpusFormat(_))));

        let result = load_str("not json at all");
        assert!(matches!(result, Err(Error::CorpusFormat(_))));
    }

    #[test]
    fn test_entry_without_procedure_is_rejected() {
        let result = load(&json!([
            {"id": 1, "title": "Ok", "procedure": "Mescolare."},
            {"id": 2, "title": "Senza corpo"}
        ]));

        match result {
            Err(Error::CorpusFormat(msg)) => assert!(msg.contains("Entry 1")),
            other => panic!("expected corpus format error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_entry_is_rejected() {
        let result = load(&json!(["just a string"]));
        assert!(matches!(result, Err(Error::CorpusFormat(_))));
    }
}
