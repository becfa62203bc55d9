use crate::index::RetrievalResult;
use serde::Serialize;

/// Stands in for the context when retrieval found nothing, so the model is
/// told explicitly that there is no material to work from.
pub const DEFAULT_EMPTY_CONTEXT_MARKER: &str = "NESSUNA RICETTA PERTINENTE TROVATA NEL CONTESTO.";

/// Rendered context block, in retrieval-rank order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    text: String,
    entries: usize,
}

impl PromptContext {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of recipes rendered; 0 means the text is the empty marker
    pub fn entries(&self) -> usize {
        self.entries
    }
}

#[derive(Debug, Clone)]
pub struct ContextFormatter {
    empty_marker: String,
}

impl Default for ContextFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_EMPTY_CONTEXT_MARKER)
    }
}

impl ContextFormatter {
    pub fn new(empty_marker: impl Into<String>) -> Self {
        Self {
            empty_marker: empty_marker.into(),
        }
    }

    pub fn empty_marker(&self) -> &str {
        &self.empty_marker
    }

    /// Number each hit from 1 and show its title and full procedure
    pub fn format(&self, result: &RetrievalResult) -> PromptContext {
        if result.is_empty() {
            return PromptContext {
                text: self.empty_marker.clone(),
                entries: 0,
            };
        }

        let text = result
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "RICETTA {}:\nTitolo: {}\nProcedimento: {}\n",
                    i + 1,
                    hit.document.title(),
                    hit.document.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        PromptContext {
            text,
            entries: result.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Document, RecipeRecord};
    use crate::index::ScoredDocument;

    fn hit(title: Option<&str>, procedure: &str, score: f32) -> ScoredDocument {
        ScoredDocument {
            document: Document::from_record(
                RecipeRecord {
                    id: None,
                    title: title.map(str::to_string),
                    category: None,
                    description: None,
                    procedure: procedure.to_string(),
                },
                "inline",
                0,
            ),
            score,
        }
    }

    #[test]
    fn test_format_numbers_in_retrieval_order() {
        // Lower-scored hit first on purpose: the formatter must not re-sort
        let result = RetrievalResult {
            hits: vec![
                hit(Some("Bruschetta"), "Tostare il pane.", 0.2),
                hit(Some("Parmigiana"), "Friggere le melanzane.", 0.9),
            ],
        };

        let context = ContextFormatter::default().format(&result);
        assert_eq!(context.entries(), 2);
        assert_eq!(
            context.as_str(),
            "RICETTA 1:\nTitolo: Bruschetta\nProcedimento: Tostare il pane.\n\n\
             RICETTA 2:\nTitolo: Parmigiana\nProcedimento: Friggere le melanzane.\n"
        );
    }

    #[test]
    fn test_missing_title_shows_placeholder() {
        let result = RetrievalResult {
            hits: vec![hit(None, "Mescolare.", 0.5)],
        };
        let context = ContextFormatter::default().format(&result);
        assert!(context.as_str().contains("Titolo: Titolo sconosciuto"));
    }

    #[test]
    fn test_empty_result_yields_marker() {
        let context = ContextFormatter::default().format(&RetrievalResult::default());
        assert_eq!(context.entries(), 0);
        assert!(!context.as_str().is_empty());
        assert_eq!(context.as_str(), DEFAULT_EMPTY_CONTEXT_MARKER);

        let custom = ContextFormatter::new("(vuoto)").format(&RetrievalResult::default());
        assert_eq!(custom.as_str(), "(vuoto)");
    }
}
