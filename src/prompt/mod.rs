// Context assembly and prompt construction

pub mod context;
pub mod template;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

// Re-exports
pub use context::{ContextFormatter, PromptContext, DEFAULT_EMPTY_CONTEXT_MARKER};
pub use template::{Prompt, PromptTemplate, DEFAULT_TEMPLATE};

/// Template and context formatting used for every query
#[derive(Debug, Clone, Default)]
pub struct PromptSettings {
    pub template: PromptTemplate,
    pub formatter: ContextFormatter,
}

/// On-disk shape of a custom prompt file
#[derive(Debug, Deserialize)]
struct PromptFile {
    template: String,
    /// Listed on top of `context` and `question`, which are always required
    #[serde(default)]
    required_placeholders: Option<Vec<String>>,
    #[serde(default)]
    empty_context_marker: Option<String>,
}

impl PromptSettings {
    /// Load a custom template from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read prompt template from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let file: PromptFile = serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse prompt template from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let template = match file.required_placeholders {
            Some(required) => PromptTemplate::with_placeholders(file.template, required)?,
            None => PromptTemplate::new(file.template)?,
        };

        let formatter = file
            .empty_context_marker
            .map(ContextFormatter::new)
            .unwrap_or_default();

        Ok(Self {
            template,
            formatter,
        })
    }

    /// Custom template when a path is configured, built-in one otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_defaults_without_path() {
        let settings = PromptSettings::load(None).unwrap();
        assert_eq!(settings.template.template(), DEFAULT_TEMPLATE);
        assert_eq!(settings.formatter.empty_marker(), DEFAULT_EMPTY_CONTEXT_MARKER);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"template: |
  You are a chef. Use only this context:
  {{context}}
  Question: {{question}}
empty_context_marker: "NO RECIPES FOUND"
"#
        )
        .unwrap();

        let settings = PromptSettings::from_file(file.path()).unwrap();
        assert!(settings.template.template().contains("{context}"));
        assert_eq!(settings.formatter.empty_marker(), "NO RECIPES FOUND");
    }

    #[test]
    fn test_from_file_rejects_template_without_context() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "template: \"Question: {{question}}\"").unwrap();

        assert!(matches!(
            PromptSettings::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_file_empty_placeholder_list_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "template: \"Rispondi: {{question}}\"\nrequired_placeholders: []"
        )
        .unwrap();

        assert!(matches!(
            PromptSettings::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let result = PromptSettings::from_file("/nonexistent/prompt.yaml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
