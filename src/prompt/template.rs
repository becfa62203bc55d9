use crate::error::{Error, Result};
use crate::prompt::context::PromptContext;
use serde::Serialize;

pub const CONTEXT_PLACEHOLDER: &str = "context";
pub const QUESTION_PLACEHOLDER: &str = "question";

/// Grounding instructions given to the model. The model is told to stay within
/// the retrieved recipes; nothing checks the answer afterwards.
pub const DEFAULT_TEMPLATE: &str = "Sei un esperto chef. Rispondi SOLO sulla base del contesto fornito.

CONTESTO:
{context}

DOMANDA: {question}

ISTRUZIONI:
- Leggi attentamente il contesto sopra
- Identifica ingredienti, procedimento e dettagli
- La ricetta deve includere:
    - Nome del piatto originale
    - Lista ingredienti
    - Procedimento dettagliato
    - Piccolo consiglio su come sorprendere i commensali
- Rispondi in italiano, mantenendo lo stile italiano autentico
- Non inventare informazioni, usa solo il contesto fornito
- Non aggiungere ingredienti esterni non menzionati nel contesto
";

/// Final text sent to the generation model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Instruction template plus the placeholder names it must contain.
///
/// Placeholders are written `{name}`. Rendering is a single left-to-right pass,
/// so braces inside the substituted question or context are never expanded.
/// Unknown `{...}` sequences are copied through unchanged.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    required: Vec<String>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            required: vec![
                CONTEXT_PLACEHOLDER.to_string(),
                QUESTION_PLACEHOLDER.to_string(),
            ],
        }
    }
}

impl PromptTemplate {
    /// Template requiring both `{context}` and `{question}`
    pub fn new(template: impl Into<String>) -> Result<Self> {
        Self::with_placeholders(template, std::iter::empty::<String>())
    }

    /// Template requiring `{context}` and `{question}` plus any names in `extra`.
    ///
    /// The two built-in placeholders are always required; `extra` can only
    /// repeat them, since no other name is ever filled.
    pub fn with_placeholders<I, S>(template: impl Into<String>, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let template = template.into();
        let mut required = vec![
            CONTEXT_PLACEHOLDER.to_string(),
            QUESTION_PLACEHOLDER.to_string(),
        ];
        for name in extra.into_iter().map(Into::into) {
            if !required.contains(&name) {
                required.push(name);
            }
        }
        let present = placeholders(&template);

        for name in &required {
            if name != CONTEXT_PLACEHOLDER && name != QUESTION_PLACEHOLDER {
                return Err(Error::Config(format!(
                    "Unsupported prompt placeholder {{{name}}}: only {{{CONTEXT_PLACEHOLDER}}} and {{{QUESTION_PLACEHOLDER}}} are filled"
                )));
            }
            if !present.iter().any(|p| p == name) {
                return Err(Error::Config(format!(
                    "Prompt template is missing required placeholder {{{name}}}"
                )));
            }
        }

        Ok(Self { template, required })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn required_placeholders(&self) -> &[String] {
        &self.required
    }

    /// Fill the template with the formatted context and the user question
    pub fn build(&self, context: &PromptContext, question: &str) -> Prompt {
        let text = render(&self.template, |name| match name {
            CONTEXT_PLACEHOLDER => Some(context.as_str()),
            QUESTION_PLACEHOLDER => Some(question),
            _ => None,
        });
        Prompt { text }
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names of all `{name}` placeholders, in order of appearance
fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                names.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            _ => rest = after,
        }
    }
    names
}

fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
