use log::debug;
use pulldown_cmark::{Parser, html};

use crate::editing::Document;
use crate::error::{EditorError, Result};
use crate::markup::{TagMap, import};
use crate::state::DocumentState;

/// Turns markdown into HTML the importer understands.
pub trait MarkdownConverter: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

#[derive(Debug, Default)]
pub struct PulldownConverter;

impl PulldownConverter {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownConverter for PulldownConverter {
    fn to_html(&self, markdown: &str) -> String {
        let mut out = String::new();
        html::push_html(&mut out, Parser::new(markdown));
        out.truncate(out.trim_end().len());
        out
    }
}

/// Named importers and exporters: `html` always, `markdown` when a
/// converter is registered.
pub struct FormatRegistry {
    markdown: Option<Box<dyn MarkdownConverter>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_markdown(PulldownConverter::new())
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("markdown", &self.markdown.is_some())
            .finish()
    }
}

impl FormatRegistry {
    /// Registry without a markdown converter.
    pub fn html_only() -> Self {
        Self { markdown: None }
    }

    pub fn with_markdown(converter: impl MarkdownConverter + 'static) -> Self {
        Self {
            markdown: Some(Box::new(converter)),
        }
    }

    pub fn import(&self, format: &str, input: &str, tags: &TagMap) -> Result<DocumentState> {
        debug!("import {} bytes as {format}", input.len());
        match format {
            "html" => Ok(import::from_html(input, tags)),
            "markdown" => {
                let converter = self.markdown.as_ref().ok_or_else(|| {
                    EditorError::InvalidFormat("markdown import needs a converter".into())
                })?;
                Ok(import::from_html(&converter.to_html(input), tags))
            }
            other => Err(EditorError::InvalidFormat(format!(
                "no importer for `{other}`"
            ))),
        }
    }

    pub fn export(&self, format: &str, doc: &Document, line_break: Option<&str>) -> Result<String> {
        match format {
            "html" => Ok(doc.export(line_break)),
            "markdown" => Err(EditorError::Unsupported("markdown export".into())),
            other => Err(EditorError::InvalidFormat(format!(
                "no exporter for `{other}`"
            ))),
        }
    }
}
