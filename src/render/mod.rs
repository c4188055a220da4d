pub mod html;
pub mod text;

use crate::error::{Error, Result};
use html::HtmlStyle;

/// Output formats for an assembled slide sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Standalone HTML slide deck
    Html,
    /// Slides separated by blank lines
    Text,
    /// JSON array of slide strings
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

pub fn render(
    slides: &[String],
    format: OutputFormat,
    title: &str,
    style: &HtmlStyle,
) -> Result<String> {
    match format {
        OutputFormat::Html => html::render(slides, title, style),
        OutputFormat::Text => Ok(text::render(slides)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(slides).map_err(|e| Error::Render(e.to_string()))
        }
    }
}
