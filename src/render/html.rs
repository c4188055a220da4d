//! HTML slide deck rendering
//!
//! One full-screen `<section>` per slide, rendered from a Mustache template.
//! Slide text goes through `{{text}}`, so Mustache escapes it. Style values
//! land raw inside `<style>` and are checked by [`HtmlStyle::validate`] instead.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

const SLIDES_TEMPLATE: &str = include_str!("templates/slides.html.mustache");

/// Look of the rendered slides
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct HtmlStyle {
    pub background_color: String,
    pub font_color: String,
    pub font_family: String,
    /// Points
    pub font_size: u32,
    pub line_spacing: f32,
    /// Any CSS length
    pub margin: String,
}

impl Default for HtmlStyle {
    fn default() -> Self {
        Self {
            background_color: "#000000".to_string(),
            font_color: "#ffffff".to_string(),
            font_family: "Calibri, sans-serif".to_string(),
            font_size: 40,
            line_spacing: 1.25,
            margin: "0.5in".to_string(),
        }
    }
}

impl HtmlStyle {
    /// Style values are CSS, not text: quotes are fine, but nothing may close the `<style>` block
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("background-color", &self.background_color),
            ("font-color", &self.font_color),
            ("font-family", &self.font_family),
            ("margin", &self.margin),
        ] {
            if value.contains(['<', '>', '{', '}']) {
                return Err(Error::Render(format!(
                    "invalid {} in HTML style: {:?}",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct DeckContext<'a> {
    title: &'a str,
    background_color: &'a str,
    font_color: &'a str,
    font_family: &'a str,
    font_size: u32,
    line_spacing: f32,
    margin: &'a str,
    slides: Vec<SlideContext<'a>>,
}

#[derive(Serialize)]
struct SlideContext<'a> {
    number: usize,
    blank: bool,
    lines: Vec<LineContext<'a>>,
}

#[derive(Serialize)]
struct LineContext<'a> {
    text: &'a str,
}

/// Render slides as a standalone HTML document
pub fn render(slides: &[String], title: &str, style: &HtmlStyle) -> Result<String> {
    style.validate()?;

    let context = DeckContext {
        title,
        background_color: &style.background_color,
        font_color: &style.font_color,
        font_family: &style.font_family,
        font_size: style.font_size,
        line_spacing: style.line_spacing,
        margin: &style.margin,
        slides: slides
            .iter()
            .enumerate()
            .map(|(i, slide)| SlideContext {
                number: i + 1,
                blank: slide.is_empty(),
                lines: slide.lines().map(|text| LineContext { text }).collect(),
            })
            .collect(),
    };

    let template =
        mustache::compile_str(SLIDES_TEMPLATE).map_err(|e| Error::Render(e.to_string()))?;
    template
        .render_to_string(&context)
        .map_err(|e| Error::Render(e.to_string()))
}
