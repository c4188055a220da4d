use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the cleaning, segmenting and assembling pipeline
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A slide must be allowed to hold at least one line
    #[error("lines per slide must be at least 1")]
    InvalidLinesPerSlide,

    /// A song reached assembly without lyrics (lookup failed and nothing was entered by hand)
    #[error("no lyrics for \"{title}\"; fill them in before building slides")]
    MissingLyrics { title: String },

    #[error("failed to render slides: {0}")]
    Render(String),
}
