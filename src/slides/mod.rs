pub mod segment;

use crate::error::{Error, Result};
use crate::lyrics::SongEntry;
use serde::{Deserialize, Serialize};

pub use segment::segment;

pub const DEFAULT_LINES_PER_SLIDE: usize = 4;

/// How a set of songs is turned into a slide sequence
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SlideshowConfig {
    /// Maximum lyric lines on one slide; `None` only breaks at blank lines
    pub lines_per_slide: Option<usize>,
    /// Put a slide with the song title before each song
    pub include_title_slides: bool,
    /// Put an empty slide between songs
    pub include_blank_slides: bool,
    pub uppercase_lyrics: bool,
    pub uppercase_titles: bool,
    /// Title slides show the artist on a second line
    pub title_includes_artist: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            lines_per_slide: Some(DEFAULT_LINES_PER_SLIDE),
            include_title_slides: true,
            include_blank_slides: true,
            uppercase_lyrics: true,
            uppercase_titles: true,
            title_includes_artist: false,
        }
    }
}

impl SlideshowConfig {
    /// Reject settings the segmenter cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.lines_per_slide == Some(0) {
            return Err(Error::InvalidLinesPerSlide);
        }
        Ok(())
    }

    fn title_slide(&self, song: &SongEntry) -> String {
        let mut slide = song.title.trim().to_string();
        let artist = song.artist.trim();
        if self.title_includes_artist && !artist.is_empty() {
            slide.push('\n');
            slide.push_str(artist);
        }
        if self.uppercase_titles {
            slide = slide.to_uppercase();
        }
        slide
    }
}

/// Build one slide sequence for a whole set list.
///
/// Songs keep their order. Each song gets an optional title slide, its lyric
/// slides, and an optional empty separator slide; the separator after the last
/// song is dropped. Every song must have lyrics by now.
pub fn assemble(songs: &[SongEntry], config: &SlideshowConfig) -> Result<Vec<String>> {
    config.validate()?;

    let mut slides = Vec::new();

    for song in songs {
        let lyrics = song.lyrics.as_deref().ok_or_else(|| Error::MissingLyrics {
            title: song.title.clone(),
        })?;

        if config.include_title_slides {
            slides.push(config.title_slide(song));
        }

        let song_slides = if config.uppercase_lyrics {
            segment(&lyrics.to_uppercase(), config.lines_per_slide)?
        } else {
            segment(lyrics, config.lines_per_slide)?
        };
        tracing::debug!("{}: {} lyric slides", song.title, song_slides.len());
        slides.extend(song_slides);

        if config.include_blank_slides {
            slides.push(String::new());
        }
    }

    // No separator after the last song
    if config.include_blank_slides && !slides.is_empty() {
        slides.pop();
    }

    Ok(slides)
}
