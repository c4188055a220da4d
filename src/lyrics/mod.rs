pub mod clean;

use serde::{Deserialize, Serialize};

pub use clean::{clean, normalize_query};

/// A song on the set list.
///
/// `lyrics` is `None` when the lookup found nothing; the entry is kept so the
/// user can be asked to type the lyrics in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SongEntry {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl SongEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            lyrics: None,
        }
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    pub fn has_lyrics(&self) -> bool {
        self.lyrics.is_some()
    }

    /// `Title - Artist`, or just the title when the artist is unknown
    pub fn display_name(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

/// A successful lookup result, lyrics already cleaned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSong {
    pub title: String,
    pub artist: String,
    pub lyrics: String,
}

impl From<FetchedSong> for SongEntry {
    fn from(song: FetchedSong) -> Self {
        SongEntry {
            title: song.title,
            artist: song.artist,
            lyrics: Some(song.lyrics),
        }
    }
}
