use crate::lyrics::SongEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A set list between fetching and building, meant to be edited by hand.
///
/// Missing lyrics stay `null` in the file until someone types them in.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub songs: Vec<SongEntry>,
}

impl Draft {
    pub fn new(songs: Vec<SongEntry>) -> Self {
        Self { songs }
    }

    /// Parse a plain song list: one `Title | Artist` per line.
    /// The artist is optional; blank lines and `#` comments are skipped.
    pub fn parse_song_list(text: &str) -> Self {
        let songs = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.split_once('|') {
                Some((title, artist)) => SongEntry::new(title.trim(), artist.trim()),
                None => SongEntry::new(line, ""),
            })
            .filter(|song| !song.title.is_empty())
            .collect();

        Self { songs }
    }

    /// Load a draft (`.json`) or a plain song list (anything else)
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let draft = if is_json {
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse draft: {}", path.display()))?
        } else {
            Self::parse_song_list(&text)
        };

        tracing::info!(
            "Loaded {} songs from {} ({} missing lyrics)",
            draft.songs.len(),
            path.display(),
            draft.missing().len()
        );

        Ok(draft)
    }

    /// Save to disk using atomic write pattern
    pub fn save(&self, path: &Path) -> Result<()> {
        // Write to temporary file first
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).context("Failed to serialize draft")?;

        std::fs::write(&temp_path, json).with_context(|| {
            format!(
                "Failed to write temporary draft file: {}",
                temp_path.display()
            )
        })?;

        // Atomic rename to final destination
        std::fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                path.display()
            )
        })?;

        tracing::info!(
            "Draft saved to {} ({} songs)",
            path.display(),
            self.songs.len()
        );
        Ok(())
    }

    /// Songs that still have no lyrics
    pub fn missing(&self) -> Vec<&SongEntry> {
        self.songs.iter().filter(|song| !song.has_lyrics()).collect()
    }
}
