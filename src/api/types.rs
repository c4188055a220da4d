use serde::Deserialize;

/// Body returned by the lyrics API. A body without `lyrics` means no match.
#[derive(Debug, Deserialize)]
pub struct LyricsResponse {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub lyrics: Option<String>,
}
