pub mod types;

use crate::config::ApiConfig;
use crate::lyrics::{self, FetchedSong};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use types::LyricsResponse;

/// Anything that can look songs up by title and artist
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Returns `Ok(None)` when the source has no such song.
    /// `Err` is reserved for the source itself failing.
    /// Found lyrics have already been through [`lyrics::clean`].
    async fn lookup(&self, title: &str, artist: &str) -> Result<Option<FetchedSong>>;
}

pub struct HttpLyricsClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpLyricsClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Fill the `{title}` and `{artist}` placeholders of the configured URL
    pub fn build_url(&self, title: &str, artist: &str) -> String {
        self.config
            .url_template
            .replacen("{title}", &urlencoding::encode(title), 1)
            .replacen("{artist}", &urlencoding::encode(artist), 1)
    }
}

#[async_trait]
impl LyricsSource for HttpLyricsClient {
    async fn lookup(&self, title: &str, artist: &str) -> Result<Option<FetchedSong>> {
        let url = self.build_url(title, artist);

        tracing::debug!("Fetching lyrics: {}", url);

        let mut request = self.client.get(&url);
        if let Some(auth) = &self.config.auth {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to lyrics API failed: {}", url))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<LyricsResponse>()
                    .await
                    .context("Lyrics API returned malformed JSON")?;
                Ok(into_fetched(body, title, artist))
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!("Lyrics not found for: {} - {}", artist, title);
                Ok(None)
            }
            status => {
                anyhow::bail!("Unexpected status code from lyrics API: {}", status);
            }
        }
    }
}

/// Turn an API body into a cleaned song, keeping the requested names when the API omits them
fn into_fetched(body: LyricsResponse, title: &str, artist: &str) -> Option<FetchedSong> {
    let Some(raw) = body.lyrics else {
        tracing::debug!("Lyrics API has no lyrics for: {} - {}", artist, title);
        return None;
    };

    Some(FetchedSong {
        title: body.title.unwrap_or_else(|| title.to_string()),
        artist: body.artist.unwrap_or_else(|| artist.to_string()),
        lyrics: lyrics::clean(&raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn client(template: &str) -> HttpLyricsClient {
        client_with_auth(template, None)
    }

    fn client_with_auth(template: &str, auth: Option<&str>) -> HttpLyricsClient {
        HttpLyricsClient::new(ApiConfig {
            url_template: template.to_string(),
            auth: auth.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    /// Answer a single request with a canned response; yields the raw request head
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let template = format!("http://{}/{{title}}/{{artist}}/", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (template, server)
    }

    fn authorization_header(request: &str) -> Option<String> {
        request.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("authorization")
                .then(|| value.trim().to_string())
        })
    }

    #[tokio::test]
    async fn test_lookup_found_returns_cleaned_lyrics() {
        let raw = "[Verse]\nx (y)\n\nz";
        let body = serde_json::json!({ "title": "Foo", "lyrics": raw }).to_string();
        let (template, server) = serve_once("200 OK", &body).await;

        let song = client(&template)
            .lookup("foo song", "bar")
            .await
            .unwrap()
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /foo%20song/bar/ HTTP/1.1"));
        assert_eq!(song.title, "Foo");
        assert_eq!(song.artist, "bar");
        assert_eq!(song.lyrics, lyrics::clean(raw));
        assert!(!song.lyrics.contains("[Verse]"));
        assert!(!song.lyrics.contains("(y)"));
        assert!(song.lyrics.contains("\n\nz"));
    }

    #[tokio::test]
    async fn test_lookup_404_is_not_found() {
        let (template, server) = serve_once("404 Not Found", "{}").await;
        let result = client(&template).lookup("foo", "bar").await.unwrap();
        server.await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_an_error() {
        let (template, server) = serve_once("500 Internal Server Error", "oops").await;
        let result = client(&template).lookup("foo", "bar").await;
        server.await.unwrap();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_lookup_sends_authorization_only_when_configured() {
        let (template, server) = serve_once("404 Not Found", "{}").await;
        client_with_auth(&template, Some("Bearer secret"))
            .lookup("foo", "bar")
            .await
            .unwrap();
        let request = server.await.unwrap();
        assert_eq!(authorization_header(&request).as_deref(), Some("Bearer secret"));

        let (template, server) = serve_once("404 Not Found", "{}").await;
        client(&template).lookup("foo", "bar").await.unwrap();
        let request = server.await.unwrap();
        assert_eq!(authorization_header(&request), None);
    }

    #[test]
    fn test_build_url() {
        let client = client("api://lyrics/{artist}/{title}");
        assert_eq!(client.build_url("foo", "bar"), "api://lyrics/bar/foo");
    }

    #[test]
    fn test_build_url_encodes_and_replaces_once() {
        let client = client("http://localhost/{title}/{artist}/?again={title}");
        assert_eq!(
            client.build_url("Song 1", "AC/DC"),
            "http://localhost/Song%201/AC%2FDC/?again={title}"
        );
    }

    #[test]
    fn test_into_fetched_cleans_lyrics() {
        let body = LyricsResponse {
            title: Some("Foo".to_string()),
            artist: Some("Bar".to_string()),
            lyrics: Some("[Verse]\nline (echo)\n".to_string()),
        };
        let song = into_fetched(body, "foo", "bar").unwrap();
        assert_eq!(song.title, "Foo");
        assert_eq!(song.artist, "Bar");
        assert_eq!(song.lyrics, "line");
    }

    #[test]
    fn test_into_fetched_without_lyrics_is_not_found() {
        let body: LyricsResponse = serde_json::from_str("{}").unwrap();
        assert!(into_fetched(body, "foo", "bar").is_none());
    }

    #[test]
    fn test_into_fetched_falls_back_to_requested_names() {
        let body: LyricsResponse = serde_json::from_str(r#"{"lyrics": "la"}"#).unwrap();
        let song = into_fetched(body, "foo", "bar").unwrap();
        assert_eq!((song.title.as_str(), song.artist.as_str()), ("foo", "bar"));
    }
}
