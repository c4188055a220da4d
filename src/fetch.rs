use crate::{
    api::LyricsSource,
    cache::{signature::SongSignature, CachedLookup, LyricsCache},
    lyrics::{FetchedSong, SongEntry},
    messages::FetchEvent,
    render, slides,
};
use anyhow::{Context, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Semaphore};

const RATE_LIMIT_PER_SEC: u32 = 5; // 5 requests/second max
const MAX_CONCURRENT_LOOKUPS: usize = 4; // Number of lookups in flight

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub max_concurrent: usize,
    pub requests_per_second: u32,
    /// Lines per slide used to pre-split fetched lyrics for review; `None` keeps stanzas whole
    pub review_lines_per_slide: Option<usize>,
    /// Skip cached answers (fresh answers are still written to the cache)
    pub refresh: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_concurrent: MAX_CONCURRENT_LOOKUPS,
            requests_per_second: RATE_LIMIT_PER_SEC,
            review_lines_per_slide: Some(slides::DEFAULT_LINES_PER_SLIDE),
            refresh: false,
        }
    }
}

/// Result of fetching a whole set list
#[derive(Debug)]
pub struct FetchReport {
    /// Every requested song, in the requested order
    pub songs: Vec<SongEntry>,
    /// Songs still without lyrics
    pub missing: usize,
    /// Every lookup that reached the API failed; the API itself is likely down or misconfigured
    pub api_error: bool,
}

/// Shared state for lookup tasks
struct FetchState {
    source: Arc<dyn LyricsSource>,
    cache: Option<Mutex<LyricsCache>>,
    rate_limiter: DefaultDirectRateLimiter,
    semaphore: Semaphore,
    refresh: bool,
}

enum Outcome {
    Found(FetchedSong),
    NotFound,
    Failed,
}

/// Look up lyrics for every song that doesn't have any yet.
///
/// A failed lookup never aborts the batch: the song keeps `lyrics: None` and is
/// counted as missing. Found lyrics are pre-split into review slides separated
/// by blank lines, ready for hand editing before the final build.
pub async fn run(
    songs: Vec<SongEntry>,
    source: Arc<dyn LyricsSource>,
    cache: Option<LyricsCache>,
    options: &FetchOptions,
    tx: mpsc::UnboundedSender<FetchEvent>,
) -> Result<FetchReport> {
    if options.review_lines_per_slide == Some(0) {
        anyhow::bail!(crate::Error::InvalidLinesPerSlide);
    }

    let quota = NonZeroU32::new(options.requests_per_second)
        .context("Requests per second must be at least 1")?;

    let state = Arc::new(FetchState {
        source,
        cache: cache.map(Mutex::new),
        rate_limiter: RateLimiter::direct(Quota::per_second(quota)),
        semaphore: Semaphore::new(options.max_concurrent.max(1)),
        refresh: options.refresh,
    });

    let to_look_up = songs.iter().filter(|song| !song.has_lyrics()).count();
    let _ = tx.send(FetchEvent::Started {
        total: songs.len(),
        to_look_up,
    });
    tracing::info!("Fetching lyrics for {} of {} songs", to_look_up, songs.len());

    // One task per lookup; handles are awaited in song order
    let mut handles = Vec::with_capacity(songs.len());
    for song in &songs {
        if song.has_lyrics() {
            let _ = tx.send(FetchEvent::Provided {
                name: song.display_name(),
            });
            handles.push(None);
            continue;
        }

        let state = state.clone();
        let tx = tx.clone();
        let title = song.title.clone();
        let artist = song.artist.clone();
        handles.push(Some(tokio::spawn(async move {
            lookup_song(&title, &artist, &state, &tx).await
        })));
    }

    let mut fetched = Vec::with_capacity(songs.len());
    let mut attempted = 0;
    let mut failed = 0;

    for (song, handle) in songs.into_iter().zip(handles) {
        let Some(handle) = handle else {
            fetched.push(song);
            continue;
        };

        // A crashed lookup task costs only its own song
        let (outcome, from_api) = match handle.await {
            Ok(result) => result,
            Err(e) => {
                let name = song.display_name();
                tracing::error!("Lookup task for {} died: {}", name, e);
                let _ = tx.send(FetchEvent::Error {
                    name,
                    error: e.to_string(),
                });
                (Outcome::Failed, true)
            }
        };
        if from_api {
            attempted += 1;
        }

        match outcome {
            Outcome::Found(found) => {
                let review = slides::segment(&found.lyrics, options.review_lines_per_slide)?;
                let mut entry = SongEntry::from(found);
                entry.lyrics = Some(render::text::render(&review));
                fetched.push(entry);
            }
            Outcome::NotFound => fetched.push(song),
            Outcome::Failed => {
                failed += 1;
                fetched.push(song);
            }
        }
    }

    let missing = fetched.iter().filter(|song| !song.has_lyrics()).count();
    let api_error = attempted > 0 && failed == attempted;

    let _ = tx.send(FetchEvent::Complete {
        found: fetched.len() - missing,
        missing,
    });

    if api_error {
        tracing::error!("All {} lyrics lookups failed", attempted);
    }
    tracing::info!(
        "Fetch complete: {} songs, {} missing lyrics",
        fetched.len(),
        missing
    );

    Ok(FetchReport {
        songs: fetched,
        missing,
        api_error,
    })
}

/// Look up one song, cache first. The flag tells whether the API was asked.
async fn lookup_song(
    title: &str,
    artist: &str,
    state: &FetchState,
    tx: &mpsc::UnboundedSender<FetchEvent>,
) -> (Outcome, bool) {
    let name = SongEntry::new(title, artist).display_name();
    let sig_hash = SongSignature::new(title, artist).generate_hash();

    // Check cache
    if !state.refresh {
        if let Some(cached) = cache_get(state, &sig_hash).await {
            return match cached {
                CachedLookup::Found(song) => {
                    let _ = tx.send(FetchEvent::CacheHit { name, found: true });
                    (Outcome::Found(song), false)
                }
                CachedLookup::NotFound => {
                    let _ = tx.send(FetchEvent::CacheHit { name, found: false });
                    (Outcome::NotFound, false)
                }
            };
        }
    }

    let Ok(_permit) = state.semaphore.acquire().await else {
        tracing::error!("Lookup pool closed before {} could run", name);
        return (Outcome::Failed, false);
    };

    // Wait for rate limiter
    state.rate_limiter.until_ready().await;

    match state.source.lookup(title, artist).await {
        Ok(Some(song)) => {
            cache_put(state, &sig_hash, Some(&song), title, artist).await;
            let _ = tx.send(FetchEvent::Found { name });
            (Outcome::Found(song), true)
        }
        Ok(None) => {
            cache_put(state, &sig_hash, None, title, artist).await;
            let _ = tx.send(FetchEvent::NotFound { name });
            (Outcome::NotFound, true)
        }
        Err(e) => {
            tracing::error!("Lookup failed for {}: {:#}", name, e);
            let _ = tx.send(FetchEvent::Error {
                name,
                error: e.to_string(),
            });
            (Outcome::Failed, true)
        }
    }
}

async fn cache_get(state: &FetchState, sig_hash: &str) -> Option<CachedLookup> {
    let cache = state.cache.as_ref()?.lock().await;
    match cache.get(sig_hash) {
        Ok(hit) => hit,
        Err(e) => {
            tracing::warn!("Cache read failed: {}", e);
            None
        }
    }
}

async fn cache_put(
    state: &FetchState,
    sig_hash: &str,
    song: Option<&FetchedSong>,
    title: &str,
    artist: &str,
) {
    let Some(cache) = &state.cache else {
        return;
    };
    let cache = cache.lock().await;
    let result = match song {
        Some(song) => cache.add_found(sig_hash, song),
        None => cache.add_not_found(sig_hash, title, artist),
    };
    if let Err(e) = result {
        tracing::warn!("Cache write failed: {}", e);
    }
}
