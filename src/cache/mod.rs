pub mod signature;

use crate::lyrics::FetchedSong;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// What an earlier lookup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedLookup {
    Found(FetchedSong),
    NotFound,
}

/// Remembers lookups, including misses, so repeated set lists don't hit the API
pub struct LyricsCache {
    conn: Connection,
}

impl LyricsCache {
    /// Open or create the SQLite database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Cache that lives only as long as this value
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Create table if it doesn't exist; NULL lyrics marks a miss
        conn.execute(
            "CREATE TABLE IF NOT EXISTS lyrics_cache (
                signature TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                lyrics TEXT,
                timestamp INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(Self { conn })
    }

    /// Look up a signature hash
    pub fn get(&self, signature: &str) -> Result<Option<CachedLookup>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title, artist, lyrics FROM lyrics_cache WHERE signature = ?1")?;

        let row = stmt
            .query_row([signature], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .optional()?;

        Ok(row.map(|(title, artist, lyrics)| match lyrics {
            Some(lyrics) => CachedLookup::Found(FetchedSong {
                title,
                artist,
                lyrics,
            }),
            None => CachedLookup::NotFound,
        }))
    }

    /// Store a successful lookup
    pub fn add_found(&self, signature: &str, song: &FetchedSong) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO lyrics_cache (signature, title, artist, lyrics, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![signature, song.title, song.artist, song.lyrics, now()?],
        )?;

        Ok(())
    }

    /// Store a miss
    pub fn add_not_found(&self, signature: &str, title: &str, artist: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO lyrics_cache (signature, title, artist, lyrics, timestamp)
             VALUES (?1, ?2, ?3, NULL, ?4)",
            rusqlite::params![signature, title, artist, now()?],
        )?;

        Ok(())
    }
}

fn now() -> Result<i64> {
    Ok(std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs() as i64)
}
