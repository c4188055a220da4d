pub mod api;
pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod fetch;
pub mod lyrics;
pub mod messages;
pub mod paths;
pub mod render;
pub mod slides;

pub use error::{Error, Result};
pub use lyrics::{clean, SongEntry};
pub use slides::{assemble, segment, SlideshowConfig};
