/// Progress messages sent from a batch fetch to whoever is displaying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    Started {
        total: usize,
        to_look_up: usize,
    },
    /// The song already had lyrics; nothing was looked up
    Provided {
        name: String,
    },
    Found {
        name: String,
    },
    CacheHit {
        name: String,
        found: bool,
    },
    NotFound {
        name: String,
    },
    Error {
        name: String,
        error: String,
    },
    Complete {
        found: usize,
        missing: usize,
    },
}

impl FetchEvent {
    /// One line for the progress log
    pub fn to_log_line(&self) -> String {
        match self {
            FetchEvent::Started { total, to_look_up } => {
                format!("Looking up {} of {} songs", to_look_up, total)
            }
            FetchEvent::Provided { name } => format!("[○] {}", name),
            FetchEvent::Found { name } => format!("[✓] {}", name),
            FetchEvent::CacheHit { name, found: true } => format!("[~] {}", name),
            FetchEvent::CacheHit { name, found: false } => format!("[~✗] {}", name),
            FetchEvent::NotFound { name } => format!("[✗] {}", name),
            FetchEvent::Error { name, error } => format!("[!] {}: {}", name, error),
            FetchEvent::Complete { found, missing } => {
                format!("Done: {} songs with lyrics, {} missing", found, missing)
            }
        }
    }
}
