use crate::lyrics::normalize_query;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Normalized lookup key; spelling variants of one song share a signature
#[derive(Serialize, Debug)]
pub struct SongSignature {
    pub title: String,
    pub artist: String,
}

impl SongSignature {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: normalize_query(title),
            artist: normalize_query(artist),
        }
    }

    /// Generates a hex-encoded SHA-256 hash of the normalized lookup
    pub fn generate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        // Serialize the struct to JSON to ensure consistent input for the hasher
        if let Ok(serialized) = serde_json::to_vec(self) {
            hasher.update(&serialized);
        }
        let result = hasher.finalize();
        format!("{:x}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelling_variants_share_hash() {
        let a = SongSignature::new("Don't Stop Me Now", "Queen").generate_hash();
        let b = SongSignature::new("dont stop me  now!", "QUEEN").generate_hash();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_title_and_artist_not_interchangeable() {
        let a = SongSignature::new("One", "Two").generate_hash();
        let b = SongSignature::new("Two", "One").generate_hash();
        assert_ne!(a, b);
    }
}
