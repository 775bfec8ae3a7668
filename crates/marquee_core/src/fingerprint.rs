//! Content fingerprinting for substantive-duplicate detection.
//!
//! A fingerprint is a hash over the identities of the titles an article
//! covers, not over its prose. Two runs that select the same titles in
//! any order produce the same fingerprint even when the generated text
//! differs, which is what duplicate detection needs.

use crate::MediaKey;
use sha2::{Digest, Sha256};

/// Compute the fingerprint of a selection of media items.
///
/// Keys are sorted before hashing so ordering does not matter.
///
/// # Examples
///
/// ```
/// use marquee_core::{MediaKey, MediaType, content_fingerprint};
///
/// let a = MediaKey { media_type: MediaType::Movie, id: 42 };
/// let b = MediaKey { media_type: MediaType::Tv, id: 7 };
/// assert_eq!(content_fingerprint(&[a, b]), content_fingerprint(&[b, a]));
/// assert_ne!(content_fingerprint(&[a]), content_fingerprint(&[b]));
/// ```
pub fn content_fingerprint(keys: &[MediaKey]) -> String {
    let mut sorted: Vec<MediaKey> = keys.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut hasher = Sha256::new();
    for key in &sorted {
        hasher.update(key.media_type.to_string().as_bytes());
        hasher.update(b":");
        hasher.update(key.id.to_le_bytes());
        hasher.update(b";");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaType;

    fn key(media_type: MediaType, id: u64) -> MediaKey {
        MediaKey { media_type, id }
    }

    #[test]
    fn order_independent() {
        let keys_a = [key(MediaType::Movie, 1), key(MediaType::Tv, 2)];
        let keys_b = [key(MediaType::Tv, 2), key(MediaType::Movie, 1)];
        assert_eq!(content_fingerprint(&keys_a), content_fingerprint(&keys_b));
    }

    #[test]
    fn media_type_distinguishes_same_id() {
        let movie = [key(MediaType::Movie, 5)];
        let tv = [key(MediaType::Tv, 5)];
        assert_ne!(content_fingerprint(&movie), content_fingerprint(&tv));
    }

    #[test]
    fn duplicate_keys_collapse() {
        let once = [key(MediaType::Movie, 9)];
        let twice = [key(MediaType::Movie, 9), key(MediaType::Movie, 9)];
        assert_eq!(content_fingerprint(&once), content_fingerprint(&twice));
    }

    #[test]
    fn empty_selection_is_stable() {
        assert_eq!(content_fingerprint(&[]), content_fingerprint(&[]));
    }
}
