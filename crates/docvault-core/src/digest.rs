//! Content digests.
//!
//! The registry stores a 64-character fingerprint per document and only
//! checks its length. [`ContentDigest`] is the conventional way to produce
//! one: lowercase hex BLAKE3 of the document bytes.

/// Helper for computing document fingerprints.
pub struct ContentDigest;

impl ContentDigest {
    /// Hex-encoded BLAKE3 hash of `content`. Always
    /// [`DIGEST_LEN`](crate::validation::DIGEST_LEN) characters.
    pub fn of(content: &[u8]) -> String {
        let hash = blake3::hash(content);
        hex::encode(hash.as_bytes())
    }
}
