//! BLAKE3-derived identifiers.
//!
//! Issue ids are opaque strings, but Qdrant point ids must be integers or UUIDs, so points
//! are keyed by a 64-bit hash of `(repo, issue id)`. The same hash seeds the stub embedder.

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// With 64 bits the birthday bound sits around four billion items; a per-repo issue
/// corpus is many orders of magnitude below it.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Point id for an issue. The separator keeps `("ab", "c")` and `("a", "bc")` apart.
#[inline]
pub fn issue_point_id(repo: &str, issue_id: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(repo.as_bytes());
    hasher.update(b"|");
    hasher.update(issue_id.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

#[inline]
pub fn hash_text(text: &str) -> u64 {
    hash_to_u64(text.as_bytes())
}
