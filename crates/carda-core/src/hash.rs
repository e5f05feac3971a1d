//! Content hashing for deterministic rendering verification.
//!
//! Produces a SHA-256 hash of frame buffer data, enabling bit-exact
//! output verification across platforms and runs. The same digest is used
//! to key decoded image sources.

use sha2::{Digest, Sha256};

use crate::frame::FrameBuffer;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn finish(hasher: Sha256) -> ContentHash {
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentHash::from_bytes(bytes)
}

/// Compute the content hash of a rendered frame buffer.
pub fn hash_frame(frame: &FrameBuffer) -> ContentHash {
    let mut hasher = Sha256::new();
    // Dimensions are part of the digest so equal bytes at different sizes differ.
    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update(&frame.data);
    finish(hasher)
}

/// Hash arbitrary bytes, e.g. an image source string.
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    finish(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_hash_deterministic() {
        let frame1 = FrameBuffer::solid(10, 10, &Color::RED);
        let frame2 = FrameBuffer::solid(10, 10, &Color::RED);
        assert_eq!(hash_frame(&frame1), hash_frame(&frame2));
    }

    #[test]
    fn test_hash_different_content() {
        let frame1 = FrameBuffer::solid(10, 10, &Color::RED);
        let frame2 = FrameBuffer::solid(10, 10, &Color::BLUE);
        assert_ne!(hash_frame(&frame1), hash_frame(&frame2));
    }

    #[test]
    fn test_hash_different_size() {
        let frame1 = FrameBuffer::solid(10, 10, &Color::RED);
        let frame2 = FrameBuffer::solid(20, 5, &Color::RED);
        assert_ne!(hash_frame(&frame1), hash_frame(&frame2));
    }

    #[test]
    fn test_hash_bytes_known_value() {
        assert_eq!(
            hash_bytes(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_hex_format() {
        let frame = FrameBuffer::solid(2, 2, &Color::BLACK);
        let hash = hash_frame(&frame);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(format!("{}", hash), hex);
    }
}
