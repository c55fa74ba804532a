use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha1::{Digest, Sha1};

/// GUID appended to the client key before hashing.
pub const HANDSHAKE_MAGIC: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Accept token for a client handshake key: `base64(sha1(key ++ magic))`.
pub fn accept_token(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(HANDSHAKE_MAGIC.as_bytes());
    BASE64.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_key_produces_known_token() {
        assert_eq!(accept_token("dGhlIHNhbXBsZSBub25jZQ=="), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[test]
    fn token_is_padded_base64_of_a_sha1_digest() {
        let token = accept_token("x3JJHMbDL1EzLkh9GBhXDw==");
        assert_eq!(token, "HSmrc0sMlYUkAGmm5OPpG2HaGWk=");
        // 20 digest bytes -> 28 chars with one pad
        assert_eq!(token.len(), 28);
        assert!(token.ends_with('='));
    }
}
