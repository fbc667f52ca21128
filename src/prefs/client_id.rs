// Anonymous per-browser identity for the preferences store. There is no
// account here (authentication lives in the backend), so preferences are
// keyed by a random cookie. Only the hash of the token ever touches disk.
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const CLIENT_TOKEN_BYTES: usize = 32;
pub const CLIENT_COOKIE: &str = "bp_client";

/// Generate a URL-safe client token using the OS RNG.
/// Base64 URL-safe, no padding; 32 bytes -> ~43 char token.
pub fn generate_client_token() -> String {
    let mut buf = [0u8; CLIENT_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Hash a client token with SHA-256. Store this output in DB (BLOB).
pub fn hash_client_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_url_safe_no_pad() {
        let t = generate_client_token();
        assert!(t
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(t.len() >= 40); // 32 bytes => usually 43 chars
    }

    #[test]
    fn hash_is_deterministic_and_input_sensitive() {
        assert_eq!(hash_client_token("abc"), hash_client_token("abc"));
        assert_ne!(hash_client_token("abc"), hash_client_token("abd"));
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(generate_client_token(), generate_client_token());
    }
}
