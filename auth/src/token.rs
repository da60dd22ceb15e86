use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a generated token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Opaque session token generator.
///
/// Tokens are 256 bits drawn from the operating system CSPRNG and rendered
/// as URL-safe base64. At this entropy, collisions are treated as negligible
/// and no retry-on-collision is performed by consumers.
pub struct TokenGenerator;

impl TokenGenerator {
    /// Create a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh unguessable token.
    ///
    /// # Returns
    /// URL-safe base64 string encoding 32 random bytes
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE.encode(bytes)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let generator = TokenGenerator::new();
        let first = generator.generate();
        let second = generator.generate();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_is_url_safe() {
        let generator = TokenGenerator::new();
        let token = generator.generate();

        // 32 bytes of base64 with padding
        assert_eq!(token.len(), 44);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[test]
    fn test_token_decodes_to_expected_length() {
        let generator = TokenGenerator::new();
        let token = generator.generate();

        let decoded = URL_SAFE.decode(token).expect("Failed to decode token");
        assert_eq!(decoded.len(), TOKEN_BYTES);
    }
}
