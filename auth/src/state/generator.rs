use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Anti-forgery token binding one federated login attempt to one user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateToken(String);

impl StateToken {
    /// Get token as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a value presented by the client, in constant time.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl From<String> for StateToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Generator for unguessable state tokens.
///
/// Tokens carry 128 bits drawn from the operating system CSPRNG, encoded as
/// unpadded URL-safe base64 so they can travel in query strings and cookies
/// without escaping.
pub struct StateTokenGenerator;

impl StateTokenGenerator {
    pub const ENTROPY_BYTES: usize = 16;

    pub fn new() -> Self {
        Self
    }

    /// Draw a fresh state token.
    pub fn generate(&self) -> StateToken {
        let mut bytes = [0u8; Self::ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        StateToken(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl Default for StateTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
