//! Key generation
//!
//! Generates random alphanumeric key strings.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default number of characters in a generated key
pub const DEFAULT_KEY_LENGTH: usize = 16;

/// Generator for random API keys
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    length: usize,
}

impl KeyGenerator {
    /// Create a generator producing keys of `length` characters
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a new key string
    pub fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}
