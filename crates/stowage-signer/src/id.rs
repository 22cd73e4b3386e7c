//! Random identifier generation
//!
//! Signature nonces and generated display names for anonymous blobs both come
//! from an [`IdPolicy`], so deployments can tune length and charset without
//! touching the signing code.

use crate::{Result, SignerError};
use rand::{rngs::OsRng, Rng};

/// URL-safe alphabet used by the default policy
pub const URL_SAFE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Default identifier length (126 bits of entropy over the URL-safe alphabet)
pub const DEFAULT_ID_LENGTH: usize = 21;

/// Length and alphabet for random identifiers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdPolicy {
    length: usize,
    alphabet: Vec<char>,
}

impl IdPolicy {
    /// Create a policy, rejecting ones that cannot produce a usable identifier
    pub fn new(length: usize, alphabet: &str) -> Result<Self> {
        if length == 0 {
            return Err(SignerError::InvalidPolicy("length must be positive".into()));
        }

        let mut chars: Vec<char> = alphabet.chars().collect();
        chars.sort_unstable();
        chars.dedup();

        if chars.len() < 2 {
            return Err(SignerError::InvalidPolicy(
                "alphabet needs at least two distinct characters".into(),
            ));
        }
        if chars.contains(&crate::PAYLOAD_SEPARATOR) {
            return Err(SignerError::InvalidPolicy(format!(
                "alphabet must not contain the payload separator '{}'",
                crate::PAYLOAD_SEPARATOR
            )));
        }

        Ok(Self {
            length,
            alphabet: chars,
        })
    }

    /// Identifier length in characters
    pub fn length(&self) -> usize {
        self.length
    }

    /// Check whether `id` could have been produced by this policy
    pub fn matches(&self, id: &str) -> bool {
        id.chars().count() == self.length && id.chars().all(|c| self.alphabet.contains(&c))
    }

    /// Generate a fresh identifier from the OS RNG
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
            .collect()
    }
}

impl Default for IdPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_ID_LENGTH,
            alphabet: URL_SAFE_ALPHABET.chars().collect(),
        }
    }
}
