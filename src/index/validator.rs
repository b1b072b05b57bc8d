//! Token admissibility rules
//!
//! A metric name is split on `.` into tokens; each token must pass the
//! validator before it is planted in the trie. A rejected token drops the
//! whole metric.

/// Maximum accepted token length in bytes
pub const TOKEN_MAX_LENGTH: usize = 500;

/// Decides which tokens may enter the index.
///
/// In strict mode a token must be non-empty, at most [`TOKEN_MAX_LENGTH`]
/// bytes, and consist only of `[A-Za-z0-9_-]`. With strict mode off the
/// byte-class check is skipped but emptiness and length are still enforced.
#[derive(Debug, Clone, Copy)]
pub struct TokenValidator {
    strict: bool,
}

impl TokenValidator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Check whether a single token may be inserted.
    pub fn is_admissible(&self, token: &str) -> bool {
        if token.is_empty() || token.len() > TOKEN_MAX_LENGTH {
            return false;
        }
        if !self.strict {
            return true;
        }
        token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }
}

impl Default for TokenValidator {
    fn default() -> Self {
        Self { strict: true }
    }
}
