//! Identity token generation for table-view entities

use uuid::Uuid;

/// Source of the random token embedded at the front of every column id.
///
/// Column ids are persisted, so the generator is injected rather than
/// called globally: production code uses [`RandomTokenGenerator`], tests
/// supply a deterministic implementation.
pub trait TokenGenerator: Send + Sync {
    /// Produce a fresh token. Tokens should avoid the column id delimiter;
    /// see `make_column_id` in the table crate.
    fn next_token(&self) -> String;
}

impl<F> TokenGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_token(&self) -> String {
        self()
    }
}

/// Random tokens cut from UUIDv4 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomTokenGenerator {
    length: usize,
}

impl RandomTokenGenerator {
    /// Default token length, comparable to a short id.
    pub const DEFAULT_LENGTH: usize = 12;

    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH)
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn next_token(&self) -> String {
        let mut token = String::with_capacity(self.length + 32);
        while token.len() < self.length {
            token.push_str(&Uuid::new_v4().simple().to_string());
        }
        token.truncate(self.length);
        token
    }
}
