//! Storage abstractions for persisted records

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// An ordered collection of raw records keyed by string.
///
/// Entries come back sorted by key, so time-ordered keys list oldest first.
#[async_trait]
pub trait RecordCollection: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    /// Returns whether the key was present.
    async fn remove(&self, key: &str) -> Result<bool>;
    async fn entries(&self) -> Result<Vec<(String, Vec<u8>)>>;
}

/// Hands out named collections.
pub trait Store: Send + Sync {
    fn get_collection(&self, name: &str) -> Result<Arc<dyn RecordCollection>>;
}
