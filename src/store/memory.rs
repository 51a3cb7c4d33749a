use crate::core::store::RecordCollection;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection backed by a `BTreeMap`, used when nothing should
/// outlive the process.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    inner: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordCollection for MemoryCollection {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let records = self.inner.lock().await;
        let value = records.get(key).cloned();
        debug!(key, found = value.is_some(), "Memory GET");
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut records = self.inner.lock().await;
        debug!(key, "Memory PUT");
        records.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut records = self.inner.lock().await;
        debug!(key, "Memory REMOVE");
        Ok(records.remove(key).is_some())
    }

    async fn entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let records = self.inner.lock().await;
        Ok(records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
