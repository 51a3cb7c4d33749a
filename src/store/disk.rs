use crate::core::store::RecordCollection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use std::sync::Arc;
use tracing::debug;

/// A collection stored in one fjall partition.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Arc<Keyspace>, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist keyspace")
    }
}

#[async_trait]
impl RecordCollection for DiskCollection {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read record {key}"))?;
        debug!(key, found = value.is_some(), "Disk GET");
        Ok(value.map(|v| v.to_vec()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.partition
            .insert(key, value)
            .with_context(|| format!("Failed to write record {key}"))?;
        debug!(key, "Disk PUT");
        self.persist()
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let existed = self
            .partition
            .contains_key(key)
            .with_context(|| format!("Failed to read record {key}"))?;
        if existed {
            self.partition
                .remove(key)
                .with_context(|| format!("Failed to remove record {key}"))?;
            self.persist()?;
        }
        debug!(key, existed, "Disk REMOVE");
        Ok(existed)
    }

    async fn entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item.context("Failed to scan records")?;
            let key = String::from_utf8(key.to_vec()).context("Record key is not UTF-8")?;
            entries.push((key, value.to_vec()));
        }
        Ok(entries)
    }
}
