//! In-process record store for tests and throwaway servers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use slayz_common::StoreError;
use slayz_core::RecordStore;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection.
    pub async fn insert(&self, name: &str, records: Vec<Value>) {
        self.collections
            .write()
            .await
            .insert(name.to_string(), records);
    }

    /// Make every subsequent write fail, to exercise persistence errors.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_collection(&self, name: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn write_collection(&self, name: &str, records: &[Value]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("writes to {name} disabled")));
        }
        self.collections
            .write()
            .await
            .insert(name.to_string(), records.to_vec());
        Ok(())
    }
}
