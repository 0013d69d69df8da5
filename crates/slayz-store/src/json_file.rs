//! One pretty-printed JSON array per collection: `<data_dir>/<name>.json`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use slayz_common::StoreError;
use slayz_core::RecordStore;
use tracing::{debug, error};

pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn read_collection(&self, name: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(collection = name, "Collection file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                error!(path = %path.display(), error = %source, "Failed to read collection");
                return Err(StoreError::Io {
                    collection: name.to_string(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| {
            error!(path = %path.display(), error = %source, "Corrupt collection file");
            StoreError::Serde {
                collection: name.to_string(),
                source,
            }
        })
    }

    async fn write_collection(&self, name: &str, records: &[Value]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            collection: name.to_string(),
            source,
        };
        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Serde {
            collection: name.to_string(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(io_err)?;
        let path = self.path_for(name);
        if let Err(source) = tokio::fs::write(&path, json).await {
            error!(path = %path.display(), error = %source, "Failed to write collection");
            return Err(io_err(source));
        }
        debug!(collection = name, records = records.len(), "Collection written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_collection_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.read_collection("messages").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));
        let records = vec![json!({"id": "m1", "content": "hi"})];

        store.write_collection("messages", &records).await.unwrap();
        assert!(dir.path().join("data").join("messages.json").exists());
        assert_eq!(store.read_collection("messages").await.unwrap(), records);
    }

    #[tokio::test]
    async fn file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store
            .write_collection("users", &[json!({"id": "u1"})])
            .await
            .unwrap();
        let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
        assert!(raw.contains("\n  {"));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("channels.json"), "[{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.read_collection("channels").await.unwrap_err();
        assert!(matches!(err, StoreError::Serde { .. }));
    }

    #[tokio::test]
    async fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let store = JsonFileStore::new(blocker.join("data"));
        let err = store.write_collection("messages", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
