//! Collaborator interfaces: the record store and token authentication.
//!
//! The store only knows named collections of JSON records; the typed views
//! and the channel access rule live here.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slayz_common::{HubError, StoreError};
use tracing::warn;

use crate::registry::Identity;

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SERVERS: &str = "servers";
    pub const CHANNELS: &str = "channels";
    pub const MESSAGES: &str = "messages";
}

/// Durable storage of whole collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records of a collection. A collection that was never written is empty.
    async fn read_collection(&self, name: &str) -> Result<Vec<Value>, StoreError>;

    /// Replace a collection's records.
    async fn write_collection(&self, name: &str, records: &[Value]) -> Result<(), StoreError>;
}

/// Maps an opaque token to a user.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` when the token is unknown.
    async fn authenticate(&self, token: &str) -> Result<Option<Identity>, StoreError>;
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl ServerRecord {
    pub fn admits(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.members.iter().any(|m| m == user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: String,
    pub server_id: String,
    #[serde(default)]
    pub name: String,
}

/// Read a collection as typed records, skipping (and logging) malformed ones.
pub async fn read_records<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    let raw = store.read_collection(collection).await?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(collection, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect())
}

/// May `user_id` post in `channel_id`?
///
/// The channel must exist, and its server must list the user as owner or member.
pub async fn authorize_post(
    store: &dyn RecordStore,
    user_id: &str,
    channel_id: &str,
) -> Result<(), HubError> {
    let channels: Vec<ChannelRecord> = read_records(store, collections::CHANNELS).await?;
    let channel = channels
        .into_iter()
        .find(|c| c.id == channel_id)
        .ok_or_else(|| HubError::NotFound("channel not found".into()))?;

    let servers: Vec<ServerRecord> = read_records(store, collections::SERVERS).await?;
    match servers.iter().find(|s| s.id == channel.server_id) {
        Some(server) if server.admits(user_id) => Ok(()),
        _ => Err(HubError::Authorization("access denied".into())),
    }
}

/// Append one record to a collection (read, push, write back).
///
/// Two concurrent appends to the same collection can lose one of them;
/// the store offers no compare-and-swap.
pub async fn append_record<T: Serialize>(
    store: &dyn RecordStore,
    collection: &str,
    record: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(record).map_err(|source| StoreError::Serde {
        collection: collection.to_string(),
        source,
    })?;
    let mut records = store.read_collection(collection).await?;
    records.push(value);
    store.write_collection(collection, &records).await
}

#[cfg(test)]
pub(crate) mod testing {
    //! Minimal in-memory store and authenticator for unit tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct TestStore {
        pub collections: Mutex<HashMap<String, Vec<Value>>>,
        pub fail_writes: AtomicBool,
    }

    impl TestStore {
        pub fn with(collection: &str, records: Vec<Value>) -> Self {
            let store = Self::default();
            store
                .collections
                .lock()
                .unwrap()
                .insert(collection.to_string(), records);
            store
        }

        pub fn put(&self, collection: &str, records: Vec<Value>) {
            self.collections
                .lock()
                .unwrap()
                .insert(collection.to_string(), records);
        }

        pub fn get(&self, collection: &str) -> Vec<Value> {
            self.collections
                .lock()
                .unwrap()
                .get(collection)
                .cloned()
                .unwrap_or_default()
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl RecordStore for TestStore {
        async fn read_collection(&self, name: &str) -> Result<Vec<Value>, StoreError> {
            Ok(self.get(name))
        }

        async fn write_collection(&self, name: &str, records: &[Value]) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("writes disabled".into()));
            }
            self.put(name, records.to_vec());
            Ok(())
        }
    }

    #[async_trait]
    impl Authenticator for TestStore {
        async fn authenticate(&self, token: &str) -> Result<Option<Identity>, StoreError> {
            let users: Vec<UserRecord> = read_records(self, collections::USERS).await?;
            Ok(users
                .into_iter()
                .find(|u| u.token.as_deref() == Some(token))
                .map(|u| Identity {
                    user_id: u.id,
                    username: u.username,
                }))
        }
    }
}
