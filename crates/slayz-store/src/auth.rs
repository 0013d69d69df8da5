//! Token authentication against the `users` collection.

use std::sync::Arc;

use async_trait::async_trait;
use slayz_common::StoreError;
use slayz_core::registry::Identity;
use slayz_core::store::{collections, read_records, UserRecord};
use slayz_core::{Authenticator, RecordStore};

/// Resolves a bearer token by matching it against stored user records.
pub struct TokenAuthenticator {
    store: Arc<dyn RecordStore>,
}

impl TokenAuthenticator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Option<Identity>, StoreError> {
        if token.is_empty() {
            return Ok(None);
        }
        let users: Vec<UserRecord> = read_records(self.store.as_ref(), collections::USERS).await?;
        Ok(users
            .into_iter()
            .find(|u| u.token.as_deref() == Some(token))
            .map(|u| Identity {
                user_id: u.id,
                username: u.username,
            }))
    }
}
