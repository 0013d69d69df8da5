//! Chat message submission: validate, authenticate, authorize, persist.
//!
//! Fan-out is done by the [`crate::Hub`] only after [`MessageService::submit`]
//! returns, so no subscriber ever sees a message the store has not accepted.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use slayz_common::{new_id, HubError};
use tracing::{error, info};

use crate::registry::Identity;
use crate::store::{self, collections, Authenticator, RecordStore};

/// A persisted chat message. The same value is stored and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    /// Author's name at send time.
    pub username: String,
    pub content: String,
    /// RFC 3339, UTC, millisecond precision.
    pub created_at: String,
}

impl ChatMessage {
    pub fn new(channel_id: &str, author: &Identity, content: &str) -> Self {
        Self {
            id: new_id(),
            channel_id: channel_id.to_string(),
            user_id: author.user_id.clone(),
            username: author.username.clone(),
            content: content.trim().to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Handles `sendMessage` up to and including persistence.
pub struct MessageService {
    store: Arc<dyn RecordStore>,
    auth: Arc<dyn Authenticator>,
}

impl MessageService {
    pub fn new(store: Arc<dyn RecordStore>, auth: Arc<dyn Authenticator>) -> Self {
        Self { store, auth }
    }

    /// Validate and persist a submission, returning the stored message and
    /// its author.
    pub async fn submit(
        &self,
        channel_id: Option<&str>,
        content: Option<&str>,
        token: Option<&str>,
    ) -> Result<(ChatMessage, Identity), HubError> {
        let (Some(channel_id), Some(content), Some(token)) = (
            channel_id.filter(|s| !s.is_empty()),
            content.filter(|s| !s.is_empty()),
            token.filter(|s| !s.is_empty()),
        ) else {
            return Err(HubError::Validation("incomplete data".into()));
        };
        if content.trim().is_empty() {
            return Err(HubError::Validation("message required".into()));
        }

        let author = self
            .auth
            .authenticate(token)
            .await?
            .ok_or_else(|| HubError::Authentication("invalid token".into()))?;

        store::authorize_post(self.store.as_ref(), &author.user_id, channel_id).await?;

        let message = ChatMessage::new(channel_id, &author, content);
        if let Err(e) =
            store::append_record(self.store.as_ref(), collections::MESSAGES, &message).await
        {
            error!(channel = %channel_id, error = %e, "Failed to persist message");
            return Err(e.into());
        }

        info!(channel = %channel_id, message_id = %message.id, user_id = %author.user_id, "Message stored");
        Ok((message, author))
    }
}
