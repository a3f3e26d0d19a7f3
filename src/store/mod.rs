//! In-memory state store
//!
//! Keeps every conversation's blobs in a process-local map. For local
//! debugging and tests only; anything stored here is gone when the process
//! restarts. Production deployments supply their own [`StateStore`] backed
//! by durable storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::aggregate::{ConversationState, DialogStack};
use crate::ports::StateStore;

/// Namespace for the conversation state blob
pub const PICTURE_STATE_PROPERTY: &str = "PictureBotAccessors.PictureState";

/// Namespace for the dialog stack blob
pub const DIALOG_STATE_PROPERTY: &str = "DialogState";

/// Process-local [`StateStore`] holding JSON blobs per conversation
///
/// Each conversation owns a property bag keyed by namespace, mirroring how
/// the durable stores lay their blobs out, so the serialized shape here is
/// the same one a real store would round-trip.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    blobs: RwLock<HashMap<Uuid, HashMap<String, serde_json::Value>>>,
}

impl InMemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    async fn load_blob<T>(&self, conversation_id: Uuid, property: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let blobs = self.blobs.read().await;
        match blobs.get(&conversation_id).and_then(|bag| bag.get(property)) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(T::default()),
        }
    }

    async fn commit_blob<T>(
        &self,
        conversation_id: Uuid,
        property: &str,
        value: &T,
    ) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let blob = serde_json::to_value(value)?;
        let mut blobs = self.blobs.write().await;
        blobs
            .entry(conversation_id)
            .or_default()
            .insert(property.to_string(), blob);
        Ok(())
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load_conversation(
        &self,
        conversation_id: Uuid,
    ) -> anyhow::Result<ConversationState> {
        self.load_blob(conversation_id, PICTURE_STATE_PROPERTY).await
    }

    async fn commit_conversation(
        &self,
        conversation_id: Uuid,
        state: &ConversationState,
    ) -> anyhow::Result<()> {
        self.commit_blob(conversation_id, PICTURE_STATE_PROPERTY, state)
            .await
    }

    async fn load_dialog_stack(&self, conversation_id: Uuid) -> anyhow::Result<DialogStack> {
        self.load_blob(conversation_id, DIALOG_STATE_PROPERTY).await
    }

    async fn commit_dialog_stack(
        &self,
        conversation_id: Uuid,
        stack: &DialogStack,
    ) -> anyhow::Result<()> {
        self.commit_blob(conversation_id, DIALOG_STATE_PROPERTY, stack)
            .await
    }
}
