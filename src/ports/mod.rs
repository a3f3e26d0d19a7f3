//! Capabilities the turn processor consumes
//!
//! These traits are the whole contract between the dialog core and its
//! collaborators. Hosting, credentials, and the persistence engine live on
//! the other side of them. Implementations report failures as
//! `anyhow::Error`; the processor decides which failures are fatal to a
//! turn.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::{ConversationState, DialogStack};
use crate::value_objects::{ClassifiedIntent, Message};

/// Durable storage for per-conversation state blobs
///
/// Loads return a default instance when nothing is stored yet. Conversation
/// state and dialog state are kept under distinct namespaces and committed
/// separately.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the conversation state, or a default one if absent
    async fn load_conversation(&self, conversation_id: Uuid)
        -> anyhow::Result<ConversationState>;

    /// Durably write the conversation state
    async fn commit_conversation(
        &self,
        conversation_id: Uuid,
        state: &ConversationState,
    ) -> anyhow::Result<()>;

    /// Load the dialog stack, or an empty one if absent
    async fn load_dialog_stack(&self, conversation_id: Uuid) -> anyhow::Result<DialogStack>;

    /// Durably write the dialog stack
    async fn commit_dialog_stack(
        &self,
        conversation_id: Uuid,
        stack: &DialogStack,
    ) -> anyhow::Result<()>;
}

/// External intent classifier
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Rank intent candidates for one utterance; may return an empty list
    async fn classify(&self, utterance: &str) -> anyhow::Result<Vec<ClassifiedIntent>>;
}

/// Outbound message channel back to the user
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver one message; called once per emitted message, in emission
    /// order
    async fn send(&self, conversation_id: Uuid, message: &Message) -> anyhow::Result<()>;
}
