//! Turn processor implementation

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::aggregate::{ConversationState, DialogFrame, DialogName, DialogStack};
use crate::dialogs::{self, StepSignal};
use crate::error::{BotError, BotResult};
use crate::ports::{IntentClassifier, MessageSink, StateStore};
use crate::value_objects::{Message, Reply};

/// Orchestrates one conversation turn end to end
///
/// All collaborators are injected; the processor holds no ambient state of
/// its own. One instance serves any number of conversations, and turns for
/// different conversations may run concurrently - the caller guarantees at
/// most one in-flight turn per conversation id.
pub struct TurnProcessor<S, C, K>
where
    S: StateStore,
    C: IntentClassifier,
    K: MessageSink,
{
    store: Arc<S>,
    classifier: Arc<C>,
    sink: Arc<K>,
}

impl<S, C, K> TurnProcessor<S, C, K>
where
    S: StateStore,
    C: IntentClassifier,
    K: MessageSink,
{
    /// Create a new turn processor
    pub fn new(store: Arc<S>, classifier: Arc<C>, sink: Arc<K>) -> Self {
        Self {
            store,
            classifier,
            sink,
        }
    }

    /// Process one inbound turn
    ///
    /// Loads the conversation state (creating defaults on first contact),
    /// records the utterance, commits it before any dialog step runs, then
    /// resumes the active dialog frame - or begins `mainDialog` when the
    /// stack produced no output and is empty - commits the resulting state,
    /// and delivers the emitted messages in order.
    ///
    /// Any state-store failure surfaces as [`BotError::StateUnavailable`]
    /// and no messages from this turn are considered delivered.
    pub async fn process_turn(
        &self,
        conversation_id: Uuid,
        utterance: &str,
    ) -> BotResult<Vec<Message>> {
        debug!(%conversation_id, "turn start");

        let mut state = self
            .store
            .load_conversation(conversation_id)
            .await
            .map_err(BotError::StateUnavailable)?;
        state.record_utterance(utterance);

        // The utterance is committed before any step runs, so it survives
        // a failure in a later step.
        self.store
            .commit_conversation(conversation_id, &state)
            .await
            .map_err(BotError::StateUnavailable)?;

        let mut stack = self
            .store
            .load_dialog_stack(conversation_id)
            .await
            .map_err(BotError::StateUnavailable)?;

        let mut replies = self.run_active_frame(&mut stack, &mut state, utterance).await;

        // No response and no active dialog left: begin the entry dialog on
        // this same turn.
        if replies.is_empty() && stack.is_empty() {
            stack.push(DialogFrame::begin(DialogName::Main));
            replies = self.run_active_frame(&mut stack, &mut state, utterance).await;
        }

        self.store
            .commit_dialog_stack(conversation_id, &stack)
            .await
            .map_err(BotError::StateUnavailable)?;
        self.store
            .commit_conversation(conversation_id, &state)
            .await
            .map_err(BotError::StateUnavailable)?;

        let mut messages = Vec::with_capacity(replies.len());
        for reply in replies {
            let message = Message::from_reply(conversation_id, reply);
            self.sink
                .send(conversation_id, &message)
                .await
                .map_err(BotError::DeliveryFailed)?;
            messages.push(message);
        }

        info!(%conversation_id, delivered = messages.len(), "turn complete");
        Ok(messages)
    }

    /// Process a turn, degrading any fault to a single apology message
    ///
    /// This is the outermost entry point for hosts that must answer every
    /// turn: a failed turn logs the error, sends the apology, and the turn
    /// is treated as complete. A failure to deliver the apology itself is
    /// logged and swallowed.
    pub async fn process_turn_with_recovery(
        &self,
        conversation_id: Uuid,
        utterance: &str,
    ) -> Vec<Message> {
        match self.process_turn(conversation_id, utterance).await {
            Ok(messages) => messages,
            Err(turn_error) => {
                error!(%conversation_id, error = %turn_error, "turn failed");
                let apology = Message::from_reply(conversation_id, Reply::Apology);
                if let Err(send_error) = self.sink.send(conversation_id, &apology).await {
                    error!(%conversation_id, error = %send_error, "apology delivery failed");
                }
                vec![apology]
            }
        }
    }

    /// Run steps of the active frame until one signals End
    ///
    /// `Next` advances the cursor and continues within the same turn; `End`
    /// pops the frame and stops. An empty stack runs nothing.
    async fn run_active_frame(
        &self,
        stack: &mut DialogStack,
        state: &mut ConversationState,
        utterance: &str,
    ) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Some(frame) = stack.top().copied() {
            let outcome =
                dialogs::run_step(&frame, state, utterance, self.classifier.as_ref()).await;
            replies.extend(outcome.replies);
            match outcome.signal {
                StepSignal::End => {
                    stack.pop();
                    break;
                }
                StepSignal::Next => stack.advance_top(),
            }
        }
        replies
    }
}
