//! Waterfall dialogs - the per-turn step machine
//!
//! A dialog is a named, ordered list of steps. Each step runs against the
//! conversation state and the turn's text and returns a [`StepOutcome`]:
//! the replies it wants emitted plus a [`StepSignal`] telling the frame
//! what to do next. `Next` falls through to the following step within the
//! same turn; `End` pops the frame.
//!
//! A cursor past the last step of a dialog - including any cursor into
//! `searchDialog`, which has no steps yet - ends the frame with no replies
//! rather than faulting, so a stale persisted frame can never stall the
//! stack.

use tracing::{debug, warn};

use crate::aggregate::{ConversationState, DialogFrame, DialogName};
use crate::policy::ResponsePolicy;
use crate::ports::IntentClassifier;
use crate::value_objects::Reply;

/// What the frame does after a step has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    /// Pop the frame; the turn stops consuming steps from it
    End,
    /// Advance the cursor and run the next step within the same turn
    Next,
}

/// Result of running one waterfall step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Replies this step wants emitted, in order
    pub replies: Vec<Reply>,
    /// What the frame does next
    pub signal: StepSignal,
}

impl StepOutcome {
    /// End the frame without emitting anything
    pub fn end() -> Self {
        Self {
            replies: Vec::new(),
            signal: StepSignal::End,
        }
    }

    /// End the frame after emitting the given replies
    pub fn end_with(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            signal: StepSignal::End,
        }
    }

    /// Fall through to the next step without emitting anything
    pub fn next() -> Self {
        Self {
            replies: Vec::new(),
            signal: StepSignal::Next,
        }
    }
}

/// Run the step a frame's cursor points at
pub async fn run_step<C>(
    frame: &DialogFrame,
    state: &mut ConversationState,
    utterance: &str,
    classifier: &C,
) -> StepOutcome
where
    C: IntentClassifier + ?Sized,
{
    match (frame.dialog, frame.cursor) {
        (DialogName::Main, 0) => greeting_step(state),
        (DialogName::Main, 1) => main_menu_step(utterance, classifier).await,
        // searchDialog has no steps, and a cursor past a dialog's last
        // step ends the frame instead of faulting.
        _ => StepOutcome::end(),
    }
}

/// First step of `mainDialog`: greet the user exactly once
///
/// On first contact this emits the greeting + help pair, flips the greeting
/// flag, and ends the turn - the user sees nothing else until their next
/// message. Once greeted, it falls straight through to the menu step.
fn greeting_step(state: &mut ConversationState) -> StepOutcome {
    if state.is_greeted() {
        return StepOutcome::next();
    }

    debug!("greeting first-contact user");
    state.mark_greeted();
    StepOutcome::end_with(vec![Reply::Greeting, Reply::Help])
}

/// Second step of `mainDialog`: classify the utterance and dispatch
///
/// Always terminal. A classifier failure is recovered here as "no intent",
/// which flows to the confused fallback; it is never fatal to the turn.
async fn main_menu_step<C>(utterance: &str, classifier: &C) -> StepOutcome
where
    C: IntentClassifier + ?Sized,
{
    let candidates = match classifier.classify(utterance).await {
        Ok(candidates) => candidates,
        Err(error) => {
            warn!(%error, "intent classifier failed, treating as no intent");
            Vec::new()
        }
    };

    let top = ResponsePolicy::top_intent(&candidates);
    debug!(top_intent = ?top.and_then(|i| i.name.as_deref()), "menu dispatch");
    StepOutcome::end_with(ResponsePolicy::replies_for(top))
}
