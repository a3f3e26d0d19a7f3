//! Response policy - pure intent-to-replies dispatch
//!
//! No I/O and no collaborators here; everything is a function of its
//! arguments so the dispatch table is testable in isolation.

use crate::value_objects::{ClassifiedIntent, Reply};

/// Pure mapping from a classified intent to the ordered replies to emit
pub struct ResponsePolicy;

impl ResponsePolicy {
    /// Select the highest-confidence candidate
    ///
    /// Deterministic: strictly greater confidence wins, equal confidence
    /// keeps the earlier candidate.
    pub fn top_intent(candidates: &[ClassifiedIntent]) -> Option<&ClassifiedIntent> {
        let mut best: Option<&ClassifiedIntent> = None;
        for candidate in candidates {
            match best {
                Some(current) if candidate.confidence <= current.confidence => {}
                _ => best = Some(candidate),
            }
        }
        best
    }

    /// The ordered replies for a turn's winning intent
    ///
    /// `None` (no classifier result) and an unlabeled candidate both fall
    /// to the confused reply alone. `"None"` is the classifier's explicit
    /// no-intent label and additionally echoes the score; so does every
    /// recognized intent. Unrecognized labels fall to confused without an
    /// echo.
    pub fn replies_for(top: Option<&ClassifiedIntent>) -> Vec<Reply> {
        let Some(intent) = top else {
            return vec![Reply::Confused];
        };

        let score = Reply::LuisScore {
            intent: intent.name.clone().unwrap_or_default(),
            score: intent.confidence,
        };

        match intent.name.as_deref() {
            None => vec![Reply::Confused],
            Some("None") => vec![Reply::Confused, score],
            Some("Greeting") => vec![Reply::Greeting, Reply::Help, score],
            Some("OrderPic") => vec![Reply::OrderConfirmation, score],
            Some("SharePic") => vec![Reply::ShareConfirmation, score],
            Some("SearchPic") => vec![Reply::SearchConfirmation, score],
            Some(_) => vec![Reply::Confused],
        }
    }
}
