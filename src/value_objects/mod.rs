//! Value objects for the PictureBot dialog domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An intent candidate returned by the classifier for one utterance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedIntent {
    /// Intent label; `None` and `Some("None")` both mean "no actionable intent"
    pub name: Option<String>,
    /// Confidence score from 0.0 to 1.0
    pub confidence: f32,
}

impl ClassifiedIntent {
    /// Create a named intent candidate
    pub fn named(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: Some(name.into()),
            confidence,
        }
    }

    /// Create a candidate with no intent label
    pub fn unnamed(confidence: f32) -> Self {
        Self {
            name: None,
            confidence,
        }
    }
}

/// Canned reply templates the bot can emit
///
/// The set mirrors the bot's response vocabulary one-to-one; the fixed
/// English text lives in [`Reply::render`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Reply {
    /// First-contact or intent-driven greeting
    Greeting,
    /// Capability overview
    Help,
    /// Fallback when no intent could be determined
    Confused,
    /// Acknowledge an order request
    OrderConfirmation,
    /// Acknowledge a share request
    ShareConfirmation,
    /// Acknowledge a search request
    SearchConfirmation,
    /// Diagnostic echo of the winning intent and its score
    LuisScore { intent: String, score: f32 },
    /// Sent when turn processing fails outright
    Apology,
}

impl Reply {
    /// Render the reply to its outbound text
    pub fn render(&self) -> String {
        match self {
            Reply::Greeting => "Hi, I'm PictureBot!".to_string(),
            Reply::Help => {
                "I can search for pictures, share pictures and order prints of pictures."
                    .to_string()
            }
            Reply::Confused => "I'm sorry, I don't understand.".to_string(),
            Reply::OrderConfirmation => {
                "Ordering standard prints of your picture(s)...".to_string()
            }
            Reply::ShareConfirmation => "Posting your picture(s) on twitter...".to_string(),
            Reply::SearchConfirmation => "Ok, searching for your picture(s)...".to_string(),
            Reply::LuisScore { intent, score } => format!("Intent: {intent} ({score})."),
            Reply::Apology => "Sorry, it looks like something went wrong.".to_string(),
        }
    }
}

/// An outbound message addressed to one conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Conversation this message belongs to
    pub conversation_id: Uuid,
    /// The reply template it was rendered from
    pub reply: Reply,
    /// Rendered text
    pub text: String,
    /// When the message was produced
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Render a reply into an outbound message
    pub fn from_reply(conversation_id: Uuid, reply: Reply) -> Self {
        let text = reply.render();
        Self {
            conversation_id,
            reply,
            text,
            sent_at: Utc::now(),
        }
    }
}
