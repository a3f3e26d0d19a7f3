//! Conversation aggregate - the per-conversation state the bot persists
//!
//! Two blobs are persisted per conversation, under distinct namespaces so
//! they never collide:
//! - [`ConversationState`]: greeting flag, accumulated utterance log, and
//!   the (currently dormant) search-session fields
//! - [`DialogStack`]: the ordered stack of active dialog frames
//!
//! Both round-trip through serde; wire names match the property names the
//! conversation store already holds, so existing blobs stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the user has been greeted in this conversation
///
/// Monotonic: once `Greeted`, the state never reverts. Serialized as the
/// store's historical string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GreetingStatus {
    /// No greeting has been sent yet
    #[serde(rename = "not greeted")]
    NotGreeted,
    /// The greeting + help pair has been sent
    #[serde(rename = "greeted")]
    Greeted,
}

/// Per-conversation state, created with defaults on first contact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationState {
    /// Greeting flag; never reverts once set
    #[serde(rename = "Greeted")]
    greeted: GreetingStatus,

    /// Every inbound utterance, in arrival order
    #[serde(rename = "UtteranceList")]
    utterance_log: Vec<String>,

    /// Pending search query (dormant; kept for data compatibility)
    #[serde(rename = "Search")]
    pub search_query: String,

    /// Whether a multi-turn search is active (dormant; kept for data
    /// compatibility)
    #[serde(rename = "Searching")]
    pub searching: bool,

    /// When this conversation state was first created
    #[serde(rename = "StartedAt")]
    pub started_at: DateTime<Utc>,

    /// When the most recent utterance was recorded
    #[serde(rename = "LastTurnAt")]
    pub last_turn_at: Option<DateTime<Utc>>,
}

impl ConversationState {
    /// Create state for a brand-new conversation
    pub fn new() -> Self {
        Self {
            greeted: GreetingStatus::NotGreeted,
            utterance_log: Vec::new(),
            search_query: String::new(),
            searching: false,
            started_at: Utc::now(),
            last_turn_at: None,
        }
    }

    /// Current greeting status
    pub fn greeted(&self) -> GreetingStatus {
        self.greeted
    }

    /// Whether the greeting + help pair has already been sent
    pub fn is_greeted(&self) -> bool {
        self.greeted == GreetingStatus::Greeted
    }

    /// Mark the user as greeted. Idempotent; there is no inverse.
    pub fn mark_greeted(&mut self) {
        self.greeted = GreetingStatus::Greeted;
    }

    /// Append one inbound utterance to the log
    pub fn record_utterance(&mut self, utterance: impl Into<String>) {
        self.utterance_log.push(utterance.into());
        self.last_turn_at = Some(Utc::now());
    }

    /// The utterance log, in arrival order
    pub fn utterance_log(&self) -> &[String] {
        &self.utterance_log
    }

    /// Number of inbound turns recorded so far
    pub fn turn_count(&self) -> usize {
        self.utterance_log.len()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the dialogs the bot knows
///
/// A closed set rather than free-form strings, so a persisted frame can
/// only reference a dialog that exists. Wire names are the dialog ids the
/// store already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogName {
    /// The entry dialog: Greeting then MainMenu
    #[serde(rename = "mainDialog")]
    Main,
    /// The search dialog; declared but has no steps yet
    #[serde(rename = "searchDialog")]
    Search,
}

/// A named dialog plus the step cursor at which it resumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogFrame {
    /// Which dialog this frame runs
    pub dialog: DialogName,
    /// Index of the step that executes next time the frame resumes
    pub cursor: usize,
}

impl DialogFrame {
    /// A fresh frame for the given dialog, positioned at its first step
    pub fn begin(dialog: DialogName) -> Self {
        Self { dialog, cursor: 0 }
    }
}

/// The per-conversation stack of active dialog frames
///
/// The top frame is the active one; at most one frame receives any given
/// turn. Under the current dialog set depth never exceeds 1, but the stack
/// discipline (push to begin, pop on End) is kept general.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DialogStack {
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    /// An empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// The active frame, if any
    pub fn top(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    /// Push a frame, making it the active one
    pub fn push(&mut self, frame: DialogFrame) {
        self.frames.push(frame);
    }

    /// Pop the active frame
    pub fn pop(&mut self) -> Option<DialogFrame> {
        self.frames.pop()
    }

    /// Advance the active frame's step cursor by one
    pub fn advance_top(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.cursor += 1;
        }
    }

    /// Whether no dialog is active
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Current stack depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
