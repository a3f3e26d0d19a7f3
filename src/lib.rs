//! PictureBot dialog module
//!
//! This crate is the conversational core of PictureBot. It processes one
//! turn at a time: greet a user exactly once, classify the utterance
//! through an external intent classifier, and dispatch to one of a handful
//! of canned replies (order, share, search, help, confused). It provides:
//! - A turn processor with a fixed persistence order (utterance committed
//!   before any dialog step runs, state committed again after)
//! - A per-conversation dialog stack with at-most-one-active-dialog
//!   semantics and explicit waterfall steps (End / Next)
//! - A pure response policy, testable without any collaborator
//! - Capability traits for the state store, intent classifier, and
//!   outbound message sink, so hosting and persistence stay outside
//!
//! Natural-language understanding itself, transport, and the persistence
//! engine are collaborators behind the `ports` traits, not part of this
//! crate.

pub mod aggregate;
pub mod dialogs;
pub mod error;
pub mod handlers;
pub mod policy;
pub mod ports;
pub mod store;
pub mod value_objects;

// Re-export main types
pub use aggregate::{
    ConversationState, DialogFrame, DialogName, DialogStack, GreetingStatus,
};

pub use dialogs::{StepOutcome, StepSignal};

pub use error::{BotError, BotResult};

pub use handlers::TurnProcessor;

pub use policy::ResponsePolicy;

pub use ports::{IntentClassifier, MessageSink, StateStore};

pub use store::InMemoryStateStore;

pub use value_objects::{ClassifiedIntent, Message, Reply};
