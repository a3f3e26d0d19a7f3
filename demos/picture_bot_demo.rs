//! PictureBot Walkthrough
//!
//! This example demonstrates how to:
//! - Wire a turn processor from its three collaborators
//! - Greet a user on first contact
//! - Route utterances through the intent classifier to canned replies
//! - Survive a classifier outage with the confused fallback

use std::sync::Arc;

use async_trait::async_trait;
use picturebot_dialog::{
    ClassifiedIntent, InMemoryStateStore, IntentClassifier, Message, MessageSink, StateStore,
    TurnProcessor,
};
use uuid::Uuid;

/// Stand-in for the external NLU service, with a tiny scripted model
struct DemoClassifier;

#[async_trait]
impl IntentClassifier for DemoClassifier {
    async fn classify(&self, utterance: &str) -> anyhow::Result<Vec<ClassifiedIntent>> {
        let candidates = match utterance {
            "order pics please" => vec![ClassifiedIntent::named("OrderPic", 0.91)],
            "share my pics" => vec![ClassifiedIntent::named("SharePic", 0.84)],
            "find my beach photos" => vec![ClassifiedIntent::named("SearchPic", 0.79)],
            "the endpoint is down" => anyhow::bail!("prediction endpoint timed out"),
            _ => vec![ClassifiedIntent::named("None", 0.12)],
        };
        Ok(candidates)
    }
}

/// Prints each outbound message to stdout
struct ConsoleSink;

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn send(&self, _conversation_id: Uuid, message: &Message) -> anyhow::Result<()> {
        println!("   bot> {}", message.text);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== PictureBot Dialog Demo ===\n");

    let store = Arc::new(InMemoryStateStore::new());
    let processor = TurnProcessor::new(store.clone(), Arc::new(DemoClassifier), Arc::new(ConsoleSink));

    let conversation_id = Uuid::new_v4();
    let turns = [
        "hi",
        "order pics please",
        "share my pics",
        "find my beach photos",
        "the endpoint is down",
        "blah blah",
    ];

    for (idx, utterance) in turns.iter().enumerate() {
        println!("{}. user> {utterance}", idx + 1);
        processor.process_turn_with_recovery(conversation_id, utterance).await;
        println!();
    }

    let state = store.load_conversation(conversation_id).await?;
    println!(
        "Conversation recorded {} turns; greeted = {}",
        state.turn_count(),
        state.is_greeted()
    );

    println!("\n=== Demo completed ===");
    Ok(())
}
