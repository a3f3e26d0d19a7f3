//! End-to-end conversation flows

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use picturebot_dialog::{
    ClassifiedIntent, InMemoryStateStore, IntentClassifier, Message, MessageSink, Reply,
    StateStore, TurnProcessor,
};
use uuid::Uuid;

/// Classifier with a fixed utterance -> intent table
struct TableClassifier {
    table: HashMap<&'static str, ClassifiedIntent>,
}

impl TableClassifier {
    fn picture_bot() -> Self {
        let mut table = HashMap::new();
        table.insert("order pics please", ClassifiedIntent::named("OrderPic", 0.91));
        table.insert("share my pics", ClassifiedIntent::named("SharePic", 0.84));
        table.insert("search for cats", ClassifiedIntent::named("SearchPic", 0.79));
        table.insert("hello", ClassifiedIntent::named("Greeting", 0.88));
        Self { table }
    }
}

#[async_trait]
impl IntentClassifier for TableClassifier {
    async fn classify(&self, utterance: &str) -> anyhow::Result<Vec<ClassifiedIntent>> {
        Ok(self
            .table
            .get(utterance)
            .cloned()
            .map(|intent| vec![intent, ClassifiedIntent::named("None", 0.1)])
            .unwrap_or_default())
    }
}

/// Sink for flows that assert on the returned messages instead
#[derive(Default)]
struct DiscardSink;

#[async_trait]
impl MessageSink for DiscardSink {
    async fn send(&self, _conversation_id: Uuid, _message: &Message) -> anyhow::Result<()> {
        Ok(())
    }
}

fn picture_bot() -> (
    TurnProcessor<InMemoryStateStore, TableClassifier, DiscardSink>,
    Arc<InMemoryStateStore>,
) {
    let store = Arc::new(InMemoryStateStore::new());
    (
        TurnProcessor::new(
            store.clone(),
            Arc::new(TableClassifier::picture_bot()),
            Arc::new(DiscardSink::default()),
        ),
        store,
    )
}

fn replies(messages: &[Message]) -> Vec<Reply> {
    messages.iter().map(|m| m.reply.clone()).collect()
}

#[tokio::test]
async fn full_conversation_flow() {
    let (processor, store) = picture_bot();
    let conversation = Uuid::new_v4();

    // Turn 1: first contact is greeted and nothing else happens
    let turn = processor.process_turn(conversation, "hello").await.unwrap();
    assert_eq!(replies(&turn), vec![Reply::Greeting, Reply::Help]);

    // Turn 2: order flows through the menu
    let turn = processor
        .process_turn(conversation, "order pics please")
        .await
        .unwrap();
    assert_eq!(turn[0].reply, Reply::OrderConfirmation);

    // Turn 3: share
    let turn = processor
        .process_turn(conversation, "share my pics")
        .await
        .unwrap();
    assert_eq!(turn[0].reply, Reply::ShareConfirmation);

    // Turn 4: search
    let turn = processor
        .process_turn(conversation, "search for cats")
        .await
        .unwrap();
    assert_eq!(turn[0].reply, Reply::SearchConfirmation);

    // Turn 5: an utterance the classifier knows nothing about
    let turn = processor.process_turn(conversation, "asdf").await.unwrap();
    assert_eq!(replies(&turn), vec![Reply::Confused]);

    // The whole history survived, in order
    let state = store.load_conversation(conversation).await.unwrap();
    assert_eq!(state.turn_count(), 5);
    assert_eq!(state.utterance_log()[0], "hello");
    assert_eq!(state.utterance_log()[4], "asdf");
    assert!(state.is_greeted());

    // Dormant search fields stayed untouched
    assert!(!state.searching);
    assert!(state.search_query.is_empty());
}

#[tokio::test]
async fn greeting_intent_after_first_contact_greets_again_via_menu() {
    let (processor, _store) = picture_bot();
    let conversation = Uuid::new_v4();

    processor.process_turn(conversation, "hello").await.unwrap();

    // Saying hello again now reaches the menu, which replays greeting +
    // help and echoes the score
    let turn = processor.process_turn(conversation, "hello").await.unwrap();
    assert_eq!(
        replies(&turn),
        vec![
            Reply::Greeting,
            Reply::Help,
            Reply::LuisScore {
                intent: "Greeting".to_string(),
                score: 0.88,
            },
        ]
    );
}

#[tokio::test]
async fn conversations_do_not_share_state() {
    let (processor, store) = picture_bot();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let turn = processor.process_turn(alice, "hello").await.unwrap();
    assert_eq!(replies(&turn), vec![Reply::Greeting, Reply::Help]);

    // Bob is a fresh conversation and gets his own greeting
    let turn = processor.process_turn(bob, "order pics please").await.unwrap();
    assert_eq!(replies(&turn), vec![Reply::Greeting, Reply::Help]);

    let alice_state = store.load_conversation(alice).await.unwrap();
    let bob_state = store.load_conversation(bob).await.unwrap();
    assert_eq!(alice_state.utterance_log(), ["hello"]);
    assert_eq!(bob_state.utterance_log(), ["order pics please"]);
}

#[tokio::test]
async fn turns_for_different_conversations_run_concurrently() {
    let store = Arc::new(InMemoryStateStore::new());
    let processor = Arc::new(TurnProcessor::new(
        store.clone(),
        Arc::new(TableClassifier::picture_bot()),
        Arc::new(DiscardSink::default()),
    ));

    let conversations: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
    let mut handles = Vec::new();
    for conversation in conversations.clone() {
        let processor = processor.clone();
        handles.push(tokio::spawn(async move {
            processor.process_turn(conversation, "hello").await.unwrap()
        }));
    }

    for handle in handles {
        let messages = handle.await.unwrap();
        assert_eq!(replies(&messages), vec![Reply::Greeting, Reply::Help]);
    }

    for conversation in conversations {
        let state = store.load_conversation(conversation).await.unwrap();
        assert_eq!(state.turn_count(), 1);
    }
}

#[tokio::test]
async fn state_survives_a_new_processor_instance() {
    let store = Arc::new(InMemoryStateStore::new());
    let conversation = Uuid::new_v4();

    {
        let processor = TurnProcessor::new(
            store.clone(),
            Arc::new(TableClassifier::picture_bot()),
            Arc::new(DiscardSink::default()),
        );
        processor.process_turn(conversation, "hello").await.unwrap();
    }

    // A fresh processor over the same store picks up where the last left
    // off: the user is already greeted, so the menu runs directly
    let processor = TurnProcessor::new(
        store.clone(),
        Arc::new(TableClassifier::picture_bot()),
        Arc::new(DiscardSink::default()),
    );
    let turn = processor
        .process_turn(conversation, "order pics please")
        .await
        .unwrap();
    assert_eq!(turn[0].reply, Reply::OrderConfirmation);

    let state = store.load_conversation(conversation).await.unwrap();
    assert_eq!(state.turn_count(), 2);
}
