//! End-to-end scenarios: a hero level energizer command parsed by the
//! [`Commander`], then completed through a hero / starting round / map
//! difficulty [`ReactionChain`].

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use itertools::Itertools;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    aliases::GameAliases,
    combos::ComboLoader,
    commands::{Commander, CommandResult, InteractiveCommand},
    parser::{FieldKey, Fields, LeafParserExt, MapDifficulty, leaves::RoundParser},
    reactor::{
        AbortReason, ChainContext, ChainOutcome, ChainState, EmojiReactor, MenuReactor,
        ReactionChain, Reactor, SingleTextParser,
    },
    transport::{ChatEvent, EventHub, MockMessenger},
};

const ROOM: &str = "!room:example.com";
const USER: &str = "@user:example.com";

fn commander() -> Commander {
    Commander::new(
        "q",
        Arc::new(GameAliases::new()),
        ComboLoader::new("nonexistent_combos.json".to_string()),
    )
    .unwrap()
}

async fn hero_level_energizer(arguments: &[&str]) -> InteractiveCommand {
    let commander = commander();
    let command = commander
        .parse(&format!("!q hle {}", arguments.join(" ")))
        .unwrap();
    match commander.parse_command(&command).await {
        CommandResult::Interactive(command) => command,
        CommandResult::Reply(reply) => panic!("expected an interactive command, got {reply}"),
    }
}

fn steps() -> Vec<Box<dyn Reactor>> {
    vec![
        Box::new(MenuReactor::heroes()),
        Box::new(SingleTextParser::new(
            RoundParser.keyed(FieldKey::StartingRound),
            "Which round do you place the hero?",
        )),
        Box::new(EmojiReactor::map_difficulty()),
    ]
}

fn messenger(sent: Arc<Mutex<Vec<String>>>) -> MockMessenger {
    let mut messenger = MockMessenger::new();
    messenger.expect_send_reply().returning(move |_, _, _, body| {
        let mut sent = sent.lock().unwrap();
        sent.push(body.to_string());
        Ok(format!("$prompt{}", sent.len()))
    });
    messenger.expect_send_reaction().returning(|_, _, _| Ok(()));
    messenger
}

fn chain(
    fields: Fields,
    sent: Arc<Mutex<Vec<String>>>,
    hub: &EventHub,
    timeout: Duration,
) -> ReactionChain<MockMessenger> {
    let context = ChainContext {
        room_id: ROOM.to_string(),
        sender_id: USER.to_string(),
        event_id: "$command".to_string(),
    };
    ReactionChain::new(
        context,
        fields,
        steps(),
        Arc::new(messenger(sent)),
        hub.clone(),
        timeout,
    )
    .unwrap()
}

fn text(body: &str) -> ChatEvent {
    ChatEvent::Message {
        room_id: ROOM.to_string(),
        sender_id: USER.to_string(),
        event_id: "$answer".to_string(),
        body: body.to_string(),
    }
}

async fn wait_pending(state: &mut watch::Receiver<ChainState>, index: usize) {
    state
        .wait_for(|state| *state == ChainState::Pending(index))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fully_supplied_command_needs_no_step() {
    let command = hero_level_energizer(&["gwen", "r40", "expert"]).await;

    assert_eq!(command.fields.hero(FieldKey::Hero), Some("gwen"));
    assert_eq!(command.fields.round(FieldKey::StartingRound), Some(40));
    assert_eq!(
        command.fields.map_difficulty(FieldKey::MapDifficulty),
        Some(MapDifficulty::Expert)
    );

    let chain = chain(
        command.fields,
        Arc::new(Mutex::new(Vec::new())),
        &EventHub::new(),
        Duration::from_secs(60),
    );
    assert!(chain.pending_steps().is_empty());
}

#[tokio::test]
async fn test_argument_order_does_not_matter() {
    let reference = hero_level_energizer(&["gwen", "r40", "expert"]).await.fields;

    for tokens in ["gwen", "r40", "expert"].into_iter().permutations(3) {
        let fields = hero_level_energizer(&tokens).await.fields;
        assert_eq!(fields, reference, "{tokens:?}");
    }
}

#[tokio::test]
async fn test_partial_command_leaves_two_steps() {
    let command = hero_level_energizer(&["gwen"]).await;

    assert_eq!(command.fields.hero(FieldKey::Hero), Some("gwen"));
    assert!(!command.fields.is_resolved(FieldKey::StartingRound));
    assert!(!command.fields.is_resolved(FieldKey::MapDifficulty));

    let chain = chain(
        command.fields,
        Arc::new(Mutex::new(Vec::new())),
        &EventHub::new(),
        Duration::from_secs(60),
    );
    assert_eq!(
        chain.pending_steps(),
        vec![FieldKey::StartingRound, FieldKey::MapDifficulty]
    );
}

#[tokio::test]
async fn test_invalid_round_does_not_advance() {
    let command = hero_level_energizer(&["gwen"]).await;
    let sent = Arc::new(Mutex::new(Vec::new()));
    let hub = EventHub::new();
    let chain = chain(command.fields, sent.clone(), &hub, Duration::from_secs(3600));
    let mut state = chain.subscribe();
    let run = tokio::spawn(chain.run(CancellationToken::new(), |_, _| {}));

    wait_pending(&mut state, 1).await;
    hub.dispatch(&text("forty"));
    while sent.lock().unwrap().len() < 2 {
        tokio::task::yield_now().await;
    }
    assert_eq!(*state.borrow(), ChainState::Pending(1));
    assert!(sent.lock().unwrap()[1].contains("Try again"));

    hub.dispatch(&text("r40"));
    wait_pending(&mut state, 2).await;

    let prompt = format!("$prompt{}", sent.lock().unwrap().len());
    hub.dispatch(&ChatEvent::Reaction {
        room_id: ROOM.to_string(),
        sender_id: USER.to_string(),
        relates_to: prompt,
        key: "🟠".to_string(),
    });

    match run.await.unwrap() {
        ChainOutcome::Complete { fields, .. } => {
            assert_eq!(fields.round(FieldKey::StartingRound), Some(40));
            assert_eq!(
                fields.map_difficulty(FieldKey::MapDifficulty),
                Some(MapDifficulty::Advanced)
            );
        }
        outcome => panic!("expected completion, got {outcome:?}"),
    }
}

#[tokio::test]
async fn test_only_first_answer_resolves_a_step() {
    let command = hero_level_energizer(&["gwen"]).await;
    let sent = Arc::new(Mutex::new(Vec::new()));
    let hub = EventHub::new();
    let chain = chain(command.fields, sent.clone(), &hub, Duration::from_secs(3600));
    let mut state = chain.subscribe();

    let completed = Arc::new(Mutex::new(0));
    let counter = completed.clone();
    let run = tokio::spawn(chain.run(CancellationToken::new(), move |_, _| {
        *counter.lock().unwrap() += 1;
    }));

    wait_pending(&mut state, 1).await;
    hub.dispatch(&text("r40"));
    hub.dispatch(&text("r41"));
    wait_pending(&mut state, 2).await;

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(*state.borrow(), ChainState::Pending(2));
    // round prompt then difficulty prompt, no re-prompt for the second answer
    assert_eq!(sent.lock().unwrap().len(), 2);

    hub.dispatch(&ChatEvent::Reaction {
        room_id: ROOM.to_string(),
        sender_id: USER.to_string(),
        relates_to: "$prompt2".to_string(),
        key: "🟠".to_string(),
    });

    match run.await.unwrap() {
        ChainOutcome::Complete { fields, .. } => {
            assert_eq!(fields.round(FieldKey::StartingRound), Some(40));
            assert_eq!(
                fields.map_difficulty(FieldKey::MapDifficulty),
                Some(MapDifficulty::Advanced)
            );
        }
        outcome => panic!("expected completion, got {outcome:?}"),
    }
    assert_eq!(*completed.lock().unwrap(), 1);
    assert_eq!(hub.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_step_times_out() {
    let command = hero_level_energizer(&["gwen"]).await;
    let hub = EventHub::new();
    let chain = chain(
        command.fields,
        Arc::new(Mutex::new(Vec::new())),
        &hub,
        Duration::from_secs(60),
    );

    let completed = Arc::new(Mutex::new(0));
    let counter = completed.clone();
    let outcome = chain
        .run(CancellationToken::new(), move |_, _| {
            *counter.lock().unwrap() += 1;
        })
        .await;

    assert_eq!(
        outcome,
        ChainOutcome::Aborted(AbortReason::Timeout(FieldKey::StartingRound))
    );
    assert_eq!(*completed.lock().unwrap(), 0);
    assert_eq!(hub.listener_count(), 0);
}

#[tokio::test]
async fn test_two_rounds_are_sorted() {
    for tokens in [["r5", "r40"], ["r40", "r5"]] {
        let fields = hero_level_energizer(&tokens).await.fields;
        assert_eq!(fields.round(FieldKey::StartingRound), Some(5), "{tokens:?}");
        assert_eq!(fields.round(FieldKey::EnergizerRound), Some(40), "{tokens:?}");
    }
}
