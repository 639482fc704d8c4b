//! Session loop: greeting, dispatch, recovery and termination

use std::time::Duration;

use herald::Phase;
use herald::Session;
use herald::actions::phrases::{APOLOGY, FAREWELL, GOODBYES, STARTUP, UNKNOWN};
use herald::actions::{ActionName, ActionRequest};
use herald::intent::{Predicate, Rule, RuleTable, Utterance};
use herald::voice::CaptureOutcome;

mod common;

use common::{Harness, ScriptedCapture, SilentCapture};

fn session<C: herald::voice::Capture>(harness: &Harness, capture: C) -> Session<C> {
    Session::new(
        RuleTable::standard(),
        harness.ctx.clone(),
        harness.pipeline.clone(),
        capture,
    )
}

#[tokio::test]
async fn test_greets_then_stops_on_exit_intent() {
    let harness = Harness::new();
    let mut session = session(
        &harness,
        ScriptedCapture::utterances(&["what time is it", "stop", "hello"]),
    );

    let phase = session.run(std::future::pending()).await;

    assert_eq!(phase, Phase::Terminated);
    let spoken = harness.voice.spoken();
    assert_eq!(spoken.len(), 3, "{spoken:?}");
    assert!(STARTUP.contains(&spoken[0].as_str()));
    assert!(spoken[1].contains("The current time is"));
    assert!(GOODBYES.contains(&spoken[2].as_str()));
    assert!(!harness.state.listening_enabled());
}

#[tokio::test]
async fn test_silence_and_noise_are_ignored() {
    let harness = Harness::new();
    let mut session = session(
        &harness,
        ScriptedCapture::new([
            CaptureOutcome::Timeout,
            CaptureOutcome::Unintelligible,
            CaptureOutcome::Utterance("goodbye".to_string()),
        ]),
    );

    session.greet().await;
    assert_eq!(session.step().await, Phase::Listening);
    assert_eq!(session.step().await, Phase::Listening);
    assert_eq!(session.step().await, Phase::Terminated);

    // greeting and goodbye only
    assert_eq!(harness.voice.calls(), 2);
}

#[tokio::test]
async fn test_unknown_utterance_gets_catch_all() {
    let harness = Harness::new();
    let mut session = session(&harness, ScriptedCapture::new([]));

    let action = session.dispatch("sing me a sea shanty").await;

    assert_eq!(action, None);
    let spoken = harness.voice.spoken();
    assert!(UNKNOWN.contains(&spoken[0].as_str()));
    assert!(harness.screen.contains("You said: sing me a sea shanty"));
}

#[tokio::test]
async fn test_end_of_input_says_farewell() {
    let harness = Harness::new();
    let mut session = session(&harness, ScriptedCapture::new([]));

    session.greet().await;
    assert_eq!(session.step().await, Phase::Terminated);
    assert_eq!(harness.voice.spoken().last().unwrap(), FAREWELL);
}

#[tokio::test]
async fn test_interrupt_says_farewell() {
    let harness = Harness::new();
    let mut session = session(&harness, SilentCapture);

    let phase = session
        .run(tokio::time::sleep(Duration::from_millis(10)))
        .await;

    assert_eq!(phase, Phase::Terminated);
    assert!(!harness.state.listening_enabled());
    assert_eq!(harness.voice.spoken().last().unwrap(), FAREWELL);
}

#[tokio::test]
async fn test_panicking_binder_is_reported_and_loop_continues() {
    fn boom(_: &Utterance) -> ActionRequest {
        panic!("binder exploded")
    }

    let harness = Harness::new();
    let table = RuleTable::new(vec![
        Rule::new("explode", Predicate::Word("explode"), boom),
        Rule::new("exit", Predicate::Word("stop"), |_| {
            ActionRequest::new(ActionName::Exit)
        }),
    ]);
    let mut session = Session::new(
        table,
        harness.ctx.clone(),
        harness.pipeline.clone(),
        ScriptedCapture::utterances(&["explode", "stop"]),
    );

    let phase = session.run(std::future::pending()).await;

    assert_eq!(phase, Phase::Terminated);
    let spoken = harness.voice.spoken();
    assert_eq!(spoken[1], APOLOGY);
    assert!(GOODBYES.contains(&spoken[2].as_str()));
}

#[tokio::test]
async fn test_action_panic_renders_apology() {
    let harness = Harness::new();
    let mut session = session(&harness, ScriptedCapture::new([]));

    // a poisoned volume lock makes the fake desktop panic inside the action
    let desktop = harness.desktop.clone();
    let _ = std::thread::spawn(move || {
        let _guard = desktop.volume.lock().unwrap();
        panic!("poison");
    })
    .join();

    let action = session.dispatch("what is the volume").await;

    assert_eq!(action, Some(ActionName::Volume));
    assert_eq!(harness.voice.spoken(), [APOLOGY]);

    // the session keeps going
    assert_eq!(session.dispatch("hello").await, Some(ActionName::Greet));
}

#[tokio::test]
async fn test_privacy_change_applies_before_reply() {
    let harness = Harness::new();
    let mut session = session(&harness, ScriptedCapture::new([]));

    let action = session.dispatch("turn privacy mode on").await;

    assert_eq!(action, Some(ActionName::PrivacyMode));
    assert!(action.is_some_and(ActionName::mutates_session));
    assert!(harness.state.privacy_mode());
    // the confirmation is already text only
    assert_eq!(harness.voice.calls(), 0);
    assert!(harness.screen.contains("[PRIVACY MODE] Text-only mode"));
}

#[tokio::test]
async fn test_wake_activation_greets() {
    let harness = Harness::new();
    let mut session = session(&harness, ScriptedCapture::new([CaptureOutcome::Activated]));

    assert_eq!(session.step().await, Phase::Listening);
    assert_eq!(harness.voice.calls(), 1);
}
