//! Output pipeline fallthrough, privacy mode and artifact cleanup

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use herald::SessionState;
use herald::background::Background;
use herald::voice::{BackendOutcome, Delivery, OutputPipeline, OutputRequest};

mod common;

use common::{
    ArtifactBackend, CollectingScreen, FailingBackend, HangingBackend, PanickingBackend,
    RecordingBackend, UnreadyBackend,
};

fn pipeline_with(
    state: &Arc<SessionState>,
    screen: &Arc<CollectingScreen>,
    background: &Background,
) -> OutputPipeline {
    OutputPipeline::new(Arc::clone(state), screen.clone(), background.clone())
}

#[tokio::test]
async fn test_first_working_backend_speaks() {
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let first = Arc::new(RecordingBackend::new("first"));
    let second = Arc::new(RecordingBackend::new("second"));

    let pipeline = pipeline_with(&state, &screen, &Background::new())
        .with_backend(first.clone())
        .with_backend(second.clone());

    let report = pipeline.render("hello").await;

    assert_eq!(report.delivery, Delivery::Spoken("first"));
    assert_eq!(first.spoken(), ["hello"]);
    assert_eq!(second.calls(), 0);
    assert_eq!(screen.lines(), ["Assistant: hello"]);
}

#[tokio::test]
async fn test_privacy_mode_never_invokes_a_backend() {
    let state = Arc::new(SessionState::new(true));
    let screen = Arc::new(CollectingScreen::default());
    let voice = Arc::new(RecordingBackend::new("voice"));

    let pipeline = pipeline_with(&state, &screen, &Background::new()).with_backend(voice.clone());
    let report = pipeline.render("secret").await;

    assert_eq!(report.delivery, Delivery::TextOnly);
    assert!(report.attempts.is_empty());
    assert_eq!(voice.calls(), 0);
    assert!(screen.contains("Assistant: secret"));
    assert!(screen.contains("[PRIVACY MODE]"));
}

#[tokio::test]
async fn test_errors_and_panics_fall_through_in_order() {
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let failing = Arc::new(FailingBackend::new("failing"));
    let last = Arc::new(RecordingBackend::new("last"));

    let pipeline = pipeline_with(&state, &screen, &Background::new())
        .with_backend(failing.clone())
        .with_backend(Arc::new(PanickingBackend))
        .with_backend(last.clone());

    let report = pipeline.render("still here").await;

    assert_eq!(report.delivery, Delivery::Spoken("last"));
    let names: Vec<_> = report.attempts.iter().map(|a| a.backend).collect();
    assert_eq!(names, ["failing", "panicking", "last"]);
    assert!(matches!(report.attempts[0].outcome, BackendOutcome::Error(_)));
    assert!(matches!(report.attempts[1].outcome, BackendOutcome::Error(_)));
    assert_eq!(report.attempts[2].outcome, BackendOutcome::Ok);
    assert_eq!(failing.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_falls_through() {
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let fallback = Arc::new(RecordingBackend::new("fallback"));

    let pipeline = pipeline_with(&state, &screen, &Background::new())
        .with_timeout(Duration::from_secs(5))
        .with_backend(Arc::new(HangingBackend))
        .with_backend(fallback.clone());

    let report = pipeline.render("slow").await;

    assert_eq!(report.attempts[0].outcome, BackendOutcome::Timeout);
    assert_eq!(report.delivery, Delivery::Spoken("fallback"));
}

#[tokio::test]
async fn test_all_backends_failing_still_renders_text() {
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());

    let pipeline = pipeline_with(&state, &screen, &Background::new())
        .with_backend(Arc::new(FailingBackend::new("a")))
        .with_backend(Arc::new(PanickingBackend));

    let report = pipeline.render(OutputRequest::new("no voice today")).await;

    assert_eq!(report.delivery, Delivery::TextFallback);
    assert_eq!(report.attempts.len(), 2);
    assert!(screen.contains("Assistant: no voice today"));
    assert!(screen.contains("[TTS not available - text only]"));
}

#[tokio::test]
async fn test_unready_backends_are_skipped() {
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let unready = Arc::new(UnreadyBackend {
        calls: AtomicUsize::new(0),
    });
    let ready = Arc::new(RecordingBackend::new("ready"));

    let pipeline = pipeline_with(&state, &screen, &Background::new())
        .with_backend(unready.clone())
        .with_backend(ready);

    let report = pipeline.render("hi").await;

    assert_eq!(unready.calls.load(Ordering::SeqCst), 0);
    assert_eq!(report.attempts.len(), 1);
    assert!(report.spoken());
}

#[tokio::test]
async fn test_alerts_are_marked_on_screen() {
    let state = Arc::new(SessionState::new(true));
    let screen = Arc::new(CollectingScreen::default());
    let pipeline = pipeline_with(&state, &screen, &Background::new());

    pipeline.render(OutputRequest::alert("Timer for 1 minute is up!")).await;

    assert!(screen.contains("Assistant (alert): Timer for 1 minute is up!"));
}

#[tokio::test(start_paused = true)]
async fn test_audio_artifact_removed_after_grace() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let background = Background::new();
    let backend = Arc::new(ArtifactBackend::new(dir.path()));

    let pipeline = pipeline_with(&state, &screen, &background)
        .with_cleanup_grace(Duration::from_secs(10))
        .with_backend(backend.clone());

    let report = pipeline.render("play me").await;
    assert!(report.spoken());

    let artifact = backend.produced().pop().unwrap();
    assert!(artifact.exists(), "artifact kept while playing");
    assert_eq!(background.active(), 1);

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(background.drain(Duration::from_secs(1)).await);
    assert!(!artifact.exists(), "artifact removed after grace period");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_removes_pending_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let background = Background::new();
    let backend = Arc::new(ArtifactBackend::new(dir.path()));

    let pipeline = pipeline_with(&state, &screen, &background)
        .with_cleanup_grace(Duration::from_secs(600))
        .with_backend(backend.clone());

    pipeline.render("bye").await;
    let artifact = backend.produced().pop().unwrap();

    assert!(background.shutdown(Duration::from_secs(1)).await);
    assert!(!artifact.exists());
}

#[tokio::test(start_paused = true)]
async fn test_finish_keeps_artifact_for_grace_period() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(SessionState::new(false));
    let screen = Arc::new(CollectingScreen::default());
    let background = Background::new();
    let backend = Arc::new(ArtifactBackend::new(dir.path()));

    let pipeline = pipeline_with(&state, &screen, &background)
        .with_cleanup_grace(Duration::from_secs(10))
        .with_backend(backend.clone());

    pipeline.render("Goodbye!").await;
    let artifact = backend.produced().pop().unwrap();

    let started = tokio::time::Instant::now();
    assert!(background.finish(Duration::from_secs(11)).await);
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert!(!artifact.exists());
}
