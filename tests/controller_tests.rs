//! End-to-end conversation controller scenarios
//!
//! The controller runs on its real worker thread; the backend, synthesis,
//! playback, recognition, and view collaborators are all injected fakes so
//! every scenario is driven and observed through the public seams.

use crossbeam_channel::{unbounded, Receiver};
use natter::backend::{AssistantBackend, Synthesizer};
use natter::controller::{
    ChannelView, Collaborators, ControllerCommand, ControllerConfig, ControllerHandle,
    ConversationController, InputMode, ViewUpdate, CONNECTION_ERROR_MESSAGE,
    STATUS_HEARING_TROUBLE, STATUS_PLAYBACK_FAILED,
};
use natter::history::{ConversationTurn, Role};
use natter::speech::{Player, RecognitionCapability, ScriptedOutcome, ScriptedRecognizer};
use natter::NatterError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Records every request and answers from a canned script.
struct MockBackend {
    requests: Arc<Mutex<Vec<(String, Vec<ConversationTurn>)>>>,
    replies: Mutex<VecDeque<natter::Result<String>>>,
}

impl AssistantBackend for MockBackend {
    fn reply(&self, text: &str, history: &[ConversationTurn]) -> natter::Result<String> {
        self.requests
            .lock()
            .push((text.to_string(), history.to_vec()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

/// Returns the reply text as audio bytes, or fails on demand.
struct MockSynthesizer {
    fail: bool,
}

impl Synthesizer for MockSynthesizer {
    fn synthesize(&self, text: &str) -> natter::Result<Vec<u8>> {
        if self.fail {
            Err(NatterError::Synthesis("synthesis backend down".to_string()))
        } else {
            Ok(text.as_bytes().to_vec())
        }
    }
}

/// Records every clip it is asked to play.
struct CountingPlayer {
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Player for CountingPlayer {
    fn play(&mut self, audio: Vec<u8>) -> natter::Result<()> {
        self.played.lock().push(audio);
        Ok(())
    }
}

struct Fixture {
    handle: ControllerHandle,
    view_rx: Receiver<ViewUpdate>,
    requests: Arc<Mutex<Vec<(String, Vec<ConversationTurn>)>>>,
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Fixture {
    fn send(&self, command: ControllerCommand) {
        self.handle.send_command(command).unwrap();
    }

    /// Collect view updates until the controller goes quiet.
    fn drain(&self) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.view_rx.recv_timeout(Duration::from_millis(500)) {
            updates.push(update);
        }
        updates
    }
}

fn start_controller(
    replies: Vec<natter::Result<String>>,
    script: Vec<ScriptedOutcome>,
    synthesis_fails: bool,
) -> Fixture {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let played = Arc::new(Mutex::new(Vec::new()));

    let (view_tx, view_rx) = unbounded();
    let (recognition_tx, recognition_rx) = unbounded();

    let collaborators = Collaborators {
        backend: Box::new(MockBackend {
            requests: Arc::clone(&requests),
            replies: Mutex::new(replies.into()),
        }),
        synthesizer: Box::new(MockSynthesizer {
            fail: synthesis_fails,
        }),
        player: Box::new(CountingPlayer {
            played: Arc::clone(&played),
        }),
        recognition: RecognitionCapability::Available(Box::new(ScriptedRecognizer::new(
            recognition_tx,
            script,
        ))),
        recognition_events: recognition_rx,
        view: Box::new(ChannelView::new(view_tx)),
    };

    let (controller, handle) =
        ConversationController::new(ControllerConfig::default(), collaborators).unwrap();
    controller.start();

    Fixture {
        handle,
        view_rx,
        requests,
        played,
    }
}

fn messages(updates: &[ViewUpdate]) -> Vec<(Role, String)> {
    updates
        .iter()
        .filter_map(|u| match u {
            ViewUpdate::Message(entry) => Some((entry.role, entry.text.clone())),
            _ => None,
        })
        .collect()
}

fn statuses(updates: &[ViewUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            ViewUpdate::Status(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("condition not met within deadline");
}

#[test]
fn text_turn_appends_user_then_model_turns() {
    let fx = start_controller(vec![Ok("Hi there".to_string())], Vec::new(), false);

    fx.send(ControllerCommand::SendText("Hello".to_string()));
    let updates = fx.drain();

    assert_eq!(
        messages(&updates),
        vec![
            (Role::User, "Hello".to_string()),
            (Role::Model, "Hi there".to_string()),
        ]
    );

    assert_eq!(
        fx.handle.history().snapshot(),
        vec![
            ConversationTurn::user("Hello"),
            ConversationTurn::model("Hi there"),
        ]
    );
}

#[test]
fn whitespace_input_mutates_nothing() {
    let fx = start_controller(Vec::new(), Vec::new(), false);

    fx.send(ControllerCommand::SendText("   \t  ".to_string()));
    fx.send(ControllerCommand::SendText(String::new()));
    let updates = fx.drain();

    assert!(messages(&updates).is_empty());
    assert!(fx.handle.history().is_empty());
    assert!(fx.requests.lock().is_empty());
}

#[test]
fn request_carries_full_history_including_new_user_turn() {
    let fx = start_controller(
        vec![Ok("Hi there".to_string()), Ok("Doing well".to_string())],
        Vec::new(),
        false,
    );

    fx.send(ControllerCommand::SendText("Hello".to_string()));
    fx.drain();
    fx.send(ControllerCommand::SendText("How are you?".to_string()));
    fx.drain();

    let requests = fx.requests.lock();
    assert_eq!(requests.len(), 2);

    let (text, history) = &requests[0];
    assert_eq!(text, "Hello");
    assert_eq!(history, &vec![ConversationTurn::user("Hello")]);

    let (text, history) = &requests[1];
    assert_eq!(text, "How are you?");
    assert_eq!(
        history,
        &vec![
            ConversationTurn::user("Hello"),
            ConversationTurn::model("Hi there"),
            ConversationTurn::user("How are you?"),
        ]
    );
}

#[test]
fn backend_failure_renders_error_and_preserves_history() {
    let fx = start_controller(
        vec![Err(NatterError::TextBackend("connection refused".to_string()))],
        Vec::new(),
        false,
    );

    fx.send(ControllerCommand::SendText("Hello".to_string()));
    let updates = fx.drain();

    assert_eq!(
        messages(&updates),
        vec![
            (Role::User, "Hello".to_string()),
            (Role::Model, CONNECTION_ERROR_MESSAGE.to_string()),
        ]
    );

    // The failed turn never reaches the history, so a retry starts clean.
    assert_eq!(
        fx.handle.history().snapshot(),
        vec![ConversationTurn::user("Hello")]
    );
}

#[test]
fn voice_loop_speaks_reply_and_relistens() {
    let fx = start_controller(
        vec![Ok("Hi there".to_string())],
        vec![ScriptedOutcome::Hear("Hello".to_string())],
        false,
    );

    fx.send(ControllerCommand::SetVoiceMode(true));
    fx.send(ControllerCommand::ToggleMic);
    let updates = fx.drain();

    assert_eq!(
        messages(&updates),
        vec![
            (Role::User, "Hello".to_string()),
            (Role::Model, "Hi there".to_string()),
        ]
    );

    // The reply was synthesized and played to completion.
    assert_eq!(*fx.played.lock(), vec![b"Hi there".to_vec()]);

    // Speaking indicator set during playback and cleared afterwards.
    let speaking_on = updates
        .iter()
        .position(|u| matches!(u, ViewUpdate::Speaking(true)))
        .expect("speaking indicator was never set");
    let speaking_off = updates
        .iter()
        .position(|u| matches!(u, ViewUpdate::Speaking(false)))
        .expect("speaking indicator was never cleared");
    assert!(speaking_on < speaking_off);

    // After the spoken reply the loop re-listens.
    let relisten = updates
        .iter()
        .skip(speaking_off)
        .any(|u| matches!(u, ViewUpdate::Listening(true)));
    assert!(relisten, "recognition did not restart after playback");
    assert!(fx.handle.is_conversation_active());

    // A second mic press stops the loop.
    fx.send(ControllerCommand::ToggleMic);
    wait_until(|| !fx.handle.is_conversation_active());
}

#[test]
fn synthesis_failure_skips_playback_but_keeps_the_loop() {
    let fx = start_controller(
        vec![Ok("Hi there".to_string())],
        vec![ScriptedOutcome::Hear("Hello".to_string())],
        true,
    );

    fx.send(ControllerCommand::SetVoiceMode(true));
    fx.send(ControllerCommand::ToggleMic);
    let updates = fx.drain();

    assert!(fx.played.lock().is_empty());
    assert!(statuses(&updates)
        .iter()
        .any(|s| s == STATUS_PLAYBACK_FAILED));

    // speak() still completed: indicator set and cleared, loop re-listened.
    let speaking_on = updates
        .iter()
        .position(|u| matches!(u, ViewUpdate::Speaking(true)))
        .expect("speaking indicator was never set");
    let speaking_off = updates
        .iter()
        .position(|u| matches!(u, ViewUpdate::Speaking(false)))
        .expect("speaking indicator was never cleared");
    assert!(speaking_on < speaking_off);
    let relisten = updates
        .iter()
        .skip(speaking_off)
        .any(|u| matches!(u, ViewUpdate::Listening(true)));
    assert!(relisten, "voice loop stopped after a synthesis failure");
    assert!(fx.handle.is_conversation_active());
}

#[test]
fn recognition_error_clears_active_flag() {
    let fx = start_controller(
        Vec::new(),
        vec![ScriptedOutcome::Fail("no-speech".to_string())],
        false,
    );

    fx.send(ControllerCommand::SetVoiceMode(true));
    fx.send(ControllerCommand::ToggleMic);
    let updates = fx.drain();

    wait_until(|| !fx.handle.is_conversation_active());

    let statuses = statuses(&updates);
    assert_eq!(statuses.last().map(String::as_str), Some(STATUS_HEARING_TROUBLE));

    // Nothing reached the turn pipeline.
    assert!(messages(&updates).is_empty());
    assert!(fx.handle.history().is_empty());
}

#[test]
fn mode_toggle_mid_conversation_stops_the_loop() {
    let fx = start_controller(Vec::new(), Vec::new(), false);

    fx.send(ControllerCommand::SetVoiceMode(true));
    fx.send(ControllerCommand::ToggleMic);
    wait_until(|| fx.handle.is_conversation_active());

    fx.send(ControllerCommand::SetVoiceMode(false));
    wait_until(|| !fx.handle.is_conversation_active());

    // The mode went Text (startup) -> Voice -> Text, in that order.
    let updates = fx.drain();
    let modes: Vec<InputMode> = updates
        .iter()
        .filter_map(|u| match u {
            ViewUpdate::Mode(mode) => Some(*mode),
            _ => None,
        })
        .collect();
    assert_eq!(modes, vec![InputMode::Text, InputMode::Voice, InputMode::Text]);
}

#[test]
fn clear_history_empties_store_and_transcript() {
    let fx = start_controller(vec![Ok("Hi there".to_string())], Vec::new(), false);

    fx.send(ControllerCommand::SendText("Hello".to_string()));
    fx.drain();
    assert_eq!(fx.handle.history().len(), 2);

    fx.send(ControllerCommand::ClearHistory);
    let updates = fx.drain();

    assert!(fx.handle.history().is_empty());
    assert!(updates
        .iter()
        .any(|u| matches!(u, ViewUpdate::TranscriptCleared)));
}
