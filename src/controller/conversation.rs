//! Conversation controller
//!
//! Coordinates the text backend, speech synthesis, playback, and the
//! recognition capability behind a command channel. One worker thread owns
//! all conversation state, so turn ordering follows command arrival order
//! and the history needs no further locking discipline.

use crate::backend::{AssistantBackend, Synthesizer};
use crate::controller::config::ControllerConfig;
use crate::controller::view::{InputMode, TranscriptEntry, View};
use crate::history::{Role, TurnStore};
use crate::speech::{Player, RecognitionCapability, RecognitionEvent};
use crate::{NatterError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Status line shown while no conversation is running
pub const STATUS_IDLE: &str = "Tap the mic to start the conversation";

/// Status line while the recognizer captures audio
pub const STATUS_LISTENING: &str = "Listening...";

/// Status line while a reply is being fetched in voice mode
pub const STATUS_THINKING: &str = "Thinking...";

/// Status line while a reply is played back
pub const STATUS_SPEAKING: &str = "Assistant is speaking...";

/// Status line after a failed synthesis or playback
pub const STATUS_PLAYBACK_FAILED: &str = "Sorry, couldn't play audio.";

/// Status line after a recognition error
pub const STATUS_HEARING_TROUBLE: &str = "Sorry, I had trouble hearing. Try again.";

/// Transcript text rendered when the text backend cannot be reached
pub const CONNECTION_ERROR_MESSAGE: &str = "Sorry, there was a connection error.";

/// Commands accepted by the controller
#[derive(Clone, Debug)]
pub enum ControllerCommand {
    /// Send a typed or transcribed message through the turn pipeline
    SendText(String),

    /// Mic button press: start the voice loop, or stop it if running
    ToggleMic,

    /// Mode switch: `true` selects voice mode
    SetVoiceMode(bool),

    /// Forget the conversation so far
    ClearHistory,

    /// Stop the worker thread
    Shutdown,
}

/// Where the recognizer currently is in the listen/reply cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListenState {
    Idle,
    Listening,
    /// Between a final transcript and the backend reply
    Processing,
}

/// Collaborators injected into the controller
pub struct Collaborators {
    pub backend: Box<dyn AssistantBackend>,
    pub synthesizer: Box<dyn Synthesizer>,
    pub player: Box<dyn Player>,
    pub recognition: RecognitionCapability,
    pub recognition_events: Receiver<RecognitionEvent>,
    pub view: Box<dyn View>,
}

/// Handle for driving the controller from the UI thread
#[derive(Clone)]
pub struct ControllerHandle {
    command_tx: Sender<ControllerCommand>,
    history: TurnStore,
    conversation_active: Arc<AtomicBool>,
}

impl ControllerHandle {
    /// Send a command to the controller
    pub fn send_command(&self, command: ControllerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| NatterError::Channel(format!("controller is gone: {e}")))
    }

    /// Read-only view of the accumulated history
    pub fn history(&self) -> &TurnStore {
        &self.history
    }

    /// True while the hands-free listen/reply loop is engaged
    pub fn is_conversation_active(&self) -> bool {
        self.conversation_active.load(Ordering::SeqCst)
    }
}

/// The conversation controller worker
pub struct ConversationController {
    config: ControllerConfig,
    command_rx: Receiver<ControllerCommand>,
    collaborators: Collaborators,
    history: TurnStore,
    conversation_active: Arc<AtomicBool>,
    mode: InputMode,
    listen_state: ListenState,
}

impl ConversationController {
    /// Create a controller and the handle for driving it
    pub fn new(
        config: ControllerConfig,
        collaborators: Collaborators,
    ) -> Result<(Self, ControllerHandle)> {
        config.validate().map_err(NatterError::Config)?;

        let (command_tx, command_rx) = bounded(100);
        let history = TurnStore::new();
        let conversation_active = Arc::new(AtomicBool::new(false));

        let handle = ControllerHandle {
            command_tx,
            history: history.clone(),
            conversation_active: Arc::clone(&conversation_active),
        };

        let controller = Self {
            config,
            command_rx,
            collaborators,
            history,
            conversation_active,
            mode: InputMode::Text,
            listen_state: ListenState::Idle,
        };

        Ok((controller, handle))
    }

    /// Start the worker thread. Consumes the controller.
    pub fn start(mut self) -> JoinHandle<()> {
        thread::spawn(move || {
            info!(
                backend = %self.config.backend.base_url,
                language = %self.config.recognition.language,
                "conversation controller started"
            );

            let voice_supported = self.collaborators.recognition.is_available();
            self.collaborators.view.set_voice_supported(voice_supported);
            self.collaborators.view.set_mode(self.mode);
            self.collaborators.view.set_status(STATUS_IDLE);

            self.run();

            info!("conversation controller stopped");
        })
    }

    fn run(&mut self) {
        loop {
            match self.command_rx.try_recv() {
                Ok(ControllerCommand::SendText(text)) => self.send_text(&text),
                Ok(ControllerCommand::ToggleMic) => self.toggle_mic(),
                Ok(ControllerCommand::SetVoiceMode(enabled)) => self.set_voice_mode(enabled),
                Ok(ControllerCommand::ClearHistory) => self.clear_history(),
                Ok(ControllerCommand::Shutdown) => {
                    info!("controller shutdown requested");
                    break;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    warn!("command channel disconnected");
                    break;
                }
            }

            while let Ok(event) = self.collaborators.recognition_events.try_recv() {
                self.handle_recognition_event(event);
            }

            thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    /// One conversation turn: render and record the user message, fetch
    /// the reply, and in voice mode speak it and resume listening.
    fn send_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.collaborators
            .view
            .render_message(TranscriptEntry::new(Role::User, text));
        self.history.push_user(text);

        if self.mode == InputMode::Voice {
            self.collaborators.view.set_status(STATUS_THINKING);
        }

        // The request carries the full history, new user turn included.
        let history = self.history.snapshot();
        match self.collaborators.backend.reply(text, &history) {
            Ok(reply) => {
                self.collaborators
                    .view
                    .render_message(TranscriptEntry::new(Role::Model, &reply));
                self.history.push_model(&reply);

                if self.mode == InputMode::Voice {
                    self.speak(&reply);
                    if self.conversation_active.load(Ordering::SeqCst) {
                        self.start_listening();
                    } else {
                        self.listen_state = ListenState::Idle;
                        self.collaborators.view.set_status(STATUS_IDLE);
                    }
                }
            }
            Err(e) => {
                warn!("text backend request failed: {e}");
                // History stays untouched so the user can retry the turn.
                self.collaborators
                    .view
                    .render_message(TranscriptEntry::new(Role::Model, CONNECTION_ERROR_MESSAGE));
            }
        }
    }

    /// Fetch synthesized audio for `text` and play it to completion.
    ///
    /// Never fails: any synthesis or playback error is reported through the
    /// status line and swallowed so the voice loop can continue. The
    /// speaking indicator is cleared on every path.
    fn speak(&mut self, text: &str) {
        self.collaborators.view.set_speaking(true);
        self.collaborators.view.set_status(STATUS_SPEAKING);

        let played = match self.collaborators.synthesizer.synthesize(text) {
            Ok(audio) => self.collaborators.player.play(audio),
            Err(e) => Err(e),
        };

        if let Err(e) = played {
            warn!("speech playback skipped: {e}");
            self.collaborators.view.set_status(STATUS_PLAYBACK_FAILED);
        }

        self.collaborators.view.set_speaking(false);
    }

    /// Mic button: start the hands-free loop, or stop a running one.
    fn toggle_mic(&mut self) {
        if !self.collaborators.recognition.is_available() {
            debug!("mic press ignored, recognition unavailable");
            return;
        }

        if !self.conversation_active.load(Ordering::SeqCst) {
            self.conversation_active.store(true, Ordering::SeqCst);
            self.start_listening();
        } else {
            self.conversation_active.store(false, Ordering::SeqCst);
            self.stop_listening();
        }
    }

    /// Mode switch: forces the voice loop off and swaps input surfaces.
    fn set_voice_mode(&mut self, enabled: bool) {
        if enabled && !self.collaborators.recognition.is_available() {
            debug!("voice mode ignored, recognition unavailable");
            return;
        }

        self.mode = if enabled {
            InputMode::Voice
        } else {
            InputMode::Text
        };
        self.conversation_active.store(false, Ordering::SeqCst);
        self.stop_listening();
        self.listen_state = ListenState::Idle;

        self.collaborators.view.set_mode(self.mode);
        if self.mode == InputMode::Voice {
            self.collaborators.view.set_status(STATUS_IDLE);
        }
    }

    fn clear_history(&mut self) {
        debug!("clearing conversation history");
        self.history.clear();
        self.collaborators.view.clear_transcript();
    }

    fn start_listening(&mut self) {
        if let RecognitionCapability::Available(recognizer) = &mut self.collaborators.recognition {
            match recognizer.start() {
                Ok(()) => self.listen_state = ListenState::Listening,
                Err(e) => {
                    warn!("recognizer failed to start: {e}");
                    self.conversation_active.store(false, Ordering::SeqCst);
                    self.listen_state = ListenState::Idle;
                    self.collaborators.view.set_status(STATUS_HEARING_TROUBLE);
                }
            }
        }
    }

    fn stop_listening(&mut self) {
        if let RecognitionCapability::Available(recognizer) = &mut self.collaborators.recognition {
            recognizer.stop();
        }
    }

    fn handle_recognition_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Started => {
                self.collaborators.view.set_listening(true);
                self.collaborators.view.set_status(STATUS_LISTENING);
            }
            RecognitionEvent::Transcript(utterance) => {
                debug!(%utterance, "final transcript");
                self.listen_state = ListenState::Processing;
                self.collaborators.view.set_listening(false);
                self.send_text(&utterance);
            }
            RecognitionEvent::Ended => {
                self.collaborators.view.set_listening(false);
                // After an error or a final transcript the cycle has moved
                // on; only a bare stop returns the status to the idle prompt.
                if self.listen_state == ListenState::Listening
                    && !self.conversation_active.load(Ordering::SeqCst)
                {
                    self.listen_state = ListenState::Idle;
                    self.collaborators.view.set_status(STATUS_IDLE);
                }
            }
            RecognitionEvent::Error(error) => {
                warn!("speech recognition error: {error}");
                self.conversation_active.store(false, Ordering::SeqCst);
                self.listen_state = ListenState::Idle;
                self.collaborators.view.set_listening(false);
                self.collaborators.view.set_status(STATUS_HEARING_TROUBLE);
            }
        }
    }
}
