//! Application state management
//!
//! Mirrors the controller's view updates for rendering and forwards user
//! input back through the command channel. The transcript mirror is
//! append-only; entries are never edited or reordered.

use crate::controller::{
    ControllerCommand, ControllerHandle, InputMode, TranscriptEntry, ViewUpdate, STATUS_IDLE,
};
use crossbeam_channel::Receiver;
use tracing::warn;

/// Central application state
pub struct AppState {
    /// Rendered transcript, in arrival order
    pub transcript: Vec<TranscriptEntry>,

    /// Current text input
    pub input_text: String,

    /// Which input surface is visible
    pub mode: InputMode,

    /// Status line shown under the mic
    pub voice_status: String,

    /// Assistant audio is playing
    pub is_speaking: bool,

    /// Recognizer is capturing
    pub is_listening: bool,

    /// Voice affordances are shown at all
    pub voice_supported: bool,

    /// Controller handle; absent in bare test states
    handle: Option<ControllerHandle>,

    /// View updates from the controller
    view_rx: Option<Receiver<ViewUpdate>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create a disconnected application state
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            input_text: String::new(),
            mode: InputMode::Text,
            voice_status: STATUS_IDLE.to_string(),
            is_speaking: false,
            is_listening: false,
            voice_supported: false,
            handle: None,
            view_rx: None,
        }
    }

    /// Wire the state to a running controller
    pub fn connect(mut self, handle: ControllerHandle, view_rx: Receiver<ViewUpdate>) -> Self {
        self.handle = Some(handle);
        self.view_rx = Some(view_rx);
        self
    }

    /// Send the typed message; whitespace-only input is dropped
    pub fn send_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() {
            return;
        }

        self.dispatch(ControllerCommand::SendText(text));
        self.input_text.clear();
    }

    /// Mic button press
    pub fn toggle_mic(&mut self) {
        self.dispatch(ControllerCommand::ToggleMic);
    }

    /// Mode switch
    pub fn set_voice_mode(&mut self, enabled: bool) {
        self.dispatch(ControllerCommand::SetVoiceMode(enabled));
    }

    /// Clear the conversation
    pub fn clear_conversation(&mut self) {
        self.dispatch(ControllerCommand::ClearHistory);
    }

    /// Ask the controller to stop
    pub fn shutdown(&mut self) {
        self.dispatch(ControllerCommand::Shutdown);
    }

    /// True while the hands-free loop is engaged
    pub fn is_conversation_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| h.is_conversation_active())
            .unwrap_or(false)
    }

    fn dispatch(&mut self, command: ControllerCommand) {
        if let Some(handle) = &self.handle {
            if let Err(e) = handle.send_command(command) {
                warn!("dropping command: {e}");
            }
        }
    }

    /// Drain pending view updates from the controller.
    pub fn poll_events(&mut self) {
        // Collect first, then apply, so the receiver borrow ends early.
        let updates: Vec<ViewUpdate> = match &self.view_rx {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };

        for update in updates {
            match update {
                ViewUpdate::Message(entry) => self.transcript.push(entry),
                ViewUpdate::Status(status) => self.voice_status = status,
                ViewUpdate::Mode(mode) => self.mode = mode,
                ViewUpdate::Speaking(speaking) => self.is_speaking = speaking,
                ViewUpdate::Listening(listening) => self.is_listening = listening,
                ViewUpdate::VoiceSupported(supported) => self.voice_supported = supported,
                ViewUpdate::TranscriptCleared => self.transcript.clear(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Role;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_disconnected_state_defaults() {
        let state = AppState::new();
        assert_eq!(state.mode, InputMode::Text);
        assert_eq!(state.voice_status, STATUS_IDLE);
        assert!(!state.voice_supported);
        assert!(!state.is_conversation_active());
    }

    #[test]
    fn test_send_message_without_handle_is_harmless() {
        let mut state = AppState::new();
        state.input_text = "Hello".to_string();
        state.send_message();
        assert!(state.input_text.is_empty());
    }

    #[test]
    fn test_whitespace_input_is_kept_out_of_the_pipeline() {
        let mut state = AppState::new();
        state.input_text = "   ".to_string();
        state.send_message();
        // Not cleared: nothing was sent.
        assert_eq!(state.input_text, "   ");
    }

    #[test]
    fn test_poll_events_applies_updates() {
        let (tx, rx) = unbounded();
        let mut state = AppState::new();
        state.view_rx = Some(rx);

        tx.send(ViewUpdate::VoiceSupported(true)).unwrap();
        tx.send(ViewUpdate::Mode(InputMode::Voice)).unwrap();
        tx.send(ViewUpdate::Message(TranscriptEntry::new(Role::User, "Hello")))
            .unwrap();
        tx.send(ViewUpdate::Status("Listening...".to_string()))
            .unwrap();
        tx.send(ViewUpdate::Listening(true)).unwrap();

        state.poll_events();

        assert!(state.voice_supported);
        assert_eq!(state.mode, InputMode::Voice);
        assert_eq!(state.transcript.len(), 1);
        assert_eq!(state.transcript[0].text, "Hello");
        assert_eq!(state.voice_status, "Listening...");
        assert!(state.is_listening);
    }

    #[test]
    fn test_transcript_cleared() {
        let (tx, rx) = unbounded();
        let mut state = AppState::new();
        state.view_rx = Some(rx);

        tx.send(ViewUpdate::Message(TranscriptEntry::new(Role::User, "Hello")))
            .unwrap();
        tx.send(ViewUpdate::TranscriptCleared).unwrap();

        state.poll_events();
        assert!(state.transcript.is_empty());
    }
}
