//! View seam for the conversation controller
//!
//! The controller never touches a rendering technology directly; it drives
//! whatever implements [`View`]. [`ChannelView`] forwards every operation
//! as a [`ViewUpdate`] for the egui front-end (and tests) to drain.

use crate::history::Role;
use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use uuid::Uuid;

/// Which input surface is active
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Text box plus send button
    Text,
    /// Mic button plus status line
    Voice,
}

/// One rendered transcript entry
#[derive(Clone, Debug)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Rendering operations the controller needs from a front-end.
pub trait View: Send {
    /// Append a labeled message block to the transcript.
    fn render_message(&mut self, entry: TranscriptEntry);

    /// Replace the status line shown under the mic.
    fn set_status(&mut self, status: &str);

    /// Swap which input surface is visible.
    fn set_mode(&mut self, mode: InputMode);

    /// Mark or clear the "assistant is speaking" indicator.
    fn set_speaking(&mut self, speaking: bool);

    /// Mark or clear the "listening" indicator.
    fn set_listening(&mut self, listening: bool);

    /// Show or hide the voice affordances entirely.
    fn set_voice_supported(&mut self, supported: bool);

    /// Remove every transcript entry.
    fn clear_transcript(&mut self);
}

/// Update emitted by [`ChannelView`]
#[derive(Clone, Debug)]
pub enum ViewUpdate {
    Message(TranscriptEntry),
    Status(String),
    Mode(InputMode),
    Speaking(bool),
    Listening(bool),
    VoiceSupported(bool),
    TranscriptCleared,
}

/// Forwards every view operation over a channel.
pub struct ChannelView {
    updates: Sender<ViewUpdate>,
}

impl ChannelView {
    pub fn new(updates: Sender<ViewUpdate>) -> Self {
        Self { updates }
    }
}

impl View for ChannelView {
    fn render_message(&mut self, entry: TranscriptEntry) {
        let _ = self.updates.send(ViewUpdate::Message(entry));
    }

    fn set_status(&mut self, status: &str) {
        let _ = self.updates.send(ViewUpdate::Status(status.to_string()));
    }

    fn set_mode(&mut self, mode: InputMode) {
        let _ = self.updates.send(ViewUpdate::Mode(mode));
    }

    fn set_speaking(&mut self, speaking: bool) {
        let _ = self.updates.send(ViewUpdate::Speaking(speaking));
    }

    fn set_listening(&mut self, listening: bool) {
        let _ = self.updates.send(ViewUpdate::Listening(listening));
    }

    fn set_voice_supported(&mut self, supported: bool) {
        let _ = self.updates.send(ViewUpdate::VoiceSupported(supported));
    }

    fn clear_transcript(&mut self) {
        let _ = self.updates.send(ViewUpdate::TranscriptCleared);
    }
}
