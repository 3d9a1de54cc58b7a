//! Speech-recognition capability seam
//!
//! Recognition is provided by the host environment, not by this crate.
//! Engines implement [`Recognizer`] and deliver discrete events through a
//! channel; when no engine is present the capability is `Unavailable` and
//! every voice affordance stays hidden.

use crate::Result;
use crossbeam_channel::Sender;
use std::collections::VecDeque;

/// Settings handed to a recognition engine
#[derive(Clone, Debug)]
pub struct RecognitionConfig {
    /// BCP 47 language tag for the recognizer
    pub language: String,

    /// Keep capturing after a final result
    pub continuous: bool,

    /// Deliver interim (non-final) transcripts
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-IN".to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

impl RecognitionConfig {
    /// Set the recognition language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Event emitted by a recognition engine
#[derive(Clone, Debug)]
pub enum RecognitionEvent {
    /// The engine started capturing audio
    Started,

    /// A final transcript for the captured utterance
    Transcript(String),

    /// The engine stopped capturing, with or without a result
    Ended,

    /// Recognition failed
    Error(String),
}

/// A speech-recognition engine controlled by the conversation loop.
pub trait Recognizer: Send {
    /// Begin capturing a single utterance.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing without waiting for a result.
    fn stop(&mut self);
}

/// Host capability: a recognition engine may or may not be present.
pub enum RecognitionCapability {
    Available(Box<dyn Recognizer>),
    Unavailable,
}

impl RecognitionCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, RecognitionCapability::Available(_))
    }
}

/// Outcome replayed by [`ScriptedRecognizer`]
#[derive(Clone, Debug)]
pub enum ScriptedOutcome {
    /// Deliver a final transcript
    Hear(String),

    /// Fail with a recognition error
    Fail(String),
}

/// Scripted engine that replays canned outcomes, one per `start` call.
/// Stands in for a real engine in tests and headless environments; once
/// the script runs dry, sessions end without a transcript.
pub struct ScriptedRecognizer {
    outcomes: VecDeque<ScriptedOutcome>,
    events: Sender<RecognitionEvent>,
}

impl ScriptedRecognizer {
    pub fn new(events: Sender<RecognitionEvent>, outcomes: Vec<ScriptedOutcome>) -> Self {
        Self {
            outcomes: outcomes.into(),
            events,
        }
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<()> {
        let _ = self.events.send(RecognitionEvent::Started);
        match self.outcomes.pop_front() {
            Some(ScriptedOutcome::Hear(text)) => {
                let _ = self.events.send(RecognitionEvent::Transcript(text));
                let _ = self.events.send(RecognitionEvent::Ended);
            }
            Some(ScriptedOutcome::Fail(error)) => {
                let _ = self.events.send(RecognitionEvent::Error(error));
                let _ = self.events.send(RecognitionEvent::Ended);
            }
            None => {
                let _ = self.events.send(RecognitionEvent::Ended);
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        let _ = self.events.send(RecognitionEvent::Ended);
    }
}
