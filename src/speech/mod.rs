//! Speech capability seams: recognition input and audio playback output.

pub mod playback;
pub mod recognition;

pub use playback::{NullPlayer, Player, RodioPlayer};
pub use recognition::{
    RecognitionCapability, RecognitionConfig, RecognitionEvent, Recognizer, ScriptedOutcome,
    ScriptedRecognizer,
};
