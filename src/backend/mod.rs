//! HTTP clients for the assistant backend
//!
//! Two endpoints: `/process_text` turns a message plus history into a
//! reply, `/synthesize` turns reply text into playable audio.

pub mod synthesis;
pub mod text;

pub use synthesis::{HttpSynthesizer, Synthesizer};
pub use text::{AssistantBackend, HttpAssistantBackend};

/// Where the assistant backend lives
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the backend service
    pub base_url: String,

    /// Path of the text-processing endpoint
    pub process_text_path: String,

    /// Path of the speech-synthesis endpoint
    pub synthesize_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            process_text_path: "/process_text".to_string(),
            synthesize_path: "/synthesize".to_string(),
        }
    }
}

impl BackendConfig {
    /// Create a config pointing at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full URL of the text-processing endpoint
    pub fn process_text_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.process_text_path
        )
    }

    /// Full URL of the speech-synthesis endpoint
    pub fn synthesize_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.synthesize_path
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("backend base URL is required".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "backend base URL must be http(s): {}",
                self.base_url
            ));
        }

        Ok(())
    }
}
