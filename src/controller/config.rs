//! Configuration for the conversation controller
//!
//! Aggregates the per-subsystem configs into one value handed to the
//! controller at construction.

use crate::backend::BackendConfig;
use crate::speech::RecognitionConfig;

#[derive(Clone, Debug, Default)]
pub struct ControllerConfig {
    /// Assistant backend endpoints
    pub backend: BackendConfig,

    /// Recognition engine settings
    pub recognition: RecognitionConfig,
}

impl ControllerConfig {
    /// Set the complete backend configuration
    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }

    /// Point at a different backend base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }

    /// Set the recognition configuration
    pub fn with_recognition(mut self, recognition: RecognitionConfig) -> Self {
        self.recognition = recognition;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.backend.validate()
    }
}
