//! Speech-synthesis backend client
//!
//! `/synthesize` returns an encoded audio stream which is consumed as an
//! opaque blob; decoding happens at playback time.

use crate::backend::BackendConfig;
use crate::{NatterError, Result};
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
}

/// Turns reply text into playable audio bytes.
pub trait Synthesizer: Send {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// HTTP implementation talking to `POST /synthesize`
pub struct HttpSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    runtime: Runtime,
}

impl HttpSynthesizer {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| NatterError::Synthesis(format!("runtime creation failed: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.synthesize_url(),
            runtime,
        })
    }
}

impl Synthesizer for HttpSynthesizer {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        debug!(endpoint = %self.endpoint, chars = text.len(), "requesting audio");

        self.runtime.block_on(async {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&SynthesizeRequest { text })
                .send()
                .await
                .map_err(|e| NatterError::Synthesis(e.to_string()))?;

            if !response.status().is_success() {
                return Err(NatterError::Synthesis(format!(
                    "unexpected status {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| NatterError::Synthesis(e.to_string()))?;

            Ok(bytes.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_payload_shape() {
        let request = SynthesizeRequest { text: "Hi there" };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"text": "Hi there"}));
    }
}
