//! Text-processing backend client
//!
//! Each request carries the full accumulated history, new user turn
//! included, so the backend holds no session state.

use crate::backend::BackendConfig;
use crate::history::ConversationTurn;
use crate::{NatterError, Result};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::debug;

/// Request body for `/process_text`
#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    text: &'a str,
    history: &'a [ConversationTurn],
}

/// Response body from `/process_text`
#[derive(Debug, Deserialize)]
struct ReplyResponse {
    reply: String,
}

/// Produces an assistant reply for a user message plus history.
pub trait AssistantBackend: Send {
    /// Blocks until the backend answers. There is no request timeout: a
    /// hung call stalls the current conversation turn.
    fn reply(&self, text: &str, history: &[ConversationTurn]) -> Result<String>;
}

/// HTTP implementation talking to `POST /process_text`
pub struct HttpAssistantBackend {
    client: reqwest::Client,
    endpoint: String,
    runtime: Runtime,
}

impl HttpAssistantBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| NatterError::TextBackend(format!("runtime creation failed: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.process_text_url(),
            runtime,
        })
    }
}

impl AssistantBackend for HttpAssistantBackend {
    fn reply(&self, text: &str, history: &[ConversationTurn]) -> Result<String> {
        debug!(endpoint = %self.endpoint, turns = history.len(), "requesting reply");

        self.runtime.block_on(async {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&ReplyRequest { text, history })
                .send()
                .await
                .map_err(|e| NatterError::TextBackend(e.to_string()))?;

            if !response.status().is_success() {
                return Err(NatterError::TextBackend(format!(
                    "unexpected status {}",
                    response.status()
                )));
            }

            let body: ReplyResponse = response
                .json()
                .await
                .map_err(|e| NatterError::TextBackend(e.to_string()))?;

            Ok(body.reply)
        })
    }
}
