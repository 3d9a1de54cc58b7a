use super::types::ConversationTurn;
use parking_lot::RwLock;
use std::sync::Arc;

/// Append-only conversation history, shared between the controller and the
/// UI thread. Turns are never edited or reordered once pushed.
#[derive(Debug, Clone)]
pub struct TurnStore {
    turns: Arc<RwLock<Vec<ConversationTurn>>>,
}

impl TurnStore {
    pub fn new() -> Self {
        Self {
            turns: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn push(&self, turn: ConversationTurn) {
        self.turns.write().push(turn);
    }

    pub fn push_user(&self, text: impl Into<String>) {
        self.push(ConversationTurn::user(text));
    }

    pub fn push_model(&self, text: impl Into<String>) {
        self.push(ConversationTurn::model(text));
    }

    /// Clone of the full turn sequence, in chronological order
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.read().clone()
    }

    pub fn clear(&self) {
        self.turns.write().clear();
    }

    pub fn len(&self) -> usize {
        self.turns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.read().is_empty()
    }
}

impl Default for TurnStore {
    fn default() -> Self {
        Self::new()
    }
}
