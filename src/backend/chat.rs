use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::backend::{LLMClient, TokenUsage};
use crate::error::Result;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in a conversation.
///
/// Used both for the transcript a display surface keeps and for the
/// model-side history a [`ChatSession`] keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// One persistent conversation with the remote model.
///
/// Every message sent carries the whole history, so the model sees earlier
/// turns (the report summary, the diagnosis) when answering follow-ups.
/// A failed or cancelled call leaves the history untouched.
pub struct ChatSession {
    client: Box<dyn LLMClient>,
    history: Vec<ChatMessage>,
    last_usage: Option<TokenUsage>,
}

impl ChatSession {
    pub fn new(client: impl LLMClient + 'static) -> Self {
        Self::from_boxed(Box::new(client))
    }

    pub fn from_boxed(client: Box<dyn LLMClient>) -> Self {
        Self {
            client,
            history: Vec::new(),
            last_usage: None,
        }
    }

    /// Messages exchanged so far, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Token usage reported for the most recent successful call.
    pub fn last_usage(&self) -> Option<&TokenUsage> {
        self.last_usage.as_ref()
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Send one user turn and return the model's reply text.
    #[instrument(
        name = "chat_send_message",
        skip(self, text),
        fields(model = %self.client.model_name(), history_len = self.history.len(), text_len = text.len())
    )]
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        // history only changes once the call completes, so a dropped future leaves it intact
        let mut request = self.history.clone();
        request.push(ChatMessage::user(text));

        let result = match self.client.generate_chat(&request).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Model call failed, user turn not added to history");
                return Err(e);
            }
        };

        if let Some(usage) = &result.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Model call usage"
            );
        }
        self.last_usage = result.usage;
        request.push(ChatMessage::assistant(result.text.clone()));
        self.history = request;
        Ok(result.text)
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("model", &self.client.model_name())
            .field("history_len", &self.history.len())
            .field("last_usage", &self.last_usage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockClient;

    #[tokio::test]
    async fn successful_send_appends_both_turns() {
        let mut chat = ChatSession::new(MockClient::new());
        let reply = chat.send_message("Hello").await.unwrap();

        assert_eq!(reply, "Mock response to: Hello");
        assert_eq!(
            chat.history(),
            &[
                ChatMessage::user("Hello"),
                ChatMessage::assistant("Mock response to: Hello"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_send_leaves_history_unchanged() {
        let mock = MockClient::new();
        mock.push_error("quota exceeded");
        let mut chat = ChatSession::new(mock);

        assert!(chat.send_message("Hello").await.is_err());
        assert!(chat.history().is_empty());
    }

    /// Client whose calls never complete.
    struct StalledClient;

    #[async_trait::async_trait]
    impl LLMClient for StalledClient {
        async fn generate_chat(&self, _messages: &[ChatMessage]) -> Result<crate::GenerateResult> {
            std::future::pending().await
        }

        fn model_name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn cancelled_send_leaves_history_unchanged() {
        let mut chat = ChatSession::new(StalledClient);

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            chat.send_message("diagnose me"),
        )
        .await;

        assert!(outcome.is_err());
        assert!(chat.history().is_empty());
        assert!(chat.last_usage().is_none());
    }

    #[tokio::test]
    async fn history_is_sent_with_every_turn() {
        let mock = MockClient::new();
        let mut chat = ChatSession::new(mock.clone());
        chat.send_message("first").await.unwrap();
        chat.send_message("second").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].len(), 3);
        assert_eq!(requests[1][0], ChatMessage::user("first"));
    }
}
