use async_trait::async_trait;

use crate::backend::{ChatMessage, GenerateResult};
use crate::error::Result;

/// LLMClient defines the interface to the remote generative model.
///
/// A client is stateless with respect to the conversation: each call receives
/// the full message history and returns the model's next turn. Persistence of
/// that history across turns is the job of [`ChatSession`](crate::ChatSession).
///
/// The crate ships two implementations:
/// - [`GeminiClient`](crate::GeminiClient) for Google's Gemini models
/// - [`MockClient`](crate::MockClient), a deterministic stand-in for tests and offline runs
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use virtual_doctor::{GeminiClient, GeminiModel, LLMClient};
///
/// let client = GeminiClient::from_env()?
///     .model(GeminiModel::Gemini15Flash)
///     .temperature(0.2);
///
/// let text = client.generate("List three common causes of a headache.").await?;
/// println!("{}", text);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate the next model turn for a conversation.
    ///
    /// `messages` holds the whole history, oldest first; the last entry is the
    /// user turn being answered.
    async fn generate_chat(&self, messages: &[ChatMessage]) -> Result<GenerateResult>;

    /// Raw single-prompt completion (returns plain text).
    async fn generate(&self, prompt: &str) -> Result<String> {
        let result = self.generate_chat(&[ChatMessage::user(prompt)]).await?;
        Ok(result.text)
    }

    /// Model identifier used for requests
    fn model_name(&self) -> &str;
}
