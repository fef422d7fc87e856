//! Mock model client
//!
//! Deterministic stand-in for the remote model, used by the test-suite and by
//! the `--mock` flag of the terminal front-end. Unless a scripted response is
//! queued, it answers `"Mock response to: <last user message>"`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::backend::{ChatMessage, GenerateResult, LLMClient, TokenUsage};
use crate::error::{DoctorError, Result};

const MOCK_MODEL: &str = "mock-model";

#[derive(Debug)]
enum Scripted {
    Text(String),
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    requests: Vec<Vec<ChatMessage>>,
}

/// Mock model client.
///
/// Clones share state, so a test can keep one handle while the session owns
/// another and inspect every request the session made.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply for the next unanswered call.
    pub fn push_response(&self, text: impl Into<String>) {
        self.lock().queue.push_back(Scripted::Text(text.into()));
    }

    /// Queue a failure for the next unanswered call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock().queue.push_back(Scripted::Error(message.into()));
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    /// Full message list of every call, in order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.lock().requests.clone()
    }

    /// Content of the final (user) message of every call, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .filter_map(|messages| messages.last().map(|m| m.content.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread may poison the lock; the data is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LLMClient for MockClient {
    async fn generate_chat(&self, messages: &[ChatMessage]) -> Result<GenerateResult> {
        tracing::info!(messages = messages.len(), "Mock model processing request");

        let scripted = {
            let mut state = self.lock();
            state.requests.push(messages.to_vec());
            state.queue.pop_front()
        };

        let text = match scripted {
            Some(Scripted::Error(message)) => return Err(DoctorError::ApiError(message)),
            Some(Scripted::Text(text)) => text,
            None => {
                let last = messages
                    .last()
                    .map(|m| m.content.as_str())
                    .unwrap_or("empty");
                format!("Mock response to: {}", last)
            }
        };

        let input_tokens = messages
            .iter()
            .map(|m| m.content.len() as u64 / 4)
            .sum::<u64>();
        let output_tokens = text.len() as u64 / 4;

        Ok(GenerateResult::new(
            text,
            Some(TokenUsage::new(MOCK_MODEL, input_tokens, output_tokens)),
        ))
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}
