pub mod chat;
pub mod client;
pub mod gemini;
pub mod mock;
pub mod usage;
pub mod utils;

pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use client::LLMClient;
pub use gemini::{GeminiClient, GeminiConfig, Model as GeminiModel};
pub use mock::MockClient;
pub use usage::{GenerateResult, TokenUsage};
pub use utils::{check_response_status, handle_http_error};
