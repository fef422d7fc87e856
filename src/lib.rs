/// Virtual Doctor: a symptom-intake chatbot backed by a generative model
///
/// # Overview
///
/// The crate walks a patient through a short scripted interview, files each
/// answer as a symptom, a piece of medical history, or a lifestyle factor, and
/// after four answers asks the model for a diagnosis. Uploaded medical reports
/// can be summarized the same way.
///
/// Key pieces:
/// - [`IntakeSession`]: the per-patient state machine and model conversation
/// - [`GeminiClient`]: Google Gemini backend; [`MockClient`] for tests
/// - [`prompt`]: the fixed diagnosis and report templates
/// - [`ingest`]: PDF and plain-text report extraction
/// - [`Reply`]: typed outcome of every turn; failures never escape as errors
///
/// # Quick Start
///
/// ```no_run
/// use virtual_doctor::{ChatMessage, DoctorConfig, IntakeSession};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DoctorConfig::from_env()?.gemini_client()?;
///     let mut session = IntakeSession::new(client);
///
///     let mut transcript = vec![ChatMessage::assistant(session.initialize())];
///     for answer in ["fever", "3 days", "mild", "no allergies"] {
///         transcript.push(ChatMessage::user(answer));
///         let reply = session.record_turn(answer, &transcript).await;
///         println!("{}", reply);
///         transcript.push(ChatMessage::assistant(reply.render()));
///     }
///     Ok(())
/// }
/// ```
mod backend;
pub mod config;
mod error;
pub mod ingest;
pub mod intake;
#[cfg(feature = "logging")]
pub mod logging;
pub mod prompt;

// Re-exports for convenience
pub use backend::{
    ChatMessage, ChatRole, ChatSession, GeminiClient, GeminiConfig, GeminiModel, GenerateResult,
    LLMClient, MockClient, TokenUsage,
};
pub use config::DoctorConfig;
pub use error::{DoctorError, Result};
pub use ingest::{ReportFormat, extract_report_text, load_report};
pub use intake::{
    ConversationState, Failure, FailureContext, GREETING, IntakeSession, Phase, Reply,
    StatementKind,
};
