use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

use crate::backend::{ChatMessage, ChatSession, LLMClient};
use crate::error::Result;
use crate::intake::questions::{
    FOLLOW_UP_PREFIX, FOLLOW_UP_QUESTIONS, classify_answer, question_in, select_follow_up,
};
use crate::intake::StatementKind;
use crate::intake::reply::{FailureContext, Reply};
use crate::intake::state::{ConversationState, Phase};
use crate::prompt::{diagnosis_prompt, report_prompt};

/// Greeting returned by [`IntakeSession::initialize`].
pub const GREETING: &str = "Hello! I'm your Virtual Doctor. To assist you better, please tell me about any symptoms you're experiencing, such as fever, cough, or pain.";

/// Reports longer than this are still forwarded, with a warning in the log.
const LONG_REPORT_CHARS: usize = 100_000;

/// One patient's conversation with the virtual doctor.
///
/// Owns the intake state and a persistent model conversation. Each session is
/// independent; concurrent users need one session each. Turns take `&mut self`
/// so a session handles one turn at a time.
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use virtual_doctor::{ChatMessage, GeminiClient, IntakeSession};
///
/// let mut session = IntakeSession::new(GeminiClient::from_env()?);
/// let mut transcript = vec![ChatMessage::assistant(session.initialize())];
///
/// transcript.push(ChatMessage::user("I have a fever"));
/// let reply = session.record_turn("I have a fever", &transcript).await;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IntakeSession {
    state: ConversationState,
    chat: ChatSession,
    rng: StdRng,
}

impl IntakeSession {
    pub fn new(client: impl LLMClient + 'static) -> Self {
        Self::from_boxed(Box::new(client))
    }

    pub fn from_boxed(client: Box<dyn LLMClient>) -> Self {
        Self {
            state: ConversationState::new(),
            chat: ChatSession::from_boxed(client),
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed the follow-up question picker, for reproducible conversations.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Start intake over and return the greeting.
    ///
    /// The model-side conversation is kept.
    pub fn initialize(&mut self) -> &'static str {
        self.state.reset();
        info!("Intake initialized");
        GREETING
    }

    /// Handle one user message.
    ///
    /// `transcript` is the caller's message list, already including
    /// `user_input` as its last entry. Only the entry before it is read.
    #[instrument(
        name = "record_turn",
        skip(self, user_input, transcript),
        fields(phase = %self.state.phase(), input_len = user_input.len())
    )]
    pub async fn record_turn(&mut self, user_input: &str, transcript: &[ChatMessage]) -> Reply {
        match self.state.phase() {
            Phase::Collecting => self.collect_answer(user_input, transcript).await,
            Phase::Diagnosing => {
                debug!("Input arrived before diagnosis completed, adding it as a symptom");
                self.state.record_statement(StatementKind::Symptom, user_input);
                self.state.set_phase(Phase::Complete);
                self.diagnose().await
            }
            Phase::Complete => match self.dispatch(user_input).await {
                Ok(text) => Reply::Chat(text),
                Err(e) => Reply::failed(FailureContext::Turn, e),
            },
        }
    }

    /// Summarize an uploaded report. Leaves the intake state alone.
    #[instrument(name = "process_report", skip(self, report_text), fields(report_len = report_text.len()))]
    pub async fn process_report(&mut self, report_text: &str) -> Reply {
        if report_text.trim().is_empty() {
            warn!("Report text is empty, forwarding anyway");
        } else if report_text.chars().count() > LONG_REPORT_CHARS {
            warn!(
                limit = LONG_REPORT_CHARS,
                "Report is unusually long, forwarding as-is"
            );
        }

        match self.dispatch(&report_prompt(report_text)).await {
            Ok(text) => {
                info!("Report summary received");
                Reply::ReportSummary(text)
            }
            Err(e) => Reply::failed(FailureContext::Report, e),
        }
    }

    async fn collect_answer(&mut self, user_input: &str, transcript: &[ChatMessage]) -> Reply {
        let previous_entry = transcript.iter().rev().nth(1).map(|m| m.content.as_str());

        let previous_question = self
            .state
            .last_question()
            .or_else(|| previous_entry.and_then(question_in));
        let kind = classify_answer(self.state.questions_asked(), previous_question);
        self.state.record_statement(kind, user_input);
        self.state.count_answer();

        debug!(
            ?kind,
            questions_asked = self.state.questions_asked(),
            "Recorded answer"
        );

        if !self.state.ready_for_diagnosis() {
            let question = select_follow_up(&mut self.rng, &FOLLOW_UP_QUESTIONS, previous_entry);
            self.state.set_last_question(question);
            return Reply::FollowUp(format!("{}{}", FOLLOW_UP_PREFIX, question));
        }

        info!("Intake complete, requesting diagnosis");
        self.state.set_phase(Phase::Diagnosing);
        let reply = self.diagnose().await;
        if !reply.is_failure() {
            self.state.set_phase(Phase::Complete);
        }
        reply
    }

    async fn diagnose(&mut self) -> Reply {
        let prompt = diagnosis_prompt(&self.state);
        match self.dispatch(&prompt).await {
            Ok(text) => Reply::Diagnosis(text),
            Err(e) => Reply::failed(FailureContext::Turn, e),
        }
    }

    async fn dispatch(&mut self, prompt: &str) -> Result<String> {
        let text = self.chat.send_message(prompt).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockClient;

    fn follow_up_transcript(question: &str, answer: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::assistant(format!("{}{}", FOLLOW_UP_PREFIX, question)),
            ChatMessage::user(answer),
        ]
    }

    #[tokio::test]
    async fn answer_to_medical_condition_question_goes_to_history() {
        let mut session = IntakeSession::new(MockClient::new()).with_seed(3);
        session.state.count_answer();
        session.state.set_last_question(FOLLOW_UP_QUESTIONS[4]);

        let transcript = follow_up_transcript(FOLLOW_UP_QUESTIONS[4], "type 2 diabetes");
        let reply = session.record_turn("type 2 diabetes", &transcript).await;

        assert!(matches!(reply, Reply::FollowUp(_)));
        assert_eq!(session.state().medical_history(), ["type 2 diabetes"]);
        assert!(session.state().symptoms().is_empty());
        assert_eq!(session.state().questions_asked(), 2);
    }

    #[tokio::test]
    async fn previous_question_is_recovered_from_transcript() {
        let mut session = IntakeSession::new(MockClient::new()).with_seed(3);
        session.state.count_answer();

        let transcript = follow_up_transcript(FOLLOW_UP_QUESTIONS[9], "I work night shifts");
        session.record_turn("I work night shifts", &transcript).await;

        assert_eq!(session.state().lifestyle(), ["I work night shifts"]);
    }

    #[tokio::test]
    async fn follow_up_is_remembered_as_last_question() {
        let mut session = IntakeSession::new(MockClient::new()).with_seed(11);
        session.initialize();

        let transcript = [ChatMessage::assistant(GREETING), ChatMessage::user("headache")];
        let reply = session.record_turn("headache", &transcript).await;

        let text = reply.text().unwrap();
        let asked = session.state().last_question().unwrap();
        assert_eq!(text, format!("{}{}", FOLLOW_UP_PREFIX, asked));
        assert_eq!(session.state().symptoms(), ["headache"]);
    }
}
