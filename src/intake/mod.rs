//! Symptom intake: the conversation state machine and the session that drives it.
//!
//! A session asks the user about their symptoms, files each answer as a
//! symptom, a piece of medical history, or a lifestyle factor, and after four
//! answers sends everything to the model for a diagnosis. After that, user
//! messages go to the model as plain conversation.
//!
//! ```text
//! Collecting --(4th answer)--> Diagnosing --(model reply)--> Complete
//!                                   |                           ^
//!                                   +--(next input, re-send)----+
//! ```

pub mod questions;
pub mod reply;
pub mod session;
pub mod state;

pub use questions::{
    FOLLOW_UP_PREFIX, FOLLOW_UP_QUESTIONS, StatementKind, classify_answer, select_follow_up,
};
pub use reply::{Failure, FailureContext, Reply, WARNING_MARKER};
pub use session::{GREETING, IntakeSession};
pub use state::{ConversationState, Phase, QUESTION_LIMIT};
