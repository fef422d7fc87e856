//! Symptom-intake state tracker

use crate::intake::StatementKind;

/// Number of user turns collected before the diagnosis is requested.
pub const QUESTION_LIMIT: usize = 4;

/// Intake phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Answers to the scripted follow-up questions are being recorded
    Collecting,
    /// The diagnosis prompt was issued but has not produced a reply yet
    Diagnosing,
    /// Diagnosis delivered; further input is plain conversation
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collecting => write!(f, "collecting"),
            Self::Diagnosing => write!(f, "diagnosing"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Everything learned about the patient in one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    phase: Phase,
    symptoms: Vec<String>,
    medical_history: Vec<String>,
    lifestyle: Vec<String>,
    questions_asked: usize,
    last_question: Option<String>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Collecting,
            symptoms: Vec::new(),
            medical_history: Vec::new(),
            lifestyle: Vec::new(),
            questions_asked: 0,
            last_question: None,
        }
    }

    /// Back to a fresh `Collecting` state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn medical_history(&self) -> &[String] {
        &self.medical_history
    }

    pub fn lifestyle(&self) -> &[String] {
        &self.lifestyle
    }

    pub fn questions_asked(&self) -> usize {
        self.questions_asked
    }

    /// The follow-up question most recently put to the user.
    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    /// True once enough answers have been collected to request a diagnosis.
    pub fn ready_for_diagnosis(&self) -> bool {
        self.questions_asked >= QUESTION_LIMIT
    }

    pub fn record_statement(&mut self, kind: StatementKind, statement: impl Into<String>) {
        let statement = statement.into();
        match kind {
            StatementKind::Symptom => self.symptoms.push(statement),
            StatementKind::MedicalHistory => self.medical_history.push(statement),
            StatementKind::Lifestyle => self.lifestyle.push(statement),
        }
    }

    pub(crate) fn count_answer(&mut self) {
        self.questions_asked += 1;
    }

    pub(crate) fn set_last_question(&mut self, question: impl Into<String>) {
        self.last_question = Some(question.into());
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collecting_with_nothing_recorded() {
        let state = ConversationState::new();
        assert_eq!(state.phase(), Phase::Collecting);
        assert_eq!(state.questions_asked(), 0);
        assert!(state.symptoms().is_empty());
        assert!(state.last_question().is_none());
        assert!(!state.ready_for_diagnosis());
    }

    #[test]
    fn statements_land_in_their_category() {
        let mut state = ConversationState::new();
        state.record_statement(StatementKind::Symptom, "headache");
        state.record_statement(StatementKind::MedicalHistory, "diabetes");
        state.record_statement(StatementKind::Lifestyle, "night shifts");

        assert_eq!(state.symptoms(), ["headache"]);
        assert_eq!(state.medical_history(), ["diabetes"]);
        assert_eq!(state.lifestyle(), ["night shifts"]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = ConversationState::new();
        state.record_statement(StatementKind::Symptom, "rash");
        state.record_statement(StatementKind::MedicalHistory, "eczema");
        state.record_statement(StatementKind::Lifestyle, "gardening");
        for _ in 0..QUESTION_LIMIT {
            state.count_answer();
        }
        state.set_last_question("How long have you been experiencing these symptoms?");
        state.set_phase(Phase::Complete);

        state.reset();
        assert_eq!(state, ConversationState::new());
    }

    #[test]
    fn phase_display_is_lowercase() {
        assert_eq!(Phase::Diagnosing.to_string(), "diagnosing");
    }
}
