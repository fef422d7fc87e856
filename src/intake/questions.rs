//! Scripted follow-up questions
//!
//! The list, the random non-repeating pick, and the classifier that decides
//! which category an answer belongs to.

use rand::Rng;
use rand::seq::SliceRandom;

/// The ten follow-up questions, asked in random order during intake.
pub const FOLLOW_UP_QUESTIONS: [&str; 10] = [
    "How long have you been experiencing these symptoms?",
    "Can you describe the severity of your symptoms (mild, moderate, or severe)?",
    "Have you noticed any triggers, such as specific foods, activities, or environments?",
    "Are you experiencing any associated symptoms, like nausea, dizziness, or fatigue?",
    "Do you have any existing medical conditions, such as diabetes or hypertension?",
    "Have you taken any medications or treatments for these symptoms?",
    "Do you have a history of allergies or reactions to medications?",
    "Are you experiencing any changes in appetite, sleep, or energy levels?",
    "Have you had any recent injuries or infections that might be related?",
    "Can you tell me about your lifestyle, such as stress levels, diet, or exercise habits?",
];

/// Prefix put in front of every follow-up question.
pub const FOLLOW_UP_PREFIX: &str = "Thank you for sharing. ";

/// Category an answer is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Symptom,
    MedicalHistory,
    Lifestyle,
}

/// Pick a follow-up question at random.
///
/// Questions whose text appears inside `previous_entry` (the message shown
/// before the user's latest answer) are skipped. When every candidate is
/// excluded the first one is returned. An empty `questions` slice yields `""`.
pub fn select_follow_up<'q, R>(
    rng: &mut R,
    questions: &[&'q str],
    previous_entry: Option<&str>,
) -> &'q str
where
    R: Rng + ?Sized,
{
    let available: Vec<&'q str> = questions
        .iter()
        .copied()
        .filter(|q| previous_entry.is_none_or(|prev| !prev.contains(q)))
        .collect();

    available
        .choose(rng)
        .or_else(|| questions.first())
        .copied()
        .unwrap_or("")
}

/// Decide where the answer to a question belongs.
///
/// The first answer is always the presenting complaint. Later answers follow
/// the question they reply to: medical conditions and allergies go to medical
/// history, lifestyle to lifestyle, anything else is another symptom.
pub fn classify_answer(questions_asked: usize, previous_question: Option<&str>) -> StatementKind {
    if questions_asked == 0 {
        return StatementKind::Symptom;
    }

    let Some(question) = previous_question else {
        return StatementKind::Symptom;
    };
    let question = question.to_lowercase();

    if question.contains("medical condition") || question.contains("allergies") {
        StatementKind::MedicalHistory
    } else if question.contains("lifestyle") {
        StatementKind::Lifestyle
    } else {
        StatementKind::Symptom
    }
}

/// The follow-up question contained in a transcript entry, if any.
pub fn question_in(entry: &str) -> Option<&'static str> {
    FOLLOW_UP_QUESTIONS
        .iter()
        .copied()
        .find(|q| entry.contains(q))
}
