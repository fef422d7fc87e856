//! Prompt templates sent to the remote model.
//!
//! Section labels and the disclaimer sentence are what downstream rendering
//! expects to find in the model's answer; they must not change.

use crate::intake::ConversationState;

pub const REPORT_SUMMARY_LABEL: &str = "**Report Summary**";
pub const POSSIBLE_DIAGNOSIS_LABEL: &str = "**Possible Diagnosis**";
pub const SUGGESTED_TREATMENT_LABEL: &str = "**Suggested Treatment**";
pub const DISCLAIMER_LABEL: &str = "**Disclaimer**";

pub const DISCLAIMER: &str = "This is an AI-generated response and not a substitute for professional medical advice. Please consult a doctor for an accurate diagnosis and treatment plan.";

const NONE_REPORTED: &str = "None reported";

fn join_or_none(statements: &[String]) -> String {
    if statements.is_empty() {
        NONE_REPORTED.to_string()
    } else {
        statements.join(", ")
    }
}

/// Prompt asking for a diagnosis from everything collected during intake.
pub fn diagnosis_prompt(state: &ConversationState) -> String {
    format!(
        "You are an AI doctor. Based on the following information:
- **Symptoms**: {symptoms}
- **Medical History**: {history}
- **Lifestyle Factors**: {lifestyle}
Provide a possible diagnosis and suggest appropriate treatment or medicine.
Ensure the diagnosis considers the symptoms, medical history, and lifestyle factors.
If the information is insufficient, suggest possible conditions and recommend consulting a doctor for further tests.
Include a disclaimer that this is not a substitute for professional medical advice.
Format the response as:
{POSSIBLE_DIAGNOSIS_LABEL}: [Diagnosis or possible conditions]
{SUGGESTED_TREATMENT_LABEL}: [Treatment/Medicine or recommendations]
{DISCLAIMER_LABEL}: {DISCLAIMER}
",
        symptoms = state.symptoms().join(", "),
        history = join_or_none(state.medical_history()),
        lifestyle = join_or_none(state.lifestyle()),
    )
}

/// Prompt asking for a summary and diagnosis of an uploaded medical report.
pub fn report_prompt(report_text: &str) -> String {
    format!(
        "You are an AI doctor. You have received the following medical report:
{report_text}

Provide a concise summary of the report and a possible diagnosis based on the information provided.
Suggest appropriate treatment or medicine. If the report lacks sufficient information, suggest possible conditions and recommend further tests.
Include a disclaimer that this is not a substitute for professional medical advice.
Format the response as:
{REPORT_SUMMARY_LABEL}: [Summary of key findings]
{POSSIBLE_DIAGNOSIS_LABEL}: [Diagnosis or possible conditions]
{SUGGESTED_TREATMENT_LABEL}: [Treatment/Medicine or recommendations]
{DISCLAIMER_LABEL}: {DISCLAIMER}
"
    )
}
