use crate::error::DoctorError;

/// Marker put in front of every failure shown to the user.
pub const WARNING_MARKER: &str = "⚠️";

/// What the user was doing when the model call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureContext {
    /// A conversational turn
    Turn,
    /// Processing an uploaded medical report
    Report,
}

/// A failed model call, kept typed so the caller decides how to show it.
#[derive(Debug)]
pub struct Failure {
    pub context: FailureContext,
    pub error: DoctorError,
}

impl Failure {
    pub fn render(&self) -> String {
        match self.context {
            FailureContext::Turn => format!("{} Error: {}", WARNING_MARKER, self.error),
            FailureContext::Report => format!(
                "{} Error processing medical report: {}",
                WARNING_MARKER, self.error
            ),
        }
    }
}

/// Outcome of one user turn or one report upload.
#[derive(Debug)]
pub enum Reply {
    /// Scripted follow-up question, prefixed with the acknowledgement
    FollowUp(String),
    /// The model's diagnosis built from the collected answers
    Diagnosis(String),
    /// Free conversation after the diagnosis
    Chat(String),
    /// The model's summary of an uploaded report
    ReportSummary(String),
    Failed(Failure),
}

impl Reply {
    pub(crate) fn failed(context: FailureContext, error: DoctorError) -> Self {
        Reply::Failed(Failure { context, error })
    }

    /// Reply text, `None` for failures.
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::FollowUp(text)
            | Reply::Diagnosis(text)
            | Reply::Chat(text)
            | Reply::ReportSummary(text) => Some(text),
            Reply::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failed(_))
    }

    /// The string to show the user, warning-prefixed for failures.
    pub fn render(&self) -> String {
        match self {
            Reply::Failed(failure) => failure.render(),
            other => other.text().unwrap_or_default().to_string(),
        }
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_failures_render_with_warning_marker() {
        let reply = Reply::failed(
            FailureContext::Turn,
            DoctorError::ApiError("quota exceeded".into()),
        );
        assert!(reply.is_failure());
        assert_eq!(reply.text(), None);
        assert_eq!(reply.render(), "⚠️ Error: API error: quota exceeded");
    }

    #[test]
    fn report_failures_name_the_report() {
        let reply = Reply::failed(FailureContext::Report, DoctorError::Timeout);
        assert_eq!(
            reply.to_string(),
            "⚠️ Error processing medical report: Timeout error"
        );
    }

    #[test]
    fn successful_replies_render_their_text() {
        let reply = Reply::Diagnosis("**Possible Diagnosis**: flu".into());
        assert!(!reply.is_failure());
        assert_eq!(reply.render(), "**Possible Diagnosis**: flu");
    }
}
