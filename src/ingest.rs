//! Medical report ingestion
//!
//! Turns an uploaded file into the plain text handed to
//! [`IntakeSession::process_report`](crate::IntakeSession::process_report).
//! PDF support is behind the `pdf` feature.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{DoctorError, Result};

/// Report formats that can be turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    PlainText,
}

impl ReportFormat {
    /// Format for a declared MIME type, `None` if unsupported.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(ReportFormat::Pdf),
            "text/plain" => Some(ReportFormat::PlainText),
            _ => None,
        }
    }

    /// Format guessed from a file's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        mime_guess::from_path(path)
            .iter()
            .find_map(|mime| Self::from_mime(mime.essence_str()))
    }
}

/// Extract the text of a report.
///
/// Plain text is decoded leniently: invalid UTF-8 sequences are replaced and
/// whatever text remains is returned. A PDF that cannot be parsed is an
/// [`DoctorError::ExtractionError`].
///
/// `pdf-extract` panics on some malformed documents. The panic is caught and
/// returned as an `ExtractionError`, but the process panic hook still runs
/// first; front-ends that print to a terminal may want to silence it around
/// the call.
pub fn extract_report_text(bytes: &[u8], format: ReportFormat) -> Result<String> {
    let text = match format {
        ReportFormat::PlainText => {
            let text = String::from_utf8_lossy(bytes);
            if text.contains(char::REPLACEMENT_CHARACTER) {
                warn!("Report is not valid UTF-8, invalid sequences replaced");
            }
            text.into_owned()
        }
        ReportFormat::Pdf => extract_pdf_text(bytes)?,
    };

    debug!(?format, bytes = bytes.len(), chars = text.len(), "Extracted report text");
    Ok(text)
}

/// Extract report text from bytes with a declared MIME type.
pub fn extract_report_text_for_mime(bytes: &[u8], mime: &str) -> Result<String> {
    let format = ReportFormat::from_mime(mime).ok_or_else(|| {
        DoctorError::ExtractionError(format!("Unsupported report type: {}", mime))
    })?;
    extract_report_text(bytes, format)
}

/// Read a report file and extract its text, choosing the format by extension.
///
/// See [`extract_report_text`] for how malformed PDFs are handled.
pub fn load_report(path: &Path) -> Result<String> {
    let format = ReportFormat::from_path(path).ok_or_else(|| {
        DoctorError::ExtractionError(format!(
            "Unsupported report file (expected .pdf or .txt): {}",
            path.display()
        ))
    })?;
    let bytes = std::fs::read(path)?;
    extract_report_text(&bytes, format)
}

#[cfg(feature = "pdf")]
fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed documents
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| DoctorError::ExtractionError("Could not read PDF: malformed document".into()))?;
    extracted.map_err(|e| DoctorError::ExtractionError(format!("Could not read PDF: {}", e)))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_text(_bytes: &[u8]) -> Result<String> {
    Err(DoctorError::ExtractionError(
        "PDF support is not enabled (build with the `pdf` feature)".to_string(),
    ))
}
