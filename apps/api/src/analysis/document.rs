//! Uploaded document descriptor and the upload gate that runs before scoring.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted upload, 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const MEDIA_PDF: &str = "application/pdf";
const MEDIA_DOC: &str = "application/msword";
const MEDIA_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MEDIA_TEXT: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    PlainText,
    Unknown,
}

impl DocumentKind {
    /// Maps a declared media type to a kind. Parameters such as
    /// `; charset=utf-8` and letter case are ignored.
    pub fn from_media_type(media_type: &str) -> Self {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MEDIA_PDF => DocumentKind::Pdf,
            MEDIA_DOC => DocumentKind::Doc,
            MEDIA_DOCX => DocumentKind::Docx,
            MEDIA_TEXT => DocumentKind::PlainText,
            _ => DocumentKind::Unknown,
        }
    }

    /// Upper-case format name used in the analysis summary.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Doc => "DOC",
            DocumentKind::Docx => "DOCX",
            DocumentKind::PlainText => "TXT",
            DocumentKind::Unknown => "Unknown",
        }
    }
}

/// A file part received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please fill in all fields and upload a document.")]
    MissingInformation,

    #[error("Please upload a PDF, DOC, DOCX, or TXT file.")]
    InvalidFileType { media_type: String },

    #[error("Please upload a file smaller than 5MB.")]
    FileTooLarge { size: usize },
}

impl UploadRejection {
    /// Short headline shown with the rejection.
    pub fn title(&self) -> &'static str {
        match self {
            UploadRejection::MissingInformation => "Missing information",
            UploadRejection::InvalidFileType { .. } => "Invalid file type",
            UploadRejection::FileTooLarge { .. } => "File too large",
        }
    }
}

/// Checks the declared type, then the size. Returns the document kind the
/// estimator should see.
pub fn validate_document(document: &UploadedDocument) -> Result<DocumentKind, UploadRejection> {
    let kind = DocumentKind::from_media_type(&document.media_type);
    if kind == DocumentKind::Unknown {
        return Err(UploadRejection::InvalidFileType {
            media_type: document.media_type.clone(),
        });
    }

    let size = document.data.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::FileTooLarge { size });
    }

    Ok(kind)
}

/// Full form gate: required fields first, then the document itself.
pub fn validate_submission(
    job_title: Option<&str>,
    experience: Option<&str>,
    document: Option<&UploadedDocument>,
) -> Result<DocumentKind, UploadRejection> {
    let filled = |field: Option<&str>| field.is_some_and(|v| !v.trim().is_empty());

    match document {
        Some(document) if filled(job_title) && filled(experience) => validate_document(document),
        _ => Err(UploadRejection::MissingInformation),
    }
}
