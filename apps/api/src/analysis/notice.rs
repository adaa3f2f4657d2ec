use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Destructive,
}

/// Transient user-facing message, rendered by the UI as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn analysis_complete(score: u32) -> Self {
        Self::info("Analysis complete", format!("Your ATS score is {score}%"))
    }

    pub fn file_uploaded(file_name: &str) -> Self {
        Self::info("File uploaded", format!("{file_name} uploaded successfully."))
    }

    pub fn analysis_failed() -> Self {
        Self::destructive("Analysis failed", "Please try again later.")
    }
}
