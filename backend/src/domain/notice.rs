//! User-visible notices returned alongside results.

use serde::Serialize;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Non-fatal message for the caller, such as "Successfully added Lagos!".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    level: NoticeLevel,
    message: String,
}

impl Notice {
    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, message)
    }

    /// Warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, message)
    }

    /// Error notice for failures that did not abort the call.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, message)
    }

    fn with_level(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Severity.
    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}
