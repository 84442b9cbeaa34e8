//! User-facing notices returned by value alongside a primary outcome.

use serde::Serialize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Confirmation of something that happened.
    Info,
    /// Something the user should fix or retry.
    Error,
}

/// One message for the presentation layer to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// The message text.
    pub message: String,
}

impl Notice {
    /// An informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A primary value plus zero or more notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    /// The primary outcome.
    pub value: T,
    /// Notices to show with it.
    pub notices: Vec<Notice>,
}

impl<T> Reply<T> {
    /// A reply with no notices.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            notices: Vec::new(),
        }
    }

    /// Appends a notice.
    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}
