//! # Chat Error Types
//!
//! Every failure the page can hit ends up in [`ChatError`] and is handed to an
//! [`ErrorReporter`]. Nothing here throws past its handler.

use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Failures of the chat page's network flows.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never produced the expected JSON body
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered but reported `success: false`
    #[error("{context}: {}", .message.as_deref().unwrap_or("Unknown error"))]
    Rejected {
        context: &'static str,
        message: Option<String>,
    },

    /// The executor refused to run a task
    #[error("{context}: task could not be scheduled")]
    Spawn { context: &'static str },
}

impl ChatError {
    /// Create a new logical failure
    pub fn rejected(context: &'static str, message: Option<String>) -> Self {
        Self::Rejected { context, message }
    }

    /// Wrap a transport or decoding failure
    pub fn transport(context: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { context, source }
    }

    /// Whether the backend itself reported the failure
    #[cfg(test)]
    pub(crate) const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Decides what the user sees when a flow fails.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorReporter {
    fn report(&self, error: &ChatError);
}

/// Writes errors to the browser console and shows nothing on the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report(&self, error: &ChatError) {
        log::error!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_with_message() {
        let error = ChatError::rejected(
            "Failed to send message",
            Some("Conversation not found".to_string()),
        );
        assert_eq!(
            error.to_string(),
            "Failed to send message: Conversation not found"
        );
        assert!(error.is_rejection());
    }

    #[test]
    fn test_rejected_without_message() {
        let error = ChatError::rejected("Failed to delete conversation", None);
        assert_eq!(
            error.to_string(),
            "Failed to delete conversation: Unknown error"
        );
    }

    #[test]
    fn test_spawn_error_display() {
        let error = ChatError::Spawn {
            context: "Failed to send message",
        };
        assert!(!error.is_rejection());
        assert!(error.to_string().contains("could not be scheduled"));
    }
}
