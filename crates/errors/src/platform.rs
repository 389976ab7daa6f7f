//! Process execution errors

use crate::UserFacingError;
use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur while launching external tools
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => {
                Some("Install gn and ninja and make sure they are on PATH.")
            }
            Self::ProcessExecutionFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::ProcessExecutionFailed { .. } => Some("platform.process_execution_failed"),
            Self::CommandNotFound { .. } => Some("platform.command_not_found"),
        }
    }
}
