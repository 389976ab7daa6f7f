//! Build error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    #[error("unsupported {kind}: {value}")]
    UnsupportedVariant { kind: String, value: String },

    #[error("unknown target: {name}")]
    UnknownTarget { name: String },

    /// `output` holds the tail of the tool's stderr and stdout
    #[error("command `{command}` failed with exit code {exit_code:?}:\n{output}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("expected build artifact missing: {path}")]
    ArtifactMissing { path: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownTarget { .. } => Some("Run `exbuild targets` to list known target names."),
            Self::UnsupportedVariant { .. } => {
                Some("Pick one of the application/board variants the platform defines.")
            }
            Self::ArtifactMissing { .. } => {
                Some("Build the target before copying its artifacts.")
            }
            Self::CommandFailed { .. } => {
                Some("Rerun with --debug to see the complete tool output.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnsupportedVariant { .. } => "build.unsupported_variant",
            Self::UnknownTarget { .. } => "build.unknown_target",
            Self::CommandFailed { .. } => "build.command_failed",
            Self::ArtifactMissing { .. } => "build.artifact_missing",
        };
        Some(code)
    }
}
