//! Registry of named build targets

use crate::builder::Builder;
use crate::environment::EnvironmentAccess;
use crate::platforms::{Platform, TizenApp, TizenBoard, TizenBuilder};
use crate::runner::CommandRunner;
use exbuild_errors::{BuildError, Error};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Platform specific selection a target builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum TargetKind {
    Tizen { board: TizenBoard, app: TizenApp },
}

/// A buildable target, addressed by name on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    name: &'static str,
    #[serde(flatten)]
    kind: TargetKind,
}

static TARGETS: &[Target] = &[Target {
    name: "tizen-arm-light",
    kind: TargetKind::Tizen {
        board: TizenBoard::Arm,
        app: TizenApp::Light,
    },
}];

impl Target {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        match self.kind {
            TargetKind::Tizen { .. } => Platform::Tizen,
        }
    }

    /// Construct the builder for this target
    ///
    /// The builder's identifier is the target name; its output directory is
    /// `<output prefix>/<target name>` once the caller sets a prefix.
    #[must_use]
    pub fn create_builder(
        &self,
        repository_root: &Path,
        runner: Arc<dyn CommandRunner>,
        env: Arc<dyn EnvironmentAccess>,
    ) -> Box<dyn Builder> {
        let mut builder: Box<dyn Builder> = match self.kind {
            TargetKind::Tizen { board, app } => Box::new(
                TizenBuilder::new(repository_root, runner, app, board).with_environment(env),
            ),
        };
        builder.set_identifier(self.name);
        builder
    }
}

/// Every known target
#[must_use]
pub fn all_targets() -> &'static [Target] {
    TARGETS
}

/// Look up a target by name, ignoring ASCII case
///
/// # Errors
///
/// Returns `BuildError::UnknownTarget` if no target has that name.
pub fn find_target(name: &str) -> Result<&'static Target, Error> {
    TARGETS
        .iter()
        .find(|target| target.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            BuildError::UnknownTarget {
                name: name.to_string(),
            }
            .into()
        })
}
