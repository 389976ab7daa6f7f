//! Tizen platform builder
//!
//! Builds the Linux flavoured example applications against a Tizen sysroot.
//! The sysroot location comes from `TIZEN_HOME`, read each time the GN
//! arguments are derived.

use crate::builder::Builder;
use crate::environment::{EnvironmentAccess, ProcessEnvironment};
use crate::gn::GnBuilder;
use crate::runner::CommandRunner;
use exbuild_errors::{BuildError, ConfigError, Error};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable naming the Tizen toolchain root
pub const TIZEN_HOME_VAR: &str = "TIZEN_HOME";

/// Example applications buildable for Tizen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TizenApp {
    #[default]
    Light,
}

impl TizenApp {
    pub const ALL: [TizenApp; 1] = [TizenApp::Light];

    /// Directory name of the example under `examples/`
    #[must_use]
    pub fn example_name(self) -> &'static str {
        match self {
            TizenApp::Light => "lighting-app",
        }
    }

    /// Name of the produced binary
    #[must_use]
    pub fn app_name(self) -> &'static str {
        match self {
            TizenApp::Light => "chip-lighting-app",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TizenApp::Light => "light",
        }
    }
}

impl fmt::Display for TizenApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TizenApp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|app| app.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                BuildError::UnsupportedVariant {
                    kind: "tizen app".to_string(),
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// Target boards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TizenBoard {
    #[default]
    Arm,
}

impl TizenBoard {
    pub const ALL: [TizenBoard; 1] = [TizenBoard::Arm];

    /// Value for GN's `target_cpu`
    #[must_use]
    pub fn target_cpu_name(self) -> &'static str {
        match self {
            TizenBoard::Arm => "arm",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TizenBoard::Arm => "arm",
        }
    }
}

impl fmt::Display for TizenBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TizenBoard {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|board| board.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                BuildError::UnsupportedVariant {
                    kind: "tizen board".to_string(),
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// GN builder for a Tizen application/board pair
pub struct TizenBuilder {
    gn: GnBuilder,
    app: TizenApp,
    board: TizenBoard,
    env: Arc<dyn EnvironmentAccess>,
}

impl TizenBuilder {
    /// Create a builder for `app` on `board` inside the repository at `root`
    ///
    /// The GN root is the example's `linux` directory. Nothing is validated
    /// here; a missing toolchain surfaces when GN arguments are derived.
    #[must_use]
    pub fn new(
        root: &Path,
        runner: Arc<dyn CommandRunner>,
        app: TizenApp,
        board: TizenBoard,
    ) -> Self {
        let gn_root = root.join("examples").join(app.example_name()).join("linux");
        Self {
            gn: GnBuilder::new(gn_root, runner),
            app,
            board,
            env: Arc::new(ProcessEnvironment::new()),
        }
    }

    /// Read `TIZEN_HOME` from `env` instead of the process environment
    #[must_use]
    pub fn with_environment(mut self, env: Arc<dyn EnvironmentAccess>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn app(&self) -> TizenApp {
        self.app
    }

    #[must_use]
    pub fn board(&self) -> TizenBoard {
        self.board
    }
}

impl Builder for TizenBuilder {
    fn gn(&self) -> &GnBuilder {
        &self.gn
    }

    fn gn_mut(&mut self) -> &mut GnBuilder {
        &mut self.gn
    }

    fn gn_build_args(&self) -> Result<Vec<String>, Error> {
        let sysroot = self
            .env
            .var(TIZEN_HOME_VAR)
            .ok_or_else(|| ConfigError::EnvVarNotFound {
                var: TIZEN_HOME_VAR.to_string(),
            })?;

        Ok(vec![
            r#"target_os="tizen""#.to_string(),
            format!(r#"target_cpu="{}""#, self.board.target_cpu_name()),
            format!(r#"sysroot="{sysroot}""#),
        ])
    }

    fn build_outputs(&self) -> HashMap<String, PathBuf> {
        let app_name = self.app.app_name();
        let map_name = format!("{app_name}.map");
        let output_dir = self.gn.output_dir();

        HashMap::from([
            (app_name.to_string(), output_dir.join(app_name)),
            (map_name.clone(), output_dir.join(&map_name)),
        ])
    }
}

impl fmt::Debug for TizenBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TizenBuilder")
            .field("gn", &self.gn)
            .field("app", &self.app)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}
