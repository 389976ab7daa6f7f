#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]
//! GN based example builders for exbuild
//!
//! A [`BuildContext`] resolves target names from the registry into platform
//! [`Builder`]s, then generates, compiles, cleans or collects artifacts for
//! them through a [`CommandRunner`].

mod builder;
mod context;
pub mod environment;
mod gn;
pub mod platforms;
pub mod runner;
mod targets;

pub use builder::Builder;
pub use context::BuildContext;
pub use environment::{EnvironmentAccess, MapEnvironment, ProcessEnvironment};
pub use gn::GnBuilder;
pub use platforms::{Platform, TizenApp, TizenBoard, TizenBuilder, TIZEN_HOME_VAR};
pub use runner::{BuildCommand, CommandRunner, PrintOnlyRunner, ShellRunner};
pub use targets::{all_targets, find_target, Target, TargetKind};
