//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// exbuild - build GN based example applications
#[derive(Parser)]
#[command(name = "exbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build GN based example applications for embedded platforms")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository root containing the examples
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory receiving one output directory per target
    #[arg(long, global = true, value_name = "DIR")]
    pub out_prefix: Option<PathBuf>,

    /// Print the commands that would run instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log and list in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

/// Target selection shared by the build commands
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Target to operate on (repeatable)
    #[arg(short, long = "target", value_name = "NAME", required = true)]
    pub targets: Vec<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List known targets
    Targets,

    /// Generate build graphs without building
    Gen {
        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Generate and build targets
    Build {
        #[command(flatten)]
        targets: TargetArgs,

        /// Copy build artifacts into DIR/<target>/ after building
        #[arg(long, value_name = "DIR")]
        copy_artifacts_to: Option<PathBuf>,
    },

    /// Remove target output directories
    Clean {
        #[command(flatten)]
        targets: TargetArgs,
    },
}
