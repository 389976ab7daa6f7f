#![deny(clippy::pedantic, unsafe_code)]

//! exbuild - build orchestration for GN based example applications
//!
//! Resolves target names into platform builders and drives `gn` and `ninja`
//! for them, or prints the commands in dry-run mode.

mod cli;
mod error;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::error::CliError;
use clap::Parser;
use exbuild_builder::{all_targets, BuildContext, CommandRunner, PrintOnlyRunner, ShellRunner};
use exbuild_config::Config;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.json, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting exbuild v{}", env!("CARGO_PKG_VERSION"));

    // Precedence: file (or defaults) < environment < CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    match cli.command {
        Commands::Targets => list_targets(cli.global.json)?,
        Commands::Gen { targets } => {
            run_with_context(&config, &targets.targets, Action::Generate).await?;
        }
        Commands::Build {
            targets,
            copy_artifacts_to,
        } => {
            run_with_context(&config, &targets.targets, Action::Build { copy_artifacts_to })
                .await?;
        }
        Commands::Clean { targets } => {
            run_with_context(&config, &targets.targets, Action::Clean).await?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

enum Action {
    Generate,
    Build { copy_artifacts_to: Option<PathBuf> },
    Clean,
}

async fn run_with_context(
    config: &Config,
    targets: &[String],
    action: Action,
) -> Result<(), CliError> {
    let print_only = config.build.dry_run.then(|| Arc::new(PrintOnlyRunner::new()));
    let runner: Arc<dyn CommandRunner> = match &print_only {
        Some(recorder) => recorder.clone(),
        None => Arc::new(ShellRunner::new()),
    };

    let mut ctx = BuildContext::new(config.repository_root(), config.output_prefix(), runner);
    ctx.setup_builders(targets)?;

    match action {
        Action::Generate => ctx.generate().await?,
        Action::Build { copy_artifacts_to } => {
            ctx.build().await?;
            if let Some(dir) = copy_artifacts_to {
                if print_only.is_some() {
                    warn!("Dry run: not copying artifacts to {}", dir.display());
                } else {
                    ctx.copy_artifacts_to(&dir).await?;
                }
            }
        }
        Action::Clean => {
            if print_only.is_some() {
                for builder in ctx.builders() {
                    info!("Dry run: would remove {}", builder.output_dir().display());
                }
            } else {
                ctx.clean_output_directories().await?;
            }
        }
    }

    if let Some(recorder) = print_only {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(recorder.script().as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

fn list_targets(json: bool) -> Result<(), CliError> {
    if json {
        let rendered =
            serde_json::to_string_pretty(all_targets()).map_err(exbuild_errors::Error::from)?;
        println!("{rendered}");
    } else {
        for target in all_targets() {
            println!("{}", target.name());
        }
    }
    Ok(())
}

/// Apply CLI flags on top of file and environment configuration
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(root) = &global.root {
        config.paths.repository_root = Some(root.clone());
    }
    if let Some(prefix) = &global.out_prefix {
        config.build.output_prefix.clone_from(prefix);
    }
    if global.dry_run {
        config.build.dry_run = true;
    }
}

/// Initialize tracing; logs go to stderr so dry-run scripts stay clean on stdout
fn init_tracing(json_mode: bool, debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if json_mode {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
