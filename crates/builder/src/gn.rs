//! GN based builder core
//!
//! [`GnBuilder`] holds what every GN driven platform shares: the GN root
//! directory, the runner used for external commands and the output
//! directory bookkeeping. Platforms wrap it and supply their GN arguments.

use crate::runner::{BuildCommand, CommandRunner};
use exbuild_errors::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

const DEFAULT_OUTPUT_PREFIX: &str = "out";
const DEFAULT_IDENTIFIER: &str = "default";

/// GN root, runner and output location shared by platform builders
///
/// The output directory is always `<output_prefix>/<identifier>` and is
/// recomputed whenever either part changes.
pub struct GnBuilder {
    root: PathBuf,
    runner: Arc<dyn CommandRunner>,
    output_prefix: PathBuf,
    identifier: String,
    output_dir: PathBuf,
}

impl GnBuilder {
    /// Create a builder rooted at `root`, the directory holding the `.gn` file
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        let output_prefix = PathBuf::from(DEFAULT_OUTPUT_PREFIX);
        let identifier = DEFAULT_IDENTIFIER.to_string();
        let output_dir = output_prefix.join(&identifier);
        Self {
            root: root.into(),
            runner,
            output_prefix,
            identifier,
            output_dir,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn output_prefix(&self) -> &Path {
        &self.output_prefix
    }

    /// Directory GN writes its build graph and ninja its outputs into
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
        self.output_dir = self.output_prefix.join(&self.identifier);
    }

    pub fn set_output_prefix(&mut self, prefix: impl Into<PathBuf>) {
        self.output_prefix = prefix.into();
        self.output_dir = self.output_prefix.join(&self.identifier);
    }

    /// `gn gen` invocation for the given build arguments
    #[must_use]
    pub fn gen_command(&self, args: &[String]) -> BuildCommand {
        let mut cmd = BuildCommand::new("gn").args([
            "gen".to_string(),
            "--check".to_string(),
            "--fail-on-unused-args".to_string(),
            format!("--root={}", self.root.display()),
        ]);

        if !args.is_empty() {
            cmd = cmd.arg(format!("--args={}", args.join(" ")));
        }

        cmd.arg(self.output_dir.display().to_string())
    }

    /// `ninja` invocation building everything in the output directory
    #[must_use]
    pub fn compile_command(&self) -> BuildCommand {
        BuildCommand::new("ninja").args(["-C".to_string(), self.output_dir.display().to_string()])
    }

    /// Run `gn gen` unless the output directory already exists
    ///
    /// An existing GN output directory regenerates itself from ninja, so it
    /// is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be inspected or the
    /// runner fails to execute `gn`.
    pub async fn generate(&self, args: &[String]) -> Result<(), Error> {
        let exists = fs::try_exists(&self.output_dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &self.output_dir))?;
        if exists {
            debug!(
                output_dir = %self.output_dir.display(),
                "output directory exists, skipping gn gen"
            );
            return Ok(());
        }

        let title = format!("Generating {}", self.identifier);
        self.runner.run(&self.gen_command(args), &title).await
    }

    /// Run ninja in the output directory
    ///
    /// # Errors
    ///
    /// Returns an error if the runner fails to execute `ninja`.
    pub async fn compile(&self) -> Result<(), Error> {
        let title = format!("Building {}", self.identifier);
        self.runner.run(&self.compile_command(), &title).await
    }
}

impl fmt::Debug for GnBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GnBuilder")
            .field("root", &self.root)
            .field("runner", &self.runner.name())
            .field("output_prefix", &self.output_prefix)
            .field("identifier", &self.identifier)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::PrintOnlyRunner;
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_output_dir_bookkeeping() {
        let mut gn = GnBuilder::new("/src/app", Arc::new(PrintOnlyRunner::new()));
        assert_eq!(gn.output_dir(), Path::new("out/default"));

        gn.set_identifier("tizen-arm-light");
        assert_eq!(gn.output_dir(), Path::new("out/tizen-arm-light"));

        gn.set_output_prefix("/tmp/build");
        assert_eq!(gn.output_dir(), Path::new("/tmp/build/tizen-arm-light"));
        assert_eq!(gn.identifier(), "tizen-arm-light");
    }

    #[test]
    fn test_gen_command() {
        let mut gn = GnBuilder::new("/src/app", Arc::new(PrintOnlyRunner::new()));
        gn.set_output_prefix("/out");
        gn.set_identifier("t");

        let cmd = gn.gen_command(&strings(&[r#"a="1""#, r#"b="2""#]));
        assert_eq!(cmd.program(), "gn");
        assert_eq!(
            cmd.get_args(),
            strings(&[
                "gen",
                "--check",
                "--fail-on-unused-args",
                "--root=/src/app",
                r#"--args=a="1" b="2""#,
                "/out/t",
            ])
            .as_slice()
        );
    }

    #[test]
    fn test_gen_command_without_args() {
        let gn = GnBuilder::new("/src/app", Arc::new(PrintOnlyRunner::new()));
        let cmd = gn.gen_command(&[]);
        assert!(!cmd.get_args().iter().any(|a| a.starts_with("--args=")));
        assert_eq!(cmd.get_args().last().map(String::as_str), Some("out/default"));
    }

    #[test]
    fn test_compile_command() {
        let mut gn = GnBuilder::new("/src/app", Arc::new(PrintOnlyRunner::new()));
        gn.set_output_prefix("/out");
        let cmd = gn.compile_command();
        assert_eq!(cmd.to_string(), "ninja -C /out/default");
    }

    #[tokio::test]
    async fn test_generate_runs_gn_for_fresh_output_dir() {
        let temp = tempdir().unwrap();
        let runner = Arc::new(PrintOnlyRunner::new());
        let mut gn = GnBuilder::new("/src/app", runner.clone());
        gn.set_output_prefix(temp.path());
        gn.set_identifier("fresh");

        gn.generate(&strings(&["x=1"])).await.unwrap();
        gn.compile().await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program(), "gn");
        assert_eq!(commands[1].program(), "ninja");
        assert!(runner.script().contains("# Generating fresh"));
        assert!(runner.script().contains("# Building fresh"));
    }

    #[tokio::test]
    async fn test_generate_skipped_when_output_dir_exists() {
        let temp = tempdir().unwrap();
        let runner = Arc::new(PrintOnlyRunner::new());
        let mut gn = GnBuilder::new("/src/app", runner.clone());
        gn.set_output_prefix(temp.path());
        gn.set_identifier("existing");
        std::fs::create_dir_all(gn.output_dir()).unwrap();

        gn.generate(&strings(&["x=1"])).await.unwrap();
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_generate_reports_unreadable_output_dir() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let runner = Arc::new(PrintOnlyRunner::new());
        let mut gn = GnBuilder::new("/src/app", runner.clone());
        gn.set_output_prefix(&blocker);

        let err = gn.generate(&strings(&["x=1"])).await.unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(ref p), .. } if p == gn.output_dir()));
        assert!(runner.commands().is_empty());
    }
}
