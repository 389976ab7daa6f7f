//! Build context driving a set of target builders

use crate::builder::Builder;
use crate::environment::{EnvironmentAccess, ProcessEnvironment};
use crate::runner::CommandRunner;
use crate::targets::find_target;
use exbuild_errors::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

/// Holds the builders selected for one invocation and runs them in order
pub struct BuildContext {
    repository_root: PathBuf,
    output_prefix: PathBuf,
    runner: Arc<dyn CommandRunner>,
    env: Arc<dyn EnvironmentAccess>,
    builders: Vec<Box<dyn Builder>>,
}

impl BuildContext {
    /// Create a context for the repository at `repository_root`
    #[must_use]
    pub fn new(
        repository_root: impl Into<PathBuf>,
        output_prefix: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            repository_root: repository_root.into(),
            output_prefix: output_prefix.into(),
            runner,
            env: Arc::new(ProcessEnvironment::new()),
            builders: Vec::new(),
        }
    }

    /// Environment builders read toolchain settings from
    #[must_use]
    pub fn with_environment(mut self, env: Arc<dyn EnvironmentAccess>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn repository_root(&self) -> &Path {
        &self.repository_root
    }

    #[must_use]
    pub fn output_prefix(&self) -> &Path {
        &self.output_prefix
    }

    #[must_use]
    pub fn builders(&self) -> &[Box<dyn Builder>] {
        &self.builders
    }

    /// Create builders for the named targets, replacing any previous set
    ///
    /// Repeated names are built once. Nothing is replaced if any name is
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if a target name is not in the registry.
    pub fn setup_builders<S: AsRef<str>>(&mut self, targets: &[S]) -> Result<(), Error> {
        let mut resolved = Vec::new();
        for name in targets {
            let target = find_target(name.as_ref())?;
            if !resolved.contains(&target) {
                resolved.push(target);
            }
        }

        self.builders = resolved
            .into_iter()
            .map(|target| {
                let mut builder = target.create_builder(
                    &self.repository_root,
                    Arc::clone(&self.runner),
                    Arc::clone(&self.env),
                );
                builder.set_output_prefix(&self.output_prefix);
                builder
            })
            .collect();

        Ok(())
    }

    /// Generate build graphs for all builders
    ///
    /// # Errors
    ///
    /// Returns the first generation error.
    pub async fn generate(&self) -> Result<(), Error> {
        for builder in &self.builders {
            builder.generate().await?;
        }
        Ok(())
    }

    /// Generate and build all builders
    ///
    /// # Errors
    ///
    /// Returns the first build error.
    pub async fn build(&self) -> Result<(), Error> {
        for builder in &self.builders {
            builder.build().await?;
        }
        Ok(())
    }

    /// Remove the output directory of every builder
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be inspected or removed.
    pub async fn clean_output_directories(&self) -> Result<(), Error> {
        for builder in &self.builders {
            let dir = builder.output_dir();
            let exists = fs::try_exists(dir)
                .await
                .map_err(|e| Error::io_with_path(&e, dir))?;
            if exists {
                info!("Cleaning {}", dir.display());
                fs::remove_dir_all(dir)
                    .await
                    .map_err(|e| Error::io_with_path(&e, dir))?;
            }
        }
        Ok(())
    }

    /// Copy artifacts of every builder into `<target_dir>/<identifier>/`
    ///
    /// # Errors
    ///
    /// Returns the first copy error.
    pub async fn copy_artifacts_to(&self, target_dir: &Path) -> Result<(), Error> {
        for builder in &self.builders {
            let dir = target_dir.join(builder.identifier());
            info!("Copying build artifacts for {} to {}", builder.identifier(), dir.display());
            builder.copy_artifacts(&dir).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identifiers: Vec<&str> = self.builders.iter().map(|b| b.identifier()).collect();
        f.debug_struct("BuildContext")
            .field("repository_root", &self.repository_root)
            .field("output_prefix", &self.output_prefix)
            .field("runner", &self.runner.name())
            .field("builders", &identifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MapEnvironment;
    use crate::runner::PrintOnlyRunner;
    use exbuild_errors::{BuildError, ConfigError};
    use tempfile::tempdir;

    fn context(out: &Path, runner: Arc<PrintOnlyRunner>, env: MapEnvironment) -> BuildContext {
        BuildContext::new("/repo", out, runner).with_environment(Arc::new(env))
    }

    #[test]
    fn test_setup_deduplicates() {
        let temp = tempdir().unwrap();
        let mut ctx = context(
            temp.path(),
            Arc::new(PrintOnlyRunner::new()),
            MapEnvironment::new(),
        );
        ctx.setup_builders(&["tizen-arm-light", "TIZEN-ARM-LIGHT"])
            .unwrap();
        assert_eq!(ctx.builders().len(), 1);
        assert_eq!(
            ctx.builders()[0].output_dir(),
            temp.path().join("tizen-arm-light")
        );
    }

    #[test]
    fn test_setup_unknown_target_keeps_previous() {
        let temp = tempdir().unwrap();
        let mut ctx = context(
            temp.path(),
            Arc::new(PrintOnlyRunner::new()),
            MapEnvironment::new(),
        );
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();

        let err = ctx.setup_builders(&["tizen-arm-light", "nope"]).unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::UnknownTarget { .. })));
        assert_eq!(ctx.builders().len(), 1);
    }

    #[tokio::test]
    async fn test_build_runs_gn_then_ninja() {
        let temp = tempdir().unwrap();
        let runner = Arc::new(PrintOnlyRunner::new());
        let mut ctx = context(
            temp.path(),
            runner.clone(),
            MapEnvironment::from_pairs([("TIZEN_HOME", "/sdk")]),
        );
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();
        ctx.build().await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program(), "gn");
        assert!(commands[0]
            .get_args()
            .contains(&r#"--args=target_os="tizen" target_cpu="arm" sysroot="/sdk""#.to_string()));
        assert_eq!(commands[1].program(), "ninja");
    }

    #[tokio::test]
    async fn test_generate_without_tizen_home_runs_nothing() {
        let temp = tempdir().unwrap();
        let runner = Arc::new(PrintOnlyRunner::new());
        let mut ctx = context(temp.path(), runner.clone(), MapEnvironment::new());
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();

        let err = ctx.generate().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::EnvVarNotFound { .. })
        ));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_clean_and_copy_artifacts() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");
        let mut ctx = context(&out, Arc::new(PrintOnlyRunner::new()), MapEnvironment::new());
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();

        let output_dir = out.join("tizen-arm-light");
        std::fs::create_dir_all(&output_dir).unwrap();
        std::fs::write(output_dir.join("chip-lighting-app"), b"ELF").unwrap();
        std::fs::write(output_dir.join("chip-lighting-app.map"), b"map").unwrap();

        let dest = temp.path().join("artifacts");
        ctx.copy_artifacts_to(&dest).await.unwrap();
        let copied = dest.join("tizen-arm-light");
        assert_eq!(std::fs::read(copied.join("chip-lighting-app")).unwrap(), b"ELF");
        assert_eq!(
            std::fs::read(copied.join("chip-lighting-app.map")).unwrap(),
            b"map"
        );

        ctx.clean_output_directories().await.unwrap();
        assert!(!output_dir.exists());
        // cleaning twice is a no-op
        ctx.clean_output_directories().await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_missing_artifact() {
        let temp = tempdir().unwrap();
        let mut ctx = context(
            temp.path(),
            Arc::new(PrintOnlyRunner::new()),
            MapEnvironment::new(),
        );
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();

        let err = ctx
            .copy_artifacts_to(&temp.path().join("dest"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::ArtifactMissing { .. })));
    }

    #[tokio::test]
    async fn test_clean_and_copy_report_io_errors() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut ctx = context(&blocker, Arc::new(PrintOnlyRunner::new()), MapEnvironment::new());
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();
        let output_dir = blocker.join("tizen-arm-light");

        let err = ctx.clean_output_directories().await.unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(ref p), .. } if *p == output_dir));

        let err = ctx
            .copy_artifacts_to(&temp.path().join("dest"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(ref p), .. } if p.starts_with(&output_dir)));
    }
}
