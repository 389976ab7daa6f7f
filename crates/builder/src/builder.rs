//! Platform builder interface

use crate::gn::GnBuilder;
use async_trait::async_trait;
use exbuild_errors::{BuildError, Error};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// A GN driven platform builder
///
/// Implementors provide the platform specific GN arguments and the list of
/// artifacts a successful build leaves behind; generation, compilation and
/// artifact copying are shared.
#[async_trait]
pub trait Builder: Send + Sync {
    /// Shared GN state
    fn gn(&self) -> &GnBuilder;

    /// Shared GN state, mutable
    fn gn_mut(&mut self) -> &mut GnBuilder;

    /// Arguments passed to `gn gen --args`
    ///
    /// # Errors
    ///
    /// Returns an error if a required toolchain setting is missing.
    fn gn_build_args(&self) -> Result<Vec<String>, Error>;

    /// Logical artifact name to the path it is expected at after a build
    fn build_outputs(&self) -> HashMap<String, PathBuf>;

    fn identifier(&self) -> &str {
        self.gn().identifier()
    }

    fn output_dir(&self) -> &Path {
        self.gn().output_dir()
    }

    fn set_identifier(&mut self, identifier: &str) {
        self.gn_mut().set_identifier(identifier);
    }

    fn set_output_prefix(&mut self, prefix: &Path) {
        self.gn_mut().set_output_prefix(prefix);
    }

    /// Generate the ninja build graph
    ///
    /// # Errors
    ///
    /// Returns an error if the GN arguments cannot be derived or `gn` fails.
    async fn generate(&self) -> Result<(), Error> {
        let args = self.gn_build_args()?;
        self.gn().generate(&args).await
    }

    /// Generate (if needed) and compile
    ///
    /// # Errors
    ///
    /// Returns an error if generation or compilation fails.
    async fn build(&self) -> Result<(), Error> {
        self.generate().await?;
        self.gn().compile().await
    }

    /// Copy every build output into `target_dir`, named by its logical name
    ///
    /// # Errors
    ///
    /// Returns an error if an expected output is missing or cannot be copied.
    async fn copy_artifacts(&self, target_dir: &Path) -> Result<(), Error> {
        let mut outputs: Vec<(String, PathBuf)> = self.build_outputs().into_iter().collect();
        outputs.sort();

        for (name, source) in outputs {
            let exists = fs::try_exists(&source)
                .await
                .map_err(|e| Error::io_with_path(&e, &source))?;
            if !exists {
                return Err(BuildError::ArtifactMissing {
                    path: source.display().to_string(),
                }
                .into());
            }

            let target = target_dir.join(&name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::io_with_path(&e, parent))?;
            }

            info!("Copying {} into {}", source.display(), name);
            fs::copy(&source, &target)
                .await
                .map_err(|e| Error::io_with_path(&e, &target))?;
        }

        Ok(())
    }
}
