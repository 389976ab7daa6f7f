//! Execution of external build tools
//!
//! Builders describe the commands they need as [`BuildCommand`] values and
//! hand them to a [`CommandRunner`]. The shell runner executes them; the
//! print-only runner records them as a shell script for dry runs.

use async_trait::async_trait;
use exbuild_errors::Error;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

mod print_only;
mod shell;

pub use print_only::PrintOnlyRunner;
pub use shell::ShellRunner;

/// A single external command invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl BuildCommand {
    /// Create a new command
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add an argument to the command
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Get the program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Runs build commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `cmd`; `title` is a short human readable description of the step
    async fn run(&self, cmd: &BuildCommand, title: &str) -> Result<(), Error>;

    /// Runner name, used in logs
    fn name(&self) -> &'static str;
}

/// Quote a word for a POSIX shell, leaving plain words untouched
pub(crate) fn shell_quote(word: &str) -> Cow<'_, str> {
    let plain = !word.is_empty()
        && word
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"@%+=:,./-_".contains(&b));
    if plain {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r#"'"'"'"#)))
    }
}
