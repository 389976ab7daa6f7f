//! Dry-run runner that records commands instead of executing them

use super::{shell_quote, BuildCommand, CommandRunner};
use async_trait::async_trait;
use exbuild_errors::Error;
use std::sync::{Mutex, PoisonError};

/// Records every command it is asked to run
#[derive(Debug, Default)]
pub struct PrintOnlyRunner {
    entries: Mutex<Vec<(String, BuildCommand)>>,
}

impl PrintOnlyRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in call order
    #[must_use]
    pub fn commands(&self) -> Vec<BuildCommand> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    /// Render the recorded commands as a shell script
    ///
    /// Every command is preceded by a `# <title>` comment; commands with a
    /// working directory run in a `cd` subshell.
    #[must_use]
    pub fn script(&self) -> String {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let mut script = String::new();
        for (title, cmd) in entries.iter() {
            script.push_str("# ");
            script.push_str(title);
            script.push('\n');
            match cmd.get_current_dir() {
                Some(dir) => {
                    let dir = dir.display().to_string();
                    script.push_str(&format!("(cd {} && {cmd})\n", shell_quote(&dir)));
                }
                None => script.push_str(&format!("{cmd}\n")),
            }
            script.push('\n');
        }
        script
    }
}

#[async_trait]
impl CommandRunner for PrintOnlyRunner {
    async fn run(&self, cmd: &BuildCommand, title: &str) -> Result<(), Error> {
        tracing::debug!(command = %cmd, "recording command (dry run)");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((title.to_string(), cmd.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "print-only"
    }
}
