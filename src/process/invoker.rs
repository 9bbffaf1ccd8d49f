//! External program invocation.
//!
//! # Responsibilities
//! - Resolve the program once, at construction
//! - Spawn it per request with the translated arguments
//! - Feed piped input, capture stdout and stderr separately
//! - Kill the child when the deadline passes
//!
//! No interpretation of the output happens here.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{TransportError, TransportResult};
use crate::translate::CommandSpec;

/// Captured output of one program run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
}

impl From<std::process::Output> for ProcessResult {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// A resolved, pre-authenticated external program.
#[derive(Debug, Clone)]
pub struct Program {
    path: PathBuf,
    timeout: Duration,
}

impl Program {
    /// Look `name` up on `PATH` (or check it directly when it is a path).
    pub fn resolve(name: &str, timeout: Duration) -> TransportResult<Self> {
        let path = which::which(name).map_err(|source| TransportError::ProgramNotFound {
            program: name.to_string(),
            source,
        })?;

        tracing::info!(program = %path.display(), "Resolved external program");

        Ok(Self { path, timeout })
    }

    /// Run the program once and wait for it to exit.
    pub async fn invoke(&self, command: &CommandSpec) -> TransportResult<ProcessResult> {
        let mut cmd = Command::new(&self.path);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if command.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;

        let pipe = child.stdin.take();
        let input = command.stdin.as_deref();
        let feed = async move {
            if let (Some(mut pipe), Some(bytes)) = (pipe, input) {
                // The program may exit without reading its input.
                if let Err(e) = pipe.write_all(bytes).await {
                    tracing::debug!(error = %e, "Failed to write piped input");
                }
            }
        };
        let run = async move {
            let (_, output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        match timeout(self.timeout, run).await {
            Ok(output) => Ok(ProcessResult::from(output?)),
            Err(_) => {
                tracing::warn!(
                    program = %self.path.display(),
                    timeout = ?self.timeout,
                    "Program timed out, killed"
                );
                Err(TransportError::InvocationTimeout(self.timeout))
            }
        }
    }
}
