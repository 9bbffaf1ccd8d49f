//! Shared utilities for integration tests: a scripted stand-in for `gh`.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use gh_transport::TransportConfig;
use tempfile::TempDir;

/// A shell script posing as the external program.
///
/// Every run records its arguments (one per line) and its stdin next to the
/// script, then runs the given body.
pub struct FakeGh {
    dir: TempDir,
    path: PathBuf,
}

impl FakeGh {
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gh");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{args}'\ncat > '{stdin}'\n{body}\n",
            args = dir.path().join("args").display(),
            stdin = dir.path().join("stdin").display(),
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, path }
    }

    /// A program printing `stdout` verbatim and exiting successfully.
    pub fn printing(stdout: &str) -> Self {
        Self::new(&format!("printf '%s' '{stdout}'"))
    }

    /// A program failing with `stderr` on its diagnostic stream.
    pub fn failing(stderr: &str) -> Self {
        Self::new(&format!("echo '{stderr}' >&2\nexit 1"))
    }

    pub fn config(&self) -> TransportConfig {
        let mut config = TransportConfig::default();
        config.program.name = self.path.to_string_lossy().into_owned();
        config.program.timeout_secs = 5;
        config
    }

    #[allow(dead_code)]
    pub fn was_invoked(&self) -> bool {
        self.dir.path().join("args").exists()
    }

    /// Arguments of the last run.
    pub fn args(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("args"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Bytes piped to the last run.
    #[allow(dead_code)]
    pub fn stdin(&self) -> Vec<u8> {
        std::fs::read(self.dir.path().join("stdin")).unwrap()
    }
}
