use crate::error::{HarnessError, Result};
use crate::paths;
use crate::probe::Probe;
use crate::process::{self, ProcessOutput};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);
/// Scripts larger than this are refused rather than executed.
pub const SCRIPT_SIZE_LIMIT: u64 = 100 * 1024;
/// Lines of stdout/stderr kept in the report.
pub const OUTPUT_TAIL: usize = 20;

/// The project's startup script, run once per session.
pub trait InitScript {
    fn run(&self) -> Probe<ScriptReport>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptReport {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<ProcessOutput> for ScriptReport {
    fn from(out: ProcessOutput) -> Self {
        Self {
            code: out.code,
            stdout: process::tail_lines(&out.stdout, OUTPUT_TAIL),
            stderr: process::tail_lines(&out.stderr, OUTPUT_TAIL),
        }
    }
}

impl ScriptReport {
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.code {
            Some(0) => lines.push(format!("{} completed (exit code 0)", paths::INIT_SCRIPT)),
            Some(code) => lines.push(format!(
                "WARNING: {} exited with code {code}",
                paths::INIT_SCRIPT
            )),
            None => lines.push(format!(
                "WARNING: {} was terminated by a signal",
                paths::INIT_SCRIPT
            )),
        }
        if !self.stdout.is_empty() {
            lines.push("stdout:".to_string());
            lines.push(self.stdout.clone());
        }
        if !self.stderr.is_empty() {
            lines.push("stderr:".to_string());
            lines.push(self.stderr.clone());
        }
        lines
    }
}

// ---------------------------------------------------------------------------
// ShellInitScript
// ---------------------------------------------------------------------------

/// Runs `init.sh` from the working directory with `bash` (or `sh`).
#[derive(Debug, Clone)]
pub struct ShellInitScript {
    root: PathBuf,
    path: PathBuf,
}

impl ShellInitScript {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            path: paths::init_script_path(root),
        }
    }

    fn check_size(&self) -> Result<()> {
        let size = std::fs::metadata(&self.path)?.len();
        if size > SCRIPT_SIZE_LIMIT {
            return Err(HarnessError::ScriptTooLarge {
                path: paths::INIT_SCRIPT.to_string(),
                size,
                limit: SCRIPT_SIZE_LIMIT,
            });
        }
        Ok(())
    }

    fn execute(&self) -> Result<ScriptReport> {
        self.check_size()?;
        let shell = if which::which("bash").is_ok() { "bash" } else { "sh" };
        tracing::info!(shell, "running {}", paths::INIT_SCRIPT);
        let out = process::run(shell, &[paths::INIT_SCRIPT], &self.root, SCRIPT_TIMEOUT)?;
        Ok(out.into())
    }
}

impl InitScript for ShellInitScript {
    fn run(&self) -> Probe<ScriptReport> {
        if !self.path.is_file() {
            return Probe::Unavailable;
        }
        self.execute().into()
    }
}
