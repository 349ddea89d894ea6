//! Synchronous subprocess execution bounded by a timeout.
//!
//! Output is captured into anonymous temp files rather than pipes so a chatty
//! child can't block on a full pipe while we poll it. Captured text is capped
//! at [`CAPTURE_LIMIT`] bytes per stream.

use crate::error::{HarnessError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub const CAPTURE_LIMIT: u64 = 64 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `program args...` in `cwd`, killing it if it outlives `timeout`.
pub fn run(program: &str, args: &[&str], cwd: &Path, timeout: Duration) -> Result<ProcessOutput> {
    let spawn_err = |e: std::io::Error| HarnessError::SpawnFailed {
        program: program.to_string(),
        reason: e.to_string(),
    };

    let mut stdout_file = tempfile::tempfile()?;
    let mut stderr_file = tempfile::tempfile()?;

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file.try_clone()?))
        .stderr(Stdio::from(stderr_file.try_clone()?))
        .spawn()
        .map_err(spawn_err)?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(program, ?timeout, "child timed out and was killed");
                return Err(HarnessError::TimedOut {
                    program: program.to_string(),
                    seconds: timeout.as_secs(),
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    Ok(ProcessOutput {
        code: status.code(),
        stdout: read_capped(&mut stdout_file)?,
        stderr: read_capped(&mut stderr_file)?,
    })
}

fn read_capped(file: &mut File) -> Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.take(CAPTURE_LIMIT).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Keep the last `max_lines` lines of `text`, prefixed with a marker when
/// anything was dropped.
pub fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    if lines.len() <= max_lines {
        return lines.join("\n");
    }
    let dropped = lines.len() - max_lines;
    let mut out = format!("[...{dropped} lines truncated...]");
    for line in &lines[dropped..] {
        out.push('\n');
        out.push_str(line);
    }
    out
}
