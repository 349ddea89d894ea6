//! Baseline test run at session start.
//!
//! The runner is picked from the project's build files; the outcome is a
//! coarse status plus a one-line summary pulled from the runner's output.

use crate::process::{self, ProcessOutput};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(120);

const NPM_PLACEHOLDER_TEST: &str = "no test specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    NotRun,
    Passed,
    Failed,
    Error,
}

impl TestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::NotRun => "not_run",
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Error => "error",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub status: TestStatus,
    pub summary: String,
}

impl TestOutcome {
    pub fn not_run() -> Self {
        Self {
            status: TestStatus::NotRun,
            summary: String::new(),
        }
    }

    pub fn error(reason: impl fmt::Display) -> Self {
        Self {
            status: TestStatus::Error,
            summary: reason.to_string(),
        }
    }
}

pub trait TestRunner {
    fn run(&self) -> TestOutcome;
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl TestCommand {
    pub fn display(&self) -> String {
        let mut s = self.program.to_string();
        for a in self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

fn has_npm_test_script(root: &Path) -> bool {
    let Ok(data) = std::fs::read_to_string(root.join("package.json")) else {
        return false;
    };
    let Ok(pkg) = serde_json::from_str::<serde_json::Value>(&data) else {
        return false;
    };
    pkg.pointer("/scripts/test")
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.contains(NPM_PLACEHOLDER_TEST))
}

/// Pick the test command for the project at `root`, if any.
pub fn detect(root: &Path) -> Option<TestCommand> {
    if root.join("Cargo.toml").is_file() {
        return Some(TestCommand {
            program: "cargo",
            args: &["test", "--quiet"],
        });
    }
    if has_npm_test_script(root) {
        return Some(TestCommand {
            program: "npm",
            args: &["test", "--silent"],
        });
    }
    if root.join("go.mod").is_file() {
        return Some(TestCommand {
            program: "go",
            args: &["test", "./..."],
        });
    }
    if ["pyproject.toml", "pytest.ini", "setup.py"]
        .iter()
        .any(|f| root.join(f).is_file())
    {
        return Some(TestCommand {
            program: "python3",
            args: &["-m", "pytest", "-q"],
        });
    }
    None
}

// ---------------------------------------------------------------------------
// Summary extraction
// ---------------------------------------------------------------------------

static RESULT_RE: OnceLock<Regex> = OnceLock::new();

fn result_re() -> &'static Regex {
    RESULT_RE.get_or_init(|| {
        Regex::new(r"(?i)test result:|\b\d+ (passed|failed)\b|^(ok|FAIL)\b|\btests?:\s+\d+")
            .expect("result pattern is valid")
    })
}

/// The last line that looks like a result tally, else the last non-empty
/// line of output.
pub fn summarize(output: &str) -> String {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| result_re().is_match(l))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_default()
}

fn outcome_from(out: &ProcessOutput) -> TestOutcome {
    let combined = format!("{}\n{}", out.stdout, out.stderr);
    let summary = summarize(&combined);
    let status = if out.success() {
        TestStatus::Passed
    } else {
        TestStatus::Failed
    };
    TestOutcome { status, summary }
}

// ---------------------------------------------------------------------------
// DetectedTestRunner
// ---------------------------------------------------------------------------

/// [`TestRunner`] that runs whatever [`detect`] finds.
#[derive(Debug, Clone)]
pub struct DetectedTestRunner {
    root: PathBuf,
}

impl DetectedTestRunner {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl TestRunner for DetectedTestRunner {
    fn run(&self) -> TestOutcome {
        let Some(cmd) = detect(&self.root) else {
            return TestOutcome::not_run();
        };
        if which::which(cmd.program).is_err() {
            return TestOutcome::error(format!("{} not found on PATH", cmd.program));
        }
        tracing::info!(command = %cmd.display(), "running baseline tests");
        match process::run(cmd.program, cmd.args, &self.root, TEST_TIMEOUT) {
            Ok(out) => outcome_from(&out),
            Err(e) => TestOutcome::error(e),
        }
    }
}
