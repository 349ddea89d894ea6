use crate::probe::Probe;
use crate::process;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout for quick repository checks.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for status and log queries.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);
/// Number of commits shown in the session report.
pub const LOG_DEPTH: usize = 10;

/// Read-only view of the version-control state of the working directory.
pub trait Vcs {
    /// Whether the working directory is inside a work tree.
    fn is_repo(&self) -> bool;

    /// Short status, one changed path per line. Empty when clean.
    fn status_short(&self) -> Probe<String>;

    /// The last `depth` commits, one line each.
    fn recent_log(&self, depth: usize) -> Probe<String>;

    /// Whether the work tree has any uncommitted change.
    fn has_changes(&self) -> Probe<bool>;

    /// Whether `path` (relative to the working directory) is among the
    /// uncommitted changes.
    fn path_changed(&self, path: &str) -> Probe<bool>;
}

// ---------------------------------------------------------------------------
// GitCli
// ---------------------------------------------------------------------------

/// [`Vcs`] backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn git(&self, args: &[&str], timeout: Duration) -> Probe<String> {
        if which::which("git").is_err() {
            return Probe::Unavailable;
        }
        match process::run("git", args, &self.root, timeout) {
            Ok(out) if out.success() => Probe::Ready(out.stdout.trim().to_string()),
            Ok(out) => Probe::failed(format!(
                "git {} exited with {:?}: {}",
                args.join(" "),
                out.code,
                out.stderr.trim()
            )),
            Err(e) => Probe::failed(e),
        }
    }
}

impl Vcs for GitCli {
    fn is_repo(&self) -> bool {
        matches!(
            self.git(&["rev-parse", "--is-inside-work-tree"], PROBE_TIMEOUT),
            Probe::Ready(ref s) if s == "true"
        )
    }

    fn status_short(&self) -> Probe<String> {
        self.git(&["status", "--short"], QUERY_TIMEOUT)
    }

    fn recent_log(&self, depth: usize) -> Probe<String> {
        let depth = format!("-{depth}");
        self.git(&["log", &depth, "--oneline", "--no-decorate"], QUERY_TIMEOUT)
    }

    fn has_changes(&self) -> Probe<bool> {
        self.git(&["status", "--porcelain"], PROBE_TIMEOUT)
            .map(|s| !s.is_empty())
    }

    fn path_changed(&self, path: &str) -> Probe<bool> {
        self.git(&["status", "--porcelain", "--", path], PROBE_TIMEOUT)
            .map(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
