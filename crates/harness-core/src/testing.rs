//! Canned collaborators and fixtures for unit tests.

use crate::baseline::{TestOutcome, TestRunner};
use crate::init_script::{InitScript, ScriptReport};
use crate::paths;
use crate::probe::Probe;
use crate::vcs::Vcs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct StubVcs {
    pub repo: bool,
    pub status: Probe<String>,
    pub log: Probe<String>,
    pub changes: Probe<bool>,
    pub progress_changed: Probe<bool>,
}

impl StubVcs {
    pub fn no_repo() -> Self {
        Self {
            repo: false,
            status: Probe::Unavailable,
            log: Probe::Unavailable,
            changes: Probe::Unavailable,
            progress_changed: Probe::Unavailable,
        }
    }

    pub fn clean() -> Self {
        Self {
            repo: true,
            status: Probe::Ready(String::new()),
            log: Probe::Ready("abc1234 initial commit".to_string()),
            changes: Probe::Ready(false),
            progress_changed: Probe::Ready(false),
        }
    }

    pub fn dirty(progress_touched: bool) -> Self {
        Self {
            repo: true,
            status: Probe::Ready(" M src/lib.rs".to_string()),
            log: Probe::Ready("abc1234 initial commit".to_string()),
            changes: Probe::Ready(true),
            progress_changed: Probe::Ready(progress_touched),
        }
    }
}

impl Vcs for StubVcs {
    fn is_repo(&self) -> bool {
        self.repo
    }

    fn status_short(&self) -> Probe<String> {
        self.status.clone()
    }

    fn recent_log(&self, _depth: usize) -> Probe<String> {
        self.log.clone()
    }

    fn has_changes(&self) -> Probe<bool> {
        self.changes.clone()
    }

    fn path_changed(&self, path: &str) -> Probe<bool> {
        if path == paths::PROGRESS_FILE {
            self.progress_changed.clone()
        } else {
            Probe::Ready(false)
        }
    }
}

pub struct StubScript(pub Probe<ScriptReport>);

impl InitScript for StubScript {
    fn run(&self) -> Probe<ScriptReport> {
        self.0.clone()
    }
}

pub struct StubTests(pub TestOutcome);

impl TestRunner for StubTests {
    fn run(&self) -> TestOutcome {
        self.0.clone()
    }
}

/// Create the `.claude/` init marker under `root`.
pub fn mark_initialized(root: &Path) {
    std::fs::create_dir_all(root.join(paths::CLAUDE_DIR)).unwrap();
    std::fs::write(paths::init_marker_path(root), "").unwrap();
}

pub fn write_features(root: &Path, json: &str) {
    std::fs::write(paths::features_path(root), json).unwrap();
}

pub fn write_config(root: &Path, yaml: &str) {
    std::fs::create_dir_all(root.join(paths::CLAUDE_DIR)).unwrap();
    std::fs::write(paths::config_path(root), yaml).unwrap();
}
