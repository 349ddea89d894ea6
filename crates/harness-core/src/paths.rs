use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const INIT_MARKER: &str = ".claude/.claude-harness-initialized";
pub const CONFIG_FILE: &str = ".claude/harness-config.yaml";

pub const FEATURES_FILE: &str = "claude-features.json";
pub const PROGRESS_FILE: &str = "claude-progress.txt";
pub const INIT_SCRIPT: &str = "init.sh";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn init_marker_path(root: &Path) -> PathBuf {
    root.join(INIT_MARKER)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn features_path(root: &Path) -> PathBuf {
    root.join(FEATURES_FILE)
}

pub fn progress_path(root: &Path) -> PathBuf {
    root.join(PROGRESS_FILE)
}

pub fn init_script_path(root: &Path) -> PathBuf {
    root.join(INIT_SCRIPT)
}

/// The harness is initialized when its marker exists under `.claude/`.
pub fn is_initialized(root: &Path) -> bool {
    init_marker_path(root).exists()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
