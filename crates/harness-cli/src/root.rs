use std::path::{Path, PathBuf};

/// Resolve the working directory the hooks operate on.
///
/// Priority:
/// 1. `--root` flag / `CLAUDE_WORKING_DIRECTORY` env var (passed in as `explicit`)
/// 2. The process's current directory
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
