use crate::config::EffectiveConfig;
use crate::paths;
use crate::probe::Probe;
use crate::types::StopReason;
use crate::vcs::Vcs;

pub const REMINDER_TITLE: &str = "[Agent Harness Checkpoint Reminder]";

/// End-of-turn nudge to checkpoint uncommitted work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub lines: Vec<String>,
}

impl Reminder {
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Decide whether the stop event deserves a reminder.
///
/// Quiet unless the harness is initialized, the turn ended normally, the
/// suggestions toggle is on, and the work tree is dirty. Any VCS failure
/// keeps it quiet.
pub fn advise(
    initialized: bool,
    stop_reason: &StopReason,
    config: &EffectiveConfig,
    vcs: &dyn Vcs,
) -> Option<Reminder> {
    if !initialized || !config.auto_checkpoint_suggestions {
        return None;
    }
    if !stop_reason.is_normal_completion() {
        tracing::debug!(?stop_reason, "abnormal stop, no reminder");
        return None;
    }
    if !vcs.has_changes().ready("git status")? {
        return None;
    }

    let mut lines = vec![REMINDER_TITLE.to_string()];
    if config.auto_progress_logging && !progress_touched(vcs) {
        lines.push(format!(
            "- Consider updating {} with what was accomplished",
            paths::PROGRESS_FILE
        ));
    }
    lines.push("- Consider creating a git commit checkpoint with a descriptive message".to_string());
    lines.push("- Ensure code is left in a merge-ready state".to_string());
    Some(Reminder { lines })
}

/// The progress log counts as touched only when git reports it changed.
fn progress_touched(vcs: &dyn Vcs) -> bool {
    matches!(vcs.path_changed(paths::PROGRESS_FILE), Probe::Ready(true))
}
