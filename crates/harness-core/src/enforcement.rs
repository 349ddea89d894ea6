use crate::config::EffectiveConfig;
use crate::feature::{Checklist, Feature};
use crate::types::{Strictness, ToolKind};

/// Number of next candidates listed in gate guidance.
pub const GUIDANCE_CANDIDATES: usize = 3;

pub const START_HINT: &str = "/harness:feature start <id>";

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Warn(String),
    Deny(String),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Warn(m) | Decision::Deny(m) => Some(m.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

/// Decide whether a tool invocation may proceed.
///
/// Pure: inputs are already loaded, and read failures upstream have already
/// degraded to the empty checklist and the default config. Only content
/// edits and writes are ever gated, and only when a non-empty checklist has
/// nothing in progress.
pub fn evaluate(
    tool: &ToolKind,
    initialized: bool,
    config: &EffectiveConfig,
    checklist: &Checklist,
) -> Decision {
    if !tool.is_file_mutation() || !initialized || !config.enforces_features() {
        return Decision::Allow;
    }
    if checklist.is_empty() {
        return Decision::Allow;
    }

    for anomaly in checklist.anomalies() {
        tracing::warn!(%anomaly, "feature checklist anomaly");
    }

    if let Some(current) = checklist.current_in_progress() {
        tracing::debug!(feature = %current.id, "edit allowed under in-progress feature");
        return Decision::Allow;
    }

    let message = guidance(&checklist.next_candidates(GUIDANCE_CANDIDATES));
    match config.strictness {
        Strictness::Strict => Decision::Deny(message),
        _ => Decision::Warn(message),
    }
}

fn guidance(candidates: &[&Feature]) -> String {
    if candidates.is_empty() {
        return format!(
            "[Harness] No feature currently in progress. \
             Use `{START_HINT}` to begin working on a feature."
        );
    }
    let list = candidates
        .iter()
        .map(|f| format!("  {}. {}", f.id, f.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "[Harness] No feature currently in progress.\n\
         Consider starting one before making changes:\n\
         {list}\n\
         Use `{START_HINT}` to begin."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
