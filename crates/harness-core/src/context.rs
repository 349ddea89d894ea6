//! Session-start context report.
//!
//! Each section is fed by one data source and guarded on its own: a source
//! that yields nothing contributes no section. Git is the exception; once
//! the directory is known to be a repository, status and log always render,
//! falling back to `(clean)` / `(no commits)`.

use crate::baseline::{TestRunner, TestStatus};
use crate::config::{self, ConfigSource, ResolvedConfig};
use crate::enforcement::START_HINT;
use crate::feature::{Checklist, FeatureStore};
use crate::init_script::InitScript;
use crate::paths;
use crate::probe::Probe;
use crate::types::FeatureStatus;
use crate::vcs::{Vcs, LOG_DEPTH};
use chrono::{DateTime, Local, SecondsFormat};
use std::path::Path;

/// Progress excerpts keep this many trailing lines.
pub const PROGRESS_TAIL: usize = 50;
pub const TRUNCATION_MARKER: &str = "[...truncated...]";

pub const ONBOARDING: &str = "[Agent Harness] This project has not been initialized with the \
agent harness. Run `/harness:init` to set up progress tracking, feature checklists, and git \
checkpoints. This enables effective long-running agent workflows.";

const CALL_TO_ACTION: &str = "IMPORTANT: Review the above context before starting work. \
Select the highest-priority incomplete feature and update the progress log as you work.";

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub lines: Vec<String>,
}

impl Section {
    fn titled(title: &str, body: impl IntoIterator<Item = String>) -> Self {
        let mut lines = vec![format!("--- {title} ---")];
        lines.extend(body);
        Self { lines }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionContextReport {
    pub sections: Vec<Section>,
}

impl SessionContextReport {
    pub fn onboarding() -> Self {
        Self {
            sections: vec![Section {
                lines: vec![ONBOARDING.to_string()],
            }],
        }
    }

    /// Stand-in report when assembly itself fails.
    pub fn diagnostic(reason: &str) -> Self {
        Self {
            sections: vec![Section {
                lines: vec![format!(
                    "[Agent Harness] Session startup check failed: {reason}"
                )],
            }],
        }
    }

    fn push(&mut self, section: Option<Section>) {
        if let Some(s) = section {
            self.sections.push(s);
        }
    }

    /// Sections joined by a blank line.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// External collaborators the report pulls from.
pub struct Sources<'a> {
    pub vcs: &'a dyn Vcs,
    pub init_script: &'a dyn InitScript,
    pub tests: &'a dyn TestRunner,
}

// ---------------------------------------------------------------------------
// ContextAggregator
// ---------------------------------------------------------------------------

pub struct ContextAggregator<'a> {
    root: &'a Path,
    config: &'a ResolvedConfig,
    sources: Sources<'a>,
}

impl<'a> ContextAggregator<'a> {
    pub fn new(root: &'a Path, config: &'a ResolvedConfig, sources: Sources<'a>) -> Self {
        Self {
            root,
            config,
            sources,
        }
    }

    pub fn build(&self, now: DateTime<Local>) -> SessionContextReport {
        let checklist = FeatureStore::new(self.root).load().ready("features");

        let mut report = SessionContextReport::default();
        report.push(Some(self.header(now)));
        report.push(self.init_script_section());
        report.push(self.baseline_section());
        if self.sources.vcs.is_repo() {
            report.push(Some(self.git_status_section()));
            report.push(Some(self.git_log_section()));
        }
        report.push(self.progress_section());
        report.push(checklist.as_ref().and_then(feature_section));
        report.push(Some(self.mode_section()));
        report.push(Some(closing_section(checklist.as_ref())));
        report
    }

    fn header(&self, now: DateTime<Local>) -> Section {
        Section {
            lines: vec![
                "=== AGENT HARNESS SESSION STARTUP ===".to_string(),
                format!(
                    "Session started: {}",
                    now.to_rfc3339_opts(SecondsFormat::Secs, false)
                ),
                format!("Working directory: {}", self.root.display()),
            ],
        }
    }

    fn init_script_section(&self) -> Option<Section> {
        if !self.config.config.init_script_execution {
            return None;
        }
        let body = match self.sources.init_script.run() {
            Probe::Ready(report) => report.render(),
            Probe::Unavailable => return None,
            Probe::Failed(reason) => {
                tracing::warn!(%reason, "init script failed");
                vec![format!("WARNING: {} could not run: {reason}", paths::INIT_SCRIPT)]
            }
        };
        Some(Section::titled("INIT SCRIPT", body))
    }

    fn baseline_section(&self) -> Option<Section> {
        if !self.config.config.baseline_tests_on_startup {
            return None;
        }
        let outcome = self.sources.tests.run();
        if outcome.status == TestStatus::NotRun {
            return None;
        }
        let mut body = vec![format!("Status: {}", outcome.status)];
        if !outcome.summary.is_empty() {
            body.push(format!("Summary: {}", outcome.summary));
        }
        Some(Section::titled("BASELINE TESTS", body))
    }

    fn git_status_section(&self) -> Section {
        let status = non_empty(self.sources.vcs.status_short(), "git status");
        Section::titled(
            "GIT STATUS",
            [status.unwrap_or_else(|| "(clean)".to_string())],
        )
    }

    fn git_log_section(&self) -> Section {
        let log = non_empty(self.sources.vcs.recent_log(LOG_DEPTH), "git log");
        Section::titled(
            "RECENT COMMITS",
            [log.unwrap_or_else(|| "(no commits)".to_string())],
        )
    }

    fn progress_section(&self) -> Option<Section> {
        let path = paths::progress_path(self.root);
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "progress log unreadable");
                return None;
            }
        };
        let excerpt = progress_excerpt(&content)?;
        Some(Section::titled("PROGRESS LOG", [excerpt]))
    }

    fn mode_section(&self) -> Section {
        let cfg = &self.config.config;
        let source = match self.config.source {
            ConfigSource::Document => paths::CONFIG_FILE,
            ConfigSource::Defaults => "built-in defaults",
        };
        Section::titled(
            "HARNESS MODE",
            [
                format!("Mode: {} ({source})", cfg.strictness),
                format!("Feature enforcement: {}", on_off(cfg.feature_enforcement)),
                format!("Init script: {}", on_off(cfg.init_script_execution)),
                format!("Baseline tests: {}", on_off(cfg.baseline_tests_on_startup)),
                format!("Progress logging: {}", on_off(cfg.auto_progress_logging)),
                format!(
                    "Checkpoint suggestions: {}",
                    on_off(cfg.auto_checkpoint_suggestions)
                ),
            ],
        )
    }
}

fn non_empty(probe: Probe<String>, source: &str) -> Option<String> {
    probe.ready(source).filter(|s| !s.trim().is_empty())
}

fn on_off(v: bool) -> &'static str {
    if v {
        "on"
    } else {
        "off"
    }
}

/// Trimmed progress log, cut to the last [`PROGRESS_TAIL`] lines behind a
/// marker. `None` when the log is blank.
pub fn progress_excerpt(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() <= PROGRESS_TAIL {
        return Some(trimmed.to_string());
    }
    let mut out = vec![TRUNCATION_MARKER];
    out.extend_from_slice(&lines[lines.len() - PROGRESS_TAIL..]);
    Some(out.join("\n"))
}

fn feature_section(checklist: &Checklist) -> Option<Section> {
    if checklist.is_empty() {
        return None;
    }
    let summary = checklist.summary();
    let mut body = vec![format!(
        "Total: {} | Passing: {} | Failing: {} | In Progress: {} | Not Started: {}",
        summary.total, summary.passing, summary.failing, summary.in_progress, summary.not_started
    )];

    if !summary.next_items.is_empty() {
        body.push(String::new());
        body.push("Next priority items:".to_string());
        for item in &summary.next_items {
            let glyph = if item.status == FeatureStatus::InProgress {
                "[WIP]"
            } else {
                "[TODO]"
            };
            let desc = item.short_description();
            if desc.is_empty() {
                body.push(format!("  {glyph} {}", item.name));
            } else {
                body.push(format!("  {glyph} {}: {desc}", item.name));
            }
        }
    }

    if !summary.anomalies.is_empty() {
        body.push(String::new());
        body.extend(summary.anomalies.iter().map(|a| format!("WARNING: {a}")));
    }

    Some(Section::titled("FEATURE CHECKLIST STATUS", body))
}

fn closing_section(checklist: Option<&Checklist>) -> Section {
    let mut lines = vec![
        "=== END SESSION CONTEXT ===".to_string(),
        String::new(),
        CALL_TO_ACTION.to_string(),
    ];
    if let Some(list) = checklist {
        let failing = list.count(FeatureStatus::Failing);
        if list.current_in_progress().is_none() && failing > 0 {
            lines.push(format!(
                "No feature is in progress and {failing} failing feature(s) need attention. \
                 Use `{START_HINT}` to begin one."
            ));
        }
    }
    Section { lines }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Full session-start flow for `root`: onboarding when uninitialized,
/// otherwise the aggregated report under the resolved config.
pub fn session_context(root: &Path, sources: Sources<'_>, now: DateTime<Local>) -> SessionContextReport {
    if !paths::is_initialized(root) {
        return SessionContextReport::onboarding();
    }
    let resolved = config::resolve(root);
    ContextAggregator::new(root, &resolved, sources).build(now)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
