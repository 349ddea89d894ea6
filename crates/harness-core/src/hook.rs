//! Hook wire protocol and per-event handlers.
//!
//! The host sends one JSON object on stdin and reads one JSON object from
//! stdout. Allow/warn/deny is carried entirely by the payload: `{}` allows,
//! a `systemMessage` warns, and `hookSpecificOutput.permissionDecision =
//! "deny"` blocks. Handlers never fail; every fault becomes payload text.

use crate::checkpoint;
use crate::config;
use crate::context::{self, SessionContextReport, Sources};
use crate::enforcement::{self, Decision};
use crate::feature::FeatureStore;
use crate::paths;
use crate::types::{StopReason, ToolKind};
use crate::vcs::Vcs;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

pub const STRICT_SUFFIX: &str = "[Strict mode: Operation blocked until a feature is started]";

// ---------------------------------------------------------------------------
// HookEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    PreToolUse,
    SessionStart,
    Stop,
}

impl HookEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::SessionStart => "SessionStart",
            HookEvent::Stop => "Stop",
        }
    }

    /// What the host sees when the handler itself breaks.
    pub fn failure_output(self, reason: &str) -> HookOutput {
        match self {
            HookEvent::PreToolUse => {
                HookOutput::message(format!("[Harness] PreToolUse hook error: {reason}"))
            }
            HookEvent::SessionStart => {
                HookOutput::message(SessionContextReport::diagnostic(reason).render())
            }
            HookEvent::Stop => HookOutput::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// HookInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
    #[serde(default, rename = "stopReason", alias = "stop_reason")]
    pub stop_reason: Option<String>,
}

impl HookInput {
    /// Empty or malformed input is treated as an empty payload.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unparseable hook input, treating as empty");
            Self::default()
        })
    }
}

// ---------------------------------------------------------------------------
// HookOutput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDecision {
    Deny,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub permission_decision: PermissionDecision,
    pub permission_decision_reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

impl HookOutput {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            system_message: Some(text.into()),
            hook_specific_output: None,
        }
    }

    pub fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Self::default(),
            Decision::Warn(m) => Self::message(m),
            Decision::Deny(m) => Self {
                system_message: Some(format!("{m}\n\n{STRICT_SUFFIX}")),
                hook_specific_output: Some(HookSpecificOutput {
                    hook_event_name: HookEvent::PreToolUse.as_str().to_string(),
                    permission_decision: PermissionDecision::Deny,
                    permission_decision_reason: m,
                }),
            },
        }
    }

    pub fn is_deny(&self) -> bool {
        self.hook_specific_output
            .as_ref()
            .is_some_and(|h| h.permission_decision == PermissionDecision::Deny)
    }

    pub fn to_json(&self) -> String {
        // A struct of strings always serializes; the fallback is the allow payload.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub fn pre_tool_use(root: &Path, input: &HookInput) -> HookOutput {
    let tool = ToolKind::from_name(&input.tool_name);
    if !tool.is_file_mutation() || !paths::is_initialized(root) {
        return HookOutput::default();
    }
    let resolved = config::resolve(root);
    let checklist = FeatureStore::new(root).load_or_empty();
    let decision = enforcement::evaluate(&tool, true, &resolved.config, &checklist);
    tracing::debug!(tool = %input.tool_name, ?decision, "pre-tool-use decision");
    HookOutput::from_decision(decision)
}

pub fn session_start(root: &Path, sources: Sources<'_>, now: DateTime<Local>) -> HookOutput {
    HookOutput::message(context::session_context(root, sources, now).render())
}

pub fn stop(root: &Path, input: &HookInput, vcs: &dyn Vcs) -> HookOutput {
    let initialized = paths::is_initialized(root);
    if !initialized {
        return HookOutput::default();
    }
    let reason = StopReason::from_raw(input.stop_reason.as_deref());
    let resolved = config::resolve(root);
    match checkpoint::advise(initialized, &reason, &resolved.config, vcs) {
        Some(reminder) => HookOutput::message(reminder.render()),
        None => HookOutput::default(),
    }
}

/// Run a handler, turning a panic into the event's failure payload so the
/// host always receives well-formed output.
pub fn guarded(event: HookEvent, handler: impl FnOnce() -> HookOutput) -> HookOutput {
    match panic::catch_unwind(AssertUnwindSafe(handler)) {
        Ok(output) => output,
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            tracing::error!(event = event.as_str(), %reason, "hook handler panicked");
            event.failure_output(&reason)
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::TestOutcome;
    use crate::probe::Probe;
    use crate::testing::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn input(tool: &str) -> HookInput {
        HookInput::parse(&format!(
            r#"{{"tool_name": "{tool}", "tool_input": {{"file_path": "src/lib.rs"}}}}"#
        ))
    }

    fn project(features: &str, config: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        mark_initialized(dir.path());
        write_features(dir.path(), features);
        if let Some(c) = config {
            write_config(dir.path(), c);
        }
        dir
    }

    const FAILING_AND_WIP: &str = r#"{"features": [
        {"id": 1, "name": "Login", "status": "failing"},
        {"id": 2, "name": "Signup", "status": "in_progress"}
    ]}"#;

    const FAILING_AND_PASSING: &str = r#"{"features": [
        {"id": 1, "name": "Login", "status": "failing"},
        {"id": 2, "name": "Signup", "status": "passing"}
    ]}"#;

    #[test]
    fn input_parsing_is_lenient() {
        assert_eq!(HookInput::parse("").tool_name, "");
        assert_eq!(HookInput::parse("not json").tool_name, "");
        let stop = HookInput::parse(r#"{"stopReason": "end_turn", "extra": 1}"#);
        assert_eq!(stop.stop_reason.as_deref(), Some("end_turn"));
        let snake = HookInput::parse(r#"{"stop_reason": "stop_sequence"}"#);
        assert_eq!(snake.stop_reason.as_deref(), Some("stop_sequence"));
    }

    #[test]
    fn allow_serializes_to_empty_object() {
        assert_eq!(HookOutput::default().to_json(), "{}");
    }

    #[test]
    fn deny_payload_shape() {
        let out = HookOutput::from_decision(Decision::Deny("blocked".to_string()));
        let v: serde_json::Value = serde_json::from_str(&out.to_json()).unwrap();
        assert_eq!(v["hookSpecificOutput"]["permissionDecision"], "deny");
        assert_eq!(v["hookSpecificOutput"]["hookEventName"], "PreToolUse");
        assert_eq!(v["hookSpecificOutput"]["permissionDecisionReason"], "blocked");
        assert_eq!(v["systemMessage"], format!("blocked\n\n{STRICT_SUFFIX}"));
    }

    #[test]
    fn warn_payload_has_no_decision() {
        let out = HookOutput::from_decision(Decision::Warn("careful".to_string()));
        assert!(!out.is_deny());
        assert_eq!(out.to_json(), r#"{"systemMessage":"careful"}"#);
    }

    #[test]
    fn strict_with_wip_feature_allows_write() {
        let dir = project(FAILING_AND_WIP, Some("strictness: strict\n"));
        assert_eq!(pre_tool_use(dir.path(), &input("Write")), HookOutput::default());
    }

    #[test]
    fn strict_without_wip_denies_write() {
        let dir = project(FAILING_AND_PASSING, Some("strictness: strict\n"));
        let out = pre_tool_use(dir.path(), &input("Write"));
        assert!(out.is_deny());
        let msg = out.system_message.unwrap();
        assert!(msg.contains("  1. Login"));
        assert!(!msg.contains("Signup"));
    }

    #[test]
    fn standard_without_wip_warns() {
        let dir = project(FAILING_AND_PASSING, None);
        let out = pre_tool_use(dir.path(), &input("Edit"));
        assert!(!out.is_deny());
        assert!(out.system_message.unwrap().contains("No feature currently in progress"));
    }

    #[test]
    fn read_tools_and_uninitialized_projects_pass() {
        let dir = project(FAILING_AND_PASSING, Some("strictness: strict\n"));
        assert_eq!(pre_tool_use(dir.path(), &input("Read")), HookOutput::default());

        let bare = TempDir::new().unwrap();
        write_features(bare.path(), FAILING_AND_PASSING);
        assert_eq!(pre_tool_use(bare.path(), &input("Write")), HookOutput::default());
    }

    #[test]
    fn malformed_store_fails_open() {
        let dir = project("{{{{", Some("strictness: strict\n"));
        assert_eq!(pre_tool_use(dir.path(), &input("Write")), HookOutput::default());
    }

    #[test]
    fn session_start_wraps_report() {
        let dir = TempDir::new().unwrap();
        let vcs = StubVcs::no_repo();
        let script = StubScript(Probe::Unavailable);
        let tests = StubTests(TestOutcome::not_run());
        let sources = Sources {
            vcs: &vcs,
            init_script: &script,
            tests: &tests,
        };
        let now = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let out = session_start(dir.path(), sources, now);
        assert_eq!(out.system_message.as_deref(), Some(context::ONBOARDING));
    }

    #[test]
    fn stop_reminds_on_dirty_tree() {
        let dir = project(FAILING_AND_WIP, None);
        let input = HookInput::parse(r#"{"stopReason": "end_turn"}"#);
        let out = stop(dir.path(), &input, &StubVcs::dirty(false));
        assert!(out
            .system_message
            .unwrap()
            .starts_with(checkpoint::REMINDER_TITLE));

        let interrupted = HookInput::parse(r#"{"stopReason": "interrupted"}"#);
        assert_eq!(
            stop(dir.path(), &interrupted, &StubVcs::dirty(false)),
            HookOutput::default()
        );
    }

    #[test]
    fn guarded_converts_panics() {
        let out = guarded(HookEvent::PreToolUse, || panic!("store exploded"));
        assert_eq!(
            out.system_message.as_deref(),
            Some("[Harness] PreToolUse hook error: store exploded")
        );

        let out = guarded(HookEvent::SessionStart, || panic!("{}", "vcs hung".to_string()));
        assert!(out
            .system_message
            .unwrap()
            .contains("Session startup check failed: vcs hung"));

        assert_eq!(
            guarded(HookEvent::Stop, || panic!("nope")),
            HookOutput::default()
        );
    }
}
