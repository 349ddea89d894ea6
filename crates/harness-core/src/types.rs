use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FeatureStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    NotStarted,
    InProgress,
    Failing,
    Passing,
}

impl FeatureStatus {
    pub fn all() -> &'static [FeatureStatus] {
        &[
            FeatureStatus::NotStarted,
            FeatureStatus::InProgress,
            FeatureStatus::Failing,
            FeatureStatus::Passing,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStatus::NotStarted => "not_started",
            FeatureStatus::InProgress => "in_progress",
            FeatureStatus::Failing => "failing",
            FeatureStatus::Passing => "passing",
        }
    }

    /// Statuses that make a feature a "next priority" candidate.
    pub fn is_priority(self) -> bool {
        matches!(self, FeatureStatus::Failing | FeatureStatus::InProgress)
    }

    /// Lenient match used when reading hand-edited checklists:
    /// case-insensitive, with `-` and spaces treated as `_`.
    pub fn normalize(raw: &str) -> Option<FeatureStatus> {
        let key: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        key.parse().ok()
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureStatus {
    type Err = crate::error::HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(FeatureStatus::NotStarted),
            "in_progress" => Ok(FeatureStatus::InProgress),
            "failing" => Ok(FeatureStatus::Failing),
            "passing" => Ok(FeatureStatus::Passing),
            _ => Err(crate::error::HarnessError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Strictness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Relaxed,
    #[default]
    Standard,
    Strict,
}

impl Strictness {
    pub fn as_str(self) -> &'static str {
        match self {
            Strictness::Relaxed => "relaxed",
            Strictness::Standard => "standard",
            Strictness::Strict => "strict",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strictness {
    type Err = crate::error::HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relaxed" => Ok(Strictness::Relaxed),
            "standard" => Ok(Strictness::Standard),
            "strict" => Ok(Strictness::Strict),
            _ => Err(crate::error::HarnessError::InvalidStrictness(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ToolKind
// ---------------------------------------------------------------------------

/// The host tool a pre-tool-use event is about. Only `Edit` and `Write`
/// mutate file content; everything else passes through the gate untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Edit,
    Write,
    Other(String),
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Edit" => ToolKind::Edit,
            "Write" => ToolKind::Write,
            other => ToolKind::Other(other.to_string()),
        }
    }

    pub fn is_file_mutation(&self) -> bool {
        matches!(self, ToolKind::Edit | ToolKind::Write)
    }
}

// ---------------------------------------------------------------------------
// StopReason
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    StopSequence,
    Other(String),
}

impl StopReason {
    /// A missing reason is treated as `unknown`, which is not a normal stop.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.unwrap_or("unknown") {
            "end_turn" => StopReason::EndTurn,
            "stop_sequence" => StopReason::StopSequence,
            other => StopReason::Other(other.to_string()),
        }
    }

    /// Normal completion, as opposed to errors, interrupts and limits.
    pub fn is_normal_completion(&self) -> bool {
        matches!(self, StopReason::EndTurn | StopReason::StopSequence)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
