use crate::error::Result;
use crate::paths;
use crate::probe::Probe;
use crate::types::FeatureStatus;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Summaries show at most this many next-priority items.
pub const SUMMARY_NEXT_LIMIT: usize = 5;

/// Descriptions are cut to this many characters in summaries.
pub const DESCRIPTION_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: FeatureStatus,
}

impl Feature {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: FeatureStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            status,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn short_description(&self) -> String {
        self.description.chars().take(DESCRIPTION_WIDTH).collect()
    }
}

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawChecklist {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn render_id(value: &serde_json::Value, position: usize) -> String {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => position.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// The features file as read, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checklist {
    pub features: Vec<Feature>,
    status_anomalies: Vec<String>,
}

impl Checklist {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            status_anomalies: Vec::new(),
        }
    }

    pub fn parse(data: &str) -> Result<Self> {
        let raw: RawChecklist = serde_json::from_str(data)?;
        let mut features = Vec::with_capacity(raw.features.len());
        let mut status_anomalies = Vec::new();

        for (i, rf) in raw.features.into_iter().enumerate() {
            let id = render_id(&rf.id, i + 1);
            let status = match rf.status.as_deref() {
                None => FeatureStatus::NotStarted,
                Some(s) => FeatureStatus::normalize(s).unwrap_or_else(|| {
                    status_anomalies.push(format!(
                        "feature {id} has unrecognized status '{s}' (treated as not_started)"
                    ));
                    FeatureStatus::NotStarted
                }),
            };
            features.push(Feature {
                id,
                name: rf
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "Unnamed".to_string()),
                description: rf.description.unwrap_or_default(),
                status,
            });
        }

        Ok(Self {
            features,
            status_anomalies,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The first `in_progress` feature in file order is canonical.
    pub fn current_in_progress(&self) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| f.status == FeatureStatus::InProgress)
    }

    /// Up to `n` features that are failing or in progress, in file order.
    /// `not_started` features must be promoted before they are suggested.
    pub fn next_candidates(&self, n: usize) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| f.status.is_priority())
            .take(n)
            .collect()
    }

    pub fn count(&self, status: FeatureStatus) -> usize {
        self.features.iter().filter(|f| f.status == status).count()
    }

    /// Conditions worth surfacing to the operator: unrecognized statuses and
    /// more than one feature in progress.
    pub fn anomalies(&self) -> Vec<String> {
        let mut out = self.status_anomalies.clone();
        let wip: Vec<&str> = self
            .features
            .iter()
            .filter(|f| f.status == FeatureStatus::InProgress)
            .map(|f| f.id.as_str())
            .collect();
        if wip.len() > 1 {
            out.push(format!(
                "{} features are in progress ({}); only feature {} is treated as current",
                wip.len(),
                wip.join(", "),
                wip[0]
            ));
        }
        out
    }

    pub fn summary(&self) -> ChecklistSummary {
        ChecklistSummary {
            total: self.features.len(),
            passing: self.count(FeatureStatus::Passing),
            failing: self.count(FeatureStatus::Failing),
            in_progress: self.count(FeatureStatus::InProgress),
            not_started: self.count(FeatureStatus::NotStarted),
            next_items: self
                .next_candidates(SUMMARY_NEXT_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
            anomalies: self.anomalies(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChecklistSummary
// ---------------------------------------------------------------------------

/// Derived tally, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistSummary {
    pub total: usize,
    pub passing: usize,
    pub failing: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub next_items: Vec<Feature>,
    pub anomalies: Vec<String>,
}

// ---------------------------------------------------------------------------
// FeatureStore
// ---------------------------------------------------------------------------

/// Read-only view of the features file. The file belongs to the slash
/// commands; this side never writes it.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    path: PathBuf,
}

impl FeatureStore {
    pub fn new(root: &Path) -> Self {
        Self {
            path: paths::features_path(root),
        }
    }

    pub fn load(&self) -> Probe<Checklist> {
        if !self.path.exists() {
            return Probe::Unavailable;
        }
        std::fs::read_to_string(&self.path)
            .map_err(crate::error::HarnessError::from)
            .and_then(|data| Checklist::parse(&data))
            .into()
    }

    /// Load, degrading a missing or malformed file to the empty checklist.
    pub fn load_or_empty(&self) -> Checklist {
        self.load().ready_or_default("features")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
