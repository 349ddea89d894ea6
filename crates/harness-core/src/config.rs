use crate::error::Result;
use crate::paths;
use crate::probe::Probe;
use crate::types::Strictness;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// EffectiveConfig
// ---------------------------------------------------------------------------

const KNOWN_KEYS: &[&str] = &[
    "strictness",
    "feature_enforcement",
    "init_script_execution",
    "baseline_tests_on_startup",
    "auto_progress_logging",
    "auto_checkpoint_suggestions",
];

/// Settings for one working directory. Missing fields fall back to their
/// defaults individually, so a document holding only `strictness: strict`
/// is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    #[serde(default)]
    pub strictness: Strictness,
    #[serde(default = "default_on")]
    pub feature_enforcement: bool,
    #[serde(default = "default_on")]
    pub init_script_execution: bool,
    #[serde(default = "default_on")]
    pub baseline_tests_on_startup: bool,
    #[serde(default = "default_on")]
    pub auto_progress_logging: bool,
    #[serde(default = "default_on")]
    pub auto_checkpoint_suggestions: bool,
}

fn default_on() -> bool {
    true
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            feature_enforcement: default_on(),
            init_script_execution: default_on(),
            baseline_tests_on_startup: default_on(),
            auto_progress_logging: default_on(),
            auto_checkpoint_suggestions: default_on(),
        }
    }
}

impl EffectiveConfig {
    /// Read the config document. A missing file is `Unavailable`; an
    /// unreadable or malformed one is `Failed`.
    pub fn load(root: &Path) -> Probe<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Probe::Unavailable;
        }
        Self::parse_file(&path).into()
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    /// Gate decisions only apply when enforcement is on and the mode isn't
    /// relaxed.
    pub fn enforces_features(&self) -> bool {
        self.feature_enforcement && self.strictness != Strictness::Relaxed
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.strictness == Strictness::Strict && !self.feature_enforcement {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "strictness is 'strict' but feature_enforcement is off; \
                          nothing will be blocked"
                    .to_string(),
            });
        }

        if !self.auto_checkpoint_suggestions && self.auto_progress_logging {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "auto_progress_logging has no effect while \
                          auto_checkpoint_suggestions is off"
                    .to_string(),
            });
        }

        warnings
    }
}

/// Strict check of the raw document used by `harness config validate`:
/// parse errors become `Error` warnings, unknown top-level keys become
/// `Warning`s, and the parsed config's own checks are appended.
pub fn validate_document(data: &str) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if let Ok(serde_yaml::Value::Mapping(map)) = serde_yaml::from_str::<serde_yaml::Value>(data) {
        for key in map.keys() {
            let name = key.as_str().unwrap_or("<non-string key>");
            if !KNOWN_KEYS.contains(&name) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown key '{name}'"),
                });
            }
        }
    }

    match EffectiveConfig::parse(data) {
        Ok(cfg) => warnings.extend(cfg.validate()),
        Err(e) => warnings.push(ConfigWarning {
            level: WarnLevel::Error,
            message: format!("config does not parse: {e}"),
        }),
    }

    warnings
}

// ---------------------------------------------------------------------------
// ConfigProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Document,
    Defaults,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub source: ConfigSource,
    #[serde(flatten)]
    pub config: EffectiveConfig,
}

/// Resolve the effective config for `root`, falling back to the built-in
/// defaults when the document is missing or unusable.
pub fn resolve(root: &Path) -> ResolvedConfig {
    match EffectiveConfig::load(root).ready("config") {
        Some(config) => ResolvedConfig {
            source: ConfigSource::Document,
            config,
        },
        None => ResolvedConfig {
            source: ConfigSource::Defaults,
            config: EffectiveConfig::default(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
