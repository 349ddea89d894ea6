use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid feature status '{0}'")]
    InvalidStatus(String),

    #[error("invalid strictness '{0}': expected relaxed, standard or strict")]
    InvalidStrictness(String),

    #[error("failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("'{program}' timed out after {seconds}s")]
    TimedOut { program: String, seconds: u64 },

    #[error("script {path} is {size} bytes (limit {limit})")]
    ScriptTooLarge { path: String, size: u64, limit: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
