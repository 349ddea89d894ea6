//! Outcome of querying one data source.
//!
//! Every artifact read and every collaborator call yields a [`Probe`]. The
//! degrade rule lives here and nowhere else: `Ready` carries data,
//! `Unavailable` means the source simply isn't there (missing file, no
//! detected runner), and `Failed` means it was there but could not be used.
//! Consumers either take the value or fall back; `Failed` is logged.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    Ready(T),
    Unavailable,
    Failed(String),
}

impl<T> Probe<T> {
    pub fn failed(reason: impl fmt::Display) -> Self {
        Probe::Failed(reason.to_string())
    }

    /// Collapse to `Some(value)` or `None`, logging the failure reason under
    /// `source`.
    pub fn ready(self, source: &str) -> Option<T> {
        match self {
            Probe::Ready(v) => Some(v),
            Probe::Unavailable => {
                tracing::debug!(source, "data source unavailable");
                None
            }
            Probe::Failed(reason) => {
                tracing::warn!(source, %reason, "data source failed");
                None
            }
        }
    }

    pub fn ready_or_default(self, source: &str) -> T
    where
        T: Default,
    {
        self.ready(source).unwrap_or_default()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probe<U> {
        match self {
            Probe::Ready(v) => Probe::Ready(f(v)),
            Probe::Unavailable => Probe::Unavailable,
            Probe::Failed(r) => Probe::Failed(r),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Probe::Ready(_))
    }
}

impl<T, E: fmt::Display> From<std::result::Result<T, E>> for Probe<T> {
    fn from(r: std::result::Result<T, E>) -> Self {
        match r {
            Ok(v) => Probe::Ready(v),
            Err(e) => Probe::failed(e),
        }
    }
}
