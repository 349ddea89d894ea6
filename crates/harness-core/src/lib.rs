pub mod baseline;
pub mod checkpoint;
pub mod config;
pub mod context;
pub mod enforcement;
pub mod error;
pub mod feature;
pub mod hook;
pub mod init_script;
pub mod paths;
pub mod probe;
pub mod process;
pub mod types;
pub mod vcs;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HarnessError, Result};
