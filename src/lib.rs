pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    http::RestCollection, notify::LogNotifier, notify::RecordingNotifier,
    session_file::FileSessionStore,
};
pub use config::toml_config::TomlConfig;
pub use crate::core::manager::{CommitOutcome, ReorderableList};
pub use domain::session::{SessionContext, SessionHandle};
pub use utils::error::{ReorderError, Result};
