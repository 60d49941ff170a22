pub mod toml_config;

use crate::utils::error::{ReorderError, Result};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// A single `FROM:TO` move, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveArg {
    pub from: usize,
    pub to: usize,
}

impl std::str::FromStr for MoveArg {
    type Err = ReorderError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ReorderError::InvalidConfigValueError {
            field: "move".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected FROM:TO"))?;
        let from = from
            .trim()
            .parse()
            .map_err(|_| invalid("FROM is not a non-negative integer"))?;
        let to = to
            .trim()
            .parse()
            .map_err(|_| invalid("TO is not a non-negative integer"))?;
        Ok(Self { from, to })
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "merch-reorder")]
#[command(about = "Reorder offers or products of a storefront collection")]
pub struct CliConfig {
    #[arg(long, short, help = "Collection config file (TOML)")]
    pub config: PathBuf,

    #[arg(long = "move", value_name = "FROM:TO", help = "Move a row (0-based), repeatable")]
    pub moves: Vec<MoveArg>,

    #[arg(long, help = "Save the new order to the server")]
    pub commit: bool,

    #[arg(long, help = "Sign in with this token and persist it")]
    pub token: Option<String>,

    #[arg(long, help = "Forget the persisted token")]
    pub sign_out: bool,

    #[arg(long, help = "Emit JSON logs")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
