//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::path::PathBuf;

/// Environment variable overriding the SQLite database location
pub const DATABASE_PATH_VAR: &str = "NUTRITRACK_DATABASE_PATH";
/// Extra tracing filter directive (e.g. "nutritrack=debug")
pub const LOG_FILTER_VAR: &str = "NUTRITRACK_LOG";
/// Directive applied when NUTRITRACK_LOG is unset
pub const DEFAULT_LOG_DIRECTIVE: &str = "nutritrack=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_directive: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());
        let log_directive = std::env::var(LOG_FILTER_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string());

        Self {
            database_path,
            log_directive,
        }
    }
}

/// `<project>/data/nutritrack.db`, resolved from the executable location
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutritrack.db");
    path
}
