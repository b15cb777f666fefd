/// Runtime configuration
///
/// Configuration comes from the command line. The only thing that needs
/// resolving is where the database lives when no path is given.

use std::path::{Path, PathBuf};

use crate::AppError;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "focusflow.db";

/// Resolved settings the binary runs with
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
}

impl AppConfig {
    /// Resolve the configuration from command line values
    pub fn resolve(database: Option<PathBuf>) -> Result<Self, AppError> {
        let database_path = match database {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                path
            }
            None => default_database_path()?,
        };

        Ok(Self { database_path })
    }
}

/// Filter directive for `tracing_subscriber::EnvFilter`
pub fn log_filter(debug: bool, verbose: bool) -> String {
    format!("focusflow={}", log_level(debug, verbose))
}

/// Log level for the given flags; verbose wins over debug
pub fn log_level(debug: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if debug {
        "info"
    } else {
        "warn"
    }
}

/// Get the default database path with a fallback chain
///
/// Tries the home, data and config directories, then the working directory,
/// and settles for the temp directory if none of them is writable.
pub fn default_database_path() -> Result<PathBuf, AppError> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".focusflow")),
        dirs::data_dir().map(|p| p.join("focusflow")),
        dirs::config_dir().map(|p| p.join("focusflow")),
        std::env::current_dir().ok().map(|p| p.join(".focusflow")),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join(DATABASE_FILE));
        }
    }

    let temp_dir = std::env::temp_dir().join("focusflow");
    std::fs::create_dir_all(&temp_dir)?;

    tracing::warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join(DATABASE_FILE))
}

/// Create `dir` if needed and check a file can be written in it
fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let probe = dir.join(".write_test");
    let writable = std::fs::write(&probe, b"ok").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}
