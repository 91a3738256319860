//! Path resolution utilities.

use crate::env::{self, vars};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Burnlink base directory (`$BURNLINK_HOME` or `~/.burnlink`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(vars::BURNLINK_HOME) {
        return Ok(expand_tilde(&home));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".burnlink"))
}

/// Get the main config file path (`$BURNLINK_CONFIG` or `~/.burnlink/burnlink.json5`).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::get_var(vars::BURNLINK_CONFIG) {
        return Ok(expand_tilde(&path));
    }
    Ok(base_dir()?.join("burnlink.json5"))
}

/// Get the default SQLite database path (~/.burnlink/shares.db).
pub fn database_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("shares.db"))
}

/// Ensure the base directory exists, owner-only on Unix.
pub fn ensure_dirs() -> Result<(), ConfigError> {
    let dir = base_dir()?;
    std::fs::create_dir_all(&dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
