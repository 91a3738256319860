//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a u64 (e.g., for durations in seconds).
pub fn get_u64(name: &str) -> Option<u64> {
    get_var(name).and_then(|v| v.trim().parse().ok())
}

/// Environment variable names understood by Burnlink.
pub mod vars {
    /// Burnlink home directory override.
    pub const BURNLINK_HOME: &str = "BURNLINK_HOME";

    /// Burnlink config file override.
    pub const BURNLINK_CONFIG: &str = "BURNLINK_CONFIG";

    /// Burnlink log filter (same syntax as `RUST_LOG`).
    pub const BURNLINK_LOG: &str = "BURNLINK_LOG";

    /// Share time-to-live override, in seconds.
    pub const BURNLINK_TTL_SECS: &str = "BURNLINK_TTL_SECS";

    /// Reaper sweep interval override, in seconds.
    pub const BURNLINK_REAPER_INTERVAL_SECS: &str = "BURNLINK_REAPER_INTERVAL_SECS";

    /// SQLite database path override.
    pub const BURNLINK_DATABASE: &str = "BURNLINK_DATABASE";
}
