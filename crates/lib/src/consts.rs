//! Crate-wide constants.

/// Application name, used for per-user directories and the default signature prefix.
pub const APP_NAME: &str = "sysdef";

/// File name suffix identifying a manifest.
pub const MANIFEST_SUFFIX: &str = ".sys.lua";

/// Placeholder used for any signature field that cannot be detected.
pub const UNKNOWN: &str = "unknown";

/// Overrides the `<cache-directory>` under which build roots are created.
pub const CACHE_DIR_ENV: &str = "SYSDEF_CACHE_DIR";

/// Overrides the location of the JSON configuration file.
pub const CONFIG_ENV: &str = "SYSDEF_CONFIG";

/// Name of the lock file kept at the top of each build root.
pub const LOCK_FILENAME: &str = ".lock";
