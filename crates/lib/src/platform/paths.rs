use crate::consts::{APP_NAME, CONFIG_ENV};
use std::path::PathBuf;

/// Returns the user's home directory
///
/// Falls back to the current directory when the variable is unset.
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var("USERPROFILE")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the user's home directory
///
/// Falls back to the current directory when the variable is unset.
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> PathBuf {
  std::env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
    .join(APP_NAME)
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
  let config_home = std::env::var("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".config"));
  config_home.join(APP_NAME)
}

/// Returns the directory for cache files for the application
#[cfg(windows)]
pub fn cache_dir() -> PathBuf {
  std::env::var("LOCALAPPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join("AppData").join("Local"))
    .join(APP_NAME)
    .join("Cache")
}

/// Returns the directory for cache files for the application
#[cfg(not(windows))]
pub fn cache_dir() -> PathBuf {
  let cache_home = std::env::var("XDG_CACHE_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".cache"));
  cache_home.join(APP_NAME)
}

/// Location of the JSON configuration file.
pub fn config_file() -> PathBuf {
  if let Ok(path) = std::env::var(CONFIG_ENV) {
    return PathBuf::from(path);
  }

  config_dir().join("config.json")
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn xdg_config_home_takes_precedence() {
    temp_env::with_vars(
      [
        ("XDG_CONFIG_HOME", Some("/custom/config")),
        ("HOME", Some("/home/user")),
      ],
      || {
        assert_eq!(config_dir(), PathBuf::from("/custom/config").join(APP_NAME));
      },
    );
  }

  #[test]
  #[serial]
  fn xdg_fallback_to_home_directories() {
    temp_env::with_vars(
      [
        ("XDG_CONFIG_HOME", None::<&str>),
        ("XDG_CACHE_HOME", None::<&str>),
        ("HOME", Some("/home/user")),
      ],
      || {
        assert_eq!(config_dir(), PathBuf::from("/home/user/.config").join(APP_NAME));
        assert_eq!(cache_dir(), PathBuf::from("/home/user/.cache").join(APP_NAME));
      },
    );
  }

  #[test]
  #[serial]
  fn config_file_honours_env_override() {
    temp_env::with_vars(
      [(CONFIG_ENV, Some("/etc/sysdef.json")), ("XDG_CONFIG_HOME", None::<&str>)],
      || {
        assert_eq!(config_file(), PathBuf::from("/etc/sysdef.json"));
      },
    );
  }
}
