//! User configuration.
//!
//! Read from a JSON file (see [`paths::config_file`]). A missing file is the
//! default configuration; a file that cannot be parsed is an error.
//!
//! ```json
//! {
//!   "cache_dir": "/var/cache/sysdef",
//!   "kinds": [
//!     { "file_type": "c", "artifact_type": "so",
//!       "compile": "cc -shared -fPIC {source} -o {output}", "load": "dylib" }
//!   ]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backend::{CommandBackend, LoadMode};
use crate::component::{CompiledSource, KindRegistry};
use crate::consts::CACHE_DIR_ENV;
use crate::platform::paths;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// A command-backed component kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindConfig {
  pub file_type: String,
  pub artifact_type: String,
  /// Shell template with `{source}` and `{output}` placeholders.
  pub compile: String,
  #[serde(default)]
  pub load: LoadMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cache_dir: Option<PathBuf>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub kinds: Vec<KindConfig>,
}

impl Config {
  /// Loads the configuration from its default location.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&paths::config_file())
  }

  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// The cache directory: `SYSDEF_CACHE_DIR`, then `cache_dir`, then the per-user default.
  pub fn resolve_cache_dir(&self) -> PathBuf {
    if let Ok(dir) = std::env::var(CACHE_DIR_ENV)
      && !dir.is_empty()
    {
      return PathBuf::from(dir);
    }

    self.cache_dir.clone().unwrap_or_else(paths::cache_dir)
  }

  /// Registers every configured kind, replacing built-ins with the same file type.
  pub fn register_kinds(&self, kinds: &mut KindRegistry) {
    for kind in &self.kinds {
      let backend = Rc::new(CommandBackend::new(kind.compile.clone(), kind.load));
      kinds.register(
        kind.file_type.clone(),
        Rc::new(CompiledSource::new(kind.artifact_type.clone(), backend)),
      );
    }
  }
}
