//! Toolchain signature and build-root naming.
//!
//! Every artifact the pipeline writes lives under a build root named after the
//! executing toolchain, so that caches produced by different implementations,
//! versions, operating systems or architectures never collide:
//!
//! ```text
//! <cache-directory>/
//! └── sysdef-0.3.0-linux-x86_64/      # toolchain signature
//!     ├── .lock
//!     └── <system>/
//!         └── <relative-component-path-with-artifact-suffix>
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::consts::{APP_NAME, UNKNOWN};
use crate::platform::{arch_name, os_name};

/// Returns the signature of the executing toolchain, e.g. `sysdef-0.3.0-linux-x86_64`.
///
/// Computed on first use and held for the lifetime of the process.
pub fn signature() -> &'static str {
  static SIGNATURE: OnceLock<String> = OnceLock::new();
  SIGNATURE.get_or_init(|| compose_signature(APP_NAME, env!("CARGO_PKG_VERSION"), os_name(), arch_name()))
}

/// Joins the four signature fields into one filesystem-safe path segment.
///
/// Each field is lowercased and any character outside `[a-z0-9._]` is replaced
/// by `_`, which keeps `-` free to separate fields. Empty fields become
/// `"unknown"`.
pub fn compose_signature(implementation: &str, version: &str, os: &str, arch: &str) -> String {
  [implementation, version, os, arch]
    .iter()
    .map(|field| sanitize_field(field))
    .collect::<Vec<_>>()
    .join("-")
}

fn sanitize_field(field: &str) -> String {
  let field = field.trim();
  if field.is_empty() {
    return UNKNOWN.to_string();
  }

  field
    .chars()
    .map(|c| match c {
      'a'..='z' | '0'..='9' | '.' | '_' => c,
      'A'..='Z' => c.to_ascii_lowercase(),
      _ => '_',
    })
    .collect()
}

/// The directory tree generated and compiled artifacts are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRoot {
  cache_dir: PathBuf,
  signature: String,
}

impl BuildRoot {
  /// Build root for the executing toolchain under `cache_dir`.
  pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
    Self::with_signature(cache_dir, signature())
  }

  /// Build root with an explicit signature.
  pub fn with_signature(cache_dir: impl Into<PathBuf>, signature: impl Into<String>) -> Self {
    Self {
      cache_dir: cache_dir.into(),
      signature: signature.into(),
    }
  }

  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  pub fn signature(&self) -> &str {
    &self.signature
  }

  /// `<cache-directory>/<signature>`
  pub fn path(&self) -> PathBuf {
    self.cache_dir.join(&self.signature)
  }

  /// `<build-root>/<system>`
  pub fn system_dir(&self, system: &str) -> PathBuf {
    self.path().join(system)
  }

  /// `<build-root>/<system>/<relative path with its suffix replaced by file_type>`
  pub fn cache_path(&self, system: &str, relative: &Path, file_type: &str) -> PathBuf {
    self.system_dir(system).join(relative.with_extension(file_type))
  }
}
