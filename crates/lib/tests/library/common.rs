//! Shared fixtures for library integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use sysdef_lib::Session;
use sysdef_lib::toolchain::BuildRoot;
use tempfile::TempDir;

pub const SIGNATURE: &str = "sysdef-test-os-arch";

/// A project directory and a build cache, both temporary.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn project(&self) -> PathBuf {
    self.temp.path().join("project")
  }

  pub fn cache(&self) -> PathBuf {
    self.temp.path().join("cache")
  }

  /// Writes `content` to `relative` under the project directory.
  pub fn write(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.project().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
  }

  pub fn session(&self) -> Session {
    Session::new(BuildRoot::with_signature(self.cache(), SIGNATURE))
  }

  /// A session initialized from the project directory.
  pub fn initialized(&self) -> Session {
    let mut session = self.session();
    session.initialize(&[self.project()]).unwrap();
    session
  }

  pub fn artifact(&self, system: &str, relative: &str) -> PathBuf {
    self.cache().join(SIGNATURE).join(system).join(relative)
  }
}

pub fn read(path: &Path) -> String {
  fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}
