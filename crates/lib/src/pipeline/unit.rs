//! Path derivation for one component of one system.

use std::path::PathBuf;

use tracing::debug;

use crate::component::Component;
use crate::system::System;
use crate::toolchain::BuildRoot;

/// A component seen from inside the pipeline: where it comes from and where
/// its cached files go.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'a> {
  root: &'a BuildRoot,
  system: &'a System,
  component: &'a Component,
}

impl<'a> Unit<'a> {
  pub fn new(root: &'a BuildRoot, system: &'a System, component: &'a Component) -> Self {
    Self {
      root,
      system,
      component,
    }
  }

  pub fn system(&self) -> &'a System {
    self.system
  }

  pub fn component(&self) -> &'a Component {
    self.component
  }

  /// The declared path under the system directory.
  pub fn absolute_source_path(&self) -> PathBuf {
    self.system.directory().join(self.component.path())
  }

  /// `<build-root>/<system>/<path with suffix = file_type>`
  pub fn cache_path(&self, file_type: &str) -> PathBuf {
    self
      .root
      .cache_path(self.system.canonical_name(), self.component.path(), file_type)
  }

  /// Where the source to compile actually lives.
  ///
  /// Generated components are compiled from the build cache, where the
  /// generator wrote them; everything else from the declared location.
  pub fn effective_source_path(&self, file_type: &str) -> PathBuf {
    let path = if self.component.generator().is_some() {
      self.cache_path(file_type)
    } else {
      self.absolute_source_path()
    };
    debug!(component = %self.component.path().display(), source = %path.display(), "effective source");
    path
  }
}
