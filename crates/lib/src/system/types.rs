use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::component::{Component, Form, flatten};

use super::Version;

/// Lowercased form of a system name, used as its registry key.
pub fn canonicalize_name(name: &str) -> String {
  name.to_lowercase()
}

/// Descriptive attributes shared by declarations and registered systems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
  pub description: Option<String>,
  pub authors: Vec<String>,
  pub homepage: Option<String>,
  pub licenses: Vec<String>,
  pub version: Option<Version>,
}

/// A system as declared by a manifest, before its component forms are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDecl {
  pub name: String,
  /// Directory of the system relative to the originating directory.
  pub pathname: Option<PathBuf>,
  pub metadata: Metadata,
  /// Names of systems to load first, in order. Duplicates are kept.
  pub depends_on: Vec<String>,
  pub components: Vec<Form>,
}

impl SystemDecl {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      pathname: None,
      metadata: Metadata::default(),
      depends_on: Vec::new(),
      components: Vec::new(),
    }
  }

  pub fn depends_on<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.depends_on = names.into_iter().map(Into::into).collect();
    self
  }

  pub fn components(mut self, forms: Vec<Form>) -> Self {
    self.components = forms;
    self
  }
}

/// A registered system.
#[derive(Debug, Clone)]
pub struct System {
  name: String,
  canonical_name: String,
  directory: PathBuf,
  metadata: Metadata,
  depends_on: Vec<String>,
  components: Vec<Component>,
}

impl System {
  pub(crate) fn new(
    name: String,
    directory: PathBuf,
    metadata: Metadata,
    depends_on: Vec<String>,
    components: Vec<Component>,
  ) -> Self {
    Self {
      canonical_name: canonicalize_name(&name),
      name,
      directory,
      metadata,
      depends_on,
      components,
    }
  }

  /// Name as declared.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn canonical_name(&self) -> &str {
    &self.canonical_name
  }

  /// Absolute directory component paths are resolved against.
  pub fn directory(&self) -> &Path {
    &self.directory
  }

  pub fn metadata(&self) -> &Metadata {
    &self.metadata
  }

  pub fn version(&self) -> Option<&Version> {
    self.metadata.version.as_ref()
  }

  pub fn depends_on(&self) -> &[String] {
    &self.depends_on
  }

  /// Root components in declaration order.
  pub fn components(&self) -> &[Component] {
    &self.components
  }

  /// Every component, depth-first pre-order. This is the order the pipeline visits them in.
  pub fn flattened_components(&self) -> Vec<&Component> {
    flatten(&self.components)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonicalization_is_lowercase_and_idempotent() {
    for name in ["Foo", "foo", "FOO"] {
      assert_eq!(canonicalize_name(name), "foo");
      assert_eq!(canonicalize_name(&canonicalize_name(name)), "foo");
    }
  }

  #[test]
  fn system_keeps_declared_name() {
    let system = System::new("MySys".into(), PathBuf::from("/p"), Metadata::default(), vec![], vec![]);
    assert_eq!(system.name(), "MySys");
    assert_eq!(system.canonical_name(), "mysys");
  }

  #[test]
  fn builder_keeps_duplicate_dependencies() {
    let decl = SystemDecl::new("a").depends_on(["b", "c", "b"]);
    assert_eq!(decl.depends_on, vec!["b", "c", "b"]);
  }
}
