//! The system registry.
//!
//! Maps canonical (lowercased) system names to registered [`System`]s. A
//! registry is an explicit state object: callers own it, pass it by reference
//! and reset it before re-initialization.

mod graph;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::component::{Component, FormError, KindRegistry, make_component};
use crate::lock::BuildLockError;
use crate::pipeline::PipelineError;
use crate::system::{System, SystemDecl, canonicalize_name};

pub use graph::DependencyGraph;

#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("unknown system: {0}")]
  UnknownSystem(String),

  #[error("system {system}: {source}")]
  MalformedComponentForm {
    system: String,
    #[source]
    source: FormError,
  },

  #[error("dependency cycle involving system {system}")]
  DependencyCycle { system: String },

  #[error(transparent)]
  Pipeline(#[from] PipelineError),

  #[error(transparent)]
  Lock(#[from] BuildLockError),
}

#[derive(Debug, Default)]
pub struct Registry {
  systems: BTreeMap<String, System>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Discards every registered system.
  pub fn reset(&mut self) {
    debug!(count = self.systems.len(), "resetting registry");
    self.systems.clear();
  }

  /// Builds and registers a system from its declaration.
  ///
  /// `origin` is the directory the declaration came from; the system
  /// directory is `origin/pathname`. An existing system with the same
  /// canonical name is replaced entirely. When any component form is
  /// malformed nothing is registered.
  pub fn define_system(
    &mut self,
    decl: SystemDecl,
    origin: &Path,
    kinds: &KindRegistry,
  ) -> Result<&System, RegistryError> {
    let canonical = canonicalize_name(&decl.name);

    let mut components = decl
      .components
      .iter()
      .map(|form| make_component(form, kinds))
      .collect::<Result<Vec<_>, _>>()
      .map_err(|source| RegistryError::MalformedComponentForm {
        system: decl.name.clone(),
        source,
      })?;

    for component in &mut components {
      component.assign_system(&canonical);
    }

    let directory = match &decl.pathname {
      Some(pathname) => origin.join(pathname),
      None => origin.to_path_buf(),
    };
    let directory = dunce::canonicalize(&directory).unwrap_or(directory);

    let system = System::new(decl.name, directory, decl.metadata, decl.depends_on, components);
    info!(
      system = %system.canonical_name(),
      directory = %system.directory().display(),
      components = system.flattened_components().len(),
      "defined system"
    );

    if self.systems.insert(canonical.clone(), system).is_some() {
      debug!(system = %canonical, "replaced existing definition");
    }

    self.find_system(&canonical)
  }

  /// Looks up a system by name, case-insensitively.
  pub fn find_system(&self, name: &str) -> Result<&System, RegistryError> {
    self
      .systems
      .get(&canonicalize_name(name))
      .ok_or_else(|| RegistryError::UnknownSystem(name.to_string()))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.systems.contains_key(&canonicalize_name(name))
  }

  /// Every system, ordered by canonical name.
  pub fn list_systems(&self) -> Vec<&System> {
    self.systems.values().collect()
  }

  /// The named system's components, depth-first pre-order.
  pub fn list_system_components(&self, name: &str) -> Result<Vec<&Component>, RegistryError> {
    Ok(self.find_system(name)?.flattened_components())
  }

  pub fn len(&self) -> usize {
    self.systems.len()
  }

  pub fn is_empty(&self) -> bool {
    self.systems.is_empty()
  }
}
