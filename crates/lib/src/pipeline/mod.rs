//! The generate → build → load pipeline.
//!
//! Every component passes through three phases, in order, before the next
//! component is visited:
//!
//! - **generate** - only for components with a generator: the generator's
//!   output is written to the component's cache path, which then serves as
//!   its source
//! - **build** - delegated to the component's [`Kind`](crate::component::Kind)
//! - **load** - delegated to the component's kind
//!
//! Groups take part in the walk but every phase is a no-op for them.
//!
//! # Submodules
//!
//! - [`generator`] - generator registration and resolution
//! - [`unit`] - source and cache path derivation

pub mod generator;
pub mod unit;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::component::{Component, Node};
use crate::system::System;
use crate::toolchain::BuildRoot;

pub use generator::{GeneratorFn, GeneratorRegistry};
pub use unit::Unit;

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("generator not found: {namespace}:{function}")]
  GeneratorNotFound { namespace: String, function: String },

  #[error("generator {namespace}:{function} failed: {message}")]
  GeneratorFailed {
    namespace: String,
    function: String,
    message: String,
  },

  #[error("compilation of {} failed:\n{diagnostics}", source_path.display())]
  CompilationFailure { source_path: PathBuf, diagnostics: String },

  #[error("failed to load {}: {message}", artifact.display())]
  LoadFailure { artifact: PathBuf, message: String },

  #[error("io error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Creates the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
      path: parent.to_path_buf(),
      source,
    })?;
  }
  Ok(())
}

/// Which phases a traversal runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phases {
  /// generate → build
  Build,
  /// generate → build → load
  Load,
}

/// Runs pipeline phases against a build root.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
  root: &'a BuildRoot,
  generators: &'a GeneratorRegistry,
}

impl<'a> Pipeline<'a> {
  pub fn new(root: &'a BuildRoot, generators: &'a GeneratorRegistry) -> Self {
    Self { root, generators }
  }

  pub fn unit<'s>(&self, system: &'s System, component: &'s Component) -> Unit<'s>
  where
    'a: 's,
  {
    Unit::new(self.root, system, component)
  }

  /// Writes a generated component's source into the build cache.
  ///
  /// No-op for components without a generator.
  pub fn generate(&self, system: &System, component: &Component) -> Result<(), PipelineError> {
    let Some(generator) = component.generator() else {
      return Ok(());
    };

    let resolved = self.generators.resolve(generator)?;

    let target = self.unit(system, component).cache_path(component.file_type());
    ensure_parent_dir(&target)?;

    debug!(generator = %generator, target = %target.display(), "generating");
    let content = resolved
      .call(&generator.args)
      .map_err(|message| PipelineError::GeneratorFailed {
        namespace: generator.namespace.clone(),
        function: generator.function.clone(),
        message,
      })?;

    fs::write(&target, content).map_err(|source| PipelineError::Io { path: target, source })
  }

  pub fn build(&self, system: &System, component: &Component) -> Result<(), PipelineError> {
    match component.node() {
      Node::Group(_) => Ok(()),
      Node::Leaf(kind) => kind.build(&self.unit(system, component)),
    }
  }

  pub fn load(&self, system: &System, component: &Component) -> Result<(), PipelineError> {
    match component.node() {
      Node::Group(_) => Ok(()),
      Node::Leaf(kind) => kind.load(&self.unit(system, component)),
    }
  }

  /// Runs `phases` for one component, in order.
  pub fn run(&self, system: &System, component: &Component, phases: Phases) -> Result<(), PipelineError> {
    info!(
      system = %system.canonical_name(),
      component = %component.path().display(),
      kind = component.kind_name(),
      "processing component"
    );

    self.generate(system, component)?;
    self.build(system, component)?;
    if phases == Phases::Load {
      self.load(system, component)?;
    }
    Ok(())
  }
}
