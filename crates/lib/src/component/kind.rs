//! Component kinds.
//!
//! A kind is the capability set a leaf component brings to the pipeline. Both
//! capabilities default to doing nothing, so a kind that only marks files as
//! part of a system costs nothing to add.
//!
//! Kinds are chosen at tree-construction time from the file-type suffix of the
//! declared name, via the [`KindRegistry`]. Names without a registered suffix
//! become [`StaticFile`]s.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::backend::{Backend, LuaImage};
use crate::pipeline::{PipelineError, Unit, ensure_parent_dir};

/// File type compiled by the built-in Lua backend.
pub const LUA_FILE_TYPE: &str = "lua";

/// Artifact file type produced by the built-in Lua backend.
pub const LUA_ARTIFACT_TYPE: &str = "luac";

pub trait Kind: fmt::Debug {
  /// Short identifier shown in listings.
  fn name(&self) -> &str;

  /// File type of the artifact `build` writes, for kinds that compile anything.
  fn artifact_type(&self) -> Option<&str> {
    None
  }

  fn build(&self, _unit: &Unit<'_>) -> Result<(), PipelineError> {
    Ok(())
  }

  fn load(&self, _unit: &Unit<'_>) -> Result<(), PipelineError> {
    Ok(())
  }
}

/// A file that belongs to a system but is neither compiled nor loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticFile;

impl Kind for StaticFile {
  fn name(&self) -> &str {
    "static-file"
  }
}

/// A source file compiled into the build cache and loaded from there.
#[derive(Debug, Clone)]
pub struct CompiledSource {
  artifact_type: String,
  backend: Rc<dyn Backend>,
}

impl CompiledSource {
  pub fn new(artifact_type: impl Into<String>, backend: Rc<dyn Backend>) -> Self {
    Self {
      artifact_type: artifact_type.into(),
      backend,
    }
  }
}

impl Kind for CompiledSource {
  fn name(&self) -> &str {
    "compiled-source"
  }

  fn artifact_type(&self) -> Option<&str> {
    Some(&self.artifact_type)
  }

  fn build(&self, unit: &Unit<'_>) -> Result<(), PipelineError> {
    let source = unit.effective_source_path(unit.component().file_type());
    let output = unit.cache_path(&self.artifact_type);
    ensure_parent_dir(&output)?;

    debug!(source = %source.display(), output = %output.display(), "compiling");
    self
      .backend
      .compile(&source, &output)
      .map_err(|diagnostics| PipelineError::CompilationFailure {
        source_path: source,
        diagnostics,
      })
  }

  fn load(&self, unit: &Unit<'_>) -> Result<(), PipelineError> {
    let artifact = unit.cache_path(&self.artifact_type);

    debug!(artifact = %artifact.display(), "loading");
    self
      .backend
      .load(&artifact)
      .map_err(|message| PipelineError::LoadFailure { artifact, message })
  }
}

/// Mapping from file-type suffix to component kind.
///
/// Consulted only while component trees are being built; registering a kind
/// afterwards does not change systems that are already defined.
#[derive(Debug)]
pub struct KindRegistry {
  kinds: HashMap<String, Rc<dyn Kind>>,
  fallback: Rc<dyn Kind>,
}

impl Default for KindRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl KindRegistry {
  /// An empty registry: every component becomes a [`StaticFile`].
  pub fn new() -> Self {
    Self {
      kinds: HashMap::new(),
      fallback: Rc::new(StaticFile),
    }
  }

  /// Registry seeded with the built-in kinds, compiling `.lua` sources into `image`.
  pub fn with_builtins(image: Rc<LuaImage>) -> Self {
    let mut registry = Self::new();
    registry.register(
      LUA_FILE_TYPE,
      Rc::new(CompiledSource::new(LUA_ARTIFACT_TYPE, image)),
    );
    registry
  }

  /// Maps `file_type` to `kind`, returning the kind it replaces.
  pub fn register(&mut self, file_type: impl Into<String>, kind: Rc<dyn Kind>) -> Option<Rc<dyn Kind>> {
    let file_type = file_type.into();
    debug!(file_type = %file_type, kind = kind.name(), "registering component kind");
    self.kinds.insert(file_type, kind)
  }

  /// Kind for `file_type`, falling back to [`StaticFile`].
  pub fn lookup(&self, file_type: &str) -> Rc<dyn Kind> {
    self
      .kinds
      .get(file_type)
      .cloned()
      .unwrap_or_else(|| self.fallback.clone())
  }

  pub fn contains(&self, file_type: &str) -> bool {
    self.kinds.contains_key(file_type)
  }

  /// Registered file types, sorted.
  pub fn file_types(&self) -> Vec<&str> {
    let mut types: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
    types.sort_unstable();
    types
  }
}
