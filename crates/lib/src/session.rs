//! The top-level state object.
//!
//! A [`Session`] owns everything a load needs: the system registry, the kind
//! and generator registries, the Lua image artifacts are loaded into, and the
//! build root they are cached under. Nothing is process-global; two sessions
//! never observe each other.
//!
//! # Lifecycle
//!
//! 1. [`Session::new`] or [`Session::from_config`]
//! 2. register extra kinds and generators ([`Session::kinds_mut`],
//!    [`Session::generators_mut`]) before any manifest is evaluated
//! 3. [`Session::initialize`] with the manifest roots (or define systems
//!    directly with [`Session::define_system`])
//! 4. [`Session::load_system`] / [`Session::build_system`]

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::info;

use crate::backend::LuaImage;
use crate::component::{Component, KindRegistry};
use crate::config::Config;
use crate::lock::BuildLock;
use crate::manifest::{EvalError, discover_manifests, evaluate_manifest};
use crate::pipeline::{GeneratorRegistry, Phases, Pipeline};
use crate::registry::{DependencyGraph, Registry, RegistryError};
use crate::system::{System, SystemDecl};
use crate::toolchain::BuildRoot;

#[derive(Debug)]
pub struct Session {
  registry: Registry,
  kinds: KindRegistry,
  generators: GeneratorRegistry,
  image: Rc<LuaImage>,
  build_root: BuildRoot,
}

impl Session {
  /// A session with the built-in kinds, caching under `build_root`.
  pub fn new(build_root: BuildRoot) -> Self {
    let image = Rc::new(LuaImage::new());
    Self {
      registry: Registry::new(),
      kinds: KindRegistry::with_builtins(image.clone()),
      generators: GeneratorRegistry::with_image(image.clone()),
      image,
      build_root,
    }
  }

  /// A session using the configured kinds.
  ///
  /// `cache_dir` takes precedence over every configured cache directory.
  pub fn from_config(config: &Config, cache_dir: Option<PathBuf>) -> Self {
    let cache_dir = cache_dir.unwrap_or_else(|| config.resolve_cache_dir());
    let mut session = Self::new(BuildRoot::new(cache_dir));
    config.register_kinds(&mut session.kinds);
    session
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  pub fn kinds(&self) -> &KindRegistry {
    &self.kinds
  }

  /// Kinds registered here only apply to systems defined afterwards.
  pub fn kinds_mut(&mut self) -> &mut KindRegistry {
    &mut self.kinds
  }

  pub fn generators(&self) -> &GeneratorRegistry {
    &self.generators
  }

  pub fn generators_mut(&mut self) -> &mut GeneratorRegistry {
    &mut self.generators
  }

  pub fn image(&self) -> &LuaImage {
    &self.image
  }

  pub fn build_root(&self) -> &BuildRoot {
    &self.build_root
  }

  pub fn define_system(&mut self, decl: SystemDecl, origin: &Path) -> Result<&System, RegistryError> {
    self.registry.define_system(decl, origin, &self.kinds)
  }

  /// Evaluates one manifest, returning the names of the systems it defined.
  pub fn evaluate_manifest(&mut self, path: &Path) -> Result<Vec<String>, EvalError> {
    evaluate_manifest(path, &mut self.registry, &self.kinds, self.build_root.signature())
  }

  /// Discards every registered system, then evaluates every manifest under `roots`.
  pub fn initialize(&mut self, roots: &[PathBuf]) -> Result<Vec<String>, EvalError> {
    self.registry.reset();

    let mut defined = Vec::new();
    for manifest in discover_manifests(roots)? {
      defined.extend(self.evaluate_manifest(&manifest)?);
    }

    info!(systems = self.registry.len(), "initialized registry");
    Ok(defined)
  }

  pub fn find_system(&self, name: &str) -> Result<&System, RegistryError> {
    self.registry.find_system(name)
  }

  pub fn list_systems(&self) -> Vec<&System> {
    self.registry.list_systems()
  }

  pub fn list_system_components(&self, name: &str) -> Result<Vec<&Component>, RegistryError> {
    self.registry.list_system_components(name)
  }

  /// Generates, builds and loads `name` after all of its dependencies.
  ///
  /// Dependencies are visited depth-first in declaration order and fully
  /// processed before the system's own components. A dependency reached twice
  /// is processed twice.
  pub fn load_system(&self, name: &str) -> Result<(), RegistryError> {
    self.run(name, Phases::Load)
  }

  /// Like [`Session::load_system`], except that `name`'s own components are
  /// generated and built but not loaded.
  ///
  /// Dependencies are still loaded, so generators they define in the Lua
  /// image are available to `name`.
  pub fn build_system(&self, name: &str) -> Result<(), RegistryError> {
    self.run(name, Phases::Build)
  }

  fn run(&self, name: &str, phases: Phases) -> Result<(), RegistryError> {
    let system = self.registry.find_system(name)?;
    DependencyGraph::reachable_from(&self.registry, system)?.order()?;

    let command = match phases {
      Phases::Build => format!("build {}", system.canonical_name()),
      Phases::Load => format!("load {}", system.canonical_name()),
    };
    let _lock = BuildLock::acquire(&self.build_root.path(), &command)?;

    info!(system = %system.canonical_name(), ?phases, "starting");
    let pipeline = Pipeline::new(&self.build_root, &self.generators);
    self.visit(&pipeline, system, phases)
  }

  fn visit(&self, pipeline: &Pipeline<'_>, system: &System, phases: Phases) -> Result<(), RegistryError> {
    for dependency in system.depends_on() {
      let dependency = self.registry.find_system(dependency)?;
      self.visit(pipeline, dependency, Phases::Load)?;
    }

    for component in system.flattened_components() {
      pipeline.run(system, component, phases)?;
    }
    Ok(())
  }
}
