//! Manifest discovery and evaluation.
//!
//! A manifest is a `*.sys.lua` file declaring zero or more systems. Evaluating
//! one registers every system it declares, resolved against the manifest's
//! directory.

mod discover;
mod lua;

use std::path::{Path, PathBuf};

use mlua::prelude::LuaError;
use thiserror::Error;
use tracing::info;

use crate::component::KindRegistry;
use crate::registry::{Registry, RegistryError};

pub use discover::discover_manifests;
pub use lua::declare_systems;

#[derive(Debug, Error)]
pub enum EvalError {
  #[error("failed to evaluate manifest {}: {source}", path.display())]
  Lua {
    path: PathBuf,
    #[source]
    source: LuaError,
  },

  #[error("failed to discover manifests: {0}")]
  Walk(#[from] walkdir::Error),

  #[error(transparent)]
  Define(#[from] RegistryError),
}

/// Evaluates the manifest at `path` and defines every system it declares.
///
/// Returns the canonical names of the defined systems, in declaration order.
pub fn evaluate_manifest(
  path: &Path,
  registry: &mut Registry,
  kinds: &KindRegistry,
  signature: &str,
) -> Result<Vec<String>, EvalError> {
  let (origin, declarations) = declare_systems(path, signature).map_err(|source| EvalError::Lua {
    path: path.to_path_buf(),
    source,
  })?;

  let mut defined = Vec::with_capacity(declarations.len());
  for decl in declarations {
    let system = registry.define_system(decl, &origin, kinds)?;
    defined.push(system.canonical_name().to_string());
  }

  info!(path = %path.display(), systems = ?defined, "evaluated manifest");
  Ok(defined)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn declared_systems_are_registered_against_manifest_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("demo.sys.lua");
    fs::write(
      &path,
      r#"
      sysdef.defsystem { name = "Demo", components = { { "lib", { "a.src" } } } }
      sysdef.defsystem { name = "other" }
      "#,
    )
    .unwrap();

    let mut registry = Registry::new();
    let defined = evaluate_manifest(&path, &mut registry, &KindRegistry::new(), "sig").unwrap();

    assert_eq!(defined, vec!["demo", "other"]);
    let system = registry.find_system("demo").unwrap();
    assert_eq!(system.directory(), dunce::canonicalize(temp.path()).unwrap());
    assert_eq!(system.flattened_components().len(), 2);
  }

  #[test]
  fn malformed_form_is_a_definition_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.sys.lua");
    fs::write(&path, r#"sysdef.defsystem { name = "bad", components = { {} } }"#).unwrap();

    let mut registry = Registry::new();
    let err = evaluate_manifest(&path, &mut registry, &KindRegistry::new(), "sig").unwrap_err();

    assert!(matches!(
      err,
      EvalError::Define(RegistryError::MalformedComponentForm { .. })
    ));
    assert!(registry.is_empty());
  }

  #[test]
  fn lua_error_names_manifest() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.sys.lua");
    fs::write(&path, "error('boom')").unwrap();

    let mut registry = Registry::new();
    let err = evaluate_manifest(&path, &mut registry, &KindRegistry::new(), "sig").unwrap_err();

    assert!(matches!(err, EvalError::Lua { .. }));
    let message = err.to_string();
    assert!(message.contains("broken.sys.lua") && message.contains("boom"), "{}", message);
  }
}
