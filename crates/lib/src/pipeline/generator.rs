//! Generator resolution.
//!
//! Generators are capabilities registered by the host ahead of time, keyed by
//! `(namespace, function)`. When no native entry matches, the Lua image is
//! searched for a global table `namespace` holding a function `function`.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use mlua::prelude::LuaFunction;

use crate::backend::LuaImage;
use crate::component::GeneratorRef;

use super::PipelineError;

/// A native generator: receives the descriptor's arguments, returns the content.
pub type GeneratorFn = dyn Fn(&[String]) -> Result<String, String>;

#[derive(Default)]
pub struct GeneratorRegistry {
  native: HashMap<(String, String), Rc<GeneratorFn>>,
  image: Option<Rc<LuaImage>>,
}

impl fmt::Debug for GeneratorRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut keys: Vec<_> = self.native.keys().collect();
    keys.sort();
    f.debug_struct("GeneratorRegistry")
      .field("native", &keys)
      .field("image", &self.image.is_some())
      .finish()
  }
}

impl GeneratorRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry that falls back to functions defined in `image`.
  pub fn with_image(image: Rc<LuaImage>) -> Self {
    Self {
      native: HashMap::new(),
      image: Some(image),
    }
  }

  pub fn register<F>(&mut self, namespace: impl Into<String>, function: impl Into<String>, generator: F)
  where
    F: Fn(&[String]) -> Result<String, String> + 'static,
  {
    self
      .native
      .insert((namespace.into(), function.into()), Rc::new(generator));
  }

  pub fn contains(&self, namespace: &str, function: &str) -> bool {
    self.native.contains_key(&(namespace.to_string(), function.to_string()))
      || self
        .image
        .as_ref()
        .is_some_and(|image| image.generator(namespace, function).is_some())
  }

  /// Resolves `generator` without running it.
  pub(crate) fn resolve(&self, generator: &GeneratorRef) -> Result<Resolved<'_>, PipelineError> {
    let key = (generator.namespace.clone(), generator.function.clone());
    if let Some(native) = self.native.get(&key) {
      return Ok(Resolved::Native(native.as_ref()));
    }

    if let Some(image) = &self.image
      && let Some(function) = image.generator(&generator.namespace, &generator.function)
    {
      return Ok(Resolved::Image(image, function));
    }

    Err(PipelineError::GeneratorNotFound {
      namespace: generator.namespace.clone(),
      function: generator.function.clone(),
    })
  }
}

pub(crate) enum Resolved<'a> {
  Native(&'a GeneratorFn),
  Image(&'a LuaImage, LuaFunction),
}

impl Resolved<'_> {
  pub(crate) fn call(&self, args: &[String]) -> Result<String, String> {
    match self {
      Resolved::Native(generator) => generator(args),
      Resolved::Image(image, function) => image.call_generator(function, args),
    }
  }
}
