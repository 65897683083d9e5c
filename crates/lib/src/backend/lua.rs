//! The built-in Lua image.
//!
//! One Lua state stands in for the running process: compiling a `.lua`
//! component dumps its bytecode into the build cache, and loading executes
//! that bytecode in the shared state. Globals defined by earlier components
//! are therefore visible to every later component, including those of
//! dependent systems, and to generators resolved through the image.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use mlua::{ChunkMode, Variadic};

use super::Backend;

pub struct LuaImage {
  lua: Lua,
  loaded: RefCell<Vec<PathBuf>>,
}

impl fmt::Debug for LuaImage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LuaImage").field("loaded", &self.loaded.borrow()).finish()
  }
}

impl Default for LuaImage {
  fn default() -> Self {
    Self::new()
  }
}

impl LuaImage {
  pub fn new() -> Self {
    // SAFETY: binary chunks must be accepted to load compiled artifacts. They
    // are only ever read from the build cache, where `compile` writes them.
    let lua = unsafe { Lua::unsafe_new() };
    Self {
      lua,
      loaded: RefCell::new(Vec::new()),
    }
  }

  pub fn lua(&self) -> &Lua {
    &self.lua
  }

  /// Artifacts loaded so far, in load order.
  pub fn loaded(&self) -> Vec<PathBuf> {
    self.loaded.borrow().clone()
  }

  /// Evaluates `chunk` in the image and renders the result with `tostring`.
  pub fn eval(&self, chunk: &str) -> LuaResult<String> {
    let value: LuaValue = self.lua.load(chunk).set_name("=eval").eval()?;
    let tostring: LuaFunction = self.lua.globals().get("tostring")?;
    tostring.call(value)
  }

  /// Looks up `namespace.function` among the image's globals.
  pub(crate) fn generator(&self, namespace: &str, function: &str) -> Option<LuaFunction> {
    match self.lua.globals().get::<LuaValue>(namespace) {
      Ok(LuaValue::Table(table)) => match table.get::<LuaValue>(function) {
        Ok(LuaValue::Function(f)) => Some(f),
        _ => None,
      },
      _ => None,
    }
  }

  /// Calls a generator function with string arguments, returning its output.
  pub(crate) fn call_generator(&self, function: &LuaFunction, args: &[String]) -> Result<String, String> {
    function
      .call::<String>(Variadic::from_iter(args.iter().cloned()))
      .map_err(|e| e.to_string())
  }
}

impl Backend for LuaImage {
  fn compile(&self, source: &Path, output: &Path) -> Result<(), String> {
    let content =
      fs::read_to_string(source).map_err(|e| format!("cannot read '{}': {}", source.display(), e))?;

    let function = self
      .lua
      .load(&content)
      .set_name(format!("@{}", source.display()))
      .into_function()
      .map_err(|e| e.to_string())?;

    fs::write(output, function.dump(false)).map_err(|e| format!("cannot write '{}': {}", output.display(), e))
  }

  fn load(&self, artifact: &Path) -> Result<(), String> {
    let bytecode = fs::read(artifact).map_err(|e| format!("cannot read '{}': {}", artifact.display(), e))?;

    self
      .lua
      .load(bytecode)
      .set_name(format!("@{}", artifact.display()))
      .set_mode(ChunkMode::Binary)
      .exec()
      .map_err(|e| e.to_string())?;

    self.loaded.borrow_mut().push(artifact.to_path_buf());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn compile_and_load(image: &LuaImage, dir: &Path, name: &str, code: &str) -> Result<PathBuf, String> {
    let source = dir.join(format!("{}.lua", name));
    let artifact = dir.join(format!("{}.luac", name));
    fs::write(&source, code).unwrap();
    image.compile(&source, &artifact)?;
    image.load(&artifact)?;
    Ok(artifact)
  }

  #[test]
  fn compiled_chunk_runs_in_image() {
    let temp = TempDir::new().unwrap();
    let image = LuaImage::new();

    compile_and_load(&image, temp.path(), "answer", "answer = 6 * 7").unwrap();

    assert_eq!(image.eval("return answer").unwrap(), "42");
  }

  #[test]
  fn later_loads_see_earlier_globals() {
    let temp = TempDir::new().unwrap();
    let image = LuaImage::new();

    compile_and_load(&image, temp.path(), "base", "base = { greet = function(n) return 'hi ' .. n end }").unwrap();
    compile_and_load(&image, temp.path(), "use", "greeting = base.greet('there')").unwrap();

    assert_eq!(image.eval("return greeting").unwrap(), "hi there");
    assert_eq!(image.loaded().len(), 2);
  }

  #[test]
  fn artifact_is_bytecode_not_source() {
    let temp = TempDir::new().unwrap();
    let image = LuaImage::new();

    let artifact = compile_and_load(&image, temp.path(), "x", "x = 1").unwrap();

    let bytes = fs::read(artifact).unwrap();
    assert_eq!(&bytes[..4], b"\x1bLua");
  }

  #[test]
  fn syntax_error_is_reported_as_diagnostic() {
    let temp = TempDir::new().unwrap();
    let image = LuaImage::new();

    let err = compile_and_load(&image, temp.path(), "broken", "local = 1").unwrap_err();
    assert!(err.contains("broken.lua"), "diagnostic should name the source: {}", err);
    assert!(image.loaded().is_empty());
  }

  #[test]
  fn runtime_error_fails_load() {
    let temp = TempDir::new().unwrap();
    let image = LuaImage::new();

    let err = compile_and_load(&image, temp.path(), "boom", "error('boom')").unwrap_err();
    assert!(err.contains("boom"));
  }

  #[test]
  fn generator_lookup_requires_table_and_function() {
    let image = LuaImage::new();
    image
      .lua()
      .load("codegen = { table = function(n) return 'n=' .. n end, value = 1 }")
      .exec()
      .unwrap();

    let function = image.generator("codegen", "table").unwrap();
    assert_eq!(image.call_generator(&function, &["3".to_string()]).unwrap(), "n=3");
    assert!(image.generator("codegen", "value").is_none());
    assert!(image.generator("codegen", "missing").is_none());
    assert!(image.generator("nowhere", "table").is_none());
  }
}
