//! Compilers and loaders behind compiled component kinds.
//!
//! A [`Backend`] turns one source file into one artifact and loads that
//! artifact into the running process. The pipeline decides *which* paths are
//! involved; the backend only knows how to compile and load.
//!
//! # Submodules
//!
//! - [`lua`] - the built-in Lua 5.4 image
//! - [`command`] - shell command templates, optionally loading shared libraries

pub mod command;
pub mod lua;

use std::fmt;
use std::path::Path;

pub use command::{CommandBackend, LoadMode};
pub use lua::LuaImage;

pub trait Backend: fmt::Debug {
  /// Compiles `source` into `output`.
  ///
  /// On failure returns the compiler's own diagnostic text, unmodified.
  fn compile(&self, source: &Path, output: &Path) -> Result<(), String>;

  /// Loads a previously compiled artifact into the running process.
  fn load(&self, artifact: &Path) -> Result<(), String>;
}
