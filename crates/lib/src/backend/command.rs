//! Shell command backend.
//!
//! Compiles by running a command template with `{source}` and `{output}`
//! substituted (quoted for the shell), e.g.
//! `cc -shared -fPIC {source} -o {output}`.

use std::cell::RefCell;
use std::path::Path;
use std::process::Command;

use libloading::Library;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Backend;

/// How a command-built artifact is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
  /// The artifact only has to exist.
  #[default]
  None,
  /// The artifact is opened as a shared library and kept open.
  Dylib,
}

#[derive(Debug)]
pub struct CommandBackend {
  template: String,
  mode: LoadMode,
  libraries: RefCell<Vec<Library>>,
}

impl CommandBackend {
  pub fn new(template: impl Into<String>, mode: LoadMode) -> Self {
    Self {
      template: template.into(),
      mode,
      libraries: RefCell::new(Vec::new()),
    }
  }

  /// The command line for compiling `source` into `output`.
  pub fn render(&self, source: &Path, output: &Path) -> String {
    self
      .template
      .replace("{source}", &shell_quote(source))
      .replace("{output}", &shell_quote(output))
  }
}

impl Backend for CommandBackend {
  fn compile(&self, source: &Path, output: &Path) -> Result<(), String> {
    let cmd = self.render(source, output);
    info!(cmd = %cmd, "executing compiler");

    let (shell, shell_args) = get_shell();
    debug!(shell = %shell, "spawning process");

    let result = Command::new(&shell)
      .args(&shell_args)
      .arg(&cmd)
      .output()
      .map_err(|e| format!("failed to spawn '{}': {}", shell, e))?;

    let stderr = String::from_utf8_lossy(&result.stderr);
    let stdout = String::from_utf8_lossy(&result.stdout);

    if !result.status.success() {
      if !stderr.trim().is_empty() {
        return Err(stderr.into_owned());
      }
      if !stdout.trim().is_empty() {
        return Err(stdout.into_owned());
      }
      return Err(format!("command failed with exit code {:?}: {}", result.status.code(), cmd));
    }

    if !stderr.trim().is_empty() {
      warn!(source = %source.display(), stderr = %stderr.trim(), "compiler reported warnings");
    }

    Ok(())
  }

  fn load(&self, artifact: &Path) -> Result<(), String> {
    match self.mode {
      LoadMode::None => {
        if artifact.is_file() {
          Ok(())
        } else {
          Err(format!("artifact not found: {}", artifact.display()))
        }
      }
      LoadMode::Dylib => {
        // SAFETY: opening a library runs its initialisers. The artifact was
        // produced by the user's own configured compiler for this build.
        let library = unsafe { Library::new(artifact) }.map_err(|e| e.to_string())?;
        self.libraries.borrow_mut().push(library);
        Ok(())
      }
    }
  }
}

#[cfg(unix)]
fn shell_quote(path: &Path) -> String {
  format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}

#[cfg(windows)]
fn shell_quote(path: &Path) -> String {
  format!("'{}'", path.to_string_lossy().replace('\'', "''"))
}

/// Shell and the flag(s) used to pass it a command string.
///
/// Always the system shell rather than `$SHELL`, which may source profiles.
fn get_shell() -> (String, Vec<String>) {
  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
      ],
    )
  }
}
