mod build;
mod info;
mod list;
mod load;
mod show;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use sysdef_lib::Session;
use sysdef_lib::config::Config;
use tracing::debug;

use crate::output::OutputFormat;

pub use build::cmd_build;
pub use info::cmd_info;
pub use list::cmd_list;
pub use load::cmd_load;
pub use show::cmd_show;

/// Options shared by every subcommand.
pub struct GlobalArgs {
  pub paths: Vec<PathBuf>,
  pub cache_dir: Option<PathBuf>,
  pub output: OutputFormat,
}

impl GlobalArgs {
  /// A session configured from the config file, without evaluating any manifest.
  pub fn session(&self) -> Result<Session> {
    let config = Config::load().context("Failed to load configuration")?;
    Ok(Session::from_config(&config, self.cache_dir.clone()))
  }

  /// A session with every manifest under `paths` evaluated.
  pub fn initialized_session(&self) -> Result<Session> {
    let mut session = self.session()?;
    debug!(paths = ?self.paths, build_root = %session.build_root().path().display(), "initializing session");
    // Lua errors are not Send; keep their rendered chain instead.
    session
      .initialize(&self.paths)
      .map_err(|err| anyhow!("Failed to evaluate manifests: {}", err))?;
    Ok(session)
  }
}
