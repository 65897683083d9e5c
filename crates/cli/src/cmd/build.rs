use std::time::Instant;

use anyhow::Result;
use serde_json::json;

use crate::output::{format_duration, print_json, print_stat, print_success};

use super::GlobalArgs;

pub fn cmd_build(args: &GlobalArgs, name: &str) -> Result<()> {
  let session = args.initialized_session()?;
  let start = Instant::now();

  session.build_system(name)?;

  let system = session.find_system(name)?;
  let elapsed = start.elapsed();
  if args.output.is_json() {
    return print_json(&json!({
      "system": system.name(),
      "build_root": session.build_root().path(),
      "duration_secs": elapsed.as_secs_f64(),
    }));
  }

  print_success(&format!("Built {} in {}", system.name(), format_duration(elapsed)));
  print_stat("build root", &session.build_root().path().display().to_string());
  Ok(())
}
