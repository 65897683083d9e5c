use std::time::Instant;

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::output::{format_duration, print_json, print_stat, print_success};

use super::GlobalArgs;

pub fn cmd_load(args: &GlobalArgs, name: &str, eval: Option<&str>) -> Result<()> {
  let session = args.initialized_session()?;
  let start = Instant::now();

  session.load_system(name)?;
  let elapsed = start.elapsed();

  let result = eval
    .map(|chunk| session.image().eval(chunk))
    .transpose()
    .map_err(|err| anyhow!("Failed to evaluate chunk: {}", err))?;

  let system = session.find_system(name)?;
  let loaded = session.image().loaded();
  if args.output.is_json() {
    return print_json(&json!({
      "system": system.name(),
      "loaded": loaded,
      "duration_secs": elapsed.as_secs_f64(),
      "result": result,
    }));
  }

  print_success(&format!(
    "Loaded {} ({} artifacts) in {}",
    system.name(),
    loaded.len(),
    format_duration(elapsed)
  ));
  if let Some(result) = result {
    print_stat("result", &result);
  }
  Ok(())
}
