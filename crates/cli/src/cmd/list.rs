use anyhow::Result;
use serde_json::json;

use crate::output::{print_info, print_json, print_stat};

use super::GlobalArgs;

pub fn cmd_list(args: &GlobalArgs) -> Result<()> {
  let session = args.initialized_session()?;
  let systems = session.list_systems();

  if args.output.is_json() {
    let systems: Vec<_> = systems
      .iter()
      .map(|system| {
        json!({
          "name": system.name(),
          "version": system.version().map(|v| v.to_string()),
          "directory": system.directory(),
          "depends_on": system.depends_on(),
        })
      })
      .collect();
    return print_json(&systems);
  }

  if systems.is_empty() {
    print_info("No systems defined");
    return Ok(());
  }

  for system in systems {
    match system.version() {
      Some(version) => println!("{} {}", system.name(), version),
      None => println!("{}", system.name()),
    }
    print_stat("directory", &system.directory().display().to_string());
    if !system.depends_on().is_empty() {
      print_stat("depends on", &system.depends_on().join(", "));
    }
  }

  Ok(())
}
