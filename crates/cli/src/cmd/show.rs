use anyhow::Result;
use serde_json::json;
use sysdef_lib::component::Component;
use sysdef_lib::pipeline::Unit;
use sysdef_lib::system::System;
use sysdef_lib::toolchain::BuildRoot;

use crate::output::{print_json, print_stat, symbols};

use super::GlobalArgs;

pub fn cmd_show(args: &GlobalArgs, name: &str) -> Result<()> {
  let session = args.initialized_session()?;
  let system = session.find_system(name)?;
  let components = system.flattened_components();

  if args.output.is_json() {
    let components: Vec<_> = components
      .iter()
      .map(|component| {
        let (source, artifact) = unit_paths(session.build_root(), system, component);
        json!({
          "name": component.name(),
          "path": component.path(),
          "kind": component.kind_name(),
          "generator": component.generator().map(|g| g.to_string()),
          "source": source,
          "artifact": artifact,
        })
      })
      .collect();
    return print_json(&json!({
      "name": system.name(),
      "directory": system.directory(),
      "metadata": system.metadata(),
      "depends_on": system.depends_on(),
      "components": components,
    }));
  }

  let metadata = system.metadata();
  println!("{}", system.name());
  print_stat("directory", &system.directory().display().to_string());
  if let Some(version) = system.version() {
    print_stat("version", &version.to_string());
  }
  if let Some(description) = &metadata.description {
    print_stat("description", description);
  }
  if !metadata.authors.is_empty() {
    print_stat("authors", &metadata.authors.join(", "));
  }
  if !metadata.licenses.is_empty() {
    print_stat("licenses", &metadata.licenses.join(", "));
  }
  if let Some(homepage) = &metadata.homepage {
    print_stat("homepage", homepage);
  }
  if !system.depends_on().is_empty() {
    print_stat("depends on", &system.depends_on().join(", "));
  }

  println!();
  println!("Components:");
  for component in components {
    let (_, artifact) = unit_paths(session.build_root(), system, component);
    let mut line = format!("  {} [{}]", component.path().display(), component.kind_name());
    if let Some(generator) = component.generator() {
      line.push_str(&format!(" generated by {}", generator));
    }
    if let Some(artifact) = artifact {
      line.push_str(&format!(" {} {}", symbols::ARROW, artifact));
    }
    println!("{}", line);
  }

  Ok(())
}

/// Source and artifact paths a load would use; groups have neither.
fn unit_paths(root: &BuildRoot, system: &System, component: &Component) -> (Option<String>, Option<String>) {
  let Some(kind) = component.kind() else {
    return (None, None);
  };

  let unit = Unit::new(root, system, component);
  let source = unit.effective_source_path(component.file_type());
  let artifact = kind.artifact_type().map(|artifact_type| unit.cache_path(artifact_type));
  (
    Some(source.display().to_string()),
    artifact.map(|path| path.display().to_string()),
  )
}
