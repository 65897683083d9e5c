//! Discovery and evaluation of `*.sys.lua` manifests through a session.

use std::path::PathBuf;

use sysdef_lib::manifest::EvalError;
use sysdef_lib::registry::RegistryError;
use sysdef_lib::system::Version;

use super::common::Workspace;

#[test]
fn systems_from_every_manifest_are_listed_by_name() {
  let ws = Workspace::new();
  ws.write("zeta.sys.lua", r#"sysdef.defsystem { name = "Zeta" }"#);
  ws.write(
    "nested/alpha.sys.lua",
    r#"sysdef.defsystem { name = "alpha", version = "0.2.0", description = "first" }"#,
  );

  let session = ws.initialized();

  let names: Vec<_> = session.list_systems().iter().map(|s| s.name()).collect();
  assert_eq!(names, vec!["alpha", "Zeta"]);

  let alpha = session.find_system("ALPHA").unwrap();
  assert_eq!(alpha.version(), Some(&Version::semantic(0, 2, 0)));
  assert_eq!(alpha.metadata().description.as_deref(), Some("first"));
  assert!(alpha.directory().ends_with("nested"));
}

#[test]
fn deeper_manifest_redefinition_wins() {
  let ws = Workspace::new();
  ws.write(
    "top.sys.lua",
    r#"sysdef.defsystem { name = "demo", components = { "old.lua" } }"#,
  );
  ws.write(
    "sub/override.sys.lua",
    r#"sysdef.defsystem { name = "Demo", components = { "new.lua" } }"#,
  );

  let session = ws.initialized();

  let paths: Vec<_> = session
    .list_system_components("demo")
    .unwrap()
    .iter()
    .map(|c| c.path().to_path_buf())
    .collect();
  assert_eq!(paths, vec![PathBuf::from("new.lua")]);
}

#[test]
fn pathname_moves_system_directory() {
  let ws = Workspace::new();
  ws.write("src/.keep", "");
  ws.write(
    "demo.sys.lua",
    r#"sysdef.defsystem { name = "demo", pathname = "src" }"#,
  );

  let session = ws.initialized();

  let system = session.find_system("demo").unwrap();
  assert_eq!(system.directory(), dunce::canonicalize(ws.project().join("src")).unwrap());
}

#[test]
fn component_listing_reflects_groups_and_kinds() {
  let ws = Workspace::new();
  ws.write(
    "demo.sys.lua",
    r#"
    sysdef.defsystem {
      name = "demo",
      components = {
        { "lib/", { "a.lua", "README" } },
        { "gen.lua", generator = { namespace = "g", ["function"] = "f" } },
      },
    }
    "#,
  );

  let session = ws.initialized();
  let components = session.list_system_components("demo").unwrap();

  let summary: Vec<_> = components
    .iter()
    .map(|c| (c.path().to_string_lossy().replace('\\', "/"), c.kind_name().to_string()))
    .collect();
  assert_eq!(
    summary,
    vec![
      ("lib".to_string(), "group".to_string()),
      ("lib/a.lua".to_string(), "compiled-source".to_string()),
      ("lib/README".to_string(), "static-file".to_string()),
      ("gen.lua".to_string(), "compiled-source".to_string()),
    ]
  );
  assert!(components[3].generator().is_some());
}

#[test]
fn malformed_manifest_stops_initialization() {
  let ws = Workspace::new();
  ws.write(
    "bad.sys.lua",
    r#"sysdef.defsystem { name = "bad", components = { { "lib", {} } } }"#,
  );

  let mut session = ws.session();
  let err = session.initialize(&[ws.project()]).unwrap_err();

  assert!(matches!(
    err,
    EvalError::Define(RegistryError::MalformedComponentForm { .. })
  ));
  assert!(session.find_system("bad").is_err());
}

#[test]
fn unreadable_root_is_reported() {
  let ws = Workspace::new();
  let mut session = ws.session();

  let err = session.initialize(&[ws.project().join("missing")]).unwrap_err();
  assert!(matches!(err, EvalError::Walk(_)));
}

#[test]
fn component_outside_the_system_directory_is_rejected() {
  let ws = Workspace::new();
  let victim = ws.temp.path().join("outside").join("victim.txt");
  ws.write(
    "escape.sys.lua",
    &format!(
      r#"
      sysdef.defsystem {{
        name = "escape",
        components = {{
          {{ "lib", {{ {{ {:?}, generator = {{ namespace = "codegen", ["function"] = "f" }} }} }} }},
        }},
      }}
      "#,
      victim.display().to_string()
    ),
  );
  let mut session = ws.session();
  session.generators_mut().register("codegen", "f", |_: &[String]| Ok("overwritten".to_string()));

  let err = session.initialize(&[ws.project()]).unwrap_err();

  assert!(matches!(
    err,
    EvalError::Define(RegistryError::MalformedComponentForm { .. })
  ));
  assert!(session.load_system("escape").is_err());
  assert!(!victim.exists());
}
