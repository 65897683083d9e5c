//! End-to-end loads through the built-in Lua image.

use std::fs;

use sysdef_lib::pipeline::PipelineError;
use sysdef_lib::registry::RegistryError;

use super::common::{Workspace, read};

fn demo_workspace() -> Workspace {
  let ws = Workspace::new();
  ws.write(
    "demo.sys.lua",
    r#"
    sysdef.defsystem {
      name = "demo",
      depends_on = { "base" },
      components = { { "lib", { "a.lua", "b.lua" } } },
    }
    sysdef.defsystem {
      name = "base",
      pathname = "base",
      components = { "init.lua" },
    }
    "#,
  );
  ws.write("base/init.lua", "trace = 'base'");
  ws.write("lib/a.lua", "trace = trace .. ',a'");
  ws.write("lib/b.lua", "trace = trace .. ',b'");
  ws
}

#[test]
fn load_runs_dependencies_then_components_in_declared_order() {
  let ws = demo_workspace();
  let session = ws.initialized();

  session.load_system("demo").unwrap();

  assert_eq!(session.image().eval("trace").unwrap(), "base,a,b");
  assert_eq!(
    session.image().loaded(),
    vec![
      ws.artifact("base", "init.luac"),
      ws.artifact("demo", "lib/a.luac"),
      ws.artifact("demo", "lib/b.luac"),
    ]
  );
}

#[test]
fn artifacts_land_under_signature_and_system() {
  let ws = demo_workspace();
  let session = ws.initialized();

  session.build_system("demo").unwrap();

  for artifact in [
    ws.artifact("demo", "lib/a.luac"),
    ws.artifact("demo", "lib/b.luac"),
    ws.artifact("base", "init.luac"),
  ] {
    assert!(artifact.is_file(), "missing {}", artifact.display());
    assert!(fs::read(&artifact).unwrap().starts_with(b"\x1bLua"));
  }
  assert_eq!(session.image().loaded(), vec![ws.artifact("base", "init.luac")]);
}

#[test]
fn rebuild_always_recompiles() {
  let ws = demo_workspace();
  let session = ws.initialized();
  session.build_system("demo").unwrap();
  let artifact = ws.artifact("demo", "lib/a.luac");
  fs::write(&artifact, "stale").unwrap();

  session.build_system("demo").unwrap();

  assert!(fs::read(&artifact).unwrap().starts_with(b"\x1bLua"));
}

#[test]
fn native_generator_feeds_compilation() {
  let ws = Workspace::new();
  ws.write(
    "gen.sys.lua",
    r#"
    sysdef.defsystem {
      name = "gen",
      components = {
        { "consts.lua", generator = { namespace = "host", ["function"] = "consts", args = { "width", 80 } } },
      },
    }
    "#,
  );
  let mut session = ws.session();
  session.generators_mut().register("host", "consts", |args: &[String]| {
    Ok(format!("{} = {}", args[0], args[1]))
  });
  session.initialize(&[ws.project()]).unwrap();

  session.load_system("gen").unwrap();

  assert_eq!(read(&ws.artifact("gen", "consts.lua")), "width = 80");
  assert_eq!(session.image().eval("width * 2").unwrap(), "160");
}

#[test]
fn diamond_dependency_is_loaded_twice() {
  let ws = Workspace::new();
  ws.write(
    "diamond.sys.lua",
    r#"
    sysdef.defsystem { name = "top", depends_on = { "left", "right" } }
    sysdef.defsystem { name = "left", depends_on = { "base" } }
    sysdef.defsystem { name = "right", depends_on = { "base" } }
    sysdef.defsystem { name = "base", components = { "count.lua" } }
    "#,
  );
  ws.write("count.lua", "count = (count or 0) + 1");
  let session = ws.initialized();

  session.load_system("top").unwrap();

  assert_eq!(session.image().eval("count").unwrap(), "2");
}

#[test]
fn cyclic_manifest_is_rejected_before_compiling() {
  let ws = Workspace::new();
  ws.write(
    "cycle.sys.lua",
    r#"
    sysdef.defsystem { name = "a", depends_on = { "b" }, components = { "a.lua" } }
    sysdef.defsystem { name = "b", depends_on = { "a" }, components = { "b.lua" } }
    "#,
  );
  ws.write("a.lua", "");
  ws.write("b.lua", "");
  let session = ws.initialized();

  let err = session.load_system("a").unwrap_err();

  assert!(matches!(err, RegistryError::DependencyCycle { .. }));
  assert!(!ws.artifact("a", "a.luac").exists());
  assert!(!ws.artifact("b", "b.luac").exists());
}

#[test]
fn runtime_error_in_artifact_is_a_load_failure() {
  let ws = Workspace::new();
  ws.write(
    "demo.sys.lua",
    r#"sysdef.defsystem { name = "demo", components = { "boom.lua" } }"#,
  );
  ws.write("boom.lua", "error('kaboom')");
  let session = ws.initialized();

  let err = session.load_system("demo").unwrap_err();

  match err {
    RegistryError::Pipeline(PipelineError::LoadFailure { artifact, message }) => {
      assert_eq!(artifact, ws.artifact("demo", "boom.luac"));
      assert!(message.contains("kaboom"), "{}", message);
    }
    other => panic!("expected load failure, got {other:?}"),
  }
}

#[test]
#[cfg(unix)]
fn configured_command_kind_builds_with_shell() {
  use sysdef_lib::config::{Config, KindConfig};
  use sysdef_lib::backend::LoadMode;

  let ws = Workspace::new();
  ws.write(
    "text.sys.lua",
    r#"sysdef.defsystem { name = "text", components = { { "docs", { "guide.txt" } } } }"#,
  );
  ws.write("docs/guide.txt", "hello");

  let config = Config {
    cache_dir: None,
    kinds: vec![KindConfig {
      file_type: "txt".into(),
      artifact_type: "upper".into(),
      compile: "tr a-z A-Z < {source} > {output}".into(),
      load: LoadMode::None,
    }],
  };
  let mut session = ws.session();
  config.register_kinds(session.kinds_mut());
  session.initialize(&[ws.project()]).unwrap();

  session.load_system("text").unwrap();

  assert_eq!(read(&ws.artifact("text", "docs/guide.upper")), "HELLO");
}
