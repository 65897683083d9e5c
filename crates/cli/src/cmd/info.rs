use anyhow::Result;
use serde_json::json;
use sysdef_lib::platform::{paths, platform_triple};

use crate::output::{print_json, print_stat};

use super::GlobalArgs;

pub fn cmd_info(args: &GlobalArgs) -> Result<()> {
  let session = args.session()?;
  let root = session.build_root();
  let config_file = paths::config_file();

  if args.output.is_json() {
    return print_json(&json!({
      "platform": platform_triple(),
      "signature": root.signature(),
      "cache_dir": root.cache_dir(),
      "build_root": root.path(),
      "config_file": config_file,
      "file_types": session.kinds().file_types(),
    }));
  }

  println!("System:");
  print_stat("platform", &platform_triple());
  print_stat("signature", root.signature());
  print_stat("cache dir", &root.cache_dir().display().to_string());
  print_stat("build root", &root.path().display().to_string());
  print_stat("config file", &config_file.display().to_string());
  print_stat("compiled file types", &session.kinds().file_types().join(", "));
  Ok(())
}
