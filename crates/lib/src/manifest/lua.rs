//! Lua evaluation of `*.sys.lua` manifests.
//!
//! Each manifest runs in its own Lua state, so nothing one manifest binds is
//! visible to another. The state exposes a `sysdef` table:
//!
//! - `sysdef.platform`, `sysdef.os`, `sysdef.arch` - the executing platform
//! - `sysdef.dir` - directory of the manifest being evaluated
//! - `sysdef.signature` - toolchain signature
//! - `sysdef.defsystem{...}` - declare a system
//!
//! ```lua
//! sysdef.defsystem {
//!   name = "demo",
//!   version = "1.0.0",
//!   depends_on = { "base" },
//!   components = {
//!     { "lib", { "a.lua", "b.lua" } },
//!     { "gen.lua", generator = { namespace = "codegen", ["function"] = "table", args = { "8" } } },
//!   },
//! }
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;

use crate::component::{Form, GeneratorRef};
use crate::platform::{arch_name, os_name, platform_triple};
use crate::system::{Metadata, SystemDecl, Version};

/// Evaluates the manifest at `path`, returning its directory and the systems it declares.
pub fn declare_systems(path: &Path, signature: &str) -> LuaResult<(PathBuf, Vec<SystemDecl>)> {
  let path = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot resolve '{}': {}", path.display(), e)))?;
  let content =
    fs::read_to_string(&path).map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;
  let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

  let lua = Lua::new();
  let declarations = Rc::new(RefCell::new(Vec::new()));
  register_globals(&lua, &dir, signature, declarations.clone())?;

  lua
    .load(&content)
    .set_name(format!("@{}", path.display()))
    .exec()?;

  let declarations = std::mem::take(&mut *declarations.borrow_mut());
  Ok((dir, declarations))
}

fn register_globals(
  lua: &Lua,
  dir: &Path,
  signature: &str,
  declarations: Rc<RefCell<Vec<SystemDecl>>>,
) -> LuaResult<()> {
  let sysdef = lua.create_table()?;

  sysdef.set("platform", platform_triple())?;
  sysdef.set("os", os_name())?;
  sysdef.set("arch", arch_name())?;
  sysdef.set("dir", dir.to_string_lossy().into_owned())?;
  sysdef.set("signature", signature)?;

  let defsystem = lua.create_function(move |_, spec: LuaTable| {
    let decl = parse_decl(&spec)?;
    let name = decl.name.clone();
    declarations.borrow_mut().push(decl);
    Ok(name)
  })?;
  sysdef.set("defsystem", defsystem)?;

  lua.globals().set("sysdef", sysdef)
}

fn parse_decl(spec: &LuaTable) -> LuaResult<SystemDecl> {
  let name: String = spec
    .get::<Option<String>>("name")?
    .filter(|name| !name.is_empty())
    .ok_or_else(|| LuaError::external("defsystem: 'name' is required"))?;

  let metadata = Metadata {
    description: spec.get("description")?,
    authors: string_list(spec, "author", "authors")?,
    homepage: spec.get("homepage")?,
    licenses: string_list(spec, "license", "licenses")?,
    version: parse_version(spec.get("version")?)?,
  };

  let depends_on = match spec.get::<LuaValue>("depends_on")? {
    LuaValue::Nil => Vec::new(),
    LuaValue::String(s) => vec![s.to_str()?.to_string()],
    LuaValue::Table(list) => list.sequence_values::<String>().collect::<LuaResult<_>>()?,
    other => return Err(field_error(&name, "depends_on", &other)),
  };

  let components = match spec.get::<Option<LuaTable>>("components")? {
    Some(list) => list
      .sequence_values::<LuaValue>()
      .map(|value| value.and_then(parse_form))
      .collect::<LuaResult<_>>()?,
    None => Vec::new(),
  };

  Ok(SystemDecl {
    name,
    pathname: spec.get::<Option<String>>("pathname")?.map(PathBuf::from),
    metadata,
    depends_on,
    components,
  })
}

/// Collects `single` (one string) followed by `plural` (a string or a list).
fn string_list(spec: &LuaTable, single: &str, plural: &str) -> LuaResult<Vec<String>> {
  let mut values = Vec::new();
  if let Some(value) = spec.get::<Option<String>>(single)? {
    values.push(value);
  }
  match spec.get::<LuaValue>(plural)? {
    LuaValue::Nil => {}
    LuaValue::String(s) => values.push(s.to_str()?.to_string()),
    LuaValue::Table(list) => {
      for value in list.sequence_values::<String>() {
        values.push(value?);
      }
    }
    other => {
      return Err(LuaError::external(format!(
        "'{}' must be a string or a list, got {}",
        plural,
        other.type_name()
      )));
    }
  }
  Ok(values)
}

fn parse_version(value: LuaValue) -> LuaResult<Option<Version>> {
  match value {
    LuaValue::Nil => Ok(None),
    LuaValue::String(s) => Ok(Some(Version::parse(&s.to_str()?))),
    LuaValue::Table(table) => {
      let command: String = table
        .get::<Option<String>>("command")?
        .ok_or_else(|| LuaError::external("version table requires a 'command' field"))?;
      Ok(Some(Version::dynamic(command)))
    }
    other => Err(LuaError::external(format!(
      "'version' must be a string or a table, got {}",
      other.type_name()
    ))),
  }
}

/// Converts a Lua component form: a string is a name, a table is a list of
/// forms with an optional trailing `generator` descriptor.
fn parse_form(value: LuaValue) -> LuaResult<Form> {
  match value {
    LuaValue::String(s) => Ok(Form::Name(s.to_str()?.to_string())),
    LuaValue::Table(table) => {
      let mut items = table
        .sequence_values::<LuaValue>()
        .map(|item| item.and_then(parse_form))
        .collect::<LuaResult<Vec<_>>>()?;
      if let Some(generator) = table.get::<Option<LuaTable>>("generator")? {
        items.push(Form::Generator(parse_generator(&generator)?));
      }
      Ok(Form::List(items))
    }
    other => Err(LuaError::external(format!(
      "component form must be a string or a table, got {}",
      other.type_name()
    ))),
  }
}

fn parse_generator(table: &LuaTable) -> LuaResult<GeneratorRef> {
  let namespace: String = table.get("namespace")?;
  let function: String = table.get("function")?;

  let args = match table.get::<Option<LuaTable>>("args")? {
    Some(list) => list
      .sequence_values::<LuaValue>()
      .map(|arg| arg.and_then(argument_string))
      .collect::<LuaResult<Vec<_>>>()?,
    None => Vec::new(),
  };

  Ok(GeneratorRef::new(namespace, function).with_args(args))
}

fn argument_string(value: LuaValue) -> LuaResult<String> {
  match value {
    LuaValue::String(s) => Ok(s.to_str()?.to_string()),
    LuaValue::Integer(i) => Ok(i.to_string()),
    LuaValue::Number(n) => Ok(n.to_string()),
    LuaValue::Boolean(b) => Ok(b.to_string()),
    other => Err(LuaError::external(format!(
      "generator arguments must be strings or numbers, got {}",
      other.type_name()
    ))),
  }
}

fn field_error(system: &str, field: &str, value: &LuaValue) -> LuaError {
  LuaError::external(format!(
    "defsystem {}: invalid '{}' ({})",
    system,
    field,
    value.type_name()
  ))
}
