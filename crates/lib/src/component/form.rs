//! Declarative component forms and the tree factory.
//!
//! A form is one of three shapes, tried in order:
//!
//! 1. `(name (child ...))` - a group owning a non-empty list of child forms
//! 2. `name` - a leaf with no generator
//! 3. `(name [generator])` - a leaf, optionally produced by a generator
//!
//! Anything else is rejected with [`FormError::Malformed`] and no partial tree
//! is returned. So is any name that is absolute or contains `..`: every path
//! stays rooted under its group's path.

use std::fmt;
use std::path::{self, Path, PathBuf};

use thiserror::Error;

use super::kind::KindRegistry;
use super::types::{Component, GeneratorRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
  Name(String),
  List(Vec<Form>),
  Generator(GeneratorRef),
}

impl Form {
  /// `(name (children ...))`
  pub fn group(name: impl Into<String>, children: Vec<Form>) -> Self {
    Form::List(vec![Form::Name(name.into()), Form::List(children)])
  }

  /// `(name :generator ...)`
  pub fn generated(name: impl Into<String>, generator: GeneratorRef) -> Self {
    Form::List(vec![Form::Name(name.into()), Form::Generator(generator)])
  }
}

impl From<&str> for Form {
  fn from(name: &str) -> Self {
    Form::Name(name.to_string())
  }
}

impl From<String> for Form {
  fn from(name: String) -> Self {
    Form::Name(name)
  }
}

impl fmt::Display for Form {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Form::Name(name) => write!(f, "{:?}", name),
      Form::List(items) => {
        write!(f, "(")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            write!(f, " ")?;
          }
          write!(f, "{}", item)?;
        }
        write!(f, ")")
      }
      Form::Generator(generator) => write!(f, ":generator {}", generator),
    }
  }
}

#[derive(Debug, Error)]
pub enum FormError {
  #[error("malformed component form: {form}")]
  Malformed { form: String },

  #[error("component name must not be empty")]
  EmptyName,
}

/// Builds a component tree from `form`, rooted at the system directory.
///
/// The returned tree has no owning system assigned.
pub fn make_component(form: &Form, kinds: &KindRegistry) -> Result<Component, FormError> {
  make_component_in(form, Path::new(""), kinds)
}

fn make_component_in(form: &Form, parent: &Path, kinds: &KindRegistry) -> Result<Component, FormError> {
  match form {
    Form::List(items) => match items.as_slice() {
      [Form::Name(name), Form::List(children)] if !children.is_empty() => make_group(name, children, parent, kinds),
      [Form::Name(name)] => make_leaf(name, None, parent, kinds),
      [Form::Name(name), Form::Generator(generator)] => make_leaf(name, Some(generator), parent, kinds),
      _ => Err(malformed(form)),
    },
    Form::Name(name) => make_leaf(name, None, parent, kinds),
    Form::Generator(_) => Err(malformed(form)),
  }
}

fn make_group(name: &str, children: &[Form], parent: &Path, kinds: &KindRegistry) -> Result<Component, FormError> {
  let name = canonical_group_name(name);
  if name.is_empty() {
    return Err(FormError::EmptyName);
  }
  check_relative(name)?;

  let path = parent.join(name);
  let children = children
    .iter()
    .map(|child| make_component_in(child, &path, kinds))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(Component::group(name, path, children))
}

fn make_leaf(
  name: &str,
  generator: Option<&GeneratorRef>,
  parent: &Path,
  kinds: &KindRegistry,
) -> Result<Component, FormError> {
  if name.is_empty() {
    return Err(FormError::EmptyName);
  }
  check_relative(name)?;

  let path: PathBuf = parent.join(name);
  let file_type = Path::new(name).extension().and_then(|ext| ext.to_str()).unwrap_or("");
  let kind = kinds.lookup(file_type);

  Ok(Component::leaf(name, path, kind, generator.cloned()))
}

/// Group names may be written with a trailing separator (`"utils/"`).
fn canonical_group_name(name: &str) -> &str {
  name.trim_end_matches(std::path::is_separator)
}

fn check_relative(name: &str) -> Result<(), FormError> {
  let escapes = Path::new(name).components().any(|part| {
    matches!(
      part,
      path::Component::RootDir | path::Component::Prefix(_) | path::Component::ParentDir
    )
  });
  if escapes {
    return Err(malformed(&Form::Name(name.to_string())));
  }
  Ok(())
}

fn malformed(form: &Form) -> FormError {
  FormError::Malformed { form: form.to_string() }
}
