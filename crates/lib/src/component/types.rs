use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::kind::Kind;

/// Reference to an external capability that writes a component's source.
///
/// Stored as an opaque triple; resolution happens at generate time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorRef {
  pub namespace: String,
  pub function: String,
  #[serde(default)]
  pub args: Vec<String>,
}

impl GeneratorRef {
  pub fn new(namespace: impl Into<String>, function: impl Into<String>) -> Self {
    Self {
      namespace: namespace.into(),
      function: function.into(),
      args: Vec::new(),
    }
  }

  pub fn with_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args = args.into_iter().map(Into::into).collect();
    self
  }
}

impl fmt::Display for GeneratorRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.namespace, self.function)
  }
}

/// What a component is: a directory of children or a leaf of some kind.
#[derive(Debug, Clone)]
pub enum Node {
  Group(Vec<Component>),
  Leaf(Rc<dyn Kind>),
}

/// A node in a system's component forest.
#[derive(Debug, Clone)]
pub struct Component {
  name: String,
  path: PathBuf,
  generator: Option<GeneratorRef>,
  node: Node,
  /// Canonical name of the owning system, stamped once the forest is complete.
  system: Option<String>,
}

impl Component {
  pub fn group(name: impl Into<String>, path: impl Into<PathBuf>, children: Vec<Component>) -> Self {
    Self {
      name: name.into(),
      path: path.into(),
      generator: None,
      node: Node::Group(children),
      system: None,
    }
  }

  pub fn leaf(
    name: impl Into<String>,
    path: impl Into<PathBuf>,
    kind: Rc<dyn Kind>,
    generator: Option<GeneratorRef>,
  ) -> Self {
    Self {
      name: name.into(),
      path: path.into(),
      generator,
      node: Node::Leaf(kind),
      system: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Path relative to the owning system's directory.
  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn generator(&self) -> Option<&GeneratorRef> {
    self.generator.as_ref()
  }

  pub fn node(&self) -> &Node {
    &self.node
  }

  pub fn is_group(&self) -> bool {
    matches!(self.node, Node::Group(_))
  }

  /// Children in declaration order; empty for leaves.
  pub fn children(&self) -> &[Component] {
    match &self.node {
      Node::Group(children) => children,
      Node::Leaf(_) => &[],
    }
  }

  pub fn kind(&self) -> Option<&Rc<dyn Kind>> {
    match &self.node {
      Node::Group(_) => None,
      Node::Leaf(kind) => Some(kind),
    }
  }

  /// Display name of the component's kind.
  pub fn kind_name(&self) -> &str {
    match &self.node {
      Node::Group(_) => "group",
      Node::Leaf(kind) => kind.name(),
    }
  }

  /// Suffix of the declared path, without the dot; empty when there is none.
  pub fn file_type(&self) -> &str {
    self.path.extension().and_then(|ext| ext.to_str()).unwrap_or("")
  }

  /// Canonical name of the owning system, once assigned.
  pub fn system(&self) -> Option<&str> {
    self.system.as_deref()
  }

  /// Stamps the owning system on this node and every descendant.
  pub(crate) fn assign_system(&mut self, system: &str) {
    self.system = Some(system.to_string());
    if let Node::Group(children) = &mut self.node {
      for child in children {
        child.assign_system(system);
      }
    }
  }
}

/// Depth-first pre-order flattening of a forest: each group precedes its children.
pub fn flatten(forest: &[Component]) -> Vec<&Component> {
  fn visit<'a>(component: &'a Component, out: &mut Vec<&'a Component>) {
    out.push(component);
    for child in component.children() {
      visit(child, out);
    }
  }

  let mut out = Vec::new();
  for component in forest {
    visit(component, &mut out);
  }
  out
}
