//! Dependency graph validation.
//!
//! Checked before any pipeline step runs, so a load never starts on a graph
//! that references missing systems or contains a cycle.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::system::System;

use super::{Registry, RegistryError};

/// Systems reachable from one root through `depends_on`.
///
/// Edges run from a dependency to its dependent.
pub struct DependencyGraph {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
  /// Collects every system reachable from `root`.
  ///
  /// Fails with `UnknownSystem` naming the first dependency that is not
  /// registered.
  pub fn reachable_from(registry: &Registry, root: &System) -> Result<Self, RegistryError> {
    let mut dag = Self {
      graph: DiGraph::new(),
      nodes: HashMap::new(),
    };

    let mut pending = vec![root];
    dag.node(root.canonical_name());

    while let Some(system) = pending.pop() {
      let dependent = dag.node(system.canonical_name());
      for name in system.depends_on() {
        let dependency = registry.find_system(name)?;
        let seen = dag.nodes.contains_key(dependency.canonical_name());
        let index = dag.node(dependency.canonical_name());
        dag.graph.update_edge(index, dependent, ());
        if !seen {
          pending.push(dependency);
        }
      }
    }

    Ok(dag)
  }

  fn node(&mut self, name: &str) -> NodeIndex {
    if let Some(&index) = self.nodes.get(name) {
      return index;
    }
    let index = self.graph.add_node(name.to_string());
    self.nodes.insert(name.to_string(), index);
    index
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  /// Canonical names with every dependency before its dependents.
  ///
  /// Fails with `DependencyCycle` naming a system on the cycle.
  pub fn order(&self) -> Result<Vec<&str>, RegistryError> {
    let sorted = toposort(&self.graph, None).map_err(|cycle| RegistryError::DependencyCycle {
      system: self.graph[cycle.node_id()].clone(),
    })?;
    Ok(sorted.into_iter().map(|index| self.graph[index].as_str()).collect())
  }
}
