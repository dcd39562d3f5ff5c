//! Parent/child edges between form fields.
//!
//! Built once per form from each field's `depends_on`. A field names at most
//! one parent, so any cycle shows up when walking parent links.

use std::collections::{HashMap, HashSet};

use telebiz_models::FormField;

use crate::error::{FormError, Result};

/// Resolved dependency edges, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// child -> parent, only for parents present in the form.
    parents: HashMap<String, String>,
    /// parent -> children, in field order.
    children: HashMap<String, Vec<String>>,
    /// Fields whose declared parent is missing.
    orphans: HashSet<String>,
}

impl DependencyGraph {
    /// Builds the graph, rejecting cycles.
    pub fn resolve(fields: &[FormField]) -> Result<Self> {
        let present: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        let mut graph = Self::default();

        for field in fields {
            let Some(parent) = field.depends_on.as_deref() else {
                continue;
            };
            if present.contains(parent) {
                graph
                    .parents
                    .insert(field.name.clone(), parent.to_string());
                graph
                    .children
                    .entry(parent.to_string())
                    .or_default()
                    .push(field.name.clone());
            } else {
                graph.orphans.insert(field.name.clone());
            }
        }

        graph.check_cycles(fields)?;
        Ok(graph)
    }

    fn check_cycles(&self, fields: &[FormField]) -> Result<()> {
        let mut cleared: HashSet<&str> = HashSet::new();

        for field in fields {
            let mut path: Vec<&str> = Vec::new();
            let mut current = field.name.as_str();

            loop {
                if cleared.contains(current) {
                    break;
                }
                if let Some(pos) = path.iter().position(|n| *n == current) {
                    let mut cycle: Vec<&str> = path[pos..].to_vec();
                    cycle.push(current);
                    return Err(FormError::DependencyCycle(cycle.join(" -> ")));
                }
                path.push(current);
                match self.parents.get(current) {
                    Some(parent) => current = parent.as_str(),
                    None => break,
                }
            }

            cleared.extend(path);
        }

        Ok(())
    }

    /// Parent of `name`, if it is present in the form.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parents.get(name).map(String::as_str)
    }

    /// Direct children of `name`, in field order.
    pub fn children_of(&self, name: &str) -> &[String] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All transitive dependents of `name`, parents before children.
    pub fn descendants_of(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut frontier: Vec<&str> = vec![name];
        while let Some(next) = frontier.pop() {
            for child in self.children_of(next).iter().rev() {
                frontier.push(child);
            }
            if next != name {
                out.push(next.to_string());
            }
        }
        out
    }

    /// True if `name` declares a parent that is not in the form.
    pub fn is_orphan(&self, name: &str) -> bool {
        self.orphans.contains(name)
    }

    /// Number of resolved parent/child edges.
    pub fn edge_count(&self) -> usize {
        self.parents.len()
    }
}
