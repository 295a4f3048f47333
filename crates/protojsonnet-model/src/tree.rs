//! Package namespace tree over the top-level types of a registry.
//!
//! Generators emit one nested namespace object per package component with the
//! top-level types of that package as leaves:
//!
//! ```json
//! { "acme": { "v1": { "Order": "acme.v1.Order", "Status": "acme.v1.Status" } } }
//! ```

use crate::registry::Registry;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PackageNode {
    /// A package component, children keyed by local name.
    Namespace(BTreeMap<String, PackageNode>),
    /// A top-level type, by qualified name.
    Leaf(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageTree {
    root: BTreeMap<String, PackageNode>,
}

impl PackageTree {
    pub fn build(registry: &Registry) -> Self {
        let mut tree = Self::default();

        for (_, t) in registry.iter() {
            tree.ensure_namespace(t.package());
        }

        for (name, t) in registry.iter() {
            if !t.is_top_level() {
                continue;
            }
            let Some(children) = tree.ensure_namespace(t.package()) else {
                continue;
            };
            if matches!(children.get(t.name()), Some(PackageNode::Namespace(_))) {
                tracing::warn!(
                    type_name = name,
                    "type name collides with a package namespace, leaving it out of the tree"
                );
                continue;
            }
            children.insert(t.name().to_string(), PackageNode::Leaf(name.to_string()));
        }
        tree
    }

    /// Children of the namespace for `package` (the root for the empty package), creating it.
    ///
    /// Returns `None` when a component of the path is already taken by a leaf.
    fn ensure_namespace(&mut self, package: &str) -> Option<&mut BTreeMap<String, PackageNode>> {
        let mut node = &mut self.root;
        if package.is_empty() {
            return Some(node);
        }
        for part in package.split('.') {
            let child = node
                .entry(part.to_string())
                .or_insert_with(|| PackageNode::Namespace(BTreeMap::new()));
            match child {
                PackageNode::Namespace(children) => node = children,
                PackageNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    pub fn root(&self) -> &BTreeMap<String, PackageNode> {
        &self.root
    }

    /// Children of the namespace for `package`, if it exists.
    pub fn namespace(&self, package: &str) -> Option<&BTreeMap<String, PackageNode>> {
        let mut node = &self.root;
        if package.is_empty() {
            return Some(node);
        }
        for part in package.split('.') {
            match node.get(part)? {
                PackageNode::Namespace(children) => node = children,
                PackageNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Qualified names of every leaf, depth-first in name order.
    pub fn leaves(&self) -> Vec<&str> {
        fn walk<'a>(node: &'a BTreeMap<String, PackageNode>, out: &mut Vec<&'a str>) {
            for child in node.values() {
                match child {
                    PackageNode::Namespace(children) => walk(children, out),
                    PackageNode::Leaf(name) => out.push(name),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
}
