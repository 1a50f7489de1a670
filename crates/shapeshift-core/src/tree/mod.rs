//! Schema tree compiler
//!
//! A schema is compiled once into a tree of nodes stored in an arena. Every
//! node knows its dotted target path; leaves carry a prepared action ready
//! to run against any source item. The tree is immutable once compiled and
//! is evaluated breadth first, so parents always come before their
//! children.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

pub mod classify;
pub mod node;
mod prepare;

#[cfg(test)]
mod tests;

pub use classify::{classify, is_valid_action};
pub use node::{ActionInput, NodeData, NodeId, NodeKind, PreparedAction, SchemaNode, ROOT_NAME};

use crate::schema::{Action, Schema};
use crate::{Error, Result};
use log::debug;
use std::collections::VecDeque;

const ROOT: NodeId = 0;

/// Compiled, traversal-ready form of a schema
#[derive(Debug, Clone)]
pub struct SchemaTree {
    nodes: Vec<SchemaNode>,
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaTree {
    /// Empty tree holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![SchemaNode::root()],
        }
    }

    /// Compile a schema
    pub fn parse(schema: &Schema) -> Result<Self> {
        let mut tree = Self::new();
        for (key, action) in schema.entries() {
            tree.seed(key, action, None)?;
        }
        debug!("Compiled schema into {} nodes", tree.len());
        Ok(tree)
    }

    fn seed(&mut self, key: &str, action: &Action, parent_path: Option<&str>) -> Result<()> {
        if classify(key, action)?.is_action() {
            self.add(NodeData::action(key, action.clone()), parent_path)?;
            return Ok(());
        }

        let id = self.add(NodeData::property(key), parent_path)?;
        let path = self.nodes[id].target_property_path.clone();
        match action {
            Action::Object(schema) => {
                for (child_key, child_action) in schema.entries() {
                    self.seed(child_key, child_action, Some(&path))?;
                }
            }
            Action::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.seed(&index.to_string(), item, Some(&path))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Attach a node under the node whose target path is `parent_path`,
    /// or under the root when `parent_path` is `None`
    ///
    /// The action must be a leaf action. Nested schemas and mixed lists are
    /// rejected with [`Error::UnsupportedAction`]; [`SchemaTree::parse`]
    /// expands them into property nodes.
    pub fn add(&mut self, data: NodeData, parent_path: Option<&str>) -> Result<NodeId> {
        let kind = match &data.action {
            Some(action) => classify(&data.property_name, action)?,
            None => NodeKind::Property,
        };
        if data.action.is_some() && !kind.is_action() {
            return Err(Error::UnsupportedAction {
                property: data.property_name,
            });
        }

        let parent = match parent_path {
            None => ROOT,
            Some(path) => self.find(path).ok_or_else(|| {
                Error::configuration(format!(
                    "Cannot add property {}: no node found at path {}",
                    data.property_name, path
                ))
            })?,
        };

        let target_property_path = if parent == ROOT {
            data.property_name.clone()
        } else {
            format!("{}.{}", self.nodes[parent].target_property_path, data.property_name)
        };
        if self.find(&target_property_path).is_some() {
            return Err(Error::DuplicatePath {
                path: target_property_path,
            });
        }

        let (action, prepared_action) = match data.action {
            Some(action) => {
                let prepared = prepare::prepare(kind, &target_property_path, &action)?;
                (Some(action), prepared)
            }
            None => (None, None),
        };

        let id = self.nodes.len();
        self.nodes.push(SchemaNode {
            property_name: data.property_name,
            target_property_path,
            action,
            kind,
            prepared_action,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id)
    }

    /// Node whose target path is `path`
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .skip(1)
            .position(|node| node.target_property_path == path)
            .map(|index| index + 1)
    }

    /// Number of nodes, root excluded
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nodes level by level, root excluded
    pub fn traverse_bfs(&self) -> Bfs<'_> {
        let mut queue = VecDeque::new();
        queue.push_back(ROOT);
        Bfs { tree: self, queue }
    }
}

/// Breadth-first iterator over a [`SchemaTree`]
pub struct Bfs<'a> {
    tree: &'a SchemaTree,
    queue: VecDeque<NodeId>,
}

impl<'a> Iterator for Bfs<'a> {
    type Item = &'a SchemaNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.queue.pop_front() {
            let node = &self.tree.nodes[id];
            self.queue.extend(node.children.iter().copied());
            if node.kind != NodeKind::Root {
                return Some(node);
            }
        }
        None
    }
}
