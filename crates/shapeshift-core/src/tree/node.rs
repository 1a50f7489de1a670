//! Schema tree nodes
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::schema::Action;
use crate::validation::ValidationError;
use crate::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Index of a node in its tree's arena
pub type NodeId = usize;

/// Name of the synthetic root node
pub const ROOT_NAME: &str = "$root";

/// Classification of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Property,
    ActionString,
    ActionFunction,
    ActionAggregator,
    ActionSelector,
}

impl NodeKind {
    /// Whether nodes of this kind compute a value
    pub fn is_action(self) -> bool {
        !matches!(self, NodeKind::Root | NodeKind::Property)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "Root",
            NodeKind::Property => "Property",
            NodeKind::ActionString => "ActionString",
            NodeKind::ActionFunction => "ActionFunction",
            NodeKind::ActionAggregator => "ActionAggregator",
            NodeKind::ActionSelector => "ActionSelector",
        };
        f.write_str(name)
    }
}

/// Everything a prepared action can read while computing one property
#[derive(Debug, Clone, Copy)]
pub struct ActionInput<'a> {
    /// Current source item
    pub object: &'a Value,
    /// Full source collection, `[object]` for a single item
    pub items: &'a [Value],
    /// Target being built
    pub object_to_compute: &'a Value,
}

/// Precompiled computation for one node; validation failures go to the sink
pub type PreparedAction =
    Arc<dyn Fn(&ActionInput<'_>, &mut Vec<ValidationError>) -> Result<Option<Value>> + Send + Sync>;

/// Data needed to attach a node to a tree
#[derive(Debug, Clone)]
pub struct NodeData {
    pub property_name: String,
    /// `None` for a pure property node
    pub action: Option<Action>,
}

impl NodeData {
    /// Intermediate node grouping nested properties
    pub fn property(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            action: None,
        }
    }

    pub fn action(property_name: impl Into<String>, action: impl Into<Action>) -> Self {
        Self {
            property_name: property_name.into(),
            action: Some(action.into()),
        }
    }
}

/// A node of the compiled schema tree
#[derive(Clone)]
pub struct SchemaNode {
    pub(crate) property_name: String,
    pub(crate) target_property_path: String,
    pub(crate) action: Option<Action>,
    pub(crate) kind: NodeKind,
    pub(crate) prepared_action: Option<PreparedAction>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SchemaNode {
    pub(crate) fn root() -> Self {
        Self {
            property_name: ROOT_NAME.to_string(),
            target_property_path: String::new(),
            action: None,
            kind: NodeKind::Root,
            prepared_action: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Dotted path of this node in the target
    pub fn target_property_path(&self) -> &str {
        &self.target_property_path
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn prepared_action(&self) -> Option<&PreparedAction> {
        self.prepared_action.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("property_name", &self.property_name)
            .field("target_property_path", &self.target_property_path)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}
