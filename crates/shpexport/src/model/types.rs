//! Graph entities: nodes with a layout position, edges between them.

use super::attribute::{AttributeRow, AttributeValue};
use serde::{Deserialize, Serialize};

/// Identifier of a node, as assigned by the host.
pub type NodeId = String;

/// Identifier of an edge, as assigned by the host.
pub type EdgeId = String;

/// A graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Host identifier
    pub id: NodeId,
    /// Current layout position, horizontal
    pub x: f32,
    /// Current layout position, vertical
    pub y: f32,
    /// Attribute values keyed by column title
    #[serde(default)]
    pub attributes: AttributeRow,
}

impl Node {
    /// Create a node at a layout position.
    pub fn new(id: impl Into<NodeId>, x: f32, y: f32, attributes: AttributeRow) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            attributes,
        }
    }

    /// Add or update an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key, value);
    }

    /// Get an attribute value.
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Host identifier
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Attribute values keyed by column title
    #[serde(default)]
    pub attributes: AttributeRow,
}

impl Edge {
    /// Create an edge from `source` to `target`.
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        attributes: AttributeRow,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            attributes,
        }
    }

    /// Add or update an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key, value);
    }

    /// Get an attribute value.
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}
