//! Rendering-time view of the graph: the ordered visual items with the
//! size and color the preview pipeline computed for them.

use super::attribute::{AttributeColumn, AttributeRow};
use super::types::{Edge, Node, NodeId};
use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Display color of a visual item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase six digit hex string without a leading `#`.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Entity class of a visual item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Node items, exported as points
    Node,
    /// Edge items, exported as lines
    Edge,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Node => write!(f, "node"),
            ItemKind::Edge => write!(f, "edge"),
        }
    }
}

/// A node as rendered by the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeItem {
    /// Underlying node
    pub node: Node,
    /// Rendered size
    pub size: f32,
    /// Rendered color, if any
    pub color: Option<Color>,
}

/// An edge as rendered by the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeItem {
    /// Underlying edge
    pub edge: Edge,
    /// Rendered weight (line thickness)
    pub weight: f32,
    /// Rendered color, if any
    pub color: Option<Color>,
}

/// A visual item over either a node or an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualItem {
    /// Node item
    Node(NodeItem),
    /// Edge item
    Edge(EdgeItem),
}

impl VisualItem {
    /// Entity class of this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            VisualItem::Node(_) => ItemKind::Node,
            VisualItem::Edge(_) => ItemKind::Edge,
        }
    }

    /// Host-computed size: node size, or edge weight.
    pub fn size(&self) -> f32 {
        match self {
            VisualItem::Node(item) => item.size,
            VisualItem::Edge(item) => item.weight,
        }
    }

    /// Host-computed display color.
    pub fn color(&self) -> Option<Color> {
        match self {
            VisualItem::Node(item) => item.color,
            VisualItem::Edge(item) => item.color,
        }
    }

    /// Attribute row of the underlying entity.
    pub fn attributes(&self) -> &AttributeRow {
        match self {
            VisualItem::Node(item) => &item.node.attributes,
            VisualItem::Edge(item) => &item.edge.attributes,
        }
    }

    /// Host identifier of the underlying entity.
    pub fn entity_id(&self) -> &str {
        match self {
            VisualItem::Node(item) => &item.node.id,
            VisualItem::Edge(item) => &item.edge.id,
        }
    }
}

/// The previewed graph handed over by the host.
///
/// Holds the attribute tables' column metadata and the visual items in
/// the order the preview pipeline produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewModel {
    /// Columns of the node attribute table
    pub node_columns: Vec<AttributeColumn>,
    /// Columns of the edge attribute table
    pub edge_columns: Vec<AttributeColumn>,
    items: Vec<VisualItem>,
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
}

impl PreviewModel {
    /// Create an empty preview over the given attribute tables.
    pub fn new(node_columns: Vec<AttributeColumn>, edge_columns: Vec<AttributeColumn>) -> Self {
        Self {
            node_columns,
            edge_columns,
            items: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    /// Append a rendered node.
    pub fn add_node(&mut self, node: Node, size: f32, color: Option<Color>) {
        self.node_index.insert(node.id.clone(), self.items.len());
        self.items
            .push(VisualItem::Node(NodeItem { node, size, color }));
    }

    /// Append a rendered edge.
    pub fn add_edge(&mut self, edge: Edge, weight: f32, color: Option<Color>) {
        self.items
            .push(VisualItem::Edge(EdgeItem { edge, weight, color }));
    }

    /// Items of one entity class, in preview order.
    pub fn items(&self, kind: ItemKind) -> impl Iterator<Item = &VisualItem> {
        self.items.iter().filter(move |item| item.kind() == kind)
    }

    /// All items, in preview order.
    pub fn all_items(&self) -> &[VisualItem] {
        &self.items
    }

    /// Columns of the attribute table for an entity class.
    pub fn columns(&self, kind: ItemKind) -> &[AttributeColumn] {
        match kind {
            ItemKind::Node => &self.node_columns,
            ItemKind::Edge => &self.edge_columns,
        }
    }

    /// Look up a rendered node by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NodeNotFound`] if the node is not part of the preview.
    pub fn node(&self, id: &str) -> Result<&Node> {
        match self.node_index.get(id).and_then(|&i| self.items.get(i)) {
            Some(VisualItem::Node(item)) => Ok(&item.node),
            _ => Err(ExportError::NodeNotFound {
                node_id: id.to_string(),
            }),
        }
    }

    /// Number of node items.
    pub fn node_count(&self) -> usize {
        self.items(ItemKind::Node).count()
    }

    /// Number of edge items.
    pub fn edge_count(&self) -> usize {
        self.items(ItemKind::Edge).count()
    }

    /// Load a preview snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialization`] if the JSON does not describe a preview.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut model: PreviewModel = serde_json::from_str(json)
            .map_err(|e| ExportError::serialization("Failed to parse preview snapshot", Some(e)))?;
        model.reindex();
        Ok(model)
    }

    /// Serialize this preview to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::serialization("Failed to serialize preview snapshot", Some(e)))
    }

    fn reindex(&mut self) {
        self.node_index = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                VisualItem::Node(n) => Some((n.node.id.clone(), i)),
                VisualItem::Edge(_) => None,
            })
            .collect();
    }
}
