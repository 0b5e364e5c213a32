//! Host data model consumed by the exporter.
//!
//! This module defines what the host application hands over:
//! - [`AttributeColumn`] / [`AttributeRow`]: typed attribute tables
//! - [`Node`] / [`Edge`]: graph entities
//! - [`PreviewModel`]: the rendered items with their computed size and color

mod attribute;
mod preview;
mod types;

pub use attribute::{AttributeColumn, AttributeRow, AttributeType, AttributeValue};
pub use preview::{Color, EdgeItem, ItemKind, NodeItem, PreviewModel, VisualItem};
pub use types::{Edge, EdgeId, Node, NodeId};
