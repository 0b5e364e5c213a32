//! # shpexport
//!
//! Exports a previewed graph to a pair of Shapefiles for GIS tools: a point
//! layer for nodes and a line layer for edges, each carrying the node or edge
//! attributes plus the size and color the preview rendered.
//!
//! ## Architecture
//!
//! ```text
//! Host (preview pipeline, attribute model, options dialog)
//!     ↓
//! Exporter (dialog → build → write)
//!     ↓
//! Schema + Record building (geometry, gSize, gColor, attributes)
//!     ↓
//! Shapefile writer (staged, committed per file)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use shpexport::{
//!     AttributeColumn, AttributeRow, AttributeType, Color, Edge, ExportOptions, Node,
//!     PreviewModel, ShpExporter,
//! };
//!
//! let mut preview = PreviewModel::new(
//!     vec![AttributeColumn::new("label", AttributeType::String)],
//!     vec![],
//! );
//! preview.add_node(
//!     Node::new("a", 0.0, 0.0, AttributeRow::new().with("label", "A")),
//!     10.0,
//!     Some(Color::rgb(255, 0, 0)),
//! );
//! preview.add_node(Node::new("b", 5.0, 5.0, AttributeRow::new()), 4.0, None);
//! preview.add_edge(Edge::new("ab", "a", "b", AttributeRow::new()), 1.0, None);
//!
//! let mut exporter = ShpExporter::default();
//! let report = exporter
//!     .export(&preview, &ExportOptions::new("out/graph.shp"))
//!     .unwrap();
//! assert!(report.is_complete());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod export;
pub mod exporter;
pub mod geo;
pub mod model;

// Re-export main types
pub use config::{ExportConfig, FieldNames, WritePolicy, COLOR_FIELD, LOCATION_FIELD, SIZE_FIELD};
pub use error::{ExportError, Result};
pub use export::{FeatureCollection, Geometry, GeometryKind, Record, RecordValue, Schema};
pub use exporter::{
    output_paths, DialogRequest, ExportOptions, ExportReport, ExportState, FileOutcome,
    OptionsDialog, OutputPaths, PresetOptions, ShpExporter,
};
pub use geo::{find_geo_fields, resolve_coordinate, Coordinate, GeoFields};
pub use model::{
    AttributeColumn, AttributeRow, AttributeType, AttributeValue, Color, Edge, ItemKind, Node,
    PreviewModel, VisualItem,
};
