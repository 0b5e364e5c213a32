//! Per-item record building.
//!
//! Walks the preview items of one entity class once and resolves each schema
//! field to a geometry, a synthetic value, or a pass-through attribute.

use super::schema::{FieldRole, Schema};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::geo::{resolve_coordinate, Coordinate, GeoFields};
use crate::model::{AttributeValue, ItemKind, PreviewModel, VisualItem};
use log::{debug, trace};

/// Shape of one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Node location
    Point(Coordinate),
    /// Edge from source to target
    LineString(Vec<Coordinate>),
}

/// A value in a record, positionally aligned with its schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Value of the `location` field
    Geometry(Geometry),
    /// Value of any other field
    Attribute(AttributeValue),
}

/// One output record per visual item.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Values in schema order
    pub values: Vec<RecordValue>,
}

impl Record {
    /// The record's geometry, if the schema has one.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.values.iter().find_map(|v| match v {
            RecordValue::Geometry(g) => Some(g),
            RecordValue::Attribute(_) => None,
        })
    }

    /// Attribute value of the named field.
    pub fn attribute(&self, schema: &Schema, name: &str) -> Option<&AttributeValue> {
        let index = schema.fields().iter().position(|f| f.name == name)?;
        match self.values.get(index) {
            Some(RecordValue::Attribute(value)) => Some(value),
            _ => None,
        }
    }
}

/// Records of one entity class together with their schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    /// Shared schema
    pub schema: Schema,
    /// Records in item order
    pub records: Vec<Record>,
}

impl FeatureCollection {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build one record per item of `kind`, in preview order.
///
/// # Errors
///
/// Returns [`crate::ExportError::CoordinateParse`] if a node cannot be placed and
/// [`crate::ExportError::NodeNotFound`] if an edge endpoint is not in the preview.
pub fn build_records(
    model: &PreviewModel,
    kind: ItemKind,
    schema: Schema,
    geo_fields: Option<&GeoFields>,
    config: &ExportConfig,
) -> Result<FeatureCollection> {
    let mut records = Vec::new();

    for item in model.items(kind) {
        let mut values = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let value = match field.role {
                FieldRole::Location => {
                    RecordValue::Geometry(item_geometry(model, item, geo_fields)?)
                }
                FieldRole::Size => RecordValue::Attribute(AttributeValue::Float(f64::from(
                    item.size() * config.size_scale,
                ))),
                FieldRole::Color => RecordValue::Attribute(AttributeValue::String(
                    item.color().map(|c| c.to_hex()).unwrap_or_default(),
                )),
                FieldRole::Attribute => {
                    RecordValue::Attribute(item.attributes().value_or_null(&field.name))
                }
            };
            values.push(value);
        }
        trace!("Built {kind} record for {}", item.entity_id());
        records.push(Record { values });
    }

    debug!("Built {} {kind} records", records.len());
    Ok(FeatureCollection { schema, records })
}

fn item_geometry(
    model: &PreviewModel,
    item: &VisualItem,
    geo_fields: Option<&GeoFields>,
) -> Result<Geometry> {
    match item {
        VisualItem::Node(node_item) => Ok(Geometry::Point(resolve_coordinate(
            &node_item.node,
            geo_fields,
        )?)),
        VisualItem::Edge(edge_item) => {
            let edge = &edge_item.edge;
            let source = model.node(&edge.source)?;
            let target = model.node(&edge.target)?;
            Ok(Geometry::LineString(vec![
                resolve_coordinate(source, geo_fields)?,
                resolve_coordinate(target, geo_fields)?,
            ]))
        }
    }
}

impl Geometry {
    /// Coordinates of the shape, in order.
    pub fn coordinates(&self) -> &[Coordinate] {
        match self {
            Geometry::Point(c) => std::slice::from_ref(c),
            Geometry::LineString(cs) => cs,
        }
    }
}
