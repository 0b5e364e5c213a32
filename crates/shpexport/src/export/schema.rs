//! Output schema derivation.
//!
//! Every schema is `location` + the non-list source columns + `gSize` + `gColor`,
//! in that order, fixed once per entity class.

use crate::config::FieldNames;
use crate::model::{AttributeColumn, AttributeType, ItemKind};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// dBASE III field names hold at most ten bytes.
pub const DBF_NAME_LIMIT: usize = 10;

/// Geometry stored in the `location` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Single point per record (nodes)
    Point,
    /// Two-point line per record (edges)
    LineString,
}

impl GeometryKind {
    /// Geometry used for an entity class.
    pub fn for_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Node => GeometryKind::Point,
            ItemKind::Edge => GeometryKind::LineString,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::LineString => write!(f, "LineString"),
        }
    }
}

/// Type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// The shape itself
    Geometry(GeometryKind),
    /// A scalar attribute
    Attribute(AttributeType),
}

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    /// Resolved coordinate(s)
    Location,
    /// Scaled item size
    Size,
    /// Item color as hex
    Color,
    /// Pass-through attribute value
    Attribute,
}

/// One field of an output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (the source column title for attributes)
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Value source
    pub role: FieldRole,
    /// Column name in the `.dbf` table; `None` for the geometry
    pub dbf_name: Option<String>,
}

/// Ordered field list shared by every record of an entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    geometry: GeometryKind,
    fields: Vec<Field>,
}

impl Schema {
    /// Build the schema for a geometry kind from the source columns.
    ///
    /// List-typed columns are dropped; every other column keeps its declared type.
    pub fn for_attributes(
        geometry: GeometryKind,
        columns: &[AttributeColumn],
        names: &FieldNames,
    ) -> Self {
        let mut namer = DbfNamer::default();
        let mut fields = Vec::with_capacity(columns.len() + 3);

        fields.push(Field {
            name: names.location.clone(),
            field_type: FieldType::Geometry(geometry),
            role: FieldRole::Location,
            dbf_name: None,
        });

        for column in columns.iter().filter(|c| !c.is_list()) {
            fields.push(Field {
                name: column.title.clone(),
                field_type: FieldType::Attribute(column.attribute_type),
                role: FieldRole::Attribute,
                dbf_name: Some(namer.assign(&column.title)),
            });
        }

        fields.push(Field {
            name: names.size.clone(),
            field_type: FieldType::Attribute(AttributeType::Float),
            role: FieldRole::Size,
            dbf_name: Some(namer.assign(&names.size)),
        });
        fields.push(Field {
            name: names.color.clone(),
            field_type: FieldType::Attribute(AttributeType::String),
            role: FieldRole::Color,
            dbf_name: Some(namer.assign(&names.color)),
        });

        let skipped = columns.iter().filter(|c| c.is_list()).count();
        debug!(
            "Built {geometry} schema: {} fields, {skipped} list columns skipped",
            fields.len()
        );

        Self {
            name: geometry.to_string(),
            geometry,
            fields,
        }
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry kind of the `location` field.
    pub fn geometry(&self) -> GeometryKind {
        self.geometry
    }

    /// All fields in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Stored `.dbf` column name of a field.
    pub fn dbf_name(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(|f| f.dbf_name.as_deref())
    }

    /// Number of fields, geometry included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields. Never true for a built schema.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Hands out unique `.dbf` column names.
#[derive(Debug, Default)]
struct DbfNamer {
    used: HashSet<String>,
}

impl DbfNamer {
    fn assign(&mut self, name: &str) -> String {
        let base = truncate(name, DBF_NAME_LIMIT);
        let base = if base.is_empty() { "field".to_string() } else { base };

        let mut candidate = base.clone();
        let mut counter = 1usize;
        while self.used.contains(&candidate.to_lowercase()) {
            let suffix = format!("_{counter}");
            candidate = format!("{}{suffix}", truncate(&base, DBF_NAME_LIMIT - suffix.len()));
            counter += 1;
        }

        self.used.insert(candidate.to_lowercase());
        candidate
    }
}

fn truncate(name: &str, max_bytes: usize) -> String {
    let mut end = 0;
    for (i, c) in name.char_indices() {
        if i + c.len_utf8() > max_bytes {
            break;
        }
        end = i + c.len_utf8();
    }
    name[..end].to_string()
}
