//! Geographic placement of nodes.
//!
//! A node is placed either from two user-designated attribute columns or,
//! when none are designated, from its layout position in the preview.

use crate::error::{ExportError, Result};
use crate::model::{AttributeColumn, AttributeType, AttributeValue, Node};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// A resolved 2-D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Coordinate {
    /// Create a coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The pair of node columns holding latitude and longitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoFields {
    /// Column title holding the latitude
    pub latitude: String,
    /// Column title holding the longitude
    pub longitude: String,
}

impl GeoFields {
    /// Designate a latitude and a longitude column.
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

/// Resolve the coordinate of a node.
///
/// With `geo_fields` set, the latitude value becomes `x` and the longitude
/// value becomes `y`. Without, the layout position is used.
///
/// # Errors
///
/// Returns [`ExportError::CoordinateParse`] if a designated value is missing,
/// not numeric, or not finite.
pub fn resolve_coordinate(node: &Node, geo_fields: Option<&GeoFields>) -> Result<Coordinate> {
    let coordinate = match geo_fields {
        Some(fields) => Coordinate::new(
            coordinate_value(node, &fields.latitude)?,
            coordinate_value(node, &fields.longitude)?,
        ),
        None => Coordinate::new(f64::from(node.x), f64::from(node.y)),
    };
    trace!("Node {} at ({}, {})", node.id, coordinate.x, coordinate.y);
    Ok(coordinate)
}

fn coordinate_value(node: &Node, column: &str) -> Result<f64> {
    let parse_error = |value: String| ExportError::CoordinateParse {
        node_id: node.id.clone(),
        column: column.to_string(),
        value,
    };

    let value = match node.get_attribute(column) {
        Some(AttributeValue::Int(i)) => *i as f64,
        Some(AttributeValue::Float(f)) => *f,
        Some(AttributeValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| parse_error(s.clone()))?,
        Some(other) => return Err(parse_error(other.to_string())),
        None => return Err(parse_error(AttributeValue::Null.to_string())),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(parse_error(value.to_string()))
    }
}

const LATITUDE_NAMES: &[&str] = &["lat", "latitude", "y_lat", "geo_lat"];
const LATITUDE_SUFFIXES: &[&str] = &["_lat", "latitude"];
const LONGITUDE_NAMES: &[&str] = &["lon", "lng", "long", "longitude", "x_lon", "geo_lon"];
const LONGITUDE_SUFFIXES: &[&str] = &["_lon", "_lng", "longitude"];

/// Guess which node columns hold latitude and longitude.
///
/// Only non-list columns of numeric or string type are considered. The first
/// match in column order wins; a pair is returned only when both are found.
pub fn find_geo_fields(columns: &[AttributeColumn]) -> Option<GeoFields> {
    let candidates = || columns.iter().filter(|c| can_hold_coordinate(c.attribute_type));

    let latitude = candidates().find(|c| name_matches(&c.title, LATITUDE_NAMES, LATITUDE_SUFFIXES));
    let longitude =
        candidates().find(|c| name_matches(&c.title, LONGITUDE_NAMES, LONGITUDE_SUFFIXES));

    match (latitude, longitude) {
        (Some(lat), Some(lon)) => {
            debug!("Detected geo fields: lat={}, lon={}", lat.title, lon.title);
            Some(GeoFields::new(lat.title.clone(), lon.title.clone()))
        }
        _ => {
            debug!("No geo fields detected among {} columns", columns.len());
            None
        }
    }
}

fn can_hold_coordinate(attribute_type: AttributeType) -> bool {
    attribute_type.is_integral()
        || attribute_type.is_floating()
        || attribute_type == AttributeType::String
}

fn name_matches(title: &str, names: &[&str], suffixes: &[&str]) -> bool {
    let title = title.trim().to_lowercase();
    names.contains(&title.as_str()) || suffixes.iter().any(|s| title.ends_with(s))
}
