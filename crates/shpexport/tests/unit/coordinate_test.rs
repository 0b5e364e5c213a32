//! Unit tests for node coordinate resolution.

use shpexport::{resolve_coordinate, AttributeRow, Coordinate, ExportError, GeoFields, Node};

fn geo() -> GeoFields {
    GeoFields::new("lat", "lon")
}

#[test]
fn test_layout_position_without_geo_fields() {
    let node = Node::new("n1", 12.5, -3.25, AttributeRow::new());

    let coordinate = resolve_coordinate(&node, None).unwrap();

    assert_eq!(coordinate, Coordinate::new(12.5, -3.25));
}

#[test]
fn test_string_coordinates() {
    let node = Node::new(
        "n1",
        0.0,
        0.0,
        AttributeRow::new().with("lat", "10.5").with("lon", "20.25"),
    );

    let coordinate = resolve_coordinate(&node, Some(&geo())).unwrap();

    assert_eq!(coordinate, Coordinate::new(10.5, 20.25));
}

#[test]
fn test_numeric_coordinates() {
    let node = Node::new(
        "n1",
        0.0,
        0.0,
        AttributeRow::new().with("lat", 48.2).with("lon", 16i64),
    );

    let coordinate = resolve_coordinate(&node, Some(&geo())).unwrap();

    assert_eq!(coordinate, Coordinate::new(48.2, 16.0));
}

#[test]
fn test_whitespace_is_ignored() {
    let node = Node::new(
        "n1",
        0.0,
        0.0,
        AttributeRow::new().with("lat", " 1.5 ").with("lon", "\t-2"),
    );

    let coordinate = resolve_coordinate(&node, Some(&geo())).unwrap();

    assert_eq!(coordinate, Coordinate::new(1.5, -2.0));
}

#[test]
fn test_decimal_comma_is_rejected() {
    let node = Node::new(
        "n1",
        0.0,
        0.0,
        AttributeRow::new().with("lat", "10,5").with("lon", "20.25"),
    );

    let err = resolve_coordinate(&node, Some(&geo())).unwrap_err();

    match err {
        ExportError::CoordinateParse {
            node_id,
            column,
            value,
        } => {
            assert_eq!(node_id, "n1");
            assert_eq!(column, "lat");
            assert_eq!(value, "10,5");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_coordinate_is_an_error() {
    let node = Node::new("n1", 0.0, 0.0, AttributeRow::new().with("lat", "1.0"));

    let err = resolve_coordinate(&node, Some(&geo())).unwrap_err();

    assert!(matches!(
        err,
        ExportError::CoordinateParse { ref column, ref value, .. } if column == "lon" && value == "null"
    ));
}

#[test]
fn test_boolean_coordinate_is_an_error() {
    let node = Node::new(
        "n1",
        0.0,
        0.0,
        AttributeRow::new().with("lat", true).with("lon", 1.0),
    );

    assert!(resolve_coordinate(&node, Some(&geo())).is_err());
}
