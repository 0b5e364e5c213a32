//! Integration tests for Shapefile output.
//!
//! Files are written to a scratch directory and read back with the
//! `shapefile` reader.

use shapefile::dbase::{FieldValue, Record as DbfRecord};
use shapefile::{Point, Polyline};
use shpexport::export::{build_records, write_shapefile, GeometryKind, Schema};
use shpexport::{
    AttributeColumn, AttributeRow, AttributeType, Color, Edge, ExportConfig, ExportError,
    FeatureCollection, ItemKind, Node, PreviewModel,
};
use tempfile::TempDir;

fn create_test_preview() -> PreviewModel {
    let mut preview = PreviewModel::new(
        vec![
            AttributeColumn::new("label", AttributeType::String),
            AttributeColumn::new("population", AttributeType::Long),
            AttributeColumn::new("capital", AttributeType::Boolean),
            AttributeColumn::new("tags", AttributeType::ListString),
        ],
        vec![AttributeColumn::new("distance", AttributeType::Double)],
    );
    preview.add_node(
        Node::new(
            "vie",
            16.37,
            48.21,
            AttributeRow::new()
                .with("label", "Vienna")
                .with("population", 1_900_000i64)
                .with("capital", true),
        ),
        10.0,
        Some(Color::rgb(255, 0, 0)),
    );
    preview.add_node(
        Node::new(
            "grz",
            15.44,
            47.07,
            AttributeRow::new()
                .with("label", "Graz")
                .with("population", 290_000i64)
                .with("capital", false),
        ),
        4.0,
        None,
    );
    preview.add_edge(
        Edge::new("a2", "vie", "grz", AttributeRow::new().with("distance", 191.5)),
        2.0,
        Some(Color::rgb(0, 0, 0)),
    );
    preview
}

fn collection(preview: &PreviewModel, kind: ItemKind) -> FeatureCollection {
    let config = ExportConfig::default();
    let schema = Schema::for_attributes(
        GeometryKind::for_kind(kind),
        preview.columns(kind),
        &config.field_names,
    );
    build_records(preview, kind, schema, None, &config).unwrap()
}

#[test]
fn test_write_point_layer() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cities.node.shp");
    let nodes = collection(&create_test_preview(), ItemKind::Node);

    let summary = write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap();

    assert_eq!(summary.records, 2);
    assert_eq!(summary.path, path);
    assert!(path.exists());
    assert!(path.with_extension("shx").exists());
    assert!(path.with_extension("dbf").exists());

    let rows = shapefile::read_as::<_, Point, DbfRecord>(&path).unwrap();
    assert_eq!(rows.len(), 2);

    let (point, record) = &rows[0];
    assert!((point.x - 16.37).abs() < 1e-4);
    assert!((point.y - 48.21).abs() < 1e-4);
    assert_eq!(
        record.get("label"),
        Some(&FieldValue::Character(Some("Vienna".to_string())))
    );
    assert_eq!(
        record.get("population"),
        Some(&FieldValue::Numeric(Some(1_900_000.0)))
    );
    assert_eq!(record.get("capital"), Some(&FieldValue::Logical(Some(true))));
    assert_eq!(record.get("gSize"), Some(&FieldValue::Numeric(Some(0.5))));
    assert_eq!(
        record.get("gColor"),
        Some(&FieldValue::Character(Some("ff0000".to_string())))
    );
    assert!(record.get("tags").is_none());
    assert!(record.get("location").is_none());
}

#[test]
fn test_write_line_layer() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cities.edge.shp");
    let edges = collection(&create_test_preview(), ItemKind::Edge);

    write_shapefile(&path, &edges, &ExportConfig::default()).unwrap();

    let rows = shapefile::read_as::<_, Polyline, DbfRecord>(&path).unwrap();
    assert_eq!(rows.len(), 1);

    let (line, record) = &rows[0];
    let points = &line.parts()[0];
    assert_eq!(points.len(), 2);
    assert!((points[0].x - 16.37).abs() < 1e-4);
    assert!((points[1].y - 47.07).abs() < 1e-4);
    assert_eq!(record.get("distance"), Some(&FieldValue::Numeric(Some(191.5))));
    assert_eq!(
        record.get("gColor"),
        Some(&FieldValue::Character(Some("000000".to_string())))
    );
}

#[test]
fn test_failed_write_leaves_nothing_behind() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing-dir").join("cities.node.shp");
    let nodes = collection(&create_test_preview(), ItemKind::Node);

    let err = write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap_err();

    assert!(matches!(err, ExportError::Io { .. }));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_overwrites_previous_export() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cities.node.shp");
    let preview = create_test_preview();
    let nodes = collection(&preview, ItemKind::Node);

    write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap();
    write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap();

    let rows = shapefile::read_as::<_, Point, DbfRecord>(&path).unwrap();
    assert_eq!(rows.len(), 2);
    // only the three dataset files remain, no staging directories
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 3);
}

#[test]
fn test_mismatched_value_written_as_null() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("odd.node.shp");
    let mut preview = PreviewModel::new(
        vec![AttributeColumn::new("population", AttributeType::Int)],
        vec![],
    );
    preview.add_node(
        Node::new("n", 1.0, 2.0, AttributeRow::new().with("population", "many")),
        1.0,
        None,
    );
    let nodes = collection(&preview, ItemKind::Node);

    write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap();

    let rows = shapefile::read_as::<_, Point, DbfRecord>(&path).unwrap();
    assert_eq!(rows[0].1.get("population"), Some(&FieldValue::Numeric(None)));
}

#[test]
fn test_blocked_table_file_leaves_no_partial_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cities.node.shp");
    std::fs::create_dir(path.with_extension("dbf")).unwrap();
    let nodes = collection(&create_test_preview(), ItemKind::Node);

    let err = write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap_err();

    assert!(matches!(err, ExportError::Io { .. }));
    assert!(!path.exists());
    assert!(!path.with_extension("shx").exists());
    assert!(path.with_extension("dbf").is_dir());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_failed_overwrite_keeps_previous_export() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cities.node.shp");
    let preview = create_test_preview();
    let nodes = collection(&preview, ItemKind::Node);
    write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap();
    let shp_before = std::fs::read(&path).unwrap();

    // swap the table file for a directory the next commit cannot replace
    let dbf = path.with_extension("dbf");
    let dbf_before = std::fs::read(&dbf).unwrap();
    std::fs::remove_file(&dbf).unwrap();
    std::fs::create_dir(&dbf).unwrap();

    let mut grown = create_test_preview();
    grown.add_node(Node::new("lnz", 14.29, 48.31, AttributeRow::new()), 3.0, None);
    let more = collection(&grown, ItemKind::Node);
    assert!(write_shapefile(&path, &more, &ExportConfig::default()).is_err());

    assert_eq!(std::fs::read(&path).unwrap(), shp_before);
    std::fs::remove_dir(&dbf).unwrap();
    std::fs::write(&dbf, dbf_before).unwrap();
    let rows = shapefile::read_as::<_, Point, DbfRecord>(&path).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_multibyte_char_survives() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accents.node.shp");
    let mut preview = PreviewModel::new(
        vec![AttributeColumn::new("initial", AttributeType::Char)],
        vec![],
    );
    preview.add_node(
        Node::new("a", 0.0, 0.0, AttributeRow::new().with("initial", 'é')),
        1.0,
        None,
    );
    preview.add_node(
        Node::new("b", 1.0, 1.0, AttributeRow::new().with("initial", 'z')),
        1.0,
        None,
    );
    let nodes = collection(&preview, ItemKind::Node);

    write_shapefile(&path, &nodes, &ExportConfig::default()).unwrap();

    let rows = shapefile::read_as::<_, Point, DbfRecord>(&path).unwrap();
    assert_eq!(
        rows[0].1.get("initial"),
        Some(&FieldValue::Character(Some("é".to_string())))
    );
    assert_eq!(
        rows[1].1.get("initial"),
        Some(&FieldValue::Character(Some("z".to_string())))
    );
}
