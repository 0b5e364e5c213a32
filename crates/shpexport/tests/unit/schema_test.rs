//! Unit tests for output schema derivation.

use shpexport::export::{FieldRole, FieldType, GeometryKind, Schema};
use shpexport::{AttributeColumn, AttributeType, FieldNames};

fn columns() -> Vec<AttributeColumn> {
    vec![
        AttributeColumn::new("label", AttributeType::String),
        AttributeColumn::new("tags", AttributeType::ListString),
        AttributeColumn::new("population", AttributeType::Long),
        AttributeColumn::new("weights", AttributeType::ListDouble),
        AttributeColumn::new("score", AttributeType::Double),
        AttributeColumn::new("capital", AttributeType::Boolean),
    ]
}

#[test]
fn test_schema_field_order() {
    let schema = Schema::for_attributes(GeometryKind::Point, &columns(), &FieldNames::default());

    assert_eq!(
        schema.field_names(),
        vec!["location", "label", "population", "score", "capital", "gSize", "gColor"]
    );
}

#[test]
fn test_list_columns_are_dropped() {
    let schema = Schema::for_attributes(GeometryKind::Point, &columns(), &FieldNames::default());

    assert!(schema.field("tags").is_none());
    assert!(schema.field("weights").is_none());
}

#[test]
fn test_attribute_types_pass_through() {
    let schema =
        Schema::for_attributes(GeometryKind::LineString, &columns(), &FieldNames::default());

    assert_eq!(
        schema.field("location").unwrap().field_type,
        FieldType::Geometry(GeometryKind::LineString)
    );
    assert_eq!(
        schema.field("population").unwrap().field_type,
        FieldType::Attribute(AttributeType::Long)
    );
    assert_eq!(
        schema.field("capital").unwrap().field_type,
        FieldType::Attribute(AttributeType::Boolean)
    );
    assert_eq!(
        schema.field("gSize").unwrap().field_type,
        FieldType::Attribute(AttributeType::Float)
    );
    assert_eq!(
        schema.field("gColor").unwrap().field_type,
        FieldType::Attribute(AttributeType::String)
    );
}

#[test]
fn test_synthetic_roles() {
    let schema = Schema::for_attributes(GeometryKind::Point, &[], &FieldNames::default());

    let roles: Vec<_> = schema.fields().iter().map(|f| f.role).collect();
    assert_eq!(roles, vec![FieldRole::Location, FieldRole::Size, FieldRole::Color]);
    assert_eq!(schema.len(), 3);
    assert_eq!(schema.name(), "Point");
}

#[test]
fn test_custom_field_names() {
    let names = FieldNames {
        location: "geom".to_string(),
        size: "size".to_string(),
        color: "color".to_string(),
    };
    let schema = Schema::for_attributes(GeometryKind::Point, &[], &names);

    assert_eq!(schema.field_names(), vec!["geom", "size", "color"]);
}

#[test]
fn test_long_names_get_unique_dbf_names() {
    let columns = vec![
        AttributeColumn::new("population", AttributeType::Int),
        AttributeColumn::new("population_density", AttributeType::Double),
    ];
    let schema = Schema::for_attributes(GeometryKind::Point, &columns, &FieldNames::default());

    assert_eq!(schema.dbf_name("population"), Some("population"));
    assert_eq!(schema.dbf_name("population_density"), Some("populati_1"));
    assert_eq!(schema.dbf_name("location"), None);
    assert_eq!(schema.dbf_name("gColor"), Some("gColor"));
}

#[test]
fn test_column_named_like_synthetic_field() {
    let columns = vec![AttributeColumn::new("gSize", AttributeType::Int)];
    let schema = Schema::for_attributes(GeometryKind::Point, &columns, &FieldNames::default());

    let sizes: Vec<_> = schema
        .fields()
        .iter()
        .filter(|f| f.name == "gSize")
        .map(|f| (f.role, f.dbf_name.clone()))
        .collect();
    assert_eq!(
        sizes,
        vec![
            (FieldRole::Attribute, Some("gSize".to_string())),
            (FieldRole::Size, Some("gSize_1".to_string())),
        ]
    );
}
