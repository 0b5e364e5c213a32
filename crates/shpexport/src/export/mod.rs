//! Graph to Shapefile transformation.
//!
//! - **schema**: output field list per entity class
//! - **record**: one record per visual item
//! - **writer**: transactional Shapefile output

pub mod record;
pub mod schema;
pub mod writer;

pub use record::{build_records, FeatureCollection, Geometry, Record, RecordValue};
pub use schema::{Field, FieldRole, FieldType, GeometryKind, Schema, DBF_NAME_LIMIT};
pub use writer::{write_shapefile, Transaction, WriteSummary, SHAPEFILE_EXTENSIONS};
