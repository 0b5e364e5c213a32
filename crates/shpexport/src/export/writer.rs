//! Shapefile output.
//!
//! Records are staged in a temporary directory next to the destination and
//! moved into place only when the whole collection has been written.

use super::record::{FeatureCollection, Geometry, RecordValue};
use super::schema::{FieldType, GeometryKind, Schema};
use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::model::{AttributeType, AttributeValue};
use log::{debug, error, info, warn};
use shapefile::dbase::{self, FieldName, FieldValue, TableWriterBuilder};
use shapefile::record::EsriShape;
use shapefile::{Point, Polyline, Writer};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Files making up one shapefile dataset.
pub const SHAPEFILE_EXTENSIONS: &[&str] = &["shp", "shx", "dbf"];

const INTEGER_WIDTH: u8 = 20;
const DECIMAL_WIDTH: u8 = 24;
const DECIMAL_PLACES: u8 = 10;
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Result of a successful file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Path of the `.shp` file
    pub path: PathBuf,
    /// Number of records written
    pub records: usize,
}

/// A write transaction for one shapefile dataset.
///
/// Dropping an uncommitted transaction discards everything staged so far.
#[derive(Debug)]
pub struct Transaction {
    staging: TempDir,
    destination: PathBuf,
    committed: bool,
}

impl Transaction {
    /// Start a transaction that will produce `destination` on commit.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidPath`] if `destination` has no file name and
    /// [`ExportError::Io`] if the staging directory cannot be created.
    pub fn begin(destination: &Path) -> Result<Self> {
        if destination.file_name().is_none() {
            return Err(ExportError::InvalidPath {
                path: destination.to_path_buf(),
            });
        }
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".shpexport-")
            .tempdir_in(&parent)
            .map_err(|e| ExportError::io(&parent, e))?;

        debug!("Began transaction for {}", destination.display());
        Ok(Self {
            staging,
            destination: destination.to_path_buf(),
            committed: false,
        })
    }

    /// Where the `.shp` file is written before commit.
    pub fn staged_path(&self) -> PathBuf {
        // begin() rejected paths without a file name
        let name = self.destination.file_name().unwrap_or_default();
        self.staging.path().join(name)
    }

    /// Final location of the `.shp` file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Move every staged file into place.
    ///
    /// Files already at the destination are kept aside until every staged
    /// file has been moved. If any move fails, the moved files are taken back
    /// and the previous files restored.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if a staged file cannot be moved.
    pub fn commit(mut self) -> Result<()> {
        let backups = self.staging.path().join("previous");
        std::fs::create_dir(&backups).map_err(|e| ExportError::io(&backups, e))?;

        let mut moved = Vec::new();
        let mut replaced = Vec::new();
        if let Err(e) = self.swap_in(&backups, &mut moved, &mut replaced) {
            self.undo(&moved, &replaced);
            return Err(e);
        }

        self.committed = true;
        debug!("Committed {}", self.destination.display());
        Ok(())
    }

    fn swap_in(
        &self,
        backups: &Path,
        moved: &mut Vec<(PathBuf, PathBuf)>,
        replaced: &mut Vec<(PathBuf, PathBuf)>,
    ) -> Result<()> {
        let staged = self.staged_path();
        for ext in SHAPEFILE_EXTENSIONS {
            let from = staged.with_extension(ext);
            if !from.exists() {
                continue;
            }
            let to = self.destination.with_extension(ext);
            if to.is_file() {
                let keep = backups.join(format!("previous.{ext}"));
                std::fs::rename(&to, &keep).map_err(|e| ExportError::io(&to, e))?;
                replaced.push((keep, to.clone()));
            }
            std::fs::rename(&from, &to).map_err(|e| ExportError::io(&to, e))?;
            moved.push((to, from));
        }
        Ok(())
    }

    fn undo(&self, moved: &[(PathBuf, PathBuf)], replaced: &[(PathBuf, PathBuf)]) {
        for (to, from) in moved.iter().rev() {
            if let Err(e) = std::fs::rename(to, from) {
                error!("Could not take back {}: {e}", to.display());
            }
        }
        for (keep, to) in replaced.iter().rev() {
            if let Err(e) = std::fs::rename(keep, to) {
                error!("Could not restore {}: {e}", to.display());
            }
        }
    }

    /// Discard everything staged.
    pub fn rollback(self) {
        drop(self);
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            warn!("Rolled back write of {}", self.destination.display());
        }
    }
}

/// Write a feature collection to a shapefile at `path`.
///
/// # Errors
///
/// Returns an error if staging, encoding, or committing fails. Nothing is left
/// at `path` in that case.
pub fn write_shapefile(
    path: &Path,
    collection: &FeatureCollection,
    config: &ExportConfig,
) -> Result<WriteSummary> {
    let transaction = Transaction::begin(path)?;

    match write_staged(&transaction.staged_path(), collection, config) {
        Ok(records) => {
            transaction.commit()?;
            info!("Wrote {records} records to {}", path.display());
            Ok(WriteSummary {
                path: path.to_path_buf(),
                records,
            })
        }
        Err(e) => {
            error!("Failed to write {}: {e}", path.display());
            transaction.rollback();
            Err(e)
        }
    }
}

fn write_staged(
    path: &Path,
    collection: &FeatureCollection,
    config: &ExportConfig,
) -> Result<usize> {
    let schema = &collection.schema;
    if collection.is_empty() {
        warn!("No {} records for {}", schema.name(), path.display());
    }

    let table = table_builder(collection, config)?;
    match schema.geometry() {
        GeometryKind::Point => {
            let mut rows = Vec::with_capacity(collection.len());
            for record in &collection.records {
                let shape = to_point(record.geometry())?;
                rows.push((shape, dbf_record(schema, &record.values, config)));
            }
            write_rows(path, table, &rows)
        }
        GeometryKind::LineString => {
            let mut rows = Vec::with_capacity(collection.len());
            for record in &collection.records {
                let shape = to_polyline(record.geometry())?;
                rows.push((shape, dbf_record(schema, &record.values, config)));
            }
            write_rows(path, table, &rows)
        }
    }
}

fn write_rows<S: EsriShape>(
    path: &Path,
    table: TableWriterBuilder,
    rows: &[(S, dbase::Record)],
) -> Result<usize> {
    let mut writer = Writer::from_path(path, table).map_err(|e| {
        ExportError::shapefile(format!("Failed to create {}", path.display()), Some(e))
    })?;
    for (shape, record) in rows {
        writer
            .write_shape_and_record(shape, record)
            .map_err(|e| ExportError::shapefile("Failed to write record", Some(e)))?;
    }
    drop(writer);
    Ok(rows.len())
}

fn table_builder(
    collection: &FeatureCollection,
    config: &ExportConfig,
) -> Result<TableWriterBuilder> {
    let mut builder = TableWriterBuilder::new();

    for (index, field) in collection.schema.fields().iter().enumerate() {
        let (FieldType::Attribute(attribute_type), Some(dbf_name)) =
            (field.field_type, field.dbf_name.as_deref())
        else {
            continue;
        };
        let name = FieldName::try_from(dbf_name).map_err(|e| ExportError::InvalidRecord {
            message: format!("invalid dBASE field name {dbf_name:?}: {e:?}"),
        })?;

        builder = match attribute_type {
            AttributeType::String => {
                let width = widest_text(collection, index)
                    .clamp(1, config.max_character_length as usize);
                builder.add_character_field(name, width as u8)
            }
            AttributeType::Char => {
                builder.add_character_field(name, widest_text(collection, index).clamp(1, 4) as u8)
            }
            AttributeType::Boolean => builder.add_logical_field(name),
            t if t.is_integral() => builder.add_numeric_field(name, INTEGER_WIDTH, 0),
            _ => builder.add_numeric_field(name, DECIMAL_WIDTH, DECIMAL_PLACES),
        };
    }

    Ok(builder)
}

fn widest_text(collection: &FeatureCollection, index: usize) -> usize {
    collection
        .records
        .iter()
        .filter_map(|r| match r.values.get(index) {
            Some(RecordValue::Attribute(AttributeValue::String(s))) => Some(s.len()),
            Some(RecordValue::Attribute(AttributeValue::Char(c))) => Some(c.len_utf8()),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

fn dbf_record(schema: &Schema, values: &[RecordValue], config: &ExportConfig) -> dbase::Record {
    let mut record = dbase::Record::default();
    let null = AttributeValue::Null;

    for (field, value) in schema.fields().iter().zip(values) {
        let (FieldType::Attribute(attribute_type), Some(dbf_name), RecordValue::Attribute(value)) =
            (field.field_type, field.dbf_name.as_deref(), value)
        else {
            continue;
        };

        let value = if value.fits(attribute_type) {
            value
        } else {
            warn!(
                "Field '{}' is declared {attribute_type} but holds a {} value; writing null",
                field.name,
                value.kind()
            );
            &null
        };
        record.insert(
            dbf_name.to_string(),
            dbf_value(attribute_type, value, config.max_character_length as usize),
        );
    }

    record
}

fn dbf_value(attribute_type: AttributeType, value: &AttributeValue, max_len: usize) -> FieldValue {
    match (attribute_type, value) {
        (AttributeType::String, AttributeValue::String(s)) => {
            FieldValue::Character(Some(truncate_bytes(s, max_len)))
        }
        (AttributeType::Char, AttributeValue::Char(c)) => FieldValue::Character(Some(c.to_string())),
        (AttributeType::Boolean, AttributeValue::Bool(b)) => FieldValue::Logical(Some(*b)),
        (_, AttributeValue::Int(i)) => {
            if exceeds_f64_precision(*i) {
                warn!("Integer {i} is wider than a dBASE numeric holds exactly; it will be rounded");
            }
            FieldValue::Numeric(Some(*i as f64))
        }
        (_, AttributeValue::Float(f)) => FieldValue::Numeric(Some(*f)),
        (t, _) if t.is_textual() => FieldValue::Character(None),
        (AttributeType::Boolean, _) => FieldValue::Logical(None),
        _ => FieldValue::Numeric(None),
    }
}

/// dBASE numerics travel as `f64`, exact only up to 2^53.
fn exceeds_f64_precision(value: i64) -> bool {
    value.unsigned_abs() > MAX_EXACT_INTEGER
}

fn truncate_bytes(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

fn to_point(geometry: Option<&Geometry>) -> Result<Point> {
    match geometry {
        Some(Geometry::Point(c)) => Ok(Point::new(c.x, c.y)),
        other => Err(ExportError::InvalidRecord {
            message: format!("expected a point geometry, got {other:?}"),
        }),
    }
}

fn to_polyline(geometry: Option<&Geometry>) -> Result<Polyline> {
    match geometry {
        Some(Geometry::LineString(coords)) if coords.len() >= 2 => Ok(Polyline::new(
            coords.iter().map(|c| Point::new(c.x, c.y)).collect(),
        )),
        other => Err(ExportError::InvalidRecord {
            message: format!("expected a line geometry with two or more points, got {other:?}"),
        }),
    }
}
