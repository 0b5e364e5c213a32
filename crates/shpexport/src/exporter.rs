//! Export orchestration: ask for options, build both layers, write both files.

use crate::config::{ExportConfig, WritePolicy};
use crate::error::{ExportError, Result};
use crate::export::{
    build_records, write_shapefile, FeatureCollection, GeometryKind, Schema, WriteSummary,
};
use crate::geo::{find_geo_fields, GeoFields};
use crate::model::{AttributeColumn, ItemKind, PreviewModel};
use log::{debug, error, info};
use std::path::{Path, PathBuf};

/// Title shown on the options dialog.
pub const DIALOG_TITLE: &str = "SHP Export Options";

/// What the options dialog is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogRequest {
    /// Window title
    pub title: String,
    /// All node columns, to pick coordinate columns from
    pub columns: Vec<AttributeColumn>,
    /// Columns detected as latitude/longitude, if any
    pub suggested_geo_fields: Option<GeoFields>,
}

/// Options confirmed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Chosen output file; its stem becomes the base name of both layers
    pub file: PathBuf,
    /// Coordinate columns, or `None` to use layout positions
    pub geo_fields: Option<GeoFields>,
}

impl ExportOptions {
    /// Options that place nodes at their layout positions.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            geo_fields: None,
        }
    }

    /// Place nodes from the given coordinate columns.
    pub fn with_geo_fields(mut self, geo_fields: GeoFields) -> Self {
        self.geo_fields = Some(geo_fields);
        self
    }
}

/// Modal options dialog supplied by the host.
pub trait OptionsDialog {
    /// Show the dialog. `None` means the user cancelled.
    fn show(&mut self, request: &DialogRequest) -> Option<ExportOptions>;
}

/// A dialog that answers with fixed options, for scripted hosts.
#[derive(Debug, Clone, Default)]
pub struct PresetOptions(pub Option<ExportOptions>);

impl OptionsDialog for PresetOptions {
    fn show(&mut self, _request: &DialogRequest) -> Option<ExportOptions> {
        self.0.clone()
    }
}

/// Phase of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportState {
    /// Not started
    Idle,
    /// Options dialog is open
    AwaitingUserOptions,
    /// Building schemas and records
    Building,
    /// Writing output files
    Writing,
    /// Finished, whether or not files were written
    Done,
}

/// Outcome of writing one output file.
#[derive(Debug)]
pub enum FileOutcome {
    /// File written and committed
    Written(WriteSummary),
    /// Write failed and was rolled back
    Failed {
        /// Intended output path
        path: PathBuf,
        /// Why it failed
        error: ExportError,
    },
}

impl FileOutcome {
    /// Whether the file was written.
    pub fn is_written(&self) -> bool {
        matches!(self, FileOutcome::Written(_))
    }
}

/// Result of an export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Point layer outcome; `None` when cancelled
    pub node_file: Option<FileOutcome>,
    /// Line layer outcome; `None` when cancelled
    pub edge_file: Option<FileOutcome>,
}

impl ExportReport {
    /// Report for a run the user cancelled.
    pub fn cancelled() -> Self {
        Self::default()
    }

    /// Whether the user cancelled before anything was written.
    pub fn is_cancelled(&self) -> bool {
        self.node_file.is_none() && self.edge_file.is_none()
    }

    /// Whether both files were written.
    pub fn is_complete(&self) -> bool {
        matches!(
            (&self.node_file, &self.edge_file),
            (Some(FileOutcome::Written(_)), Some(FileOutcome::Written(_)))
        )
    }

    /// Failed file writes.
    pub fn failures(&self) -> Vec<(&Path, &ExportError)> {
        [&self.node_file, &self.edge_file]
            .into_iter()
            .flatten()
            .filter_map(|outcome| match outcome {
                FileOutcome::Failed { path, error } => Some((path.as_path(), error)),
                FileOutcome::Written(_) => None,
            })
            .collect()
    }
}

/// Paths of the two output layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Point layer
    pub nodes: PathBuf,
    /// Line layer
    pub edges: PathBuf,
}

/// Derive both layer paths from the chosen file.
///
/// `out/graph.shp` becomes `out/graph.node.shp` and `out/graph.edge.shp`.
///
/// # Errors
///
/// Returns [`ExportError::InvalidPath`] if `file` has no file name.
pub fn output_paths(file: &Path, config: &ExportConfig) -> Result<OutputPaths> {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExportError::InvalidPath {
            path: file.to_path_buf(),
        })?;
    let parent = file.parent().unwrap_or_else(|| Path::new(""));

    Ok(OutputPaths {
        nodes: parent.join(format!("{stem}{}", config.node_suffix)),
        edges: parent.join(format!("{stem}{}", config.edge_suffix)),
    })
}

/// Exports a previewed graph to a point layer and a line layer.
#[derive(Debug)]
pub struct ShpExporter {
    config: ExportConfig,
    state: ExportState,
}

impl Default for ShpExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl ShpExporter {
    /// Create an exporter.
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            state: ExportState::Idle,
        }
    }

    /// Current phase.
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Run an export, asking `dialog` for the output file and coordinate columns.
    ///
    /// Cancelling the dialog returns a cancelled report and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CoordinateParse`] if a node cannot be placed,
    /// which aborts the run before any file is written. Write failures are
    /// reported per file; see [`WritePolicy`].
    pub fn execute(
        &mut self,
        model: &PreviewModel,
        dialog: &mut dyn OptionsDialog,
    ) -> Result<ExportReport> {
        self.state = ExportState::AwaitingUserOptions;
        let request = DialogRequest {
            title: DIALOG_TITLE.to_string(),
            columns: model.node_columns.clone(),
            suggested_geo_fields: find_geo_fields(&model.node_columns),
        };

        let Some(options) = dialog.show(&request) else {
            info!("Shapefile export cancelled");
            self.state = ExportState::Done;
            return Ok(ExportReport::cancelled());
        };

        self.export(model, &options)
    }

    /// Run an export with options already chosen.
    ///
    /// # Errors
    ///
    /// See [`ShpExporter::execute`].
    pub fn export(
        &mut self,
        model: &PreviewModel,
        options: &ExportOptions,
    ) -> Result<ExportReport> {
        let result = self.run(model, options);
        self.state = ExportState::Done;
        result
    }

    fn run(&mut self, model: &PreviewModel, options: &ExportOptions) -> Result<ExportReport> {
        let paths = output_paths(&options.file, &self.config)?;
        let geo_fields = options.geo_fields.as_ref();
        info!(
            "Exporting {} nodes and {} edges to {}",
            model.node_count(),
            model.edge_count(),
            options.file.display()
        );
        match geo_fields {
            Some(g) => debug!("Placing nodes from columns {} / {}", g.latitude, g.longitude),
            None => debug!("Placing nodes at layout positions"),
        }

        self.state = ExportState::Building;
        let nodes = self.build(model, ItemKind::Node, geo_fields)?;
        let edges = self.build(model, ItemKind::Edge, geo_fields)?;

        self.state = ExportState::Writing;
        let node_file = self.write(&paths.nodes, &nodes);
        let edge_file = self.write(&paths.edges, &edges);
        let report = ExportReport {
            node_file: Some(node_file),
            edge_file: Some(edge_file),
        };

        if self.config.write_policy == WritePolicy::Strict {
            return strict(report);
        }
        Ok(report)
    }

    fn build(
        &self,
        model: &PreviewModel,
        kind: ItemKind,
        geo_fields: Option<&GeoFields>,
    ) -> Result<FeatureCollection> {
        let schema = Schema::for_attributes(
            GeometryKind::for_kind(kind),
            model.columns(kind),
            &self.config.field_names,
        );
        build_records(model, kind, schema, geo_fields, &self.config)
    }

    fn write(&self, path: &Path, collection: &FeatureCollection) -> FileOutcome {
        match write_shapefile(path, collection, &self.config) {
            Ok(summary) => FileOutcome::Written(summary),
            Err(error) => {
                error!("Shapefile export to {} failed: {error}", path.display());
                FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error,
                }
            }
        }
    }
}

fn strict(report: ExportReport) -> Result<ExportReport> {
    let ExportReport {
        node_file,
        edge_file,
    } = report;
    match (node_file, edge_file) {
        (Some(FileOutcome::Failed { error, .. }), _)
        | (_, Some(FileOutcome::Failed { error, .. })) => Err(error),
        (node_file, edge_file) => Ok(ExportReport {
            node_file,
            edge_file,
        }),
    }
}
