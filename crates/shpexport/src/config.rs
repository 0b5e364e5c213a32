//! Export configuration.

use serde::{Deserialize, Serialize};

/// Default name of the geometry field.
pub const LOCATION_FIELD: &str = "location";
/// Default name of the scaled size field.
pub const SIZE_FIELD: &str = "gSize";
/// Default name of the hex color field.
pub const COLOR_FIELD: &str = "gColor";

/// Names of the three synthetic fields added to every schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Geometry field
    pub location: String,
    /// Scaled item size
    pub size: String,
    /// Item color as hex
    pub color: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            location: LOCATION_FIELD.to_string(),
            size: SIZE_FIELD.to_string(),
            color: COLOR_FIELD.to_string(),
        }
    }
}

/// What the exporter does when writing one of the output files fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WritePolicy {
    /// Log the failure, record it in the report, and keep going.
    /// The run still returns `Ok`.
    #[default]
    Report,
    /// Attempt both files, then return the first failure as an error
    Strict,
}

/// Configuration for an export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Synthetic field names
    pub field_names: FieldNames,

    /// Factor applied to the host item size before it is written.
    /// 0.05 matches QGIS's default symbol scale.
    pub size_scale: f32,

    /// Suffix appended to the base name for the point layer
    pub node_suffix: String,

    /// Suffix appended to the base name for the line layer
    pub edge_suffix: String,

    /// Upper bound for dBASE character field widths
    pub max_character_length: u8,

    /// Handling of per-file write failures
    pub write_policy: WritePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            field_names: FieldNames::default(),
            size_scale: 0.05,
            node_suffix: ".node.shp".to_string(),
            edge_suffix: ".edge.shp".to_string(),
            max_character_length: 254,
            write_policy: WritePolicy::Report,
        }
    }
}

impl ExportConfig {
    /// Config that turns any write failure into an error for the caller.
    pub fn strict() -> Self {
        Self {
            write_policy: WritePolicy::Strict,
            ..Default::default()
        }
    }

    /// Set the size scale factor
    pub fn with_size_scale(mut self, scale: f32) -> Self {
        self.size_scale = scale;
        self
    }

    /// Set the synthetic field names
    pub fn with_field_names(mut self, field_names: FieldNames) -> Self {
        self.field_names = field_names;
        self
    }

    /// Set the write failure policy
    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Set the maximum dBASE character field width
    pub fn with_max_character_length(mut self, length: u8) -> Self {
        self.max_character_length = length.max(1);
        self
    }
}
