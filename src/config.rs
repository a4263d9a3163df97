//! Fixture configuration
//!
//! A fixture is selected by two independent layout axes (packing and integer
//! width) plus the record shape. Defaults match the plain build of the C
//! generator: fixed-width ints, which imply `#pragma pack(1)`, in a container
//! of two records.
//! Configuration can be loaded from a JSON file and then overridden field by
//! field from the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::EmitError;
pub use crate::layout::{IntWidth, Packing};

/// Which record is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordShape {
    /// Full field set, two copies wrapped in a container.
    #[default]
    Container,
    /// `{char[13], uint32, double}` written once.
    Simple,
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordShape::Container => f.write_str("container"),
            RecordShape::Simple => f.write_str("simple"),
        }
    }
}

/// Complete fixture configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    pub packing: Packing,
    pub int_width: IntWidth,
    pub shape: RecordShape,
}

impl FixtureConfig {
    pub fn new(shape: RecordShape, packing: Packing, int_width: IntWidth) -> Self {
        Self {
            packing,
            int_width,
            shape,
        }
    }

    /// Every configuration the C generator was built in.
    pub fn variants() -> Vec<Self> {
        vec![
            Self::new(RecordShape::Container, Packing::Native, IntWidth::Native),
            Self::new(RecordShape::Container, Packing::Packed, IntWidth::Native),
            Self::new(RecordShape::Container, Packing::Native, IntWidth::Fixed),
            Self::new(RecordShape::Container, Packing::Packed, IntWidth::Fixed),
            Self::new(RecordShape::Simple, Packing::Native, IntWidth::Fixed),
            Self::new(RecordShape::Simple, Packing::Packed, IntWidth::Fixed),
        ]
    }

    /// Stable identifier such as `container-packed-fixed`.
    pub fn profile_name(&self) -> String {
        match self.shape {
            RecordShape::Container => {
                format!("{}-{}-{}", self.shape, self.packing, self.int_width)
            }
            // The simple record always uses a fixed-width integer.
            RecordShape::Simple => format!("{}-{}", self.shape, self.packing),
        }
    }

    /// Parse a configuration from JSON; missing keys take their defaults.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Load configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// * `Ok(FixtureConfig)` - Loaded configuration
    /// * `Err(EmitError::Config)` - If the file can't be read or parsed. A
    ///   fixture must never silently fall back to a different layout.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EmitError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| EmitError::Config {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config = Self::from_json(&contents).map_err(|err| EmitError::Config {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        log::info!("[Config] Loaded configuration from {:?}", path);
        Ok(config)
    }
}
