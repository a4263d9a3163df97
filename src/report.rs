//! JSON layout sidecar for emitted fixtures.
//!
//! The consuming decoder has to reproduce the same offset computation as the
//! emitter. The sidecar records the layout the image was written with, plus
//! the host properties native-mode fixtures depend on.

use std::path::Path;

use serde::Serialize;

use crate::config::{IntWidth, Packing, RecordShape};
use crate::emit::write_file;
use crate::error::EmitError;
use crate::fixtures::Fixture;
use crate::layout::RecordLayout;

/// Host ABI facts that native-mode fixtures depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostAbi {
    pub pointer_width: u32,
    pub endian: &'static str,
}

impl HostAbi {
    pub fn current() -> Self {
        Self {
            pointer_width: usize::BITS,
            endian: if cfg!(target_endian = "big") {
                "big"
            } else {
                "little"
            },
        }
    }
}

/// Serializable description of a written fixture image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport<'a> {
    pub profile: String,
    pub shape: RecordShape,
    pub packing: Packing,
    pub int_width: IntWidth,
    pub host: HostAbi,
    pub record: &'a RecordLayout,
    pub record_offsets: &'a [usize],
    pub records: usize,
    pub image_size: usize,
}

impl<'a> LayoutReport<'a> {
    pub fn new(fixture: &'a Fixture) -> Self {
        Self {
            profile: fixture.config.profile_name(),
            shape: fixture.config.shape,
            packing: fixture.config.packing,
            int_width: fixture.config.int_width,
            host: HostAbi::current(),
            record: &fixture.layout.record,
            record_offsets: &fixture.layout.record_offsets,
            records: fixture.layout.record_count(),
            image_size: fixture.layout.size,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the pretty-printed report to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), EmitError> {
        let json = self.to_json().map_err(|err| EmitError::Report {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        write_file(path, json.as_bytes())
    }
}
