//! Writing fixture images to disk.
//!
//! The image is written with a single `write` call and the returned byte
//! count is checked against the image length. A short write is reported as
//! an error; the partially written file is left in place and must not be
//! trusted by callers.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::FixtureConfig;
use crate::error::EmitError;
use crate::fixtures::Fixture;

/// Build the fixture for `config` and write its image to `output_path`.
pub fn emit(output_path: &Path, config: &FixtureConfig) -> Result<(), EmitError> {
    let fixture = Fixture::build(config)?;
    emit_fixture(output_path, &fixture)
}

/// Write an already built fixture to `output_path`.
pub fn emit_fixture(output_path: &Path, fixture: &Fixture) -> Result<(), EmitError> {
    write_file(output_path, &fixture.image)?;
    tracing::info!(
        path = %output_path.display(),
        profile = %fixture.config.profile_name(),
        bytes = fixture.len(),
        "fixture written"
    );
    Ok(())
}

/// Create or truncate `path` and write `bytes` in one call.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), EmitError> {
    let mut file = File::create(path).map_err(|err| EmitError::open(path, &err))?;
    let label = path.display().to_string();
    // Dropping the file closes it whether or not the write succeeded.
    write_image(&mut file, &label, bytes)
}

/// Write `image` with a single `write` call and verify the byte count.
pub fn write_image<W: Write>(writer: &mut W, label: &str, image: &[u8]) -> Result<(), EmitError> {
    let written = writer.write(image).map_err(|err| EmitError::IoWrite {
        path: label.to_string(),
        expected: image.len(),
        written: 0,
        reason: Some(err.to_string()),
    })?;

    if written != image.len() {
        return Err(EmitError::IoWrite {
            path: label.to_string(),
            expected: image.len(),
            written,
            reason: None,
        });
    }

    writer.flush().map_err(|err| EmitError::IoWrite {
        path: label.to_string(),
        expected: image.len(),
        written,
        reason: Some(err.to_string()),
    })
}

/// Write every known variant into `dir` as `<profile>.bin`.
///
/// The directory must already exist. Stops at the first failure.
pub fn emit_all(dir: &Path) -> Result<Vec<PathBuf>, EmitError> {
    let metadata = fs::metadata(dir).map_err(|err| EmitError::open(dir, &err))?;
    if !metadata.is_dir() {
        return Err(EmitError::IoOpen {
            path: dir.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut written = Vec::new();
    for config in FixtureConfig::variants() {
        let path = dir.join(format!("{}.bin", config.profile_name()));
        emit(&path, &config)?;
        written.push(path);
    }
    Ok(written)
}
