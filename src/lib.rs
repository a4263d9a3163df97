// C Struct Fixtures - raw memory images of C records
// Deterministic ground-truth files for binary layout decoders

// Module declarations
pub mod config;
pub mod emit;
pub mod error;
pub mod fixtures;
pub mod layout;
pub mod record;
pub mod report;

// Re-exports for convenience
pub use config::{FixtureConfig, IntWidth, Packing, RecordShape};
pub use emit::{emit, emit_all, emit_fixture};
pub use error::{EmitError, ErrorCode};
pub use fixtures::Fixture;
pub use report::LayoutReport;
