//! Fixture records and their constant values.
//!
//! Each configuration maps to one record definition filled with fixed
//! constants. The common fields are shared by both integer-width families;
//! the integer fields exercise sign handling (native widths) or the extremes
//! of every fixed width.

use crate::config::{FixtureConfig, IntWidth, RecordShape};
use crate::error::EmitError;
use crate::layout::{CType, ImageLayout, RecordLayout};
use crate::record::{Container, Record, Value};

/// Contents of the 10-byte character array in the container records.
pub const CHAR_ARRAY_TEXT: &[u8] = b"123456789";

/// Contents of the 13-byte string in the simple record.
pub const SIMPLE_TEXT: &[u8] = b"Hello!";

/// Fields present in every container record, independent of integer width.
fn common_fields() -> Result<Record, EmitError> {
    Record::new()
        .field("test_bool", CType::Bool, Value::Bool(true))?
        .field("test_float", CType::Float, Value::Float(1.5))?
        .field("test_double", CType::Double, Value::Float(2.5))?
        .field("test_char", CType::Char, Value::Char(b'!'))?
        .field(
            "test_char_array",
            CType::CharArray(10),
            Value::Bytes(CHAR_ARRAY_TEXT.to_vec()),
        )
}

/// Container record with host C integer types.
pub fn native_ints_record() -> Result<Record, EmitError> {
    common_fields()?
        .field("test_signed_char", CType::SignedChar, Value::Signed(-10))?
        .field("test_unsigned_char", CType::UnsignedChar, Value::Unsigned(10))?
        .field("test_signed_short", CType::Short, Value::Signed(-500))?
        .field("test_unsigned_short", CType::UnsignedShort, Value::Unsigned(500))?
        .field("test_signed_int", CType::Int, Value::Signed(-5000))?
        .field("test_unsigned_int", CType::UnsignedInt, Value::Unsigned(5000))?
        .field("test_signed_long", CType::Long, Value::Signed(-6000))?
        .field("test_unsigned_long", CType::UnsignedLong, Value::Unsigned(6000))?
        .field("test_signed_long_long", CType::LongLong, Value::Signed(-7000))?
        .field(
            "test_unsigned_long_long",
            CType::UnsignedLongLong,
            Value::Unsigned(7000),
        )?
        .field("test_size", CType::Size, Value::Unsigned(8000))?
        .field("test_pointer", CType::Pointer, Value::Pointer(0))
}

/// Container record with `<stdint.h>` types at their extremes.
pub fn fixed_ints_record() -> Result<Record, EmitError> {
    common_fields()?
        .field("test_uint8", CType::U8, Value::Unsigned(u8::MAX.into()))?
        .field("test_int8", CType::I8, Value::Signed(i8::MIN.into()))?
        .field("test_uint16", CType::U16, Value::Unsigned(u16::MAX.into()))?
        .field("test_int16", CType::I16, Value::Signed(i16::MIN.into()))?
        .field("test_uint32", CType::U32, Value::Unsigned(u32::MAX.into()))?
        .field("test_int32", CType::I32, Value::Signed(i32::MIN.into()))?
        .field("test_uint64", CType::U64, Value::Unsigned(u64::MAX))?
        .field("test_int64", CType::I64, Value::Signed(i64::MIN))
}

/// The minimal `{char[13], uint32, double}` record.
pub fn simple_record() -> Result<Record, EmitError> {
    Record::new()
        .field(
            "str_test",
            CType::CharArray(13),
            Value::Bytes(SIMPLE_TEXT.to_vec()),
        )?
        .field("u32_test", CType::U32, Value::Unsigned(5))?
        .field("double_test", CType::Double, Value::Float(-0.5))
}

fn log_fields(record: &Record, layout: &RecordLayout) {
    for (field, placed) in record.fields().iter().zip(&layout.fields) {
        log::debug!(
            "[Fixture]   {:>3} {} {} = {}{}",
            placed.offset,
            field.ctype,
            field.name,
            field.value,
            if field.ctype.is_host_sized() {
                " (host-sized)"
            } else {
                ""
            }
        );
    }
}

/// A constructed fixture: its configuration, layout and raw image.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub config: FixtureConfig,
    pub layout: ImageLayout,
    pub image: Vec<u8>,
}

impl Fixture {
    /// Build the record(s) for `config` and encode the memory image.
    pub fn build(config: &FixtureConfig) -> Result<Self, EmitError> {
        let (layout, image) = match config.shape {
            RecordShape::Container => {
                let container = Container::new(match config.int_width {
                    IntWidth::Native => native_ints_record()?,
                    IntWidth::Fixed => fixed_ints_record()?,
                });
                let (layout, image) = container.encode(config.packing);
                log_fields(container.record(), &layout.record);
                (layout, image)
            }
            RecordShape::Simple => {
                let record = simple_record()?;
                let (layout, image) = record.encode(config.packing);
                log_fields(&record, &layout.record);
                (layout, image)
            }
        };

        log::debug!(
            "[Fixture] {}: {} record(s) of {} bytes (align {}), image {} bytes",
            config.profile_name(),
            layout.record_count(),
            layout.record.size,
            layout.record.align,
            layout.size
        );

        Ok(Self {
            config: *config,
            layout,
            image,
        })
    }

    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}
