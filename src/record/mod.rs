//! Typed record values and their raw memory images.
//!
//! A [`Record`] is an ordered list of named fields. Each value is checked
//! against its declared [`CType`] when the field is added and converted to
//! host-order bytes right away, so encoding an image can no longer fail:
//! it only copies the stored bytes to their computed offsets in a zeroed
//! buffer.

use std::ffi::{
    c_int, c_long, c_longlong, c_schar, c_short, c_uchar, c_uint, c_ulong, c_ulonglong, c_ushort,
};
use std::fmt;

use bytemuck::Pod;

use crate::error::EmitError;
use crate::layout::{CType, ImageLayout, Packing, RecordLayout};

/// Constant assigned to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    /// A single `char` byte.
    Char(u8),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// Contents of a `char[N]`; shorter contents are NUL-padded.
    Bytes(Vec<u8>),
    /// Address stored in a pointer field.
    Pointer(usize),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Signed(_) => "signed integer",
            Value::Unsigned(_) => "unsigned integer",
            Value::Float(_) => "floating point",
            Value::Bytes(_) => "byte string",
            Value::Pointer(_) => "pointer",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{:?}", char::from(*c)),
            Value::Signed(v) => write!(f, "{}", v),
            Value::Unsigned(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bytes(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::Pointer(addr) => write!(f, "{:#x}", addr),
        }
    }
}

fn scalar<T: Pod>(value: T) -> Vec<u8> {
    bytemuck::bytes_of(&value).to_vec()
}

fn int<T, V>(value: V) -> Result<Vec<u8>, String>
where
    T: Pod + TryFrom<V>,
    <T as TryFrom<V>>::Error: fmt::Display,
    V: Copy + fmt::Display,
{
    T::try_from(value)
        .map(scalar)
        .map_err(|err| format!("{} is out of range: {}", value, err))
}

/// Host-order bytes of `value` stored as `ctype`.
fn encode_value(ctype: CType, value: &Value) -> Result<Vec<u8>, String> {
    match (ctype, value) {
        (CType::Bool, Value::Bool(b)) => Ok(scalar(u8::from(*b))),
        (CType::Char, Value::Char(c)) => Ok(vec![*c]),
        (CType::SignedChar, Value::Signed(v)) => int::<c_schar, _>(*v),
        (CType::UnsignedChar, Value::Unsigned(v)) => int::<c_uchar, _>(*v),
        (CType::Short, Value::Signed(v)) => int::<c_short, _>(*v),
        (CType::UnsignedShort, Value::Unsigned(v)) => int::<c_ushort, _>(*v),
        (CType::Int, Value::Signed(v)) => int::<c_int, _>(*v),
        (CType::UnsignedInt, Value::Unsigned(v)) => int::<c_uint, _>(*v),
        (CType::Long, Value::Signed(v)) => int::<c_long, _>(*v),
        (CType::UnsignedLong, Value::Unsigned(v)) => int::<c_ulong, _>(*v),
        (CType::LongLong, Value::Signed(v)) => int::<c_longlong, _>(*v),
        (CType::UnsignedLongLong, Value::Unsigned(v)) => int::<c_ulonglong, _>(*v),
        (CType::Size, Value::Unsigned(v)) => int::<usize, _>(*v),
        (CType::Pointer, Value::Pointer(addr)) => Ok(scalar(*addr)),
        (CType::U8, Value::Unsigned(v)) => int::<u8, _>(*v),
        (CType::I8, Value::Signed(v)) => int::<i8, _>(*v),
        (CType::U16, Value::Unsigned(v)) => int::<u16, _>(*v),
        (CType::I16, Value::Signed(v)) => int::<i16, _>(*v),
        (CType::U32, Value::Unsigned(v)) => int::<u32, _>(*v),
        (CType::I32, Value::Signed(v)) => int::<i32, _>(*v),
        (CType::U64, Value::Unsigned(v)) => int::<u64, _>(*v),
        (CType::I64, Value::Signed(v)) => int::<i64, _>(*v),
        // C converts double to float by rounding; keep that behaviour.
        (CType::Float, Value::Float(v)) => Ok(scalar(*v as f32)),
        (CType::Double, Value::Float(v)) => Ok(scalar(*v)),
        (CType::CharArray(capacity), Value::Bytes(contents)) => {
            if contents.len() > capacity {
                return Err(format!(
                    "{} bytes do not fit in char[{}]",
                    contents.len(),
                    capacity
                ));
            }
            let mut bytes = vec![0u8; capacity];
            bytes[..contents.len()].copy_from_slice(contents);
            Ok(bytes)
        }
        (ctype, value) => Err(format!(
            "{} value cannot initialise {}",
            value.kind(),
            ctype
        )),
    }
}

/// One named, typed, initialised field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ctype: CType,
    pub value: Value,
    bytes: Vec<u8>,
}

impl Field {
    pub fn new(name: &str, ctype: CType, value: Value) -> Result<Self, EmitError> {
        let bytes = encode_value(ctype, &value).map_err(|reason| EmitError::field(name, reason))?;
        debug_assert_eq!(bytes.len(), ctype.size());
        Ok(Self {
            name: name.to_string(),
            ctype,
            value,
            bytes,
        })
    }

    /// Host-order bytes of the value, exactly `ctype.size()` long.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Fixed-field aggregate whose memory image is written to a fixture file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; declaration order is kept in the image.
    pub fn field(mut self, name: &str, ctype: CType, value: Value) -> Result<Self, EmitError> {
        if self.fields.iter().any(|field| field.name == name) {
            return Err(EmitError::field(name, "duplicate field name"));
        }
        self.fields.push(Field::new(name, ctype, value)?);
        Ok(self)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn layout(&self, packing: Packing) -> RecordLayout {
        RecordLayout::compute(
            self.fields
                .iter()
                .map(|field| (field.name.as_str(), field.ctype)),
            packing,
        )
    }

    /// Image of a single record; padding bytes are zero.
    pub fn encode(&self, packing: Packing) -> (ImageLayout, Vec<u8>) {
        let layout = self.layout(packing).single();
        let mut image = vec![0u8; layout.size];
        self.write_at(&layout.record, &mut image, 0);
        (layout, image)
    }

    fn write_at(&self, layout: &RecordLayout, image: &mut [u8], base: usize) {
        for (field, placed) in self.fields.iter().zip(&layout.fields) {
            let start = base + placed.offset;
            image[start..start + placed.size].copy_from_slice(field.bytes());
        }
    }
}

/// Two copies of the same record, laid out back to back as struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    record: Record,
}

impl Container {
    pub const RECORDS: usize = 2;

    pub fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn layout(&self, packing: Packing) -> ImageLayout {
        self.record.layout(packing).repeated(Self::RECORDS, packing)
    }

    /// Image of both records including any boundary and trailing padding.
    pub fn encode(&self, packing: Packing) -> (ImageLayout, Vec<u8>) {
        let layout = self.layout(packing);
        let mut image = vec![0u8; layout.size];
        for base in &layout.record_offsets {
            self.record.write_at(&layout.record, &mut image, *base);
        }
        (layout, image)
    }
}
