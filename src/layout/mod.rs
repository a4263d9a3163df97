//! C struct layout rules for fixture records.
//!
//! Sizes and alignments of the host-dependent C types come from the Rust
//! compiler's view of the host C ABI (`core::ffi::c_long` and friends), so a
//! layout computed here matches what the platform C compiler produces for the
//! same declaration. Offsets are computed with the standard C algorithm:
//! every member is placed at the next multiple of
//! `min(natural_align, max_align)` and the aggregate size is rounded up to
//! the largest effective member alignment.

use std::ffi::{
    c_char, c_double, c_float, c_int, c_long, c_longlong, c_schar, c_short, c_uchar, c_uint,
    c_ulong, c_ulonglong, c_ushort, c_void,
};
use std::fmt;
use std::mem::{align_of, size_of};

use serde::{Deserialize, Serialize, Serializer};

/// Field placement rule for an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Packing {
    /// Compiler default alignment and padding.
    Native,
    /// `#pragma pack(1)`: no padding anywhere, 1-byte alignment.
    #[default]
    Packed,
}

impl Packing {
    /// Upper bound applied to every member's natural alignment.
    pub const fn max_align(self) -> Option<usize> {
        match self {
            Packing::Native => None,
            Packing::Packed => Some(1),
        }
    }

    /// Alignment a member with `natural` alignment gets under this rule.
    pub fn effective_align(self, natural: usize) -> usize {
        match self.max_align() {
            Some(max) => natural.min(max),
            None => natural,
        }
    }
}

impl fmt::Display for Packing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packing::Native => f.write_str("native"),
            Packing::Packed => f.write_str("packed"),
        }
    }
}

/// Integer width family used for the integer fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntWidth {
    /// `short`, `int`, `long`, ... with host-defined widths.
    Native,
    /// `uint8_t` .. `int64_t`.
    #[default]
    Fixed,
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntWidth::Native => f.write_str("native"),
            IntWidth::Fixed => f.write_str("fixed"),
        }
    }
}

/// Declared C type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CType {
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Size,
    Pointer,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Float,
    Double,
    /// `char name[N]`
    CharArray(usize),
}

impl CType {
    /// `sizeof` on the host.
    pub const fn size(self) -> usize {
        match self {
            CType::Bool => size_of::<bool>(),
            CType::Char => size_of::<c_char>(),
            CType::SignedChar => size_of::<c_schar>(),
            CType::UnsignedChar => size_of::<c_uchar>(),
            CType::Short => size_of::<c_short>(),
            CType::UnsignedShort => size_of::<c_ushort>(),
            CType::Int => size_of::<c_int>(),
            CType::UnsignedInt => size_of::<c_uint>(),
            CType::Long => size_of::<c_long>(),
            CType::UnsignedLong => size_of::<c_ulong>(),
            CType::LongLong => size_of::<c_longlong>(),
            CType::UnsignedLongLong => size_of::<c_ulonglong>(),
            CType::Size => size_of::<usize>(),
            CType::Pointer => size_of::<*const c_void>(),
            CType::U8 => size_of::<u8>(),
            CType::I8 => size_of::<i8>(),
            CType::U16 => size_of::<u16>(),
            CType::I16 => size_of::<i16>(),
            CType::U32 => size_of::<u32>(),
            CType::I32 => size_of::<i32>(),
            CType::U64 => size_of::<u64>(),
            CType::I64 => size_of::<i64>(),
            CType::Float => size_of::<c_float>(),
            CType::Double => size_of::<c_double>(),
            CType::CharArray(len) => len,
        }
    }

    /// `_Alignof` on the host.
    pub const fn align(self) -> usize {
        match self {
            CType::Bool => align_of::<bool>(),
            CType::Char => align_of::<c_char>(),
            CType::SignedChar => align_of::<c_schar>(),
            CType::UnsignedChar => align_of::<c_uchar>(),
            CType::Short => align_of::<c_short>(),
            CType::UnsignedShort => align_of::<c_ushort>(),
            CType::Int => align_of::<c_int>(),
            CType::UnsignedInt => align_of::<c_uint>(),
            CType::Long => align_of::<c_long>(),
            CType::UnsignedLong => align_of::<c_ulong>(),
            CType::LongLong => align_of::<c_longlong>(),
            CType::UnsignedLongLong => align_of::<c_ulonglong>(),
            CType::Size => align_of::<usize>(),
            CType::Pointer => align_of::<*const c_void>(),
            CType::U8 => align_of::<u8>(),
            CType::I8 => align_of::<i8>(),
            CType::U16 => align_of::<u16>(),
            CType::I16 => align_of::<i16>(),
            CType::U32 => align_of::<u32>(),
            CType::I32 => align_of::<i32>(),
            CType::U64 => align_of::<u64>(),
            CType::I64 => align_of::<i64>(),
            CType::Float => align_of::<c_float>(),
            CType::Double => align_of::<c_double>(),
            CType::CharArray(_) => align_of::<c_char>(),
        }
    }

    /// True for types whose width depends on the host ABI.
    pub const fn is_host_sized(self) -> bool {
        matches!(
            self,
            CType::Short
                | CType::UnsignedShort
                | CType::Int
                | CType::UnsignedInt
                | CType::Long
                | CType::UnsignedLong
                | CType::LongLong
                | CType::UnsignedLongLong
                | CType::Size
                | CType::Pointer
        )
    }

    /// Declaration spelling, e.g. `unsigned long` or `char[10]`.
    pub fn c_name(self) -> String {
        let name = match self {
            CType::Bool => "bool",
            CType::Char => "char",
            CType::SignedChar => "signed char",
            CType::UnsignedChar => "unsigned char",
            CType::Short => "short",
            CType::UnsignedShort => "unsigned short",
            CType::Int => "int",
            CType::UnsignedInt => "unsigned int",
            CType::Long => "long",
            CType::UnsignedLong => "unsigned long",
            CType::LongLong => "long long",
            CType::UnsignedLongLong => "unsigned long long",
            CType::Size => "size_t",
            CType::Pointer => "void *",
            CType::U8 => "uint8_t",
            CType::I8 => "int8_t",
            CType::U16 => "uint16_t",
            CType::I16 => "int16_t",
            CType::U32 => "uint32_t",
            CType::I32 => "int32_t",
            CType::U64 => "uint64_t",
            CType::I64 => "int64_t",
            CType::Float => "float",
            CType::Double => "double",
            CType::CharArray(len) => return format!("char[{}]", len),
        };
        name.to_string()
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.c_name())
    }
}

impl Serialize for CType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.c_name())
    }
}

/// Round `offset` up to the next multiple of `align`.
pub fn align_up(offset: usize, align: usize) -> usize {
    debug_assert!(align > 0, "alignment must be non-zero");
    offset.next_multiple_of(align)
}

/// Offsets of a member sequence plus the aggregate's size and alignment.
struct Placement {
    offsets: Vec<usize>,
    size: usize,
    align: usize,
}

/// Place `(size, natural_align)` members in declaration order.
fn place<I>(members: I, packing: Packing) -> Placement
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut offsets = Vec::new();
    let mut end = 0;
    let mut align = 1;
    for (size, natural) in members {
        let member_align = packing.effective_align(natural);
        let offset = align_up(end, member_align);
        offsets.push(offset);
        end = offset + size;
        align = align.max(member_align);
    }
    Placement {
        offsets,
        size: align_up(end, align),
        align,
    }
}

/// Position of a single field inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub name: String,
    pub ctype: CType,
    pub offset: usize,
    pub size: usize,
    pub align: usize,
}

impl FieldLayout {
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Layout of one record type under a packing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLayout {
    pub fields: Vec<FieldLayout>,
    /// `sizeof(struct)`, trailing padding included.
    pub size: usize,
    pub align: usize,
}

impl RecordLayout {
    /// Lay out `(name, type)` pairs in declaration order.
    pub fn compute<'a, I>(fields: I, packing: Packing) -> Self
    where
        I: IntoIterator<Item = (&'a str, CType)>,
    {
        let fields: Vec<(&str, CType)> = fields.into_iter().collect();
        let placement = place(
            fields.iter().map(|(_, ctype)| (ctype.size(), ctype.align())),
            packing,
        );

        let fields = fields
            .iter()
            .zip(placement.offsets)
            .map(|((name, ctype), offset)| FieldLayout {
                name: (*name).to_string(),
                ctype: *ctype,
                offset,
                size: ctype.size(),
                align: packing.effective_align(ctype.align()),
            })
            .collect();

        Self {
            fields,
            size: placement.size,
            align: placement.align,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Bytes occupied by field data, excluding all padding.
    pub fn data_size(&self) -> usize {
        self.fields.iter().map(|field| field.size).sum()
    }

    /// Bytes of padding between fields and after the last field.
    pub fn padding(&self) -> usize {
        self.size - self.data_size()
    }

    /// Layout of an image holding a single record.
    pub fn single(self) -> ImageLayout {
        ImageLayout {
            record_offsets: vec![0],
            size: self.size,
            align: self.align,
            record: self,
        }
    }

    /// Layout of a struct whose members are `count` copies of this record.
    pub fn repeated(self, count: usize, packing: Packing) -> ImageLayout {
        let placement = place((0..count).map(|_| (self.size, self.align)), packing);
        ImageLayout {
            record_offsets: placement.offsets,
            size: placement.size,
            align: placement.align,
            record: self,
        }
    }
}

/// Layout of a whole fixture image: one record, or a container of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageLayout {
    pub record: RecordLayout,
    pub record_offsets: Vec<usize>,
    pub size: usize,
    pub align: usize,
}

impl ImageLayout {
    pub fn record_count(&self) -> usize {
        self.record_offsets.len()
    }
}

#[cfg(test)]
mod tests;
