use std::ffi::{
    c_char, c_int, c_long, c_longlong, c_schar, c_short, c_uchar, c_uint, c_ulong, c_ulonglong,
    c_ushort, c_void,
};
use std::mem::{align_of, offset_of, size_of};

use super::*;

#[allow(dead_code)]
#[repr(C)]
struct Simple {
    str_test: [c_char; 13],
    u32_test: u32,
    double_test: f64,
}

#[allow(dead_code)]
#[repr(C, packed)]
struct SimplePacked {
    str_test: [c_char; 13],
    u32_test: u32,
    double_test: f64,
}

#[allow(dead_code)]
#[repr(C)]
struct NativeInts {
    test_bool: bool,
    test_float: f32,
    test_double: f64,
    test_char: c_char,
    test_char_array: [c_char; 10],
    test_signed_char: c_schar,
    test_unsigned_char: c_uchar,
    test_signed_short: c_short,
    test_unsigned_short: c_ushort,
    test_signed_int: c_int,
    test_unsigned_int: c_uint,
    test_signed_long: c_long,
    test_unsigned_long: c_ulong,
    test_signed_long_long: c_longlong,
    test_unsigned_long_long: c_ulonglong,
    test_size: usize,
    test_pointer: *const c_void,
}

#[allow(dead_code)]
#[repr(C)]
struct FixedInts {
    test_bool: bool,
    test_float: f32,
    test_double: f64,
    test_char: c_char,
    test_char_array: [c_char; 10],
    test_uint8: u8,
    test_int8: i8,
    test_uint16: u16,
    test_int16: i16,
    test_uint32: u32,
    test_int32: i32,
    test_uint64: u64,
    test_int64: i64,
}

#[allow(dead_code)]
#[repr(C)]
struct FixedContainer {
    t1: FixedInts,
    t2: FixedInts,
}

fn simple_fields() -> Vec<(&'static str, CType)> {
    vec![
        ("str_test", CType::CharArray(13)),
        ("u32_test", CType::U32),
        ("double_test", CType::Double),
    ]
}

fn native_int_fields() -> Vec<(&'static str, CType)> {
    vec![
        ("test_bool", CType::Bool),
        ("test_float", CType::Float),
        ("test_double", CType::Double),
        ("test_char", CType::Char),
        ("test_char_array", CType::CharArray(10)),
        ("test_signed_char", CType::SignedChar),
        ("test_unsigned_char", CType::UnsignedChar),
        ("test_signed_short", CType::Short),
        ("test_unsigned_short", CType::UnsignedShort),
        ("test_signed_int", CType::Int),
        ("test_unsigned_int", CType::UnsignedInt),
        ("test_signed_long", CType::Long),
        ("test_unsigned_long", CType::UnsignedLong),
        ("test_signed_long_long", CType::LongLong),
        ("test_unsigned_long_long", CType::UnsignedLongLong),
        ("test_size", CType::Size),
        ("test_pointer", CType::Pointer),
    ]
}

fn fixed_int_fields() -> Vec<(&'static str, CType)> {
    vec![
        ("test_bool", CType::Bool),
        ("test_float", CType::Float),
        ("test_double", CType::Double),
        ("test_char", CType::Char),
        ("test_char_array", CType::CharArray(10)),
        ("test_uint8", CType::U8),
        ("test_int8", CType::I8),
        ("test_uint16", CType::U16),
        ("test_int16", CType::I16),
        ("test_uint32", CType::U32),
        ("test_int32", CType::I32),
        ("test_uint64", CType::U64),
        ("test_int64", CType::I64),
    ]
}

fn offset(layout: &RecordLayout, name: &str) -> usize {
    layout.field(name).expect("field present").offset
}

#[test]
fn align_up_rounds_to_multiple() {
    assert_eq!(align_up(0, 8), 0);
    assert_eq!(align_up(1, 8), 8);
    assert_eq!(align_up(13, 4), 16);
    assert_eq!(align_up(16, 4), 16);
    assert_eq!(align_up(27, 1), 27);
}

#[test]
fn packed_offsets_are_prefix_sums() {
    let layout = RecordLayout::compute(native_int_fields(), Packing::Packed);
    let mut expected = 0;
    for field in &layout.fields {
        assert_eq!(field.offset, expected, "offset of {}", field.name);
        assert_eq!(field.align, 1);
        expected += field.size;
    }
    assert_eq!(layout.size, expected);
    assert_eq!(layout.align, 1);
    assert_eq!(layout.padding(), 0);
}

#[test]
fn simple_packed_is_25_bytes() {
    let layout = RecordLayout::compute(simple_fields(), Packing::Packed);
    assert_eq!(layout.size, 13 + 4 + 8);
    assert_eq!(offset(&layout, "str_test"), 0);
    assert_eq!(offset(&layout, "u32_test"), 13);
    assert_eq!(offset(&layout, "double_test"), 17);
    assert_eq!(layout.size, size_of::<SimplePacked>());
}

#[test]
fn simple_native_pads_each_field_independently() {
    let layout = RecordLayout::compute(simple_fields(), Packing::Native);

    let u32_offset = align_up(13, align_of::<u32>());
    let double_offset = align_up(u32_offset + 4, align_of::<f64>());
    assert_eq!(offset(&layout, "u32_test"), u32_offset);
    assert_eq!(offset(&layout, "double_test"), double_offset);
    assert_eq!(layout.align, align_of::<f64>().max(align_of::<u32>()));
    assert_eq!(layout.size, align_up(double_offset + 8, layout.align));
    if align_of::<f64>() == 8 {
        assert_eq!(u32_offset, 16);
        assert_eq!(double_offset, 24);
        assert_eq!(layout.size, 32);
    }
}

#[test]
fn simple_matches_repr_c() {
    let native = RecordLayout::compute(simple_fields(), Packing::Native);
    assert_eq!(native.size, size_of::<Simple>());
    assert_eq!(offset(&native, "u32_test"), offset_of!(Simple, u32_test));
    assert_eq!(offset(&native, "double_test"), offset_of!(Simple, double_test));

    let packed = RecordLayout::compute(simple_fields(), Packing::Packed);
    assert_eq!(offset(&packed, "u32_test"), offset_of!(SimplePacked, u32_test));
    assert_eq!(
        offset(&packed, "double_test"),
        offset_of!(SimplePacked, double_test)
    );
}

#[test]
fn native_ints_match_repr_c() {
    let layout = RecordLayout::compute(native_int_fields(), Packing::Native);
    assert_eq!(layout.size, size_of::<NativeInts>());
    assert_eq!(layout.align, align_of::<NativeInts>());

    let expected = [
        ("test_bool", offset_of!(NativeInts, test_bool)),
        ("test_float", offset_of!(NativeInts, test_float)),
        ("test_double", offset_of!(NativeInts, test_double)),
        ("test_char", offset_of!(NativeInts, test_char)),
        ("test_char_array", offset_of!(NativeInts, test_char_array)),
        ("test_signed_char", offset_of!(NativeInts, test_signed_char)),
        ("test_unsigned_char", offset_of!(NativeInts, test_unsigned_char)),
        ("test_signed_short", offset_of!(NativeInts, test_signed_short)),
        ("test_unsigned_short", offset_of!(NativeInts, test_unsigned_short)),
        ("test_signed_int", offset_of!(NativeInts, test_signed_int)),
        ("test_unsigned_int", offset_of!(NativeInts, test_unsigned_int)),
        ("test_signed_long", offset_of!(NativeInts, test_signed_long)),
        ("test_unsigned_long", offset_of!(NativeInts, test_unsigned_long)),
        ("test_signed_long_long", offset_of!(NativeInts, test_signed_long_long)),
        ("test_unsigned_long_long", offset_of!(NativeInts, test_unsigned_long_long)),
        ("test_size", offset_of!(NativeInts, test_size)),
        ("test_pointer", offset_of!(NativeInts, test_pointer)),
    ];
    for (name, want) in expected {
        assert_eq!(offset(&layout, name), want, "offset of {name}");
    }
}

#[test]
fn fixed_ints_match_repr_c() {
    let layout = RecordLayout::compute(fixed_int_fields(), Packing::Native);
    assert_eq!(layout.size, size_of::<FixedInts>());
    assert_eq!(offset(&layout, "test_uint8"), offset_of!(FixedInts, test_uint8));
    assert_eq!(offset(&layout, "test_uint16"), offset_of!(FixedInts, test_uint16));
    assert_eq!(offset(&layout, "test_uint32"), offset_of!(FixedInts, test_uint32));
    assert_eq!(offset(&layout, "test_uint64"), offset_of!(FixedInts, test_uint64));
    assert_eq!(offset(&layout, "test_int64"), offset_of!(FixedInts, test_int64));
}

#[test]
fn native_size_is_multiple_of_max_alignment() {
    for fields in [simple_fields(), native_int_fields(), fixed_int_fields()] {
        let layout = RecordLayout::compute(fields, Packing::Native);
        let max_align = layout.fields.iter().map(|f| f.align).max().unwrap();
        assert_eq!(layout.align, max_align);
        assert_eq!(layout.size % max_align, 0);
        for pair in layout.fields.windows(2) {
            assert_eq!(pair[1].offset, align_up(pair[0].end(), pair[1].align));
        }
    }
}

#[test]
fn container_matches_repr_c() {
    let record = RecordLayout::compute(fixed_int_fields(), Packing::Native);
    let image = record.repeated(2, Packing::Native);
    assert_eq!(image.record_count(), 2);
    assert_eq!(image.size, size_of::<FixedContainer>());
    assert_eq!(image.record_offsets[1], offset_of!(FixedContainer, t2));
}

#[test]
fn packed_container_is_twice_the_record() {
    let record = RecordLayout::compute(fixed_int_fields(), Packing::Packed);
    let record_size = record.size;
    let image = record.repeated(2, Packing::Packed);
    assert_eq!(image.record_offsets, vec![0, record_size]);
    assert_eq!(image.size, 2 * record_size);
}

#[test]
fn single_image_wraps_record() {
    let record = RecordLayout::compute(simple_fields(), Packing::Native);
    let size = record.size;
    let image = record.single();
    assert_eq!(image.record_offsets, vec![0]);
    assert_eq!(image.size, size);
}

#[test]
fn ctype_names_and_sizes() {
    assert_eq!(CType::CharArray(13).c_name(), "char[13]");
    assert_eq!(CType::CharArray(13).size(), 13);
    assert_eq!(CType::CharArray(13).align(), 1);
    assert_eq!(CType::UnsignedLongLong.to_string(), "unsigned long long");
    assert_eq!(CType::Pointer.size(), size_of::<usize>());
    assert!(CType::Long.is_host_sized());
    assert!(!CType::I64.is_host_sized());
}

#[test]
fn effective_align_clamps_for_packed() {
    assert_eq!(Packing::Packed.effective_align(8), 1);
    assert_eq!(Packing::Native.effective_align(8), 8);
    assert_eq!(Packing::Packed.max_align(), Some(1));
    assert_eq!(Packing::Native.max_align(), None);
}
