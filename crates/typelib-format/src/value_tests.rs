use serde_json::json;
use typelib_core::{KnownNames, PointerWidth, hash};

use crate::catalog::Catalog;
use crate::error::DecodeError;
use crate::test_utils::{EnumSpec, MemberSpec, SchemaBuilder, TypeSpec};
use crate::type_ref::{Atom, Storage};
use crate::value::{RecordDecoder, Value};

fn sample_schema() -> Vec<u8> {
    SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Sample", 0)
                .with_sizes(20, 24)
                .member(MemberSpec::plain("a", Storage::I8, 1, 0))
                .member(MemberSpec::plain("b", Storage::U16, 2, 2))
                .member(MemberSpec::plain("c", Storage::F32, 4, 4))
                .member(MemberSpec::plain("color", Storage::EnumU8, 1, 8).with_ref("EColor"))
                .member(
                    MemberSpec::plain("unknown_color", Storage::EnumU8, 1, 9).with_ref("EColor"),
                )
                .member(MemberSpec::plain("id", Storage::U32, 4, 12))
                .member(MemberSpec::plain("ptr", Storage::Pointer, 0, 16).with_sizes(4, 8)),
        )
        .add_enum(
            EnumSpec::new("EColor", Storage::EnumU8)
                .value("Red", 0)
                .value("Green", 1),
        )
        .build()
}

fn sample_record() -> Vec<u8> {
    let mut bytes = vec![0u8; 24];
    bytes[0] = 0xFF;
    bytes[2..4].copy_from_slice(&0x1234u16.to_le_bytes());
    bytes[4..8].copy_from_slice(&1.5f32.to_le_bytes());
    bytes[8] = 1;
    bytes[9] = 7;
    bytes[12..16].copy_from_slice(&hash("Red").to_le_bytes());
    bytes[16..24].copy_from_slice(&0x1122_3344_5566_7788u64.to_le_bytes());
    bytes
}

#[test]
fn decodes_scalars_and_enums() {
    let catalog = Catalog::parse(&sample_schema(), PointerWidth::Bits64).unwrap();
    let value = RecordDecoder::new(&catalog)
        .decode(hash("Sample"), &sample_record())
        .unwrap();

    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({
            "a": -1,
            "b": 4660,
            "c": 1.5,
            "color": "Green",
            "unknown_color": 7,
            "id": hash("Red").get(),
            "ptr": 0x1122_3344_5566_7788u64,
        })
    );
}

#[test]
fn known_names_render_hash_fields() {
    let catalog = Catalog::parse(&sample_schema(), PointerWidth::Bits64).unwrap();
    let names = KnownNames::from_lines("Red\nBlue");
    let value = RecordDecoder::new(&catalog)
        .with_names(&names)
        .decode(hash("Sample"), &sample_record())
        .unwrap();

    assert_eq!(value.get("id").and_then(Value::as_str), Some("Red"));
    // only u32 fields are treated as hashes
    assert_eq!(value.get("b"), Some(&Value::UInt(0x1234)));
}

#[test]
fn pointers_follow_catalog_width() {
    let catalog = Catalog::parse(&sample_schema(), PointerWidth::Bits32).unwrap();
    let value = RecordDecoder::new(&catalog)
        .decode(hash("Sample"), &sample_record()[..20])
        .unwrap();

    assert_eq!(value.get("ptr").and_then(Value::as_u64), Some(0x5566_7788));
}

#[test]
fn bitfields_pack_from_low_bits() {
    let bytes = SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Flags", 8)
                .member(MemberSpec::plain("lo", Storage::U32, 4, 0).with_atom(Atom::Bitfield, 3))
                .member(MemberSpec::plain("mid", Storage::U32, 4, 0).with_atom(Atom::Bitfield, 5))
                .member(MemberSpec::plain("hi", Storage::I32, 4, 0).with_atom(Atom::Bitfield, 4))
                .member(MemberSpec::plain("after", Storage::U8, 1, 4))
                .member(MemberSpec::plain("tail", Storage::U8, 1, 5).with_atom(Atom::Bitfield, 2)),
        )
        .build();
    let catalog = Catalog::parse(&bytes, PointerWidth::Bits64).unwrap();

    let mut record = vec![0u8; 8];
    record[0..4].copy_from_slice(&3725u32.to_le_bytes());
    record[4] = 9;
    record[5] = 0b1111_1110;

    let value = RecordDecoder::new(&catalog)
        .decode(hash("Flags"), &record)
        .unwrap();
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({ "lo": 5, "mid": 17, "hi": -2, "after": 9, "tail": 2 })
    );
}

#[test]
fn inline_arrays_and_nested_structs() {
    let bytes = SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Vec2", 8)
                .member(MemberSpec::plain("x", Storage::F32, 4, 0))
                .member(MemberSpec::plain("y", Storage::F32, 4, 4)),
        )
        .add_type(
            TypeSpec::new("Path", 20)
                .member(MemberSpec::inline_structs("points", "Vec2", 2, 16, 0))
                .member(
                    MemberSpec::plain("ids", Storage::U16, 4, 16).with_atom(Atom::InlineArray, 2),
                ),
        )
        .build();
    let catalog = Catalog::parse(&bytes, PointerWidth::Bits64).unwrap();

    let mut record = Vec::new();
    for f in [1.0f32, 2.0, 3.0, 4.0] {
        record.extend_from_slice(&f.to_le_bytes());
    }
    record.extend_from_slice(&[7, 0, 8, 0]);

    let value = RecordDecoder::new(&catalog)
        .decode(hash("Path"), &record)
        .unwrap();
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({
            "points": [{ "x": 1.0, "y": 2.0 }, { "x": 3.0, "y": 4.0 }],
            "ids": [7, 8],
        })
    );
}

#[test]
fn out_of_line_arrays_are_raw_pointers() {
    let bytes = SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Holder", 8).member(
                MemberSpec::plain("items", Storage::Struct, 8, 0)
                    .with_ref("Vec2")
                    .with_atom(Atom::Array, 0),
            ),
        )
        .build();
    let catalog = Catalog::parse(&bytes, PointerWidth::Bits64).unwrap();

    let value = RecordDecoder::new(&catalog)
        .decode(hash("Holder"), &0xABCDu64.to_le_bytes())
        .unwrap();
    assert_eq!(value.get("items"), Some(&Value::UInt(0xABCD)));
}

#[test]
fn unknown_types_stay_raw() {
    let bytes = SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Outer", 4)
                .member(MemberSpec::plain("inner", Storage::Struct, 4, 0).with_ref("Missing")),
        )
        .build();
    let catalog = Catalog::parse(&bytes, PointerWidth::Bits64).unwrap();
    let decoder = RecordDecoder::new(&catalog);

    let value = decoder.decode(hash("Outer"), &[1, 2, 3, 4]).unwrap();
    assert_eq!(value.get("inner"), Some(&Value::Bytes(vec![1, 2, 3, 4])));

    assert_eq!(
        decoder.decode(hash("Missing"), &[5, 6]).unwrap(),
        Value::Bytes(vec![5, 6])
    );
}

#[test]
fn self_referencing_struct_hits_depth_limit() {
    let bytes = SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Node", 4)
                .member(MemberSpec::plain("next", Storage::Struct, 4, 0).with_ref("Node")),
        )
        .build();
    let catalog = Catalog::parse(&bytes, PointerWidth::Bits64).unwrap();

    let err = RecordDecoder::new(&catalog)
        .with_max_depth(3)
        .decode(hash("Node"), &[0; 4])
        .unwrap_err();
    assert_eq!(err, DecodeError::NestingTooDeep(3));
}

#[test]
fn short_record_is_an_error() {
    let catalog = Catalog::parse(&sample_schema(), PointerWidth::Bits64).unwrap();
    let err = RecordDecoder::new(&catalog)
        .decode(hash("Sample"), &sample_record()[..10])
        .unwrap_err();

    assert!(matches!(
        err,
        DecodeError::UnexpectedEof {
            what: "member value",
            offset: 12,
            ..
        }
    ));
}
