use typelib_core::{Colors, PointerWidth};

use crate::catalog::Catalog;
use crate::constants::type_flags;
use crate::dump::dump;
use crate::test_utils::{EnumSpec, MemberSpec, SchemaBuilder, TypeSpec};
use crate::type_ref::{Atom, Storage};

fn schema() -> Vec<u8> {
    SchemaBuilder::new()
        .add_type(
            TypeSpec::new("Holder", 16)
                .member(MemberSpec::plain("color", Storage::EnumU8, 1, 0).with_ref("EColor"))
                .member(MemberSpec::plain("flags", Storage::U32, 4, 4).with_atom(Atom::Bitfield, 3))
                .member(
                    MemberSpec::plain("items", Storage::Struct, 4, 8)
                        .with_ref("CTransform")
                        .with_atom(Atom::Array, 0),
                )
                .member(
                    MemberSpec::plain("ids", Storage::U16, 4, 12).with_atom(Atom::InlineArray, 2),
                ),
        )
        .add_type(
            TypeSpec::new("CTransform", 0)
                .with_sizes(20, 24)
                .with_flags(type_flags::VERIFY_SIZE | type_flags::HAS_SUBDATA)
                .with_comment("Entity placement")
                .member(MemberSpec::plain("x", Storage::F32, 4, 0))
                .member(MemberSpec::plain("y", Storage::F32, 4, 4))
                .member(
                    MemberSpec::plain("owner", Storage::Pointer, 0, 0)
                        .with_sizes(4, 8)
                        .with_offsets(8, 8)
                        .with_comment("back pointer"),
                )
                .member(
                    MemberSpec::plain("layer", Storage::U32, 4, 0)
                        .with_offsets(12, 16)
                        .with_default(&7u32.to_le_bytes()),
                ),
        )
        .add_enum(
            EnumSpec::new("EColor", Storage::EnumU8)
                .value("Red", 0)
                .value_with_aliases("Green", 1, &["Verde"])
                .value("Blue", -1),
        )
        .build()
}

#[test]
fn dump_catalog() {
    let catalog = Catalog::parse(&schema(), PointerWidth::Bits64).unwrap();
    let res = dump(&catalog, None, Colors::OFF);

    insta::assert_snapshot!(res, @r"
    [header]
    version = 1
    width = 64-bit
    types = 2
    enums = 1

    [types]
    CTransform 0xE65AF89F size=24 align=4 flags=has_subdata|verify_size  ; Entity placement
      +00 x: f32
      +04 y: f32
      +08 owner: ptr  ; back pointer
      +16 layer: u32 = [07 00 00 00]
    Holder 0xB7E7ECBE size=16 align=4
      +00 color: EColor
      +04 flags: u32:3
      +08 items: CTransform[]
      +12 ids: u16[2]

    [enums]
    EColor 0xADCE0524 : u8
      Red = 0
      Green = 1 (Verde)
      Blue = -1
    ");
}

#[test]
fn dump_selects_width_branch() {
    let catalog = Catalog::parse(&schema(), PointerWidth::Bits32).unwrap();
    let res = dump(&catalog, Some("transform"), Colors::OFF);

    insta::assert_snapshot!(res, @r"
    [header]
    version = 1
    width = 32-bit
    types = 2
    enums = 1

    [types]
    CTransform 0xE65AF89F size=20 align=4 flags=has_subdata|verify_size  ; Entity placement
      +00 x: f32
      +04 y: f32
      +08 owner: ptr  ; back pointer
      +12 layer: u32 = [07 00 00 00]

    [enums]
    ");
}

#[test]
fn dump_filter_is_case_insensitive() {
    let catalog = Catalog::parse(&schema(), PointerWidth::Bits64).unwrap();
    let res = dump(&catalog, Some("ECOLOR"), Colors::OFF);

    assert!(res.contains("EColor 0xADCE0524 : u8"));
    assert!(!res.contains("Holder"));
    assert!(!res.contains("CTransform 0x"));
}

#[test]
fn dump_with_colors() {
    let catalog = Catalog::parse(&schema(), PointerWidth::Bits64).unwrap();
    let res = dump(&catalog, None, Colors::ON);

    assert!(res.starts_with("\x1b[34m[header]\x1b[0m\n"));
    assert!(res.contains("\x1b[33m0xB7E7ECBE\x1b[0m"));
    assert!(res.contains("\x1b[32mGreen\x1b[0m = 1"));
}
