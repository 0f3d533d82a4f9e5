use std::fs;

use typelib_core::PointerWidth;
use typelib_format::test_utils::{MemberSpec, SchemaBuilder, TypeSpec};
use typelib_format::type_ref::Storage;

use super::CommandError;
use super::types::{TypesArgs, execute};

fn schema(builder: SchemaBuilder) -> Vec<u8> {
    builder
        .add_type(
            TypeSpec::new("Foo", 8)
                .member(MemberSpec::plain("count", Storage::U32, 4, 0))
                .member(MemberSpec::plain("limit", Storage::I32, 4, 4)),
        )
        .add_type(TypeSpec::new("Bar", 4))
        .build()
}

#[test]
fn dumps_stripped_schema_with_names() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.bin");
    let names_path = dir.path().join("names.txt");
    fs::write(&schema_path, schema(SchemaBuilder::new().stripped())).unwrap();
    fs::write(&names_path, "Foo\ncount\n").unwrap();

    let out = execute(&TypesArgs {
        schema: schema_path,
        names: Some(names_path),
        width: PointerWidth::Bits64,
        filter: Some("foo".to_owned()),
        color: false,
    })
    .unwrap();

    insta::assert_snapshot!(out, @r"
    [header]
    version = 1
    width = 64-bit
    types = 2
    enums = 0

    [types]
    Foo 0x0B87D664 size=8 align=4
      +0 count: u32
      +4 0xFDCB2FF: i32

    [enums]
    ");
}

#[test]
fn missing_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = execute(&TypesArgs {
        schema: dir.path().join("absent.bin"),
        names: None,
        width: PointerWidth::Bits64,
        filter: None,
        color: false,
    })
    .unwrap_err();

    assert!(matches!(err, CommandError::Asset(_)));
    assert!(err.to_string().starts_with("failed to read "));
}
