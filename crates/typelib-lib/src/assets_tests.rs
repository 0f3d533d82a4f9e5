use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use typelib_core::{KnownNames, NameHash, PointerWidth, hash};
use typelib_format::DecodeError;
use typelib_format::test_utils::{MemberSpec, SchemaBuilder, TypeSpec, instance_section};
use typelib_format::type_ref::Storage;

use crate::assets::{AssetError, AssetSet, AssetSources, Lookup, decompress};

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

fn schema() -> Vec<u8> {
    SchemaBuilder::new()
        .stripped()
        .add_type(TypeSpec::new("Foo", 8).member(MemberSpec::plain("count", Storage::U32, 4, 0)))
        .build()
}

fn entities() -> Vec<u8> {
    let mut blob = instance_section(0, hash("Foo"), &[1, 2, 3, 4, 5, 6, 7, 8]);
    blob.extend(instance_section(0, hash("Bar"), &[9; 4]));
    blob
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn decompress_gzip_and_passthrough() {
    let data = b"type library";
    assert_eq!(decompress(&gzip(data)).unwrap(), data);
    assert_eq!(decompress(data).unwrap(), data);
    assert!(decompress(&[]).unwrap().is_empty());
}

#[test]
fn decompress_rejects_corrupt_gzip() {
    let mut bad = gzip(b"type library");
    bad.truncate(12);
    assert!(decompress(&bad).is_err());
}

#[test]
fn load_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let sources = AssetSources {
        schema: write(dir.path(), "schema.bin.gz", &gzip(&schema())),
        entities: write(dir.path(), "entities.bin.gz", &gzip(&entities())),
        aux: vec![write(dir.path(), "aux0.bin.gz", &gzip(b"aux"))],
        names: Some(write(dir.path(), "names.txt", b"# symbols\nFoo\ncount\n")),
        width: PointerWidth::Bits64,
    };

    let assets = AssetSet::load(&sources).unwrap();

    // stripped schema names recovered through the dictionary
    let foo = assets.catalog().type_by_name("Foo").unwrap();
    assert_eq!(foo.name, "Foo");
    assert_eq!(foo.members[0].name, "count");

    assert_eq!(assets.instances().len(), 2);
    assert_eq!(assets.aux_count(), 1);
    assert_eq!(assets.aux(0), Some(&b"aux"[..]));
    assert_eq!(assets.aux(1), None);
    assert_eq!(assets.label(hash("Foo")), "Foo");
    assert_eq!(assets.label(hash("Bar")), hash("Bar").to_string());
}

#[test]
fn load_without_name_list() {
    let dir = tempfile::tempdir().unwrap();
    let sources = AssetSources {
        schema: write(dir.path(), "schema.bin", &schema()),
        entities: write(dir.path(), "entities.bin", &entities()),
        ..Default::default()
    };

    let assets = AssetSet::load(&sources).unwrap();
    assert!(assets.names().is_empty());
    let foo = assets.catalog().get_type(hash("Foo")).unwrap();
    assert_eq!(foo.name, format!("0x{:X}", hash("Foo").get()));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let sources = AssetSources {
        schema: dir.path().join("missing.gz"),
        entities: write(dir.path(), "entities.bin", &entities()),
        ..Default::default()
    };

    let err = AssetSet::load(&sources).unwrap_err();
    assert!(matches!(err, AssetError::Io { .. }));
    assert!(err.to_string().contains("missing.gz"));
}

#[test]
fn corrupt_blob_is_decompress_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = gzip(&schema());
    bad.truncate(16);
    let sources = AssetSources {
        schema: write(dir.path(), "schema.bin.gz", &bad),
        entities: write(dir.path(), "entities.bin", &entities()),
        ..Default::default()
    };

    assert!(matches!(
        AssetSet::load(&sources),
        Err(AssetError::Decompress { .. })
    ));
}

#[test]
fn non_utf8_name_list() {
    let dir = tempfile::tempdir().unwrap();
    let sources = AssetSources {
        schema: write(dir.path(), "schema.bin", &schema()),
        entities: write(dir.path(), "entities.bin", &entities()),
        names: Some(write(dir.path(), "names.txt", &[0x46, 0x6F, 0xFF, 0x0A])),
        ..Default::default()
    };

    assert!(matches!(
        AssetSet::load(&sources),
        Err(AssetError::Utf8 { .. })
    ));
}

#[test]
fn bad_schema_is_decode_error() {
    let err = AssetSet::from_parts(
        b"NOPE",
        entities(),
        Vec::new(),
        KnownNames::new(),
        PointerWidth::Bits64,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AssetError::Decode {
            what: "schema",
            source: DecodeError::InvalidMagic { .. }
        }
    ));
}

#[test]
fn truncated_section_does_not_block_others() {
    let mut blob = instance_section(0, hash("Foo"), &[1, 2, 3, 4, 5, 6, 7, 8]);
    let bar = instance_section(0, hash("Bar"), &[9; 16]);
    blob.extend_from_slice(&bar[..32]);

    let assets = AssetSet::from_parts(
        &schema(),
        blob,
        Vec::new(),
        KnownNames::new(),
        PointerWidth::Bits64,
    )
    .unwrap();
    assert_eq!(assets.instances().len(), 1);

    for lookup in [Lookup::Scan, Lookup::Indexed] {
        let (_, payload) = assets.instance(hash("Foo"), lookup).unwrap();
        assert_eq!(payload, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
    assert_eq!(
        assets.instance(hash("Bar"), Lookup::Indexed),
        Err(DecodeError::PatternNotFound { hash: hash("Bar") })
    );
    assert!(matches!(
        assets.instance(hash("Bar"), Lookup::Scan),
        Err(DecodeError::UnexpectedEof {
            what: "instance payload",
            ..
        })
    ));
}

#[test]
fn instance_lookup_modes_agree() {
    let assets = AssetSet::from_parts(
        &schema(),
        entities(),
        Vec::new(),
        KnownNames::new(),
        PointerWidth::Bits64,
    )
    .unwrap();

    let scanned = assets.instance(hash("Foo"), Lookup::Scan).unwrap();
    let indexed = assets.instance(hash("Foo"), Lookup::Indexed).unwrap();
    assert_eq!(scanned, indexed);
    assert_eq!(indexed.1, &[1, 2, 3, 4, 5, 6, 7, 8]);

    let missing = NameHash(0x1234_5678);
    assert_eq!(
        assets.instance(missing, Lookup::Indexed),
        Err(DecodeError::PatternNotFound { hash: missing })
    );
    assert_eq!(
        assets.instance(missing, Lookup::Scan),
        Err(DecodeError::PatternNotFound { hash: missing })
    );
}
