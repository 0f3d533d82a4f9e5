use super::hash::render;

#[test]
fn one_line_per_symbol() {
    let symbols = ["Foo".to_owned(), "Wrap".to_owned()];

    insta::assert_snapshot!(render(&symbols), @r"
    0x0B87D664  Foo
    0x7C8EA15A  Wrap
    ");
}

#[test]
fn empty_name_hashes_to_zero() {
    assert_eq!(render(&[String::new()]), "0x00000000  \n");
}
