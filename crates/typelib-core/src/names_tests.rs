use crate::{KnownNames, hash};

#[test]
fn from_lines_skips_blank_and_comments() {
    let names = KnownNames::from_lines("Foo\n\n  Bar  \n# comment\nBaz\r\n");

    assert_eq!(names.len(), 3);
    assert_eq!(names.get(hash("Foo")), Some("Foo"));
    assert_eq!(names.get(hash("Bar")), Some("Bar"));
    assert_eq!(names.get(hash("Baz")), Some("Baz"));
    assert_eq!(names.get(hash("# comment")), None);
}

#[test]
fn preserves_insertion_order() {
    let names = KnownNames::from_lines("Zeta\nAlpha\nMid");
    let order: Vec<_> = names.iter().map(|(_, s)| s).collect();
    assert_eq!(order, ["Zeta", "Alpha", "Mid"]);
}

#[test]
fn duplicates_keep_first() {
    let mut names = KnownNames::new();
    let a = names.insert("Foo");
    let b = names.insert("Foo");

    assert_eq!(a, b);
    assert_eq!(names.len(), 1);
}

#[test]
fn empty_name_is_never_stored() {
    let mut names = KnownNames::new();
    let h = names.insert("");

    assert!(h.is_unset());
    assert!(names.is_empty());
    assert!(!names.contains(h));
}

#[test]
fn from_iterator() {
    let names: KnownNames = ["CTransform", "CHealth"].into_iter().collect();
    assert!(names.contains(hash("CTransform")));
    assert!(names.contains(hash("CHealth")));
}
