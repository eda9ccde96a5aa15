//! Incremental reparses compared against full parses of the edited text.

mod common;

use common::{apply, assert_incremental, offset_of, parse, PROGRAM};
use rstest::rstest;
use sharptree::{
    parse as parse_file, DiagnosticCode, ParseOptions, SyntaxKind, SyntaxTree, TextChange, TextRange, TextSize,
};

/// Replaces `len` bytes at the first occurrence of `needle` in [`PROGRAM`] with `insert`.
fn edit_program(needle: &str, len: u32, insert: &str) -> TextChange {
    TextChange::new(TextRange::at(offset_of(PROGRAM, needle), len.into()), insert)
}

#[rstest]
#[case::rename_identifier("Origin", 6, "Zero")]
#[case::insert_statement("this.y = y;", 0, "this.z = 0;\n            ")]
#[case::break_expression("x * x", 1, "(")]
#[case::open_block_comment("private readonly", 0, "/* ")]
#[case::close_brace_early("return 0; else", 0, "} ")]
#[case::delete_else("else { return", 4, "")]
#[case::split_keyword("sealed", 3, "a l")]
#[case::into_string_hole("name ?? ", 4, "other")]
#[case::unterminated_string("\"point\"", 1, "")]
#[case::close_interpolation_early("at ({x}", 4, "\"")]
#[case::verbatim_string("// squared", 0, "var s = @\"")]
#[case::preprocessor_line("internal struct", 0, "#if DEBUG\n    ")]
#[case::line_break_before_hash("    interface", 0, "#")]
#[case::doc_comment("/// <summary>", 3, "//")]
#[case::replace_everything("using System;", PROGRAM.len() as u32, "int x;")]
#[case::empty_the_file("using", PROGRAM.len() as u32, "")]
#[case::prepend("using System;", 0, "class Top { }\n")]
#[case::unicode_identifier("Grid", 4, "Gitter\u{e4}")]
#[case::bad_character("cells.Length", 0, "\u{1}")]
fn edits(#[case] needle: &str, #[case] len: u32, #[case] insert: &str) {
    let tree = parse(PROGRAM);
    let change = edit_program(needle, len, insert);
    let edited = assert_incremental(&tree, &[change.clone()]);
    assert_eq!(edited.text().as_str(), apply(PROGRAM, &[change]));
}

#[rstest]
#[case::append_to_empty("", "class C { }")]
#[case::statement_at_end("a = 1;", "a = 1;b = 2;")]
#[case::comment_only("// nothing", "// nothing\n")]
fn from_small_texts(#[case] before: &str, #[case] after: &str) {
    let tree = parse(before);
    // `after` extends `before` at its end
    let change = TextChange::insert(TextSize::of(before), &after[before.len()..]);
    assert_incremental(&tree, &[change]);
}

#[test]
fn multiple_changes() {
    let tree = parse(PROGRAM);
    let changes = [
        edit_program("Shapes", 6, "Geometry"),
        edit_program("x * x", 5, "x"),
        edit_program("count > 0", 9, "count >= 0 && !done"),
    ];
    let edited = assert_incremental(&tree, &changes);
    assert!(edited.text().as_str().contains("namespace Demo.Geometry"));
    assert!(edited.diagnostics().is_empty());
}

#[test]
fn edit_sequence() {
    // typing a method body character by character
    let mut tree = parse("class C\n{\n    void M()\n    {\n    }\n}\n");
    let mut at = offset_of(tree.text().as_str(), "    }");
    for c in "if (a < b) { return; }".chars() {
        let text = c.to_string();
        tree = assert_incremental(&tree, &[TextChange::insert(at, text.as_str())]);
        at += TextSize::of(text.as_str());
    }
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());

    // and deleting it again from the front
    let start = offset_of(tree.text().as_str(), "if");
    for _ in 0.."if (a < b) { return; }".len() {
        tree = assert_incremental(&tree, &[TextChange::delete(TextRange::at(start, 1.into()))]);
    }
    assert_eq!(tree.text().as_str(), "class C\n{\n    void M()\n    {\n    }\n}\n");
}

#[test]
fn reuse_disabled() {
    let options = ParseOptions::default().with_node_reuse(false);
    let tree = SyntaxTree::parse(PROGRAM, options);
    let edited = assert_incremental(&tree, &[edit_program("Origin", 6, "Zero")]);
    let grid = |tree: &SyntaxTree| {
        tree.root()
            .descendants()
            .find(|node| node.kind() == SyntaxKind::StructDeclaration)
            .unwrap()
    };
    assert!(!grid(&tree).green().ptr_eq(grid(&edited).green()));
    assert_eq!(edited.options(), &options);
}

#[test]
fn depth_limit_is_respected_by_reuse() {
    let options = ParseOptions::default().with_max_depth(12);
    let text = "class A { void M() { if (a) { if (b) { x = (((y))); } } } }\nclass B { }\n";
    let tree = SyntaxTree::parse(text, options);
    let edited = assert_incremental(&tree, &[TextChange::insert(offset_of(text, "class B"), "\n")]);
    assert_eq!(
        edited
            .diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.code == DiagnosticCode::TooDeeplyNested),
        tree.diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.code == DiagnosticCode::TooDeeplyNested)
    );
}

#[test]
fn unchanged_members_are_shared() {
    let tree = parse(PROGRAM);
    let edited = assert_incremental(&tree, &[edit_program("10 ?", 2, "20")]);

    let namespace = |tree: &SyntaxTree| tree.root().children().nth(2).unwrap();
    let old = namespace(&tree);
    let new = namespace(&edited);
    let old_point = old.children().find(|node| node.kind() == SyntaxKind::ClassDeclaration).unwrap();
    let new_point = new.children().find(|node| node.kind() == SyntaxKind::ClassDeclaration).unwrap();
    assert!(old_point.green().ptr_eq(new_point.green()));
    let old_shape = old.last_child().unwrap();
    let new_shape = new.last_child().unwrap();
    assert_eq!(new_shape.kind(), SyntaxKind::InterfaceDeclaration);
    assert!(old_shape.green().ptr_eq(new_shape.green()));
}

#[test]
fn free_parse_function() {
    let first = parse_file(PROGRAM, None, &[]).unwrap();
    let change = edit_program("Origin", 6, "Zero");
    let text = apply(PROGRAM, &[change.clone()]);
    let second = parse_file(text.as_str(), Some(&first), &[change]).unwrap();
    let full = SyntaxTree::parse_with_interner(text.as_str(), ParseOptions::default(), first.interner().clone());
    assert_eq!(second.green(), full.green());
}

#[test]
fn old_tree_stays_valid() {
    let tree = parse(PROGRAM);
    let before = tree.root().debug(true);
    let edited = tree.with_changes(&[edit_program("Origin", 6, "Zero")]).unwrap();
    assert_eq!(tree.root().debug(true), before);
    assert_eq!(tree.root().full_text(), PROGRAM);
    assert_ne!(edited.root().full_text(), PROGRAM);
}

#[test]
fn text_that_disagrees_with_the_changes() {
    let first = parse_file(PROGRAM, None, &[]).unwrap();
    let change = edit_program("Origin", 6, "Zero");
    // same length as the edited text, but `Shapes` was renamed as well
    let text = apply(PROGRAM, &[change.clone()]).replacen("Shapes", "Things", 1);
    let second = parse_file(text.as_str(), Some(&first), &[change]).unwrap();
    assert_eq!(second.root().full_text(), text);
    let full = SyntaxTree::parse_with_interner(text.as_str(), ParseOptions::default(), first.interner().clone());
    assert_eq!(second.green(), full.green());
}
