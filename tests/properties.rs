//! Property tests over generated programs and edits.

mod common;

use common::{apply, assert_incremental, check_tree};
use proptest::prelude::*;
use sharptree::{SyntaxTree, TextChange, TextRange, TextSize};

/// Pieces of programs, well-formed or not. Concatenations of them exercise recovery as much as the happy path.
const FRAGMENTS: &[&str] = &[
    "class C { ",
    "struct S : I { ",
    "namespace N { ",
    "using A.B;\n",
    "}",
    "{",
    "int x = 1;\n",
    "public void M(int a, string b) { ",
    "return a + b * 2;",
    "if (a) b(); else { c = d ?? e; }\n",
    "for (int i = 0; i < n; i++) { }\n",
    "foreach (var v in list) total += v;",
    "while (x --> 0) ;",
    "x = $\"a{b}c{d ?? \"e\"}\";\n",
    "s = @\"verbatim \"\" text\";",
    "c = 'q';",
    "/* block */",
    "/* open ",
    "*/",
    "// line\n",
    "/// doc\n",
    "#if DEBUG\n",
    "#endif\n",
    "\n",
    "  ",
    "\"",
    "$\"",
    "(",
    ")",
    ";",
    "new int[3]",
    "a.b(c)[d]",
    "0x1F + 3.5e2",
    "\u{e4}bc",
    "\u{7}",
];

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24).prop_map(|parts| parts.concat())
}

/// Largest char boundary at or below `offset`.
fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// An edit of `text`, from a start fraction, a deletion length and an inserted fragment.
fn edit(text: &str, start: f64, delete: usize, insert: &str) -> TextChange {
    let start = floor_boundary(text, (text.len() as f64 * start) as usize);
    let end = floor_boundary(text, start + delete).max(start);
    TextChange::new(
        TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32)),
        insert,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn full_fidelity(text in program()) {
        let tree = SyntaxTree::parse_str(&text);
        check_tree(&tree);
    }

    #[test]
    fn arbitrary_text_round_trips(text in "\\PC{0,64}") {
        let tree = SyntaxTree::parse_str(&text);
        check_tree(&tree);
    }

    #[test]
    fn incremental_matches_full_parse(
        text in program(),
        start in 0.0..=1.0f64,
        delete in 0usize..12,
        insert in prop::sample::select(FRAGMENTS),
    ) {
        let tree = SyntaxTree::parse_str(&text);
        let change = edit(&text, start, delete, insert);
        let edited = assert_incremental(&tree, &[change.clone()]);
        prop_assert_eq!(edited.text().as_str(), apply(&text, &[change]));
    }

    #[test]
    fn repeated_edits(
        text in program(),
        edits in prop::collection::vec((0.0..=1.0f64, 0usize..6, prop::sample::select(FRAGMENTS)), 1..6),
    ) {
        let mut tree = SyntaxTree::parse_str(&text);
        for (start, delete, insert) in edits {
            let change = edit(tree.text().as_str(), start, delete, insert);
            tree = assert_incremental(&tree, &[change]);
        }
    }

    #[test]
    fn diff_round_trips(old in program(), new in program()) {
        let old_tree = SyntaxTree::parse_str(&old);
        let new_tree = SyntaxTree::parse_str(&new);
        let changes = old_tree.changes(&new_tree);
        prop_assert_eq!(apply(&old, &changes), new.clone());
    }

    #[test]
    fn diff_of_an_edit_round_trips(
        text in program(),
        start in 0.0..=1.0f64,
        delete in 0usize..12,
        insert in prop::sample::select(FRAGMENTS),
    ) {
        let tree = SyntaxTree::parse_str(&text);
        let edited = tree.with_changes(&[edit(&text, start, delete, insert)]).unwrap();
        let changes = tree.changes(&edited);
        prop_assert_eq!(apply(&text, &changes), edited.text().as_str().to_owned());
    }
}
