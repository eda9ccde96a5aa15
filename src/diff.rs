//! Text changes between two syntax trees.
//!
//! Subtrees shared by both trees are skipped without looking at their text. What remains in between is compared
//! token by token with a Myers diff, and runs of tokens without a counterpart become text changes.

use std::sync::Arc;

use similar::{Algorithm, DiffOp};
use text_size::{TextRange, TextSize};

use crate::{
    green::{GreenElementRef, GreenNode},
    NodeOrToken, SyntaxTree, TextChange,
};

/// Changes that turn the text of `old` into the text of `new`, ordered and non-overlapping.
pub(crate) fn changes(old: &SyntaxTree, new: &SyntaxTree) -> Vec<TextChange> {
    if old.green().ptr_eq(new.green()) {
        return Vec::new();
    }
    let (old_text, new_text) = (old.text().as_str(), new.text().as_str());
    let same_interner = Arc::ptr_eq(old.interner(), new.interner());

    let old_len = TextSize::of(old_text);
    let new_len = TextSize::of(new_text);
    let prefix = shared_edge(old.green(), new.green(), same_interner, Edge::Start);
    let suffix = shared_edge(old.green(), new.green(), same_interner, Edge::End)
        .min(old_len - prefix)
        .min(new_len - prefix);

    let old_window = TextRange::new(prefix, old_len - suffix);
    let new_window = TextRange::new(prefix, new_len - suffix);
    let mut old_pieces = Vec::new();
    token_pieces(old.green(), 0.into(), old_window, &mut old_pieces);
    let mut new_pieces = Vec::new();
    token_pieces(new.green(), 0.into(), new_window, &mut new_pieces);

    let mut changes = Vec::new();
    let mut emit = |old_span: TextRange, new_span: TextRange| {
        if let Some(change) = trimmed_change(old_text, new_text, old_span, new_span) {
            changes.push(change);
        }
    };

    let old_slices: Vec<&str> = old_pieces.iter().map(|&range| &old_text[range]).collect();
    let new_slices: Vec<&str> = new_pieces.iter().map(|&range| &new_text[range]).collect();
    let ops = similar::capture_diff_slices(Algorithm::Myers, &old_slices, &new_slices);
    tracing::trace!(
        old_tokens = old_pieces.len(),
        new_tokens = new_pieces.len(),
        ops = ops.len(),
        "diffed token windows"
    );

    // everything between two equal runs forms one change
    let (mut old_at, mut new_at) = (old_window.start(), new_window.start());
    for op in ops {
        let DiffOp::Equal {
            old_index,
            new_index,
            len,
        } = op
        else {
            continue;
        };
        emit(
            TextRange::new(old_at, old_pieces[old_index].start()),
            TextRange::new(new_at, new_pieces[new_index].start()),
        );
        old_at = old_pieces[old_index + len - 1].end();
        new_at = new_pieces[new_index + len - 1].end();
    }
    emit(
        TextRange::new(old_at, old_window.end()),
        TextRange::new(new_at, new_window.end()),
    );
    changes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

fn same_element(old: GreenElementRef<'_>, new: GreenElementRef<'_>, same_interner: bool) -> bool {
    match (old, new) {
        (NodeOrToken::Node(old), NodeOrToken::Node(new)) => old.ptr_eq(new) || (same_interner && old == new),
        (NodeOrToken::Token(old), NodeOrToken::Token(new)) => old.ptr_eq(new) || (same_interner && old == new),
        _ => false,
    }
}

/// Length of the text at one edge of both trees that is covered by identical elements.
fn shared_edge(old: &GreenNode, new: &GreenNode, same_interner: bool, edge: Edge) -> TextSize {
    let mut len = TextSize::from(0);
    let (mut old, mut new) = (old, new);
    'descend: loop {
        let pairs: Vec<_> = match edge {
            Edge::Start => old.children().zip(new.children()).collect(),
            Edge::End => old.children().rev().zip(new.children().rev()).collect(),
        };
        for (old_child, new_child) in pairs {
            if same_element(old_child, new_child, same_interner) {
                len += old_child.full_width();
                continue;
            }
            match (old_child, new_child) {
                (NodeOrToken::Node(old_child), NodeOrToken::Node(new_child)) => {
                    old = old_child;
                    new = new_child;
                    continue 'descend;
                }
                _ => break 'descend,
            }
        }
        break;
    }
    len
}

/// Full spans of the tokens of `node` overlapping `window`, clipped to it. Empty pieces are left out.
fn token_pieces(node: &GreenNode, offset: TextSize, window: TextRange, out: &mut Vec<TextRange>) {
    let mut offset = offset;
    for child in node.children() {
        let span = TextRange::at(offset, child.full_width());
        offset = span.end();
        if span.end() <= window.start() || span.is_empty() {
            continue;
        }
        if span.start() >= window.end() {
            break;
        }
        match child {
            NodeOrToken::Node(child) => token_pieces(child, span.start(), window, out),
            NodeOrToken::Token(_) => {
                if let Some(piece) = span.intersect(window).filter(|piece| !piece.is_empty()) {
                    out.push(piece);
                }
            }
        }
    }
}

/// A change replacing `old_span` with the text at `new_span`, shrunk by the characters both share at their ends.
fn trimmed_change(old_text: &str, new_text: &str, old_span: TextRange, new_span: TextRange) -> Option<TextChange> {
    let old = &old_text[old_span];
    let new = &new_text[new_span];
    if old == new {
        return None;
    }
    let prefix: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();
    let suffix: usize = old[prefix..]
        .chars()
        .rev()
        .zip(new[prefix..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();

    let start = old_span.start() + TextSize::from(prefix as u32);
    let end = old_span.end() - TextSize::from(suffix as u32);
    let inserted = &new[prefix..new.len() - suffix];
    Some(TextChange::new(TextRange::new(start, end), inserted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceText;

    fn apply(text: &SourceText, changes: &[TextChange]) -> String {
        text.with_changes(changes).unwrap().as_str().to_owned()
    }

    #[test]
    fn identical_trees_have_no_changes() {
        let tree = SyntaxTree::parse_str("class C { int x; }");
        assert!(tree.changes(&tree).is_empty());
        let again = SyntaxTree::parse_str("class C { int x; }");
        assert!(tree.changes(&again).is_empty());
    }

    #[test]
    fn single_token_change_is_trimmed() {
        let old = SyntaxTree::parse_str("class C { int count = 1; }");
        let new = old.with_changes(&[TextChange::insert(19.into(), "er")]).unwrap();
        let changes = old.changes(&new);
        assert_eq!(changes, vec![TextChange::insert(19.into(), "er")]);
    }

    #[test]
    fn unrelated_trees() {
        let old = SyntaxTree::parse_str("a = 1; b = 2; c = 3;");
        let new = SyntaxTree::parse_str("a = 1; c = 3; d = 4;");
        let changes = old.changes(&new);
        assert!(changes.windows(2).all(|pair| pair[0].span.end() <= pair[1].span.start()));
        assert_eq!(apply(old.text(), &changes), "a = 1; c = 3; d = 4;");
    }

    #[test]
    fn edits_at_both_ends() {
        let old = SyntaxTree::parse_str("x = \"ü\";\ny = 2;\n");
        let new = SyntaxTree::parse_str("// head\nx = \"ö\";\ny = 2;\nz = 3;\n");
        let changes = old.changes(&new);
        assert_eq!(apply(old.text(), &changes), new.text().as_str());
    }

    #[test]
    fn large_windows_are_diffed_token_by_token() {
        let body: String = (0..1_000).map(|i| format!("v{i} = {i};\n")).collect();
        let old = SyntaxTree::parse_str(&format!("a = 0;\n{body}z = 0;\n"));
        let new = SyntaxTree::parse_str(&format!("a = 1;\n{body}z = 1;\n"));
        let changes = old.changes(&new);
        let end = u32::from(old.text().len());
        assert_eq!(
            changes,
            vec![
                TextChange::new(TextRange::new(4.into(), 5.into()), "1"),
                TextChange::new(TextRange::new((end - 3).into(), (end - 2).into()), "1"),
            ]
        );
        assert_eq!(apply(old.text(), &changes), new.text().as_str());
    }
}
