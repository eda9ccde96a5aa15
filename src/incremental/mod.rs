//! Incremental reparsing.
//!
//! After an edit, only the region around the change is lexed again. Old tokens are replayed in front of a restart
//! point, and again behind the point where freshly lexed tokens line up with old ones. Where the parser stands in
//! such an unchanged region, whole subtrees of the old tree are spliced into the new one. The result is the same tree
//! a full parse of the new text produces.

mod blender;
mod cursor;

use text_size::TextSize;

use self::blender::Blender;
use crate::{
    green::{GreenFlags, GreenNode, TokenInterner},
    lexer::LEXER_LOOKAHEAD,
    parser::{self, Parsed},
    ParseOptions, TextChangeRange,
};

/// Parses `new_text`, which is `old_text` with `change` applied, reusing what it can of `old_root`.
pub(crate) fn reparse(
    old_root: &GreenNode,
    old_text: &str,
    new_text: &str,
    change: TextChangeRange,
    interner: &TokenInterner,
    options: &ParseOptions,
) -> Parsed {
    let (restart, reuse_limit) = restart_point(old_root, change.span.start());
    let mut blender = Blender::new(
        old_root,
        old_text,
        new_text,
        change,
        restart,
        reuse_limit,
        interner,
        options.documentation_comments,
    );
    let parsed = parser::parse(&mut blender, options);
    tracing::debug!(
        affected = ?change.span,
        new_len = ?change.new_len,
        ?restart,
        ?reuse_limit,
        resync = ?blender.resync(),
        reused_nodes = parsed.reused_nodes,
        "incremental parse",
    );
    parsed
}

/// Where relexing starts for a change at `change_start`, and the end of the region in front of it whose nodes may be
/// reused.
///
/// The restart point is a token boundary at least one whole token and [`LEXER_LOOKAHEAD`] bytes in front of the
/// change, and never inside an interpolated string. Nodes may be reused in front of it only if they end two more
/// tokens earlier, since the parser looks at the token after a statement to find an `else`.
pub(crate) fn restart_point(root: &GreenNode, change_start: TextSize) -> (TextSize, TextSize) {
    let zero = TextSize::from(0);
    if change_start == zero {
        return (zero, zero);
    }
    let touching = cursor::token_at(root, change_start - TextSize::from(1)).map_or(zero, |(start, _)| start);
    let mut restart = cursor::step_back(root, touching);
    while restart > zero {
        let too_close = change_start - restart < LEXER_LOOKAHEAD;
        let in_interpolation = cursor::token_at(root, restart)
            .map_or(false, |(_, token)| token.flags().contains(GreenFlags::IN_INTERPOLATION));
        if !too_close && !in_interpolation {
            break;
        }
        restart = cursor::step_back(root, restart);
    }
    let reuse_limit = cursor::step_back(root, cursor::step_back(root, restart));
    (restart, reuse_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{green::new_interner, lexer::Lexer, SourceText, TextChange};
    use text_size::TextRange;

    /// Reparses after `change` and checks the result against a full parse. Returns old and new roots.
    fn check(old_text: &str, change: TextChange) -> (GreenNode, GreenNode) {
        let interner = new_interner();
        let options = ParseOptions::default();
        let old_root = parser::parse(Lexer::new(old_text, &interner), &options).root;
        let new_text = SourceText::new(old_text).with_changes(&[change.clone()]).unwrap();
        let range = TextChangeRange::collapse(&[change]).unwrap();

        let incremental = reparse(&old_root, old_text, new_text.as_str(), range, &interner, &options).root;
        let full = parser::parse(Lexer::new(new_text.as_str(), &interner), &options).root;
        assert_eq!(incremental, full, "incremental and full parse differ for {:?}", new_text.as_str());
        (old_root, incremental)
    }

    fn statement(root: &GreenNode, index: usize) -> GreenNode {
        root.children().nth(index).and_then(|child| child.into_node()).unwrap().clone()
    }

    #[test]
    fn restart_is_in_front_of_the_change() {
        let interner = new_interner();
        let text = "a = 1;\nbb = 2;\nccc = 3;\ndddd = 4;\n";
        let root = parser::parse(Lexer::new(text, &interner), &ParseOptions::default()).root;
        assert_eq!(restart_point(&root, 0.into()), (0.into(), 0.into()));

        // change inside `dddd`, at 25
        let (restart, limit) = restart_point(&root, 26.into());
        assert!(restart <= TextSize::from(26) - LEXER_LOOKAHEAD);
        assert!(limit < restart);
        assert!(cursor::token_at(&root, restart).is_some_and(|(start, _)| start == restart));
    }

    #[test]
    fn unchanged_statements_are_reused() {
        let text = "a = 1;\nb = 2;\nc = 3;\nd = 4;\ne = 5;\nf = 6;\ng = 7;\nh = 8;\n";
        let (old, new) = check(text, TextChange::insert(44.into(), " "));
        assert!(statement(&old, 0).ptr_eq(&statement(&new, 0)));
        assert!(statement(&old, 7).ptr_eq(&statement(&new, 7)));
    }

    #[test]
    fn edits() {
        let text = "class C {\n  void M() {\n    if (a) b(); else c();\n    x = $\"v{y}\";\n  }\n  int f;\n}\n";
        let offset = |needle: &str| TextSize::of(&text[..text.find(needle).unwrap()]);
        check(text, TextChange::insert(offset("b()"), "bb"));
        check(text, TextChange::insert(offset("else"), "}"));
        check(text, TextChange::new(TextRange::at(offset("y}"), 1.into()), "z + 1"));
        check(text, TextChange::insert(offset("v{"), "\""));
        check(text, TextChange::insert(offset("int f"), "/* "));
        check(text, TextChange::insert(offset("int f"), "#if X\n"));
        check(text, TextChange::delete(TextRange::at(offset("if"), 2.into())));
        check(text, TextChange::delete(TextRange::up_to(TextSize::of(text))));
        check(text, TextChange::insert(0.into(), "using A;\n"));
        check(text, TextChange::insert(TextSize::of(text), "class D { }"));
    }
}
