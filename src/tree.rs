//! Parsed source files.

use std::{fmt, sync::Arc};

use text_size::TextSize;

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    diff,
    green::{new_interner, GreenNode, TokenInterner},
    incremental,
    lexer::Lexer,
    parser,
    text::validate_changes,
    ParseOptions, SourceText, SyntaxNode, TextChange, TextChangeRange, TextError,
};

/// A source text together with its syntax tree.
///
/// Trees are immutable. Editing produces a new tree through [`with_changes`](SyntaxTree::with_changes), which reuses
/// the unchanged parts of this one; this tree stays valid and can be read concurrently while that happens.
///
/// ```
/// use sharptree::{SyntaxKind, SyntaxTree, TextChange};
///
/// let tree = SyntaxTree::parse_str("class C { void M() { } }");
/// assert_eq!(tree.root().kind(), SyntaxKind::CompilationUnit);
/// assert!(tree.diagnostics().is_empty());
///
/// let edited = tree.with_changes(&[TextChange::insert(21.into(), "return;")]).unwrap();
/// assert_eq!(edited.text().as_str(), "class C { void M() { return;} }");
/// ```
#[derive(Clone)]
pub struct SyntaxTree {
    text:    SourceText,
    root:    SyntaxNode,
    options: ParseOptions,
}

impl SyntaxTree {
    /// Parses `text` with a fresh interner.
    pub fn parse(text: impl Into<SourceText>, options: ParseOptions) -> SyntaxTree {
        Self::parse_with_interner(text, options, new_interner())
    }

    /// Parses `text` with default options.
    pub fn parse_str(text: &str) -> SyntaxTree {
        Self::parse(text, ParseOptions::default())
    }

    /// Parses `text`, interning token text into `interner`. Trees sharing an interner can be compared by their green
    /// nodes directly.
    pub fn parse_with_interner(
        text: impl Into<SourceText>,
        options: ParseOptions,
        interner: Arc<TokenInterner>,
    ) -> SyntaxTree {
        let text = text.into();
        let _span = tracing::debug_span!("parse", len = ?text.len()).entered();
        let parsed = {
            let lexer =
                Lexer::new(text.as_str(), &interner).with_documentation_comments(options.documentation_comments);
            parser::parse(lexer, &options)
        };
        Self::from_parts(text, parsed.root, interner, options)
    }

    fn from_parts(text: SourceText, green: GreenNode, interner: Arc<TokenInterner>, options: ParseOptions) -> Self {
        debug_assert_eq!(green.full_width(), text.len(), "tree does not cover its text");
        SyntaxTree {
            text,
            root: SyntaxNode::new_root(green, interner),
            options,
        }
    }

    /// Applies `changes` to the text and parses the result incrementally.
    pub fn with_changes(&self, changes: &[TextChange]) -> Result<SyntaxTree, TextError> {
        let text = self.text.with_changes(changes)?;
        self.with_text(text, changes)
    }

    /// Parses `text`, which must be this tree's text with `changes` applied, reusing what is unchanged.
    pub fn with_text(&self, text: SourceText, changes: &[TextChange]) -> Result<SyntaxTree, TextError> {
        self.reparse(text, changes, self.options)
    }

    /// Like [`with_text`](SyntaxTree::with_text), but parses with `options`. If they differ from the options this
    /// tree was parsed with, nothing is reused.
    pub fn reparse(
        &self,
        text: SourceText,
        changes: &[TextChange],
        options: ParseOptions,
    ) -> Result<SyntaxTree, TextError> {
        validate_changes(self.text.as_str(), changes)?;
        let interner = self.interner().clone();
        if options != self.options {
            tracing::trace!("options changed, falling back to a full parse");
            return Ok(Self::parse_with_interner(text, options, interner));
        }

        let Some(change) = TextChangeRange::collapse(changes) else {
            if text.content_eq(&self.text) {
                return Ok(self.clone());
            }
            tracing::trace!("text changed without changes, falling back to a full parse");
            return Ok(Self::parse_with_interner(text, options, interner));
        };
        if expected_len(self.text.len(), changes) != Some(text.len())
            || !unchanged_outside(self.text.as_str(), text.as_str(), change)
        {
            tracing::trace!("changes do not describe the new text, falling back to a full parse");
            return Ok(Self::parse_with_interner(text, options, interner));
        }

        let _span = tracing::debug_span!("reparse", len = ?text.len()).entered();
        let parsed = incremental::reparse(
            self.green(),
            self.text.as_str(),
            text.as_str(),
            change,
            &interner,
            &options,
        );
        Ok(Self::from_parts(text, parsed.root, interner, options))
    }

    #[inline]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    #[inline]
    pub fn green(&self) -> &GreenNode {
        self.root.green()
    }

    #[inline]
    pub fn text(&self) -> &SourceText {
        &self.text
    }

    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    #[inline]
    pub fn interner(&self) -> &Arc<TokenInterner> {
        self.root.interner()
    }

    /// All diagnostics of the tree, ordered by position.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.root.diagnostics()
    }

    pub fn report_diagnostics(&self, sink: &mut dyn DiagnosticSink) {
        self.root.report_diagnostics(sink)
    }

    /// Text changes that turn this tree's text into `other`'s, found by comparing the token streams of both trees.
    pub fn changes(&self, other: &SyntaxTree) -> Vec<TextChange> {
        diff::changes(self, other)
    }
}

/// Length of a text of length `len` after applying `changes`, if they fit.
fn expected_len(len: TextSize, changes: &[TextChange]) -> Option<TextSize> {
    changes.iter().try_fold(len, |len, change| {
        len.checked_sub(change.span.len())?.checked_add(change.new_len())
    })
}

/// Whether `new` agrees with `old` before and after the edited region of `change`.
fn unchanged_outside(old: &str, new: &str, change: TextChangeRange) -> bool {
    let (old, new) = (old.as_bytes(), new.as_bytes());
    let start = usize::from(change.span.start());
    let prefix = old.get(..start) == new.get(..start);
    let suffix = old.get(usize::from(change.span.end())..) == new.get(usize::from(change.new_end())..);
    prefix && suffix
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("len", &self.text.len())
            .field("root", &self.root)
            .field("options", &self.options)
            .finish()
    }
}

/// Parses `text`. With a `previous` tree of which `text` is the edited version, the parse is incremental and keeps
/// the previous tree's options and interner.
pub fn parse(
    text: impl Into<SourceText>,
    previous: Option<&SyntaxTree>,
    changes: &[TextChange],
) -> Result<SyntaxTree, TextError> {
    match previous {
        Some(previous) => previous.with_text(text.into(), changes),
        None => Ok(SyntaxTree::parse(text, ParseOptions::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextRange;

    #[test]
    fn no_changes_keep_the_tree() {
        let tree = SyntaxTree::parse_str("int x = 1;");
        let same = tree.with_changes(&[]).unwrap();
        assert!(same.green().ptr_eq(tree.green()));
    }

    #[test]
    fn invalid_changes_are_errors() {
        let tree = SyntaxTree::parse_str("int x = 1;");
        let change = TextChange::new(TextRange::new(5.into(), 20.into()), "y");
        assert!(matches!(
            tree.with_changes(&[change]),
            Err(TextError::InvalidChangeRange { .. })
        ));
    }

    #[test]
    fn mismatched_text_falls_back_to_full_parse() {
        let tree = SyntaxTree::parse_str("int x = 1;");
        let edited = tree
            .with_text(SourceText::new("int yy = 2;"), &[TextChange::insert(4.into(), "y")])
            .unwrap();
        assert_eq!(edited.root().full_text(), "int yy = 2;");
        assert!(edited.diagnostics().is_empty());

        // same length, but the text before the change differs too
        let edited = tree
            .with_text(SourceText::new("var yx = 1;"), &[TextChange::insert(4.into(), "y")])
            .unwrap();
        assert_eq!(edited.root().full_text(), "var yx = 1;");
        assert_eq!(edited.text().as_str(), "var yx = 1;");
    }

    #[test]
    fn changed_options_reparse_everything() {
        let tree = SyntaxTree::parse_str("/// doc\nint x;");
        let options = ParseOptions::default().with_documentation_comments(false);
        let reparsed = tree.reparse(tree.text().clone(), &[], options).unwrap();
        assert_eq!(reparsed.options(), &options);
        assert!(!reparsed.green().ptr_eq(tree.green()));
        assert_eq!(reparsed.root().full_text(), tree.root().full_text());
    }

    #[test]
    fn free_function() {
        let first = parse("a = 1;", None, &[]).unwrap();
        let second = parse("a = 12;", Some(&first), &[TextChange::insert(5.into(), "2")]).unwrap();
        assert_eq!(second.text().as_str(), "a = 12;");
        assert!(Arc::ptr_eq(first.interner(), second.interner()));
    }
}
